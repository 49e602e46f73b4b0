//! Pricing and host matching for GPU virtual machine deployments.
//!
//! Everything in this crate is a pure function over an inventory snapshot and
//! the catalog. Nothing here performs I/O or returns errors; problems with a
//! request come back as data in an [`validation::IssueReport`].

pub mod locations;
pub mod presets;
pub mod pricing;
pub mod selection;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
