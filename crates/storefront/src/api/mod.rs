pub(crate) mod client;
pub(crate) mod error;

pub(crate) use client::ApiClient;
pub(crate) use error::ApiError;
