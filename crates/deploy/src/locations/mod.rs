//! Grouping of matching hosts into user-facing locations.
//!
//! Hosts at the same site whose computed price for the request is identical
//! collapse into one [`LocationInfo`] with their GPU stock summed. Hosts that
//! satisfy the request with a different GPU model land in a separate
//! "suggested" map built the same way.

mod rank;

pub use rank::rank;

use crate::pricing::{compute_price, UnitPrices};
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;
use shared::catalog::Catalog;
use shared::models::gpu::parse_vram_gb;
use shared::models::hostnode::{GpuOffer, Inventory};
use shared::models::location::{Availability, LocationHost, LocationInfo, LocationKey};
use shared::models::spec::DeploySpec;

pub type LocationMap = IndexMap<LocationKey, LocationInfo>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Hosts offering the requested model.
    pub locations: LocationMap,
    /// Hosts offering another model that still satisfies the request.
    pub suggested: LocationMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedLocations {
    pub locations: Vec<LocationInfo>,
    pub suggested: Vec<LocationInfo>,
}

/// Requirements derived once from the requested model.
struct GpuRequirement {
    count: u32,
    vram: Option<u32>,
    rtx: bool,
}

impl GpuRequirement {
    fn new(spec: &DeploySpec, catalog: &Catalog) -> Self {
        Self {
            count: spec.gpu_count,
            vram: parse_vram_gb(&spec.gpu_model),
            rtx: catalog.is_rtx_family(&spec.gpu_model),
        }
    }

    fn meets(&self, offer: &GpuOffer) -> bool {
        if offer.amount < self.count {
            return false;
        }
        if self.vram.is_some_and(|vram| offer.vram < vram) {
            return false;
        }
        !(self.rtx && !offer.rtx)
    }
}

pub fn aggregate(spec: &DeploySpec, inventory: &Inventory, catalog: &Catalog) -> Aggregation {
    let requirement = GpuRequirement::new(spec, catalog);
    let mut aggregation = Aggregation::default();

    for (host_id, entry) in inventory {
        for (model, offer) in &entry.specs.gpu {
            if !requirement.meets(offer) {
                debug!("Skipping {model} on {host_id}: does not meet {spec}");
                continue;
            }

            let Some(prices) = UnitPrices::for_host(&entry.specs, model) else {
                continue;
            };
            let price = compute_price(&prices, spec).total;
            let key = LocationKey::new(entry.location.id.clone(), price);

            let bucket = if *model == spec.gpu_model {
                &mut aggregation.locations
            } else {
                &mut aggregation.suggested
            };

            match bucket.entry(key) {
                Entry::Occupied(mut occupied) => {
                    let location = occupied.get_mut();
                    location.stock += offer.amount;
                    location.availability = Availability::from_stock(location.stock);
                    if !location.contains_host(host_id) {
                        location
                            .hostnodes
                            .push(LocationHost::from_entry(host_id, entry));
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(LocationInfo {
                        availability: Availability::from_stock(offer.amount),
                        location: entry.location.to_string(),
                        price,
                        gpu_type: model.clone(),
                        stock: offer.amount,
                        cpu_type: entry.specs.cpu.cpu_type.clone(),
                        hostnodes: vec![LocationHost::from_entry(host_id, entry)],
                    });
                }
            }
        }
    }

    aggregation
}

/// Aggregates and ranks both buckets.
pub fn generate_locations(
    spec: &DeploySpec,
    inventory: &Inventory,
    catalog: &Catalog,
) -> RankedLocations {
    let Aggregation {
        locations,
        suggested,
    } = aggregate(spec, inventory, catalog);
    RankedLocations {
        locations: rank(locations.into_values()),
        suggested: rank(suggested.into_values()),
    }
}
