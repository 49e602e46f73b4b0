use serde::Serialize;
use shared::models::hostnode::HostSpecs;
use shared::models::spec::DeploySpec;

/// Hourly USD price of one unit of each resource on a host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitPrices {
    pub gpu: f64,
    pub ram: f64,
    pub cpu: f64,
    pub storage: f64,
}

impl UnitPrices {
    /// Prices for `gpu_model` on a host. `None` when the host does not offer it.
    pub fn for_host(specs: &HostSpecs, gpu_model: &str) -> Option<Self> {
        let gpu = specs.gpu.get(gpu_model)?;
        Some(Self {
            gpu: gpu.price,
            ram: specs.ram.price,
            cpu: specs.cpu.price,
            storage: specs.storage.price,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceBreakdown {
    pub gpu_total: f64,
    pub ram_total: f64,
    pub cpu_total: f64,
    pub storage_total: f64,
    pub total: f64,
}

/// Rounds half away from zero on the value scaled by 1000.
pub fn round_thousandths(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Each sub-total is rounded on its own; the total is the plain sum of the
/// rounded parts and is not rounded again.
pub fn compute_price(prices: &UnitPrices, spec: &DeploySpec) -> PriceBreakdown {
    let gpu_total = round_thousandths(prices.gpu * f64::from(spec.gpu_count));
    let ram_total = round_thousandths(prices.ram * f64::from(spec.ram));
    let cpu_total = round_thousandths(prices.cpu * f64::from(spec.vcpu));
    let storage_total = round_thousandths(prices.storage * f64::from(spec.storage));

    PriceBreakdown {
        gpu_total,
        ram_total,
        cpu_total,
        storage_total,
        total: gpu_total + ram_total + cpu_total + storage_total,
    }
}
