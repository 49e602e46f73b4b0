//! Host selection for the fixed preset bundles.

use crate::pricing::{compute_price, UnitPrices};
use log::debug;
use serde::Serialize;
use shared::catalog::Catalog;
use shared::models::hostnode::{HostnodeEntry, Inventory};
use shared::models::preset::{DeployConfiguration, PresetMatch};

/// Capacity that must stay free next to every GPU a preset leaves unallocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyReserve {
    /// GB
    pub ram: u32,
    pub cpu: u32,
    /// GB
    pub storage: u32,
}

impl Default for SafetyReserve {
    fn default() -> Self {
        Self {
            ram: 64,
            cpu: 16,
            storage: 600,
        }
    }
}

impl SafetyReserve {
    /// GPU amount of the preset's model on the host if the host can take the
    /// preset and still keep the reserve for each unused GPU.
    fn fits(&self, preset: &DeployConfiguration, host: &HostnodeEntry) -> Option<u32> {
        let amount = host.specs.gpu.get(&preset.gpu_model)?.amount;
        let unused = u64::from(amount.checked_sub(preset.gpu_count)?);

        let keeps = |total: u32, requested: u32, per_gpu: u32| {
            total
                .checked_sub(requested)
                .is_some_and(|left| u64::from(left) >= u64::from(per_gpu) * unused)
        };

        let specs = &host.specs;
        (keeps(specs.ram.amount, preset.ram, self.ram)
            && keeps(specs.cpu.amount, preset.vcpu, self.cpu)
            && keeps(specs.storage.amount, preset.storage, self.storage))
        .then_some(amount)
    }
}

struct Candidate<'a> {
    host_id: &'a str,
    amount: u32,
    price: f64,
}

impl Candidate<'_> {
    /// Strictly cheaper wins; a host with fewer GPUs also wins at an equal price.
    fn beats(&self, best: &Self) -> bool {
        self.price < best.price || (self.amount < best.amount && self.price <= best.price)
    }
}

fn match_preset(
    index: usize,
    preset: &DeployConfiguration,
    inventory: &Inventory,
    reserve: &SafetyReserve,
) -> PresetMatch {
    let spec = preset.spec();
    let mut best: Option<Candidate<'_>> = None;

    for (host_id, host) in inventory {
        let Some(amount) = reserve.fits(preset, host) else {
            continue;
        };
        let Some(prices) = UnitPrices::for_host(&host.specs, &preset.gpu_model) else {
            continue;
        };
        let candidate = Candidate {
            host_id,
            amount,
            price: compute_price(&prices, &spec).total,
        };
        if best.as_ref().is_none_or(|best| candidate.beats(best)) {
            best = Some(candidate);
        }
    }

    match best {
        Some(best) => {
            debug!(
                "Preset {index} ({spec}) -> {} at ${}/hr",
                best.host_id, best.price
            );
            PresetMatch {
                index,
                configuration: preset.clone(),
                hostnode: Some(best.host_id.to_string()),
                stock: true,
                price: best.price,
            }
        }
        None => {
            debug!("Preset {index} ({spec}) is out of stock");
            PresetMatch::out_of_stock(index, preset.clone())
        }
    }
}

/// Annotates a fresh copy of every preset with its best host for this snapshot.
pub fn match_presets(
    presets: &[DeployConfiguration],
    inventory: &Inventory,
    reserve: &SafetyReserve,
) -> Vec<PresetMatch> {
    presets
        .iter()
        .enumerate()
        .map(|(index, preset)| match_preset(index, preset, inventory, reserve))
        .collect()
}

/// An in-stock preset ready to be listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPreset {
    pub index: usize,
    pub gpu_name: String,
    pub configuration: DeployConfiguration,
    pub hostnode: String,
    pub price: f64,
}

pub fn display_presets(matches: &[PresetMatch], catalog: &Catalog) -> Vec<DisplayPreset> {
    matches
        .iter()
        .filter(|m| m.stock)
        .filter_map(|m| {
            Some(DisplayPreset {
                index: m.index,
                gpu_name: catalog.display_name(&m.configuration.gpu_model).to_string(),
                configuration: m.configuration.clone(),
                hostnode: m.hostnode.clone()?,
                price: m.price,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{host, H100};

    fn preset(gpu_count: u32, ram: u32) -> DeployConfiguration {
        DeployConfiguration {
            gpu_count,
            gpu_model: H100.to_string(),
            ram,
            vcpu: 8,
            storage: 100,
            nvlink: false,
            bandwidth: 10,
        }
    }

    fn small_host(gpus: u32, ram: u32, gpu_price: f64) -> HostnodeEntry {
        let mut entry = host("site-1", H100, gpus, gpu_price);
        entry.specs.ram.amount = ram;
        entry
    }

    #[test]
    fn test_reserve_blocks_stranding_capacity() {
        let inventory = Inventory::from([("host-a".to_string(), small_host(2, 128, 2.0))]);
        let reserve = SafetyReserve::default();

        // 128 - 100 = 28 GB left, but the unused GPU needs 64
        let matches = match_presets(&[preset(1, 100)], &inventory, &reserve);
        assert!(!matches[0].stock);
        assert_eq!(matches[0].hostnode, None);
        assert_eq!(matches[0].price, 0.0);

        // 128 - 60 = 68 GB left
        let matches = match_presets(&[preset(1, 60)], &inventory, &reserve);
        assert!(matches[0].stock);
        assert_eq!(matches[0].hostnode.as_deref(), Some("host-a"));
        assert_eq!(matches[0].price, 2.0);
    }

    #[test]
    fn test_full_host_needs_no_reserve() {
        let inventory = Inventory::from([("host-a".to_string(), small_host(2, 128, 2.0))]);
        let matches = match_presets(&[preset(2, 128)], &inventory, &SafetyReserve::default());
        assert!(matches[0].stock);
        assert_eq!(matches[0].price, 4.0);
    }

    #[test]
    fn test_picks_cheapest_host() {
        let inventory = Inventory::from([
            ("host-a".to_string(), small_host(1, 512, 2.5)),
            ("host-b".to_string(), small_host(1, 512, 1.5)),
            ("host-c".to_string(), small_host(1, 512, 2.0)),
        ]);
        let matches = match_presets(&[preset(1, 64)], &inventory, &SafetyReserve::default());
        assert_eq!(matches[0].hostnode.as_deref(), Some("host-b"));
        assert_eq!(matches[0].price, 1.5);
    }

    #[test]
    fn test_equal_price_prefers_fewer_gpus() {
        let inventory = Inventory::from([
            ("host-a".to_string(), small_host(8, 1024, 2.0)),
            ("host-b".to_string(), small_host(2, 1024, 2.0)),
            ("host-c".to_string(), small_host(4, 1024, 2.0)),
        ]);
        let matches = match_presets(&[preset(1, 64)], &inventory, &SafetyReserve::default());
        assert_eq!(matches[0].hostnode.as_deref(), Some("host-b"));
    }

    #[test]
    fn test_host_without_model_is_ineligible() {
        let inventory = Inventory::from([(
            "host-a".to_string(),
            host("site-1", "a100-pcie-80gb", 8, 0.1),
        )]);
        let matches = match_presets(&[preset(1, 64)], &inventory, &SafetyReserve::default());
        assert!(!matches[0].stock);
    }

    #[test]
    fn test_display_presets_hide_out_of_stock() {
        let inventory = Inventory::from([("host-a".to_string(), small_host(1, 512, 2.0))]);
        let matches = match_presets(
            &[preset(2, 64), preset(1, 64)],
            &inventory,
            &SafetyReserve::default(),
        );
        let shown = display_presets(&matches, &Catalog::default());

        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].index, 1);
        assert_eq!(shown[0].gpu_name, "H100 SXM5 80GB");
        assert_eq!(shown[0].hostnode, "host-a");
    }

    #[test]
    fn test_builtin_presets_match_large_host() {
        let mut entry = host("site-1", H100, 8, 2.0);
        entry.specs.ram.amount = 1024;
        entry.specs.cpu.amount = 256;
        entry.specs.storage.amount = 5000;
        let inventory = Inventory::from([("host-a".to_string(), entry)]);
        let catalog = Catalog::default();

        let matches = match_presets(&catalog.presets, &inventory, &SafetyReserve::default());
        let stock: Vec<_> = matches.iter().map(|m| m.stock).collect();
        // the larger bundle of each GPU count leaves too little storage behind
        assert_eq!(
            stock,
            vec![true, false, true, false, true, false, true, false]
        );
        assert_eq!(matches[6].price, 16.0);
    }
}
