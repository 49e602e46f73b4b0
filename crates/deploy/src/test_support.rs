use shared::models::hostnode::{
    Bounds, CpuOffer, GpuOffer, HostLocation, HostSpecs, HostStatus, HostnodeEntry, Networking,
    ResourceOffer, ResourceRestriction,
};
use shared::models::spec::DeploySpec;

pub(crate) const H100: &str = "h100-sxm5-80gb";
pub(crate) const RTX4090: &str = "geforcertx4090-pcie-24gb";

/// A host with one GPU model and generous RAM / CPU / storage.
pub(crate) fn host(site: &str, model: &str, gpus: u32, gpu_price: f64) -> HostnodeEntry {
    let mut entry = HostnodeEntry {
        location: HostLocation {
            id: site.to_string(),
            country: "United States".to_string(),
            region: "Texas".to_string(),
            city: "Dallas".to_string(),
            dc: None,
        },
        networking: Networking {
            ports: vec![20004, 20018, 20022],
            ..Default::default()
        },
        specs: HostSpecs {
            cpu: CpuOffer {
                amount: 128,
                cpu_type: "EPYC 7763".to_string(),
                price: 0.0,
            },
            ram: ResourceOffer {
                amount: 1024,
                price: 0.0,
            },
            storage: ResourceOffer {
                amount: 20000,
                price: 0.0,
            },
            ..Default::default()
        },
        status: HostStatus {
            online: true,
            listed: true,
            reserved: false,
            uptime: 0.99,
            report: None,
        },
    };
    entry.specs.gpu.insert(model.to_string(), gpu_offer(model, gpus, gpu_price));
    entry
}

pub(crate) fn gpu_offer(model: &str, amount: u32, price: f64) -> GpuOffer {
    GpuOffer {
        amount,
        price,
        vram: shared::models::gpu::parse_vram_gb(model).unwrap_or(0),
        rtx: model.contains("rtx"),
        gtx: false,
        pcie: model.contains("pcie"),
    }
}

pub(crate) fn restriction(
    cpu: (u32, u32),
    ram: (u32, u32),
    storage: (u32, u32),
) -> ResourceRestriction {
    ResourceRestriction {
        cpu: Bounds {
            min: cpu.0,
            max: cpu.1,
        },
        ram: Bounds {
            min: ram.0,
            max: ram.1,
        },
        storage: Bounds {
            min: storage.0,
            max: storage.1,
        },
    }
}

pub(crate) fn spec(model: &str, gpu_count: u32, ram: u32, vcpu: u32, storage: u32) -> DeploySpec {
    DeploySpec {
        gpu_model: model.to_string(),
        gpu_count,
        ram,
        vcpu,
        storage,
    }
}
