use crate::api::{ApiClient, ApiError};
use anyhow::Result;
use deploy::locations::{generate_locations, RankedLocations};
use deploy::selection::{reconcile_selection, SelectionState};
use log::{error, info, warn};
use shared::catalog::Catalog;
use shared::models::gpu::parse_vram_gb;
use shared::models::hostnode::InventoryQuery;
use shared::models::preset::DeployConfiguration;
use shared::models::spec::DeploySpec;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

/// Stock query for a custom spec: hosts must fit the whole request.
pub(crate) fn query_for(spec: &DeploySpec, catalog: &Catalog) -> InventoryQuery {
    InventoryQuery {
        min_gpu_count: spec.gpu_count,
        min_ram: spec.ram,
        min_vcpus: spec.vcpu,
        min_storage: spec.storage,
        min_vram: parse_vram_gb(&spec.gpu_model),
        requires_rtx: catalog.is_rtx_family(&spec.gpu_model),
        ..Default::default()
    }
}

/// Stock query used before validating a deploy. Only the GPU filters apply so
/// capacity problems surface as validation issues rather than a missing host.
pub(crate) fn query_for_model(gpu_model: &str, catalog: &Catalog) -> InventoryQuery {
    InventoryQuery {
        min_gpu_count: 1,
        min_ram: 1,
        min_vcpus: 1,
        min_storage: 1,
        min_vram: parse_vram_gb(gpu_model),
        requires_rtx: catalog.is_rtx_family(gpu_model),
        ..Default::default()
    }
}

/// Stock query covering every preset bundle: the loosest bound of each
/// resource across all presets, so no bundle is filtered out server-side.
pub(crate) fn preset_query(catalog: &Catalog) -> InventoryQuery {
    let presets = &catalog.presets;
    let min_of = |field: fn(&DeployConfiguration) -> u32| {
        presets.iter().map(field).min().unwrap_or(1).max(1)
    };
    // a preset model with no VRAM suffix leaves VRAM unfiltered
    let min_vram = presets
        .iter()
        .map(|p| parse_vram_gb(&p.gpu_model))
        .collect::<Option<Vec<u32>>>()
        .and_then(|vram| vram.into_iter().min());

    InventoryQuery {
        min_gpu_count: min_of(|p| p.gpu_count),
        min_ram: min_of(|p| p.ram),
        min_vcpus: min_of(|p| p.vcpu),
        min_storage: min_of(|p| p.storage),
        min_vram,
        requires_rtx: !presets.is_empty()
            && presets.iter().all(|p| catalog.is_rtx_family(&p.gpu_model)),
        ..Default::default()
    }
}

/// Re-fetches stock on a fixed interval and re-ranks locations for one spec.
/// Each cycle replaces the previous result outright.
pub(crate) struct InventoryWatcher {
    client: Arc<ApiClient>,
    catalog: Arc<Catalog>,
    spec: DeploySpec,
    selected: Option<String>,
    cancellation_token: CancellationToken,
}

impl InventoryWatcher {
    pub(crate) fn new(
        client: Arc<ApiClient>,
        catalog: Arc<Catalog>,
        spec: DeploySpec,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            client,
            catalog,
            spec,
            selected: None,
            cancellation_token,
        }
    }

    pub(crate) fn with_selection(mut self, host_id: Option<String>) -> Self {
        self.selected = host_id;
        self
    }

    pub(crate) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(crate) async fn refresh(&mut self) -> Result<RankedLocations, ApiError> {
        let inventory = self
            .client
            .get_hostnodes(&query_for(&self.spec, &self.catalog))
            .await?;
        let ranked = generate_locations(&self.spec, &inventory, &self.catalog);

        if let SelectionState::Invalidated(host_id) =
            reconcile_selection(self.selected.as_deref(), &ranked.locations)
        {
            warn!("Selected host {host_id} is no longer available, please select a new location");
            self.selected = None;
        }

        Ok(ranked)
    }

    pub(crate) async fn run(
        &mut self,
        interval_seconds: u64,
        mut on_update: impl FnMut(&RankedLocations, Option<&str>),
    ) -> Result<()> {
        let mut interval = interval(Duration::from_secs(interval_seconds.max(1)));
        info!(
            "Watching stock for {} every {}s",
            self.spec,
            interval_seconds.max(1)
        );

        let token = self.cancellation_token.clone();
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!("Inventory watcher stopped");
                    return Ok(());
                }
                _ = interval.tick() => {
                    match self.refresh().await {
                        Ok(ranked) => on_update(&ranked, self.selected()),
                        Err(e) => error!("Inventory refresh failed: {e}"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn hostnodes_body(host_ids: &[&str]) -> String {
        let hosts: Vec<String> = host_ids
            .iter()
            .map(|id| {
                format!(
                    r#""{id}": {{
                        "location": {{"id": "loc-1", "country": "Canada", "region": "Quebec", "city": "Montreal"}},
                        "networking": {{"ports": [20004]}},
                        "specs": {{
                            "cpu": {{"amount": 32, "type": "Xeon", "price": 0.003}},
                            "ram": {{"amount": 256, "price": 0.002}},
                            "storage": {{"amount": 4000, "price": 0.00005}},
                            "gpu": {{"h100-sxm5-80gb": {{"amount": 2, "price": 2.1, "vram": 80}}}}
                        }},
                        "status": {{"reserved": false, "uptime": 0.99}}
                    }}"#
                )
            })
            .collect();
        format!(r#"{{"success": true, "hostnodes": {{{}}}}}"#, hosts.join(","))
    }

    fn spec() -> DeploySpec {
        DeploySpec {
            gpu_model: "h100-sxm5-80gb".to_string(),
            gpu_count: 1,
            ram: 64,
            vcpu: 16,
            storage: 600,
        }
    }

    fn watcher(server: &ServerGuard, token: CancellationToken) -> InventoryWatcher {
        let client = ApiClient::new(&server.url(), "token").unwrap();
        InventoryWatcher::new(
            Arc::new(client),
            Arc::new(Catalog::default()),
            spec(),
            token,
        )
    }

    #[test]
    fn test_query_for_spec() {
        let catalog = Catalog::default();
        let query = query_for(&spec(), &catalog);
        assert_eq!(query.min_ram, 64);
        assert_eq!(query.min_vram, Some(80));
        assert!(!query.requires_rtx);

        let query = query_for_model("geforcertx4090-pcie-24gb", &catalog);
        assert_eq!(query.min_gpu_count, 1);
        assert_eq!(query.min_vram, Some(24));
        assert!(query.requires_rtx);
    }

    #[test]
    fn test_preset_query_follows_catalog() {
        let query = preset_query(&Catalog::default());
        assert_eq!(query.min_gpu_count, 1);
        assert_eq!(query.min_ram, 62);
        assert_eq!(query.min_vcpus, 12);
        assert_eq!(query.min_storage, 600);
        assert_eq!(query.min_vram, Some(80));
        assert!(!query.requires_rtx);

        let catalog = Catalog::from_toml_str(
            r#"
            [[presets]]
            gpu_count = 1
            gpu_model = "a100-pcie-40gb"
            ram = 32
            vcpu = 8
            storage = 200
            nvlink = false
            bandwidth = 10

            [[presets]]
            gpu_count = 2
            gpu_model = "h100-sxm5-80gb"
            ram = 128
            vcpu = 32
            storage = 1200
            nvlink = false
            bandwidth = 10
            "#,
        )
        .unwrap();
        let query = preset_query(&catalog);
        assert_eq!(query.min_gpu_count, 1);
        assert_eq!(query.min_ram, 32);
        assert_eq!(query.min_vcpus, 8);
        assert_eq!(query.min_storage, 200);
        assert_eq!(query.min_vram, Some(40));
        assert!(!query.requires_rtx);
    }

    #[test]
    fn test_preset_query_rtx_only_when_every_preset_is_rtx() {
        let mut catalog = Catalog::default();
        for preset in &mut catalog.presets {
            preset.gpu_model = "geforcertx4090-pcie-24gb".to_string();
        }
        let query = preset_query(&catalog);
        assert!(query.requires_rtx);
        assert_eq!(query.min_vram, Some(24));

        catalog.presets[0].gpu_model = "h100-sxm5-80gb".to_string();
        assert!(!preset_query(&catalog).requires_rtx);

        catalog.presets.clear();
        let query = preset_query(&catalog);
        assert!(!query.requires_rtx);
        assert_eq!(query.min_vram, None);
        assert_eq!(query.min_ram, 1);
    }

    #[tokio::test]
    async fn test_refresh_invalidates_vanished_selection() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v0/client/deploy/hostnodes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(hostnodes_body(&["host-a"]))
            .create_async()
            .await;

        let mut kept = watcher(&server, CancellationToken::new())
            .with_selection(Some("host-a".to_string()));
        let ranked = kept.refresh().await?;
        assert_eq!(ranked.locations.len(), 1);
        assert_eq!(kept.selected(), Some("host-a"));

        let mut gone = watcher(&server, CancellationToken::new())
            .with_selection(Some("host-b".to_string()));
        gone.refresh().await?;
        assert_eq!(gone.selected(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v0/client/deploy/hostnodes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(hostnodes_body(&["host-a", "host-b"]))
            .create_async()
            .await;

        let token = CancellationToken::new();
        let mut watcher = watcher(&server, token.clone());
        let mut updates = Vec::new();

        watcher
            .run(1, |ranked, _| {
                updates.push(ranked.locations[0].stock);
                token.cancel();
            })
            .await?;

        assert_eq!(updates, vec![4]);
        Ok(())
    }
}
