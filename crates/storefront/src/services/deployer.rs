use super::inventory::query_for_model;
use crate::api::{ApiClient, ApiError};
use deploy::validation::{validate, IssueReport};
use log::info;
use shared::catalog::Catalog;
use shared::models::deploy::{DeployRequest, DeployResponse};

pub(crate) struct Deployer<'a> {
    client: &'a ApiClient,
    catalog: &'a Catalog,
}

impl<'a> Deployer<'a> {
    pub(crate) fn new(client: &'a ApiClient, catalog: &'a Catalog) -> Self {
        Self { client, catalog }
    }

    /// Validates against a freshly fetched inventory snapshot.
    pub(crate) async fn check(&self, request: &DeployRequest) -> Result<IssueReport, ApiError> {
        let inventory = self
            .client
            .get_hostnodes(&query_for_model(&request.specs.gpu_model, self.catalog))
            .await?;
        Ok(validate(request, &inventory, self.catalog))
    }

    pub(crate) async fn submit(&self, request: &DeployRequest) -> Result<DeployResponse, ApiError> {
        let report = self.check(request).await?;
        if !report.is_valid() {
            return Err(ApiError::Rejected(report));
        }

        info!(
            "Deploying {} on {} as {}",
            request.specs, request.hostnode, request.server_name
        );
        let response = self.client.deploy(request).await?;
        info!(
            "Server {} is up at {} (${:.3}/hr)",
            response.server, response.ip, response.cost.total_price
        );
        Ok(response)
    }
}
