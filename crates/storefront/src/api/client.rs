//! REST client for the provisioning API.
//!
//! Every call carries the configured token verbatim in `Authorization` and,
//! for form posts, the reseller `subdomain`. Responses below 500 are decoded as
//! the provider's `{success, ...}` envelope.

use super::ApiError;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use shared::models::account::{PaymentMethod, UserInfo};
use shared::models::api::{ApiEnvelope, EnvelopeError};
use shared::models::automation::{Automation, NewAutomation};
use shared::models::deploy::{DeployRequest, DeployResponse};
use shared::models::hostnode::{Inventory, InventoryQuery};
use shared::models::virtual_machine::VirtualMachineEntry;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

const HOSTNODES: &str = "/api/v0/client/deploy/hostnodes";
const DEPLOY: &str = "/api/v0/client/deploy/single";
const VM_LIST: &str = "/api/v0/client/list";
const VM_START: &str = "/api/v0/client/start/single";
const VM_STOP: &str = "/api/v0/client/stop/single";
const VM_DELETE: &str = "/api/v0/client/delete/single";
const CUSTOM_ACTIONS: &str = "/api/v0/client/whitelabel/customactions";
const PAYMENT_METHODS: &str = "/api/v0/client/whitelabel/paymentmethods";
const USER_INFO: &str = "/api/v0/client/whitelabel/getUserInfo";

#[derive(Deserialize)]
struct HostnodesBody {
    hostnodes: Inventory,
}

#[derive(Deserialize)]
struct VmListBody {
    virtualmachines: BTreeMap<String, VirtualMachineEntry>,
}

#[derive(Deserialize)]
struct AutomationsBody {
    custom_actions: Vec<Automation>,
}

#[derive(Deserialize)]
struct PaymentMethodsBody {
    payment_methods: Vec<PaymentMethod>,
}

pub(crate) struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    subdomain: Option<String>,
    domain: Option<String>,
}

impl ApiClient {
    pub(crate) fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        // fail early on a malformed base rather than on the first request
        Url::parse(base_url)?;
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            subdomain: None,
            domain: None,
        })
    }

    pub(crate) fn with_subdomain(mut self, subdomain: Option<String>) -> Self {
        self.subdomain = subdomain.filter(|s| !s.is_empty());
        self
    }

    pub(crate) fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain.filter(|d| !d.is_empty());
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{path}", self.base_url))?)
    }

    fn form(&self) -> Form {
        match &self.subdomain {
            Some(subdomain) => Form::new().text("subdomain", subdomain.clone()),
            None => Form::new(),
        }
    }

    fn form_with(&self, fields: Vec<(&'static str, String)>) -> Form {
        fields
            .into_iter()
            .fold(self.form(), |form, (name, value)| form.text(name, value))
    }

    async fn read(&self, request: RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request
            .header(AUTHORIZATION, self.token.as_str())
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok((status.as_u16(), body))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = self.read(request).await?;
        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|e| {
            ApiError::Decode(format!("status {status}: {e}"))
        })?;
        envelope.into_result().map_err(|e| match e {
            EnvelopeError::Provider(message) => ApiError::Provider(message),
            EnvelopeError::Malformed(e) => ApiError::Decode(format!("status {status}: {e}")),
        })
    }

    pub(crate) async fn get_hostnodes(&self, query: &InventoryQuery) -> Result<Inventory, ApiError> {
        let query = InventoryQuery {
            subdomain: query.subdomain.clone().or_else(|| self.subdomain.clone()),
            domain: query.domain.clone().or_else(|| self.domain.clone()),
            ..query.clone()
        };
        let mut url = self.endpoint(HOSTNODES)?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());

        let body: HostnodesBody = self.send(self.client.get(url)).await?;
        debug!("Fetched {} hostnodes", body.hostnodes.len());
        Ok(body.hostnodes)
    }

    /// Sends the request as is. Callers validate first.
    pub(crate) async fn deploy(&self, request: &DeployRequest) -> Result<DeployResponse, ApiError> {
        let form = self.form_with(request.to_form_fields());
        self.send(self.client.post(self.endpoint(DEPLOY)?).multipart(form))
            .await
    }

    pub(crate) async fn list_vms(
        &self,
    ) -> Result<BTreeMap<String, VirtualMachineEntry>, ApiError> {
        let body: VmListBody = self.send(self.client.post(self.endpoint(VM_LIST)?)).await?;
        Ok(body.virtualmachines)
    }

    async fn vm_action(&self, path: &str, form: Form) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .send(self.client.post(self.endpoint(path)?).multipart(form))
            .await?;
        Ok(())
    }

    pub(crate) async fn start_vm(&self, server: &str) -> Result<(), ApiError> {
        let form = self.form().text("server", server.to_string());
        self.vm_action(VM_START, form).await
    }

    /// With `release_gpu` the GPUs go back to the pool and the VM may not get them back.
    pub(crate) async fn stop_vm(&self, server: &str, release_gpu: bool) -> Result<(), ApiError> {
        let form = self
            .form()
            .text("server", server.to_string())
            .text("disassociate_resources", release_gpu.to_string());
        self.vm_action(VM_STOP, form).await
    }

    pub(crate) async fn delete_vm(&self, server: &str) -> Result<(), ApiError> {
        let form = self.form().text("server", server.to_string());
        self.vm_action(VM_DELETE, form).await
    }

    pub(crate) async fn list_automations(&self) -> Result<Vec<Automation>, ApiError> {
        let body: AutomationsBody = self
            .send(self.client.get(self.endpoint(CUSTOM_ACTIONS)?))
            .await?;
        Ok(body.custom_actions)
    }

    pub(crate) async fn add_automation(&self, automation: &NewAutomation) -> Result<(), ApiError> {
        let fields = automation.to_form_fields().map_err(ApiError::InvalidForm)?;
        let form = self.form_with(fields);
        let _: IgnoredAny = self
            .send(self.client.post(self.endpoint(CUSTOM_ACTIONS)?).multipart(form))
            .await?;
        Ok(())
    }

    pub(crate) async fn delete_automation(&self, uuid: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{CUSTOM_ACTIONS}/{uuid}"))?;
        let _: IgnoredAny = self.send(self.client.delete(url)).await?;
        Ok(())
    }

    pub(crate) async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        let body: PaymentMethodsBody = self
            .send(self.client.get(self.endpoint(PAYMENT_METHODS)?))
            .await?;
        Ok(body.payment_methods)
    }

    /// Returned bare, without the success envelope.
    pub(crate) async fn user_info(&self) -> Result<UserInfo, ApiError> {
        let (_, body) = self.read(self.client.get(self.endpoint(USER_INFO)?)).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
