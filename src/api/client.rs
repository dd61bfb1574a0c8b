//! Oktawave client and session
//!
//! `OktawaveClient` knows the endpoints and credentials; logging in turns it
//! into a `Session`, which every API operation hangs off. The session is
//! created once per process and passed around explicitly.

use super::fields::{opt_int, results};
use super::http::ApiHttpClient;
use crate::error::ApiError;
use crate::resolve::{Category, Lister, NamedResource};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use url::Url;

/// Production API root
pub const DEFAULT_API_URL: &str = "https://api.oktawave.com";

const COMMON_SERVICE: &str = "CommonService.svc/json";
const CLIENTS_SERVICE: &str = "ClientsService.svc/json";

/// Oktawave account credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Unauthenticated client for both API services
#[derive(Clone)]
pub struct OktawaveClient {
    common: ApiHttpClient,
    clients: ApiHttpClient,
    username: String,
    password: String,
}

fn service_url(api_url: &Url, service: &str) -> Result<Url> {
    let mut base = api_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(service)
        .with_context(|| format!("Invalid service path: {}", service))
}

impl OktawaveClient {
    /// Create a client against `api_url`
    pub fn new(api_url: &str, credentials: &Credentials) -> Result<Self> {
        let api_url = Url::parse(api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;

        let common = ApiHttpClient::new(
            service_url(&api_url, COMMON_SERVICE)?,
            &credentials.username,
            &credentials.password,
        )?;
        let clients = ApiHttpClient::new(
            service_url(&api_url, CLIENTS_SERVICE)?,
            &credentials.username,
            &credentials.password,
        )?;

        Ok(Self {
            common,
            clients,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        })
    }

    /// Log in and open a session
    pub async fn login(self) -> Result<Session> {
        let params = json!({
            "user": self.username,
            "password": self.password,
            "ipAddress": "127.0.0.1",
            "userAgent": "Oktawave CLI",
        });

        let logon = match self.common.call("LogonUser", &params).await {
            Ok(value) => value,
            Err(err) => {
                if let Some(ApiError::Status { status: 401 | 403, .. }) = err.downcast_ref::<ApiError>() {
                    return Err(ApiError::Login.into());
                }
                return Err(err.context("LogonUser failed"));
            }
        };

        let client_id = logon
            .get("Client")
            .and_then(|client| opt_int(client, "ClientId"))
            .ok_or(ApiError::Login)?;

        tracing::info!("Logged in as client {}", client_id);

        Ok(Session {
            client: self,
            client_id,
            logon,
        })
    }
}

/// Authenticated API session
pub struct Session {
    client: OktawaveClient,
    client_id: i64,
    logon: Value,
}

impl Session {
    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    /// The user record returned by `LogonUser`
    pub fn logon(&self) -> &Value {
        &self.logon
    }

    /// Call a CommonService method
    pub async fn common(&self, method: &str, params: Value) -> Result<Value> {
        self.client.common.call(method, &params).await
    }

    /// Call a ClientsService method
    pub async fn clients(&self, method: &str, params: Value) -> Result<Value> {
        self.client.clients.call(method, &params).await
    }

    /// Call a ClientsService method taking only a VM and the client ID
    pub(crate) async fn vm_call(&self, method: &str, vm_id: i64) -> Result<Value> {
        self.clients(
            method,
            json!({ "virtualMachineId": vm_id, "clientId": self.client_id }),
        )
        .await
    }

    /// List endpoints take a search-params record scoped to the client
    pub(crate) async fn search(&self, method: &str) -> Result<Vec<Value>> {
        let reply = self
            .clients(method, json!({ "searchParams": { "ClientId": self.client_id } }))
            .await?;
        Ok(results(&reply).to_vec())
    }
}

impl Lister for Session {
    async fn list(&self, category: Category) -> Result<Vec<NamedResource>> {
        let items = match category {
            Category::Oci => self
                .oci_list()
                .await?
                .into_iter()
                .map(|vm| NamedResource::new(vm.id, vm.name))
                .collect(),
            Category::Ovs => self
                .ovs_list()
                .await?
                .into_iter()
                .map(|disk| NamedResource::new(disk.id, disk.name))
                .collect(),
            Category::Ordb => self
                .ordb_list()
                .await?
                .into_iter()
                .map(|db| NamedResource::new(db.id, db.name))
                .collect(),
            Category::Opn => self
                .opn_list()
                .await?
                .into_iter()
                .map(|opn| NamedResource::new(opn.id, opn.name))
                .collect(),
            Category::Container => self
                .container_list()
                .await?
                .into_iter()
                .map(|c| NamedResource::new(c.id, c.name))
                .collect(),
        };
        Ok(items)
    }
}

/// Boolean-ish reply of a mutation; `false` and `null` mean refusal
pub(crate) fn accepted(reply: &Value) -> bool {
    match reply {
        Value::Bool(ok) => *ok,
        Value::Null => false,
        _ => true,
    }
}
