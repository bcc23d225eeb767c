pub mod admin;
pub mod auth;
pub mod error;
pub mod query;
pub mod rpc;

pub use admin::{AdminGateway, NovoUsuario, UserDTO};
pub use auth::{Sessao, UsuarioAuth};
pub use error::GatewayError;
pub use query::TableQuery;
pub use rpc::{RpcOutcome, RpcSummary};

use serde_json::Value;

use crate::config::GatewayConfig;

/// Typed client for the hosted data platform: table/view queries, stored
/// procedures and the authentication endpoints. Cheap to clone; clones share
/// the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    apikey: String,
    bearer: String,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.url.is_empty() {
            return Err(GatewayError::ConfigMissing("SUPABASE_URL"));
        }
        if config.apikey.is_empty() {
            return Err(GatewayError::ConfigMissing("SUPABASE_KEY"));
        }

        let parsed =
            url::Url::parse(&config.url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidUrl(config.url.clone()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            apikey: config.apikey.clone(),
            bearer: config.apikey.clone(),
        })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(&crate::config::config().gateway)
    }

    /// Clone scoped to a user token. Table queries and RPCs on the clone run
    /// under that user's row-level security instead of the anon role.
    pub fn with_bearer(&self, token: &str) -> Self {
        let mut scoped = self.clone();
        scoped.bearer = token.to_string();
        scoped
    }

    /// Start a query against a named relation or view.
    pub fn table(&self, relation: &str) -> TableQuery {
        TableQuery::new(self.clone(), relation)
    }

    /// Call a stored procedure with keyword arguments. The result shape is
    /// whatever the procedure returns; interpret it through [`RpcOutcome`].
    pub async fn rpc(&self, name: &str, args: Value) -> Result<Value, GatewayError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, name);
        let resp = self.authed(self.http.post(url)).json(&args).send().await?;
        read_json(resp).await
    }

    /// Ping the REST root to confirm the gateway is reachable.
    pub async fn health(&self) -> Result<(), GatewayError> {
        let url = format!("{}/rest/v1", self.base_url);
        let resp = self.authed(self.http.get(url)).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(backend_error(resp).await)
        }
    }

    pub(crate) fn rest_url(&self, relation: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, relation)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.apikey).bearer_auth(&self.bearer)
    }
}

/// Decode a non-success response into a backend error, reading the message
/// from whichever key this service put it under.
pub(crate) async fn backend_error(resp: reqwest::Response) -> GatewayError {
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    let code = body
        .get("code")
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .unwrap_or("gateway request failed")
        .to_string();
    GatewayError::Backend {
        status,
        code,
        message,
    }
}

pub(crate) async fn read_json(resp: reqwest::Response) -> Result<Value, GatewayError> {
    if !resp.status().is_success() {
        return Err(backend_error(resp).await);
    }
    let text = resp.text().await?;
    if text.trim().is_empty() {
        // Procedures returning void and 204 mutations have no body
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
}
