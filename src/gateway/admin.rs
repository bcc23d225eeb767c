use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{read_json, Gateway, GatewayError};
use crate::config::GatewayConfig;

/// A user profile row, reduced to the fields safe to show in the backoffice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDTO {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NovoUsuario {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Service-role client for privileged user management. Bypasses row-level
/// security; constructed server-side only, never from client-held config.
#[derive(Debug, Clone)]
pub struct AdminGateway {
    gateway: Gateway,
}

impl AdminGateway {
    /// Build from config; `NotConfigured` when the service-role credential is
    /// absent so callers can answer 501 instead of a misleading 500.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let service_role = config
            .service_role
            .clone()
            .ok_or(GatewayError::NotConfigured)?;
        let gateway = Gateway::new(&GatewayConfig {
            url: config.url.clone(),
            apikey: service_role,
            service_role: None,
        })?;
        Ok(Self { gateway })
    }

    /// List every user profile, ordered by name. The elevated credential sees
    /// past row-level security.
    pub async fn list_users(&self) -> Result<Vec<UserDTO>, GatewayError> {
        let rows = self
            .gateway
            .table("users")
            .select("id,name,email,role,created_at")
            .order("name", true)
            .fetch_all()
            .await?;
        // Row by row, so one malformed profile does not sink the listing
        Ok(rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect())
    }

    /// Create an auth user plus its profile row. When the profile insert
    /// fails the auth user is deleted again, so a half-created account can
    /// never sign in; the original insert error is what the caller sees.
    pub async fn create_user(&self, novo: NovoUsuario) -> Result<Value, GatewayError> {
        let resp = self
            .gateway
            .authed(self.gateway.http.post(self.gateway.auth_url("admin/users")))
            .json(&json!({ "email": novo.email, "password": novo.password }))
            .send()
            .await?;
        let body = read_json(resp).await?;

        let user_id = body
            .pointer("/user/id")
            .or_else(|| body.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::Decode("could not read user id from auth response".to_string())
            })?;

        let perfil = json!({
            "id": user_id,
            "name": novo.name,
            "email": novo.email,
            "role": novo.role.unwrap_or_else(|| "user".to_string()),
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        match self.gateway.table("users").insert(perfil).await {
            Ok(mut rows) => {
                if rows.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(rows.remove(0))
                }
            }
            Err(insert_err) => {
                if let Err(cleanup) = self.delete_auth_user(&user_id).await {
                    tracing::warn!(
                        "rollback of auth user {} failed after profile insert error: {}",
                        user_id,
                        cleanup
                    );
                }
                Err(insert_err)
            }
        }
    }

    /// Delete a user: profile row first (best effort), then the auth record.
    pub async fn delete_user(&self, id: &str) -> Result<(), GatewayError> {
        if let Err(e) = self.gateway.table("users").eq("id", id).delete().await {
            // The auth record is authoritative; a missing profile row is fine
            tracing::warn!("profile delete for user {} failed: {}", id, e);
        }
        self.delete_auth_user(id).await
    }

    async fn delete_auth_user(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.gateway.auth_url(&format!("admin/users/{}", id));
        let resp = self.gateway.authed(self.gateway.http.delete(url)).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(super::backend_error(resp).await)
        }
    }
}
