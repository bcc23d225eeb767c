use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{backend_error, read_json, Gateway, GatewayError};

/// Identity as reported by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioAuth {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session: tokens plus the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sessao {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UsuarioAuth,
}

// Authentication operations. Token-scoped calls (sign_out, update_password,
// current_user) use the gateway's own bearer; derive a user-scoped clone with
// `with_bearer` first.
impl Gateway {
    /// Password-grant sign in.
    pub async fn sign_in(&self, email: &str, senha: &str) -> Result<Sessao, GatewayError> {
        let url = self.auth_url("token?grant_type=password");
        let resp = self
            .authed(self.http.post(url))
            .json(&json!({ "email": email, "password": senha }))
            .send()
            .await?;
        let body = read_json(resp).await?;
        serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Revoke the current bearer's session.
    pub async fn sign_out(&self) -> Result<(), GatewayError> {
        let resp = self.authed(self.http.post(self.auth_url("logout"))).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(backend_error(resp).await)
        }
    }

    /// Set a new password for the bearer's user.
    pub async fn update_password(&self, nova_senha: &str) -> Result<(), GatewayError> {
        let resp = self
            .authed(self.http.put(self.auth_url("user")))
            .json(&json!({ "password": nova_senha }))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(backend_error(resp).await)
        }
    }

    /// Dispatch a password-recovery email.
    pub async fn send_recovery(&self, email: &str) -> Result<(), GatewayError> {
        let resp = self
            .authed(self.http.post(self.auth_url("recover")))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(backend_error(resp).await)
        }
    }

    /// Current-session accessor for the bearer's user.
    pub async fn current_user(&self) -> Result<UsuarioAuth, GatewayError> {
        let resp = self.authed(self.http.get(self.auth_url("user"))).send().await?;
        let body = read_json(resp).await?;
        serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
