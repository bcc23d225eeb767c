use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;

use crate::gateway::{Gateway, GatewayError, UserDTO};

#[derive(Debug, Default)]
struct PerfilState {
    profile: Option<UserDTO>,
    is_loading: bool,
    erro: Option<String>,
}

/// Current-user profile. The select is RLS-scoped, so the single-row fetch
/// returns the caller's own row. Pass a bearer-scoped gateway
/// (`Gateway::with_bearer`).
#[derive(Debug, Clone)]
pub struct PerfilStore {
    gateway: Gateway,
    state: Arc<RwLock<PerfilState>>,
}

impl PerfilStore {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(PerfilState::default())),
        }
    }

    pub async fn profile(&self) -> Option<UserDTO> {
        self.state.read().await.profile.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn erro(&self) -> Option<String> {
        self.state.read().await.erro.clone()
    }

    pub async fn fetch_profile(&self) {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.erro = None;
        }

        let resultado = self.gateway.table("users").select("*").fetch_single().await;

        let mut state = self.state.write().await;
        match resultado.and_then(|row| {
            serde_json::from_value::<UserDTO>(row).map_err(|e| GatewayError::Decode(e.to_string()))
        }) {
            Ok(perfil) => state.profile = Some(perfil),
            Err(e) => {
                tracing::error!("failed to fetch profile: {}", e);
                state.erro = Some(e.to_string());
            }
        }
        state.is_loading = false;
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.profile = None;
        state.erro = None;
    }

    /// Optimistic rename: apply locally first so the UI reflects the change
    /// immediately, confirm at the gateway, and revert to the previous value
    /// when the gateway refuses (the error still propagates).
    pub async fn update_nome(&self, novo_nome: &str) -> Result<(), GatewayError> {
        let (id, anterior) = {
            let mut state = self.state.write().await;
            let perfil = state.profile.as_mut().ok_or(GatewayError::MissingSession)?;
            let anterior = perfil.name.clone();
            perfil.name = Some(novo_nome.to_string());
            (perfil.id, anterior)
        };

        match self
            .gateway
            .table("users")
            .eq("id", id)
            .update(json!({ "name": novo_nome }))
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                let mut state = self.state.write().await;
                if let Some(perfil) = state.profile.as_mut() {
                    perfil.name = anterior;
                }
                Err(e)
            }
        }
    }
}
