use std::sync::Arc;

use tokio::sync::RwLock;

use crate::gateway::{AdminGateway, Gateway, UserDTO};

#[derive(Debug, Default)]
struct UsuariosState {
    usuarios: Vec<UserDTO>,
    is_loading: bool,
}

/// User listing for the backoffice. Prefers the service-role admin gateway
/// (sees every profile); when that is absent or fails, falls back to an anon
/// select that row-level security may narrow. Fallback failure keeps the
/// previous list.
#[derive(Debug, Clone)]
pub struct UsuariosStore {
    gateway: Gateway,
    admin: Option<AdminGateway>,
    state: Arc<RwLock<UsuariosState>>,
}

impl UsuariosStore {
    pub fn new(gateway: Gateway, admin: Option<AdminGateway>) -> Self {
        Self {
            gateway,
            admin,
            state: Arc::new(RwLock::new(UsuariosState::default())),
        }
    }

    pub async fn usuarios(&self) -> Vec<UserDTO> {
        self.state.read().await.usuarios.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn fetch_usuarios(&self) {
        self.state.write().await.is_loading = true;

        if let Some(admin) = &self.admin {
            match admin.list_users().await {
                Ok(usuarios) => {
                    let mut state = self.state.write().await;
                    state.usuarios = usuarios;
                    state.is_loading = false;
                    return;
                }
                Err(e) => {
                    tracing::warn!("admin user listing failed, falling back to anon select: {}", e)
                }
            }
        }

        let resultado = self
            .gateway
            .table("users")
            .select("*")
            .order("name", true)
            .fetch_all()
            .await;

        let mut state = self.state.write().await;
        match resultado {
            Ok(rows) => {
                state.usuarios = rows
                    .into_iter()
                    .filter_map(|row| serde_json::from_value(row).ok())
                    .collect();
            }
            Err(e) => tracing::error!("fallback user listing failed: {}", e),
        }
        state.is_loading = false;
    }
}
