use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::gateway::{Gateway, GatewayError};

/// Row of the professionals view exposed by the `get_view_profissionais`
/// procedure: the professional joined with its user and specialty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfissionalView {
    pub profissional_id: i64,
    #[serde(default)]
    pub profissional_created_at: Option<String>,
    pub user_id: Uuid,
    pub user_name: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    pub especialidade_id: i64,
    pub especialidade_nome: String,
}

#[derive(Debug, Default)]
struct ProfissionaisState {
    profissionais: Vec<ProfissionalView>,
    is_loading: bool,
}

/// Professionals: RPC-backed listing, table-backed add/remove with wholesale
/// refetch after each successful mutation.
#[derive(Debug, Clone)]
pub struct ProfissionaisStore {
    gateway: Gateway,
    state: Arc<RwLock<ProfissionaisState>>,
}

impl ProfissionaisStore {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(ProfissionaisState::default())),
        }
    }

    pub async fn profissionais(&self) -> Vec<ProfissionalView> {
        self.state.read().await.profissionais.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn fetch_profissionais(&self) {
        self.state.write().await.is_loading = true;

        let resultado = self.gateway.rpc("get_view_profissionais", json!({})).await;

        let mut state = self.state.write().await;
        match resultado {
            Ok(serde_json::Value::Array(rows)) => {
                state.profissionais = rows
                    .into_iter()
                    .filter_map(|row| serde_json::from_value(row).ok())
                    .collect();
            }
            // Anything but an array is an unrecognized shape; keep the list
            Ok(other) => {
                tracing::warn!("get_view_profissionais returned a non-array result: {}", other)
            }
            Err(e) => tracing::error!("failed to fetch profissionais: {}", e),
        }
        state.is_loading = false;
    }

    pub async fn add_profissional(
        &self,
        user_id: Uuid,
        especialidade_id: i64,
    ) -> Result<(), GatewayError> {
        self.gateway
            .table("profissionais")
            .insert(json!({ "user_id": user_id, "especialidade_id": especialidade_id }))
            .await?;
        self.fetch_profissionais().await;
        Ok(())
    }

    pub async fn remove_profissional(&self, id: i64) -> Result<(), GatewayError> {
        self.gateway.table("profissionais").eq("id", id).delete().await?;
        self.fetch_profissionais().await;
        Ok(())
    }
}
