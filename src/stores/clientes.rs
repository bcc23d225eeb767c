use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::gateway::{Gateway, GatewayError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NovoCliente {
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ClientePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

#[derive(Debug, Default)]
struct ClientesState {
    clientes: Vec<Cliente>,
    is_loading: bool,
}

/// Client registry: name-ordered listing plus CRUD, refetching wholesale
/// after each successful mutation.
#[derive(Debug, Clone)]
pub struct ClientesStore {
    gateway: Gateway,
    state: Arc<RwLock<ClientesState>>,
}

impl ClientesStore {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(ClientesState::default())),
        }
    }

    pub async fn clientes(&self) -> Vec<Cliente> {
        self.state.read().await.clientes.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Fetch failures keep the previous list and only log.
    pub async fn fetch_clientes(&self) {
        self.state.write().await.is_loading = true;

        let resultado = self
            .gateway
            .table("clientes")
            .select("*")
            .order("nome", true)
            .fetch_all()
            .await;

        let mut state = self.state.write().await;
        match resultado {
            Ok(rows) => {
                state.clientes = rows
                    .into_iter()
                    .filter_map(|row| serde_json::from_value(row).ok())
                    .collect();
            }
            Err(e) => tracing::error!("failed to fetch clientes: {}", e),
        }
        state.is_loading = false;
    }

    pub async fn add_cliente(&self, novo: NovoCliente) -> Result<(), GatewayError> {
        let payload =
            serde_json::to_value(&novo).map_err(|e| GatewayError::Decode(e.to_string()))?;
        self.gateway.table("clientes").insert(payload).await?;
        self.fetch_clientes().await;
        Ok(())
    }

    pub async fn update_cliente(&self, id: i64, patch: ClientePatch) -> Result<(), GatewayError> {
        let payload =
            serde_json::to_value(&patch).map_err(|e| GatewayError::Decode(e.to_string()))?;
        self.gateway.table("clientes").eq("id", id).update(payload).await?;
        self.fetch_clientes().await;
        Ok(())
    }

    pub async fn remove_cliente(&self, id: i64) -> Result<(), GatewayError> {
        self.gateway.table("clientes").eq("id", id).delete().await?;
        self.fetch_clientes().await;
        Ok(())
    }
}
