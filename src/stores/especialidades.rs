use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::gateway::{Gateway, GatewayError, RpcSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Especialidade {
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Default)]
struct EspecialidadesState {
    especialidades: Vec<Especialidade>,
    is_loading: bool,
}

/// Specialty registry. Reads go straight to the table; mutations go through
/// the backend's stored procedures, whose results are reduced to an
/// [`RpcSummary`] handed back to the caller. A refetch happens only when the
/// summary reports success.
#[derive(Debug, Clone)]
pub struct EspecialidadesStore {
    gateway: Gateway,
    state: Arc<RwLock<EspecialidadesState>>,
}

impl EspecialidadesStore {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(EspecialidadesState::default())),
        }
    }

    pub async fn especialidades(&self) -> Vec<Especialidade> {
        self.state.read().await.especialidades.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn fetch_especialidades(&self) {
        self.state.write().await.is_loading = true;

        // The raw column is named after the table; renamed at this boundary
        let resultado = self
            .gateway
            .table("especialidade")
            .select("id,especialidade")
            .fetch_all()
            .await;

        let mut state = self.state.write().await;
        match resultado {
            Ok(rows) => {
                state.especialidades = rows.iter().filter_map(especialidade_de).collect();
            }
            Err(e) => tracing::error!("failed to fetch especialidades: {}", e),
        }
        state.is_loading = false;
    }

    pub async fn add_especialidade(&self, nome: &str) -> Result<RpcSummary, GatewayError> {
        self.mutacao_rpc("add_especialidade", json!({ "p_especialidade": nome }))
            .await
    }

    pub async fn update_especialidade(
        &self,
        id: i64,
        nome: &str,
    ) -> Result<RpcSummary, GatewayError> {
        self.mutacao_rpc(
            "edit_especialidade",
            json!({ "p_id": id, "p_especialidade": nome }),
        )
        .await
    }

    pub async fn delete_especialidade(&self, id: i64) -> Result<RpcSummary, GatewayError> {
        self.mutacao_rpc("delete_especialidade", json!({ "p_id": id })).await
    }

    async fn mutacao_rpc(&self, nome: &str, args: Value) -> Result<RpcSummary, GatewayError> {
        let resultado = self.gateway.rpc(nome, args).await?;
        let resumo = RpcSummary::from_value(&resultado);
        if resumo.success == Some(true) {
            self.fetch_especialidades().await;
        }
        Ok(resumo)
    }
}

fn especialidade_de(row: &Value) -> Option<Especialidade> {
    Some(Especialidade {
        id: row.get("id")?.as_i64()?,
        nome: row.get("especialidade")?.as_str()?.to_string(),
    })
}
