use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::agenda::{AgendaStore, AgendamentoPatch, NovoAgendamento};
use crate::gateway::{Gateway, GatewayError, RpcSummary};

const RPC_MANAGER: &str = "admin_agendamento_manager";

#[derive(Debug, Default)]
struct ActionsState {
    is_loading: bool,
    erro: Option<String>,
}

/// Appointment mutations routed through the manager procedure (the path that
/// enforces business rules server-side), with the shared [`AgendaStore`]
/// resynchronized after every success.
#[derive(Debug, Clone)]
pub struct AgendamentoActions {
    gateway: Gateway,
    agenda: AgendaStore,
    state: Arc<RwLock<ActionsState>>,
}

impl AgendamentoActions {
    pub fn new(gateway: Gateway, agenda: AgendaStore) -> Self {
        Self {
            gateway,
            agenda,
            state: Arc::new(RwLock::new(ActionsState::default())),
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn erro(&self) -> Option<String> {
        self.state.read().await.erro.clone()
    }

    /// Create through the manager. The procedure reports logical refusals in
    /// its result rather than an error status; an explicit `success: false`
    /// fails the call and skips the resync.
    pub async fn criar(&self, novo: &NovoAgendamento) -> Result<Value, GatewayError> {
        let args = json!({
            "p_operacao": "criar",
            "p_cliente": novo.cliente_id,
            "p_profissional": novo.profissional_id,
            "p_data_horario": novo.data_hora,
            "p_status": novo.status,
            "p_observações": novo.observacoes,
        });
        self.executar(args, true).await
    }

    pub async fn atualizar(
        &self,
        id: i64,
        patch: &AgendamentoPatch,
    ) -> Result<Value, GatewayError> {
        let args = json!({
            "p_operacao": "atualizar",
            "p_agendamento_id": id,
            "p_cliente": patch.cliente_id,
            "p_profissional": patch.profissional_id,
            "p_data_horario": patch.data_hora,
            "p_status": patch.status,
            "p_observações": patch.observacoes,
        });
        self.executar(args, false).await
    }

    pub async fn deletar(&self, id: i64) -> Result<Value, GatewayError> {
        let args = json!({
            "p_operacao": "deletar",
            "p_agendamento_id": id,
        });
        self.executar(args, false).await
    }

    async fn executar(
        &self,
        args: Value,
        checar_recusa: bool,
    ) -> Result<Value, GatewayError> {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.erro = None;
        }

        let resultado = self.chamar(args, checar_recusa).await;

        match &resultado {
            Ok(_) => self.agenda.fetch_agendamentos().await,
            Err(e) => self.state.write().await.erro = Some(e.to_string()),
        }
        self.state.write().await.is_loading = false;
        resultado
    }

    async fn chamar(&self, args: Value, checar_recusa: bool) -> Result<Value, GatewayError> {
        let resultado = self.gateway.rpc(RPC_MANAGER, args).await?;
        if checar_recusa {
            let resumo = RpcSummary::from_value(&resultado);
            if resumo.success == Some(false) {
                return Err(GatewayError::Logical(resumo.message.unwrap_or_else(|| {
                    "agendamento recusado pelo gerenciador".to_string()
                })));
            }
        }
        Ok(resultado)
    }
}
