use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::normalize::{normalize_agendamento, Agendamento, StatusAgendamento};
use super::probe::ColumnProbe;
use super::week::{dias_da_semana, intervalo_da_semana};
use crate::gateway::{Gateway, GatewayError};

/// The joined view the calendar reads from.
const VIEW_AGENDAMENTOS: &str = "view_agendamentos";
/// The base table mutations target.
const TABELA_AGENDAMENTO: &str = "agendamento";

const FORMATO_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Serialize)]
pub struct NovoAgendamento {
    pub cliente_id: i64,
    pub profissional_id: i64,
    pub data_hora: NaiveDateTime,
    pub status: StatusAgendamento,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct AgendamentoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profissional_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_hora: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusAgendamento>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

#[derive(Debug)]
struct AgendaState {
    data_referencia: NaiveDate,
    agendamentos: Vec<Agendamento>,
    is_loading: bool,
}

/// Week-scoped appointment store: holds the reference date, refetches on
/// navigation, and resynchronizes wholesale after every mutation. The
/// in-memory list is a read projection; the gateway owns the data.
#[derive(Debug, Clone)]
pub struct AgendaStore {
    gateway: Gateway,
    probe: ColumnProbe,
    state: Arc<RwLock<AgendaState>>,
}

impl AgendaStore {
    pub fn new(gateway: Gateway) -> Self {
        Self::with_data_referencia(gateway, Local::now().date_naive())
    }

    pub fn with_data_referencia(gateway: Gateway, data_referencia: NaiveDate) -> Self {
        Self {
            gateway,
            probe: ColumnProbe::new(),
            state: Arc::new(RwLock::new(AgendaState {
                data_referencia,
                agendamentos: Vec::new(),
                is_loading: false,
            })),
        }
    }

    pub async fn data_referencia(&self) -> NaiveDate {
        self.state.read().await.data_referencia
    }

    pub async fn agendamentos(&self) -> Vec<Agendamento> {
        self.state.read().await.agendamentos.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// The 7 days of the currently selected week.
    pub async fn dias_da_semana(&self) -> [NaiveDate; 7] {
        dias_da_semana(self.data_referencia().await)
    }

    pub async fn avancar_semana(&self) {
        self.deslocar_semana(7).await;
    }

    pub async fn voltar_semana(&self) {
        self.deslocar_semana(-7).await;
    }

    async fn deslocar_semana(&self, dias: i64) {
        {
            let mut state = self.state.write().await;
            state.data_referencia += Duration::days(dias);
        }
        self.spawn_refetch();
    }

    pub async fn set_data_referencia(&self, data: NaiveDate) {
        {
            let mut state = self.state.write().await;
            state.data_referencia = data;
        }
        self.spawn_refetch();
    }

    /// Navigation does not await the refetch. Overlapping fetches are not
    /// serialized: whichever response lands last wins the list, exactly as
    /// the UI behaves today (no generation guard).
    fn spawn_refetch(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            store.fetch_agendamentos().await;
        });
    }

    /// Refresh the list for the current week. Fetch errors are non-fatal:
    /// the previous list is kept and only logged. `is_loading` clears on
    /// every exit path.
    pub async fn fetch_agendamentos(&self) {
        let referencia = {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.data_referencia
        };

        let resultado = self.consulta_semana(referencia).await;

        let mut state = self.state.write().await;
        match resultado {
            Ok(rows) => {
                state.agendamentos = rows.iter().map(normalize_agendamento).collect();
            }
            Err(e) => {
                tracing::error!("failed to fetch agendamentos, keeping previous list: {}", e);
            }
        }
        state.is_loading = false;
    }

    /// Week-scoped query when the view still has `data_hora`; otherwise, or
    /// when the filtered query fails, the unfiltered fallback.
    async fn consulta_semana(&self, referencia: NaiveDate) -> Result<Vec<Value>, GatewayError> {
        let (inicio, fim) = intervalo_da_semana(referencia);

        let tem_data_hora = self
            .probe
            .ensure_column(&self.gateway, VIEW_AGENDAMENTOS, "data_hora")
            .await;

        if tem_data_hora {
            let filtrada = self
                .gateway
                .table(VIEW_AGENDAMENTOS)
                .select("*")
                .gte("data_hora", inicio.format(FORMATO_TIMESTAMP))
                .lte("data_hora", fim.format(FORMATO_TIMESTAMP))
                .fetch_all()
                .await;
            match filtrada {
                Ok(rows) => return Ok(rows),
                Err(e) => {
                    tracing::warn!(
                        "week-filtered query on {} failed, retrying unfiltered: {}",
                        VIEW_AGENDAMENTOS,
                        e
                    );
                }
            }
        }

        self.gateway
            .table(VIEW_AGENDAMENTOS)
            .select("*")
            .fetch_all()
            .await
    }

    /// Insert an appointment, then resynchronize the whole list. A gateway
    /// failure propagates and skips the refetch.
    pub async fn add_agendamento(
        &self,
        novo: NovoAgendamento,
    ) -> Result<Agendamento, GatewayError> {
        let payload =
            serde_json::to_value(&novo).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let criado = self.primeiro(
            self.gateway.table(TABELA_AGENDAMENTO).insert(payload).await?,
        )?;
        self.fetch_agendamentos().await;
        Ok(criado)
    }

    /// Patch an appointment by id, then resynchronize. Same failure
    /// semantics as [`AgendaStore::add_agendamento`].
    pub async fn update_agendamento(
        &self,
        id: i64,
        patch: AgendamentoPatch,
    ) -> Result<Agendamento, GatewayError> {
        let payload =
            serde_json::to_value(&patch).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let atualizado = self.primeiro(
            self.gateway
                .table(TABELA_AGENDAMENTO)
                .eq("id", id)
                .update(payload)
                .await?,
        )?;
        self.fetch_agendamentos().await;
        Ok(atualizado)
    }

    fn primeiro(&self, rows: Vec<Value>) -> Result<Agendamento, GatewayError> {
        rows.first()
            .map(normalize_agendamento)
            .ok_or_else(|| GatewayError::RowCount {
                relation: TABELA_AGENDAMENTO.to_string(),
                count: 0,
            })
    }
}
