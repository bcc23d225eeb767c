use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::especialidades::EspecialidadesStore;
use super::profissionais::{ProfissionaisStore, ProfissionalView};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: usize,
    pub color: &'static str,
}

/// Paired labels/series for the dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribuicao {
    pub labels: Vec<String>,
    pub series: Vec<usize>,
}

/// Dashboard aggregation over the specialty and professional stores.
#[derive(Debug, Clone)]
pub struct StatsStore {
    especialidades: EspecialidadesStore,
    profissionais: ProfissionaisStore,
    is_loading: Arc<RwLock<bool>>,
}

impl StatsStore {
    pub fn new(especialidades: EspecialidadesStore, profissionais: ProfissionaisStore) -> Self {
        Self {
            especialidades,
            profissionais,
            is_loading: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn is_loading(&self) -> bool {
        *self.is_loading.read().await
    }

    pub async fn fetch_all_data(&self) {
        *self.is_loading.write().await = true;
        tokio::join!(
            self.especialidades.fetch_especialidades(),
            self.profissionais.fetch_profissionais(),
        );
        *self.is_loading.write().await = false;
    }

    /// Overview cards: real totals plus the two placeholder figures the
    /// original dashboard hardcoded.
    pub async fn overview(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                label: "Total Especialidades".to_string(),
                value: self.especialidades.especialidades().await.len(),
                color: "primary",
            },
            StatCard {
                label: "Total Profissionais".to_string(),
                value: self.profissionais.profissionais().await.len(),
                color: "success",
            },
            StatCard {
                label: "Cidades Atendidas".to_string(),
                value: 12,
                color: "warning",
            },
            StatCard {
                label: "Novos este mês".to_string(),
                value: 4,
                color: "info",
            },
        ]
    }

    pub async fn profissionais_por_especialidade(&self) -> Distribuicao {
        let profissionais = self.profissionais.profissionais().await;
        contagem(&profissionais, |p| p.especialidade_nome.clone())
    }

    pub async fn distribuicao_cargos(&self) -> Distribuicao {
        let profissionais = self.profissionais.profissionais().await;
        contagem(&profissionais, |p| {
            p.user_role.clone().unwrap_or_else(|| "user".to_string())
        })
    }
}

/// Count by key, keeping first-seen order so chart series are stable.
fn contagem(
    profissionais: &[ProfissionalView],
    chave: impl Fn(&ProfissionalView) -> String,
) -> Distribuicao {
    let mut pares: Vec<(String, usize)> = Vec::new();
    for p in profissionais {
        let k = chave(p);
        match pares.iter_mut().find(|(label, _)| *label == k) {
            Some((_, n)) => *n += 1,
            None => pares.push((k, 1)),
        }
    }
    Distribuicao {
        labels: pares.iter().map(|(label, _)| label.clone()).collect(),
        series: pares.iter().map(|(_, n)| *n).collect(),
    }
}
