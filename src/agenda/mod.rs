pub mod normalize;
pub mod probe;
pub mod store;
pub mod week;

pub use normalize::{
    normalize_agendamento, Agendamento, ClienteResumo, ProfissionalResumo, StatusAgendamento,
};
pub use probe::ColumnProbe;
pub use store::{AgendaStore, AgendamentoPatch, NovoAgendamento};
pub use week::{dias_da_semana, intervalo_da_semana};
