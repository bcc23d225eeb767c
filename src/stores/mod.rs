pub mod agendamento_actions;
pub mod clientes;
pub mod especialidades;
pub mod notify;
pub mod perfil;
pub mod profissionais;
pub mod sessao;
pub mod stats;
pub mod usuarios;

pub use agendamento_actions::AgendamentoActions;
pub use clientes::{Cliente, ClientePatch, ClientesStore, NovoCliente};
pub use especialidades::{Especialidade, EspecialidadesStore};
pub use notify::{LayoutStore, Toast, ToastOptions, ToastStore, ToastVariant};
pub use perfil::PerfilStore;
pub use profissionais::{ProfissionaisStore, ProfissionalView};
pub use sessao::SessaoStore;
pub use stats::{Distribuicao, StatCard, StatsStore};
pub use usuarios::UsuariosStore;
