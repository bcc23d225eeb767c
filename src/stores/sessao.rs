use std::sync::Arc;

use tokio::sync::RwLock;

use crate::gateway::{Gateway, GatewayError, Sessao, UsuarioAuth};

#[derive(Debug, Default)]
struct SessaoState {
    sessao: Option<Sessao>,
    is_loading: bool,
}

/// Session lifecycle over the gateway's auth endpoints. Token storage and
/// refresh belong to the identity provider; this store only keeps the live
/// session in memory.
#[derive(Debug, Clone)]
pub struct SessaoStore {
    gateway: Gateway,
    state: Arc<RwLock<SessaoState>>,
}

impl SessaoStore {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(SessaoState::default())),
        }
    }

    pub async fn sessao(&self) -> Option<Sessao> {
        self.state.read().await.sessao.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn login(&self, email: &str, senha: &str) -> Result<Sessao, GatewayError> {
        self.state.write().await.is_loading = true;
        let resultado = self.gateway.sign_in(email, senha).await;

        let mut state = self.state.write().await;
        if let Ok(sessao) = &resultado {
            state.sessao = Some(sessao.clone());
        }
        state.is_loading = false;
        resultado
    }

    /// Sign out at the gateway; the local session is only cleared when the
    /// gateway accepted the revocation.
    pub async fn logout(&self) -> Result<(), GatewayError> {
        let token = match self.sessao().await {
            Some(sessao) => sessao.access_token,
            None => return Ok(()),
        };
        self.gateway.with_bearer(&token).sign_out().await?;
        self.state.write().await.sessao = None;
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        self.gateway.send_recovery(email).await
    }

    pub async fn change_password(&self, nova_senha: &str) -> Result<(), GatewayError> {
        let sessao = self.sessao().await.ok_or(GatewayError::MissingSession)?;
        self.gateway
            .with_bearer(&sessao.access_token)
            .update_password(nova_senha)
            .await
    }

    pub async fn usuario_atual(&self) -> Result<UsuarioAuth, GatewayError> {
        let sessao = self.sessao().await.ok_or(GatewayError::MissingSession)?;
        self.gateway
            .with_bearer(&sessao.access_token)
            .current_user()
            .await
    }
}
