use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variables checked, in order, for the service-role credential.
const SERVICE_ROLE_VARS: &[&str] = &[
    "SUPABASE_SERVICE_ROLE",
    "SUPABASE_SERVICE_KEY",
    "SUPABASE_SECRET_KEY",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
    pub rotas_publicas: Vec<String>,
}

/// Connection settings for the hosted data gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    pub apikey: String,
    /// Elevated credential for the admin surface. Never shipped to clients;
    /// when absent the admin endpoints answer 501.
    pub service_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let service_role = SERVICE_ROLE_VARS
            .iter()
            .find_map(|k| env::var(k).ok())
            .filter(|v| !v.is_empty());

        Self {
            gateway: GatewayConfig {
                url: env::var("SUPABASE_URL").unwrap_or_default(),
                apikey: env::var("SUPABASE_KEY").unwrap_or_default(),
                service_role,
            },
            server: ServerConfig {
                port: porta_de(env::var("AGENDA_API_PORT").ok(), env::var("PORT").ok()),
            },
            rotas_publicas: rotas_de(env::var("PUBLIC_ROUTES").ok()),
        }
    }
}

fn porta_de(primaria: Option<String>, alternativa: Option<String>) -> u16 {
    primaria
        .or(alternativa)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000)
}

fn rotas_de(valor: Option<String>) -> Vec<String> {
    match valor {
        Some(v) if !v.trim().is_empty() => v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => ["/login", "/forgot-password", "/change-password"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
