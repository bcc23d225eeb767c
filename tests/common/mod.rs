#![allow(dead_code)]

// Shared test harness: an in-process HTTP double of the hosted data platform
// (REST relations, stored procedures, auth endpoints), plus request counters
// so tests can assert how many times each surface was hit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::{json, Value};

use agenda_admin_rust::config::GatewayConfig;
use agenda_admin_rust::gateway::Gateway;

pub const ACCESS_TOKEN: &str = "tok-mock-access";
pub const AUTH_USER_ID: &str = "4f6c2c0a-9f9e-4d76-9a1a-2b7a8e5d3c01";

/// Knobs the tests turn between requests.
#[derive(Debug, Default)]
pub struct MockConfig {
    /// Whether `view_agendamentos.data_hora` exists; false answers the probe
    /// with an undefined-column error.
    pub sem_data_hora: bool,
    /// Rows returned by reads of view_agendamentos.
    pub agendamentos: Vec<Value>,
    /// Fail week-filtered reads of the view with a 500.
    pub fail_filtrada: bool,
    /// Fail unfiltered reads of the view with a 500.
    pub fail_sem_filtro: bool,
    /// Rows per relation for generic GETs.
    pub rows: HashMap<String, Vec<Value>>,
    /// Relations whose GET fails with a 500.
    pub fail_select: Vec<String>,
    /// Relations whose POST (insert) fails with a 500.
    pub fail_insert: Vec<String>,
    /// Relations whose PATCH (update) fails with a 500.
    pub fail_update: Vec<String>,
    /// Result per stored procedure name.
    pub rpc: HashMap<String, Value>,
    /// Procedures that fail with a 500.
    pub rpc_fail: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Counters(Arc<Mutex<HashMap<String, usize>>>);

impl Counters {
    fn bump(&self, key: &str) {
        let mut counts = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> usize {
        let counts = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        counts.get(key).copied().unwrap_or(0)
    }
}

#[derive(Clone)]
struct MockState {
    config: Arc<Mutex<MockConfig>>,
    counts: Counters,
}

impl MockState {
    fn with_config<T>(&self, f: impl FnOnce(&MockConfig) -> T) -> T {
        f(&self.config.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// A running mock backend bound to an ephemeral port.
pub struct MockBackend {
    pub base_url: String,
    config: Arc<Mutex<MockConfig>>,
    counts: Counters,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::start_with(MockConfig::default()).await
    }

    pub async fn start_with(config: MockConfig) -> Self {
        let config = Arc::new(Mutex::new(config));
        let counts = Counters::default();
        let state = MockState {
            config: config.clone(),
            counts: counts.clone(),
        };

        let app = Router::new()
            .route("/rest/v1", get(rest_root))
            .route("/rest/v1/rpc/:nome", post(rpc_call))
            .route(
                "/rest/v1/:relation",
                get(rest_get).post(rest_insert).patch(rest_update).delete(rest_delete),
            )
            .route("/auth/v1/token", post(auth_token))
            .route("/auth/v1/logout", post(auth_logout))
            .route("/auth/v1/recover", post(auth_recover))
            .route("/auth/v1/user", get(auth_user).put(auth_update_password))
            .route("/auth/v1/admin/users", post(auth_admin_create))
            .route("/auth/v1/admin/users/:id", delete(auth_admin_delete))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            config,
            counts,
        }
    }

    pub fn configure(&self, f: impl FnOnce(&mut MockConfig)) {
        f(&mut self.config.lock().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key)
    }

    /// Poll a counter until it reaches `esperado`, for fire-and-forget work.
    pub async fn aguardar_count(&self, key: &str, esperado: usize) {
        for _ in 0..200 {
            if self.count(key) >= esperado {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "counter {} never reached {} (currently {})",
            key,
            esperado,
            self.count(key)
        );
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            url: self.base_url.clone(),
            apikey: "anon-test-key".to_string(),
            service_role: None,
        }
    }

    pub fn gateway_config_com_service_role(&self) -> GatewayConfig {
        GatewayConfig {
            service_role: Some("service-role-test-key".to_string()),
            ..self.gateway_config()
        }
    }

    pub fn gateway(&self) -> Gateway {
        Gateway::new(&self.gateway_config()).expect("mock gateway")
    }
}

fn erro_500(mensagem: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": mensagem })),
    )
        .into_response()
}

async fn rest_root() -> StatusCode {
    StatusCode::OK
}

async fn rest_get(
    State(state): State<MockState>,
    Path(relation): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if relation == "view_agendamentos" {
        return view_get(&state, &params);
    }

    state.counts.bump(&format!("GET {}", relation));
    state.with_config(|config| {
        if config.fail_select.iter().any(|r| r == &relation) {
            erro_500("select failed")
        } else {
            Json(Value::Array(
                config.rows.get(&relation).cloned().unwrap_or_default(),
            ))
            .into_response()
        }
    })
}

fn view_get(state: &MockState, params: &[(String, String)]) -> Response {
    let probe = params
        .iter()
        .any(|(k, v)| k == "select" && v == "data_hora");
    let filtrada = params.iter().any(|(k, _)| k == "data_hora");

    state.with_config(|config| {
        if probe {
            state.counts.bump("probe");
            return if config.sem_data_hora {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "code": "42703",
                        "message": "column view_agendamentos.data_hora does not exist"
                    })),
                )
                    .into_response()
            } else {
                Json(json!([])).into_response()
            };
        }

        if filtrada {
            state.counts.bump("fetch_filtrada");
            if config.fail_filtrada {
                return erro_500("filtered query failed");
            }
        } else {
            state.counts.bump("fetch_sem_filtro");
            if config.fail_sem_filtro {
                return erro_500("unfiltered query failed");
            }
        }
        Json(Value::Array(config.agendamentos.clone())).into_response()
    })
}

async fn rest_insert(
    State(state): State<MockState>,
    Path(relation): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.counts.bump(&format!("POST {}", relation));
    state.with_config(|config| {
        if config.fail_insert.iter().any(|r| r == &relation) {
            erro_500("insert failed")
        } else {
            let rows = match body {
                Value::Array(rows) => rows,
                other => vec![other],
            };
            (StatusCode::CREATED, Json(Value::Array(rows))).into_response()
        }
    })
}

async fn rest_update(
    State(state): State<MockState>,
    Path(relation): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.counts.bump(&format!("PATCH {}", relation));
    state.with_config(|config| {
        if config.fail_update.iter().any(|r| r == &relation) {
            erro_500("update failed")
        } else {
            Json(json!([body])).into_response()
        }
    })
}

async fn rest_delete(State(state): State<MockState>, Path(relation): Path<String>) -> Response {
    state.counts.bump(&format!("DELETE {}", relation));
    StatusCode::NO_CONTENT.into_response()
}

async fn rpc_call(State(state): State<MockState>, Path(nome): Path<String>) -> Response {
    state.counts.bump(&format!("rpc {}", nome));
    state.with_config(|config| {
        if config.rpc_fail.iter().any(|n| n == &nome) {
            erro_500("rpc failed")
        } else {
            Json(config.rpc.get(&nome).cloned().unwrap_or(Value::Null)).into_response()
        }
    })
}

async fn auth_token(State(state): State<MockState>) -> Response {
    state.counts.bump("auth_token");
    Json(json!({
        "access_token": ACCESS_TOKEN,
        "refresh_token": "tok-mock-refresh",
        "user": { "id": AUTH_USER_ID, "email": "admin@example.com" }
    }))
    .into_response()
}

async fn auth_logout(State(state): State<MockState>) -> StatusCode {
    state.counts.bump("auth_logout");
    StatusCode::NO_CONTENT
}

async fn auth_recover(State(state): State<MockState>) -> StatusCode {
    state.counts.bump("auth_recover");
    StatusCode::NO_CONTENT
}

async fn auth_user(State(state): State<MockState>) -> Response {
    state.counts.bump("auth_user");
    Json(json!({ "id": AUTH_USER_ID, "email": "admin@example.com" })).into_response()
}

async fn auth_update_password(State(state): State<MockState>) -> StatusCode {
    state.counts.bump("auth_update_password");
    StatusCode::NO_CONTENT
}

async fn auth_admin_create(State(state): State<MockState>) -> Response {
    state.counts.bump("auth_create");
    Json(json!({ "user": { "id": AUTH_USER_ID } })).into_response()
}

async fn auth_admin_delete(State(state): State<MockState>, Path(id): Path<String>) -> StatusCode {
    state.counts.bump("auth_delete");
    let _ = id;
    StatusCode::NO_CONTENT
}
