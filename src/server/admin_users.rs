use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

use super::response::{ApiResponse, ApiResult};
use super::AppState;
use crate::error::ApiError;
use crate::gateway::{AdminGateway, NovoUsuario, UserDTO};

/// GET /api/admin/users - every profile, safe projection, ordered by name.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserDTO>> {
    let admin = require_admin(&state)?;
    let usuarios = admin.list_users().await?;
    Ok(ApiResponse::success(usuarios))
}

/// POST /api/admin/users - create auth user + profile row, with rollback of
/// the auth side when the profile insert fails.
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Value> {
    let admin = require_admin(&state)?;

    let email = campo_texto(&body, "email");
    let password = campo_texto(&body, "password");
    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            return Err(ApiError::bad_request(
                "Missing required fields: email and password",
            ))
        }
    };

    let novo = NovoUsuario {
        email,
        password,
        name: campo_texto(&body, "name"),
        role: campo_texto(&body, "role"),
    };

    let criado = admin.create_user(novo).await?;
    Ok(ApiResponse::created(criado))
}

/// DELETE /api/admin/users?id= - profile row then auth record.
pub async fn remove(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let admin = require_admin(&state)?;

    let id = params
        .get("id")
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing user id"))?;

    admin.delete_user(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

fn require_admin(state: &AppState) -> Result<&AdminGateway, ApiError> {
    state.admin.as_ref().ok_or_else(ApiError::admin_not_configured)
}

fn campo_texto(body: &Value, campo: &str) -> Option<String> {
    body.get(campo)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
