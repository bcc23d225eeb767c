use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Column aliases observed on the backing view, in resolution order. The view
// has been through several renames (accented, spaced, camelCased); the
// normalizer is the single place that knows every spelling.
const ALIAS_DATA_HORA: &[&str] = &[
    "data_hora",
    "data e horario",
    "data_e_horario",
    "dataHorario",
    "data-hora",
];
const ALIAS_CLIENTE_NOME: &[&str] = &["cliente_nome", "nome_cliente"];
const ALIAS_PROFISSIONAL_NOME: &[&str] = &["profissional_nome", "nome_profissional"];
const ALIAS_OBSERVACOES: &[&str] = &["observações", "observacoes", "observação", "observacao"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAgendamento {
    Pendente,
    Confirmado,
    Cancelado,
    Concluido,
}

impl StatusAgendamento {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAgendamento::Pendente => "pendente",
            StatusAgendamento::Confirmado => "confirmado",
            StatusAgendamento::Cancelado => "cancelado",
            StatusAgendamento::Concluido => "concluido",
        }
    }
}

/// Client display projection attached by the view join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClienteResumo {
    pub nome: String,
    pub email: Option<String>,
}

/// Professional display projection attached by the view join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfissionalResumo {
    pub id: Option<i64>,
    pub nome: String,
}

/// Canonical appointment record, stable regardless of which aliases the raw
/// view row carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agendamento {
    pub id: i64,
    pub created_at: Option<NaiveDateTime>,
    pub data_hora: Option<NaiveDateTime>,
    pub status: StatusAgendamento,
    pub observacoes: Option<String>,
    pub cliente_id: Option<i64>,
    pub profissional_id: Option<i64>,
    pub cliente: ClienteResumo,
    pub profissional: ProfissionalResumo,
}

/// Map a raw heterogeneous view row into the canonical shape. Total: any
/// input, including non-objects, produces a fully-shaped record with
/// null/empty defaults.
pub fn normalize_agendamento(raw: &Value) -> Agendamento {
    let vazio = Map::new();
    let rec = raw.as_object().unwrap_or(&vazio);

    Agendamento {
        id: rec.get("id").and_then(Value::as_i64).unwrap_or(0),
        created_at: rec.get("created_at").and_then(parse_timestamp),
        data_hora: primeiro_valor(rec, ALIAS_DATA_HORA).and_then(parse_timestamp),
        status: status_de(rec.get("status")),
        observacoes: texto(rec, ALIAS_OBSERVACOES),
        cliente_id: id_em(rec, "cliente_id", "cliente"),
        profissional_id: id_em(rec, "profissional_id", "profissional"),
        cliente: ClienteResumo {
            nome: texto(rec, ALIAS_CLIENTE_NOME).unwrap_or_default(),
            email: rec
                .get("cliente_email")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        profissional: ProfissionalResumo {
            id: id_em(rec, "profissional_id", "profissional"),
            nome: texto(rec, ALIAS_PROFISSIONAL_NOME).unwrap_or_default(),
        },
    }
}

/// Lenient timestamp parsing: RFC 3339, naive with `T` or space separator,
/// date-only (midnight).
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    let s = value.as_str()?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for formato in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, formato) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn primeiro_valor<'a>(rec: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .find_map(|alias| rec.get(*alias).filter(|v| !v.is_null()))
}

fn texto(rec: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    primeiro_valor(rec, aliases)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Foreign key: the explicit `_id` column wins; the bare relation name only
/// counts when it is numeric (an object there is the joined row, not an id).
fn id_em(rec: &Map<String, Value>, coluna_id: &str, relacao: &str) -> Option<i64> {
    rec.get(coluna_id)
        .and_then(Value::as_i64)
        .or_else(|| rec.get(relacao).and_then(Value::as_i64))
}

fn status_de(value: Option<&Value>) -> StatusAgendamento {
    match value.and_then(Value::as_str) {
        Some("confirmado") => StatusAgendamento::Confirmado,
        Some("cancelado") => StatusAgendamento::Cancelado,
        Some("concluido") => StatusAgendamento::Concluido,
        // Unknown or missing status normalizes to the backend's initial state
        _ => StatusAgendamento::Pendente,
    }
}
