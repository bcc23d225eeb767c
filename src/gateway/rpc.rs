use serde_json::{Map, Value};

/// Tagged view over the shapes the backend's procedures return: a bare
/// scalar, a single record, or an array of records. Every RPC interpreter
/// goes through this one reduction instead of re-growing its own if/else
/// chain.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    Scalar(Value),
    Record(Map<String, Value>),
    Records(Vec<Value>),
}

impl RpcOutcome {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => RpcOutcome::Records(items),
            Value::Object(map) => RpcOutcome::Record(map),
            other => RpcOutcome::Scalar(other),
        }
    }

    /// Reduce to a single record: an array yields its first element, a bare
    /// record is itself, a scalar has none.
    pub fn first_record(&self) -> Option<&Map<String, Value>> {
        match self {
            RpcOutcome::Record(map) => Some(map),
            RpcOutcome::Records(items) => items.first().and_then(Value::as_object),
            RpcOutcome::Scalar(_) => None,
        }
    }

    /// Read a boolean-ish flag. Recognized keys are scanned in order on the
    /// reduced record (non-boolean values count as set, nulls as absent);
    /// when none matches, the positional first value is accepted only if it
    /// is a real boolean. A bare boolean scalar is itself. Everything else is
    /// None.
    pub fn flag(&self, keys: &[&str]) -> Option<bool> {
        if let RpcOutcome::Scalar(value) = self {
            return value.as_bool();
        }
        let record = self.first_record()?;
        for key in keys {
            match record.get(*key) {
                Some(Value::Bool(b)) => return Some(*b),
                Some(Value::Null) | None => continue,
                Some(_) => return Some(true),
            }
        }
        match record.values().next() {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// First string value under any of the recognized keys.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        let record = self.first_record()?;
        keys.iter()
            .find_map(|key| record.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

/// Success flag + human message extracted from a procedure result. The
/// backend misspells both keys on some procedures ("sucess", "mensagem"), so
/// both spellings are recognized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcSummary {
    pub success: Option<bool>,
    pub message: Option<String>,
}

impl RpcSummary {
    pub fn from_value(value: &Value) -> Self {
        let outcome = RpcOutcome::from_value(value.clone());
        Self {
            success: outcome.flag(&["success", "sucess"]),
            message: outcome.text(&["message", "mensagem"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_records_reduces_to_first_element() {
        let outcome = RpcOutcome::from_value(json!([{"IsAdmin": true}, {"IsAdmin": false}]));
        assert_eq!(outcome.flag(&["IsAdmin", "isadmin"]), Some(true));
    }

    #[test]
    fn bare_record_and_lowercase_key() {
        let outcome = RpcOutcome::from_value(json!({"isadmin": false}));
        assert_eq!(outcome.flag(&["IsAdmin", "isadmin"]), Some(false));
    }

    #[test]
    fn bare_boolean_scalar_is_itself() {
        assert_eq!(RpcOutcome::from_value(json!(true)).flag(&["IsAdmin"]), Some(true));
        assert_eq!(RpcOutcome::from_value(json!(false)).flag(&["IsAdmin"]), Some(false));
    }

    #[test]
    fn positional_fallback_accepts_only_booleans() {
        let boolean_first = RpcOutcome::from_value(json!({"permitido": true}));
        assert_eq!(boolean_first.flag(&["IsAdmin"]), Some(true));

        let string_first = RpcOutcome::from_value(json!({"resultado": "sim"}));
        assert_eq!(string_first.flag(&["IsAdmin"]), None);

        let scalar = RpcOutcome::from_value(json!(42));
        assert_eq!(scalar.flag(&["IsAdmin"]), None);
    }

    #[test]
    fn summary_accepts_misspelled_keys() {
        let summary = RpcSummary::from_value(&json!([{"sucess": true, "mensagem": "Sucesso!"}]));
        assert_eq!(summary.success, Some(true));
        assert_eq!(summary.message.as_deref(), Some("Sucesso!"));
    }

    #[test]
    fn summary_reads_explicit_failure() {
        let summary = RpcSummary::from_value(&json!({"success": false, "message": "negado"}));
        assert_eq!(summary.success, Some(false));
        assert_eq!(summary.message.as_deref(), Some("negado"));
    }

    #[test]
    fn summary_of_unrecognized_shape_is_empty() {
        let summary = RpcSummary::from_value(&json!("texto solto"));
        assert_eq!(summary.success, None);
        assert_eq!(summary.message, None);
    }
}
