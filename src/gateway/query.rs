use serde_json::Value;

use super::{backend_error, read_json, Gateway, GatewayError};

/// Fluent builder for table-style queries against a relation or view:
/// select/filter/order/limit reads plus insert/update/delete writes with
/// equality-filtered targeting.
#[derive(Debug)]
pub struct TableQuery {
    gateway: Gateway,
    relation: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl TableQuery {
    pub(crate) fn new(gateway: Gateway, relation: &str) -> Self {
        Self {
            gateway,
            relation: relation.to_string(),
            select: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("gte.{}", value.to_string())));
        self
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("lte.{}", value.to_string())));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    pub async fn fetch_all(self) -> Result<Vec<Value>, GatewayError> {
        let url = self.gateway.rest_url(&self.relation);
        let resp = self
            .gateway
            .authed(self.gateway.http.get(url))
            .query(&self.params())
            .send()
            .await?;
        rows_from(read_json(resp).await?)
    }

    /// Fetch expecting exactly one row, like a primary-key lookup or an
    /// RLS-scoped profile select.
    pub async fn fetch_single(self) -> Result<Value, GatewayError> {
        let relation = self.relation.clone();
        let mut rows = self.fetch_all().await?;
        if rows.len() != 1 {
            return Err(GatewayError::RowCount {
                relation,
                count: rows.len(),
            });
        }
        Ok(rows.remove(0))
    }

    /// Insert one row or an array of rows, returning the inserted
    /// representation.
    pub async fn insert(self, rows: Value) -> Result<Vec<Value>, GatewayError> {
        let url = self.gateway.rest_url(&self.relation);
        let resp = self
            .gateway
            .authed(self.gateway.http.post(url))
            .header("Prefer", "return=representation")
            .query(&self.params())
            .json(&rows)
            .send()
            .await?;
        rows_from(read_json(resp).await?)
    }

    /// Patch every row matching the filters. Refuses to run unfiltered; a
    /// missing filter here would rewrite the whole relation.
    pub async fn update(self, patch: Value) -> Result<Vec<Value>, GatewayError> {
        if self.filters.is_empty() {
            return Err(GatewayError::UnfilteredWrite {
                op: "update",
                relation: self.relation,
            });
        }
        let url = self.gateway.rest_url(&self.relation);
        let resp = self
            .gateway
            .authed(self.gateway.http.patch(url))
            .header("Prefer", "return=representation")
            .query(&self.params())
            .json(&patch)
            .send()
            .await?;
        rows_from(read_json(resp).await?)
    }

    /// Delete every row matching the filters, with the same unfiltered guard
    /// as [`TableQuery::update`].
    pub async fn delete(self) -> Result<(), GatewayError> {
        if self.filters.is_empty() {
            return Err(GatewayError::UnfilteredWrite {
                op: "delete",
                relation: self.relation,
            });
        }
        let url = self.gateway.rest_url(&self.relation);
        let resp = self
            .gateway
            .authed(self.gateway.http.delete(url))
            .query(&self.params())
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(backend_error(resp).await)
        }
    }
}

fn rows_from(value: Value) -> Result<Vec<Value>, GatewayError> {
    match value {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(GatewayError::Decode(format!(
            "expected an array of rows, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use serde_json::json;

    fn gateway() -> Gateway {
        Gateway::new(&GatewayConfig {
            url: "http://127.0.0.1:9".to_string(),
            apikey: "anon".to_string(),
            service_role: None,
        })
        .expect("gateway")
    }

    #[test]
    fn builds_postgrest_params_in_order() {
        let query = gateway()
            .table("view_agendamentos")
            .select("*")
            .gte("data_hora", "2026-08-23T00:00:00")
            .lte("data_hora", "2026-08-29T23:59:59")
            .order("data_hora", true)
            .limit(50);

        let params = query.params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("data_hora".to_string(), "gte.2026-08-23T00:00:00".to_string()),
                ("data_hora".to_string(), "lte.2026-08-29T23:59:59".to_string()),
                ("order".to_string(), "data_hora.asc".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn update_without_filters_is_refused_before_any_request() {
        // Port 9 is unreachable; the guard must fire before a request is made
        let err = gateway()
            .table("agendamento")
            .update(json!({"status": "cancelado"}))
            .await
            .expect_err("unfiltered update must fail");
        assert!(matches!(
            err,
            GatewayError::UnfilteredWrite { op: "update", .. }
        ));
    }

    #[tokio::test]
    async fn delete_without_filters_is_refused_before_any_request() {
        let err = gateway()
            .table("agendamento")
            .delete()
            .await
            .expect_err("unfiltered delete must fail");
        assert!(matches!(
            err,
            GatewayError::UnfilteredWrite { op: "delete", .. }
        ));
    }
}
