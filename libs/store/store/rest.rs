use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde_derive::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    Filter, PinFuture, Query, Record, Store, StoreBox, StoreConfig, StoreError, StoreResult, Table,
};

/// Configuration of the hosted PostgREST-style store.
#[derive(Debug, Deserialize, Default)]
pub struct RestStoreConfig {
    /// Base url of the project, e.g. https://xyz.supabase.co
    pub url: Option<String>,
    /// Service key, sent both as `apikey` and as a bearer token
    pub api_key: Option<String>,
}

/// Speaks the PostgREST dialect over the two board tables: equality filters
/// as `?field=eq.value`, inserts echoing the created rows, and the
/// object-accept header for exactly-one selects.
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl StoreConfig for RestStoreConfig {
    type Store = RestStore;

    fn try_into_store(self) -> eyre::Result<StoreBox> {
        Ok(StoreBox::new(RestStore::try_new(self)?))
    }
}

impl RestStore {
    pub fn try_new(config: RestStoreConfig) -> eyre::Result<Self> {
        let url = config
            .url
            .ok_or_else(|| eyre::eyre!("rest store has no 'url' configured"))?;

        let mut headers = header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let mut api_key = header::HeaderValue::from_str(key)?;
            api_key.set_sensitive(true);
            headers.insert("apikey", api_key);
            let mut bearer = header::HeaderValue::from_str(&format!("Bearer {key}"))?;
            bearer.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, bearer);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(RestStore {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, query: &Query) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(query.table))
            .query(&filter_params(&query.filters))
    }
}

/// Filters in PostgREST form: `?field=eq.value`.
fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            (
                filter.field.clone(),
                format!("eq.{}", plain_value(&filter.value)),
            )
        })
        .collect()
}

/// Strings go on the wire unquoted; everything else keeps its JSON form.
fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_for(status: StatusCode, body: &str) -> StoreError {
    match status {
        // PostgREST answers 406 when the object-accept header is set and the
        // result is not exactly one row; the body tells which way it failed.
        StatusCode::NOT_ACCEPTABLE if body.contains("0 rows") => StoreError::NotFound,
        StatusCode::NOT_ACCEPTABLE => StoreError::NotSingular,
        StatusCode::CONFLICT => StoreError::Conflict(body.to_string()),
        _ => StoreError::Backend(format!("{status}: {body}")),
    }
}

fn backend(e: reqwest::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn malformed(e: reqwest::Error) -> StoreError {
    StoreError::Malformed(e.to_string())
}

async fn checked(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_for(status, &body))
}

impl Store for RestStore {
    fn select(&self, query: Query) -> PinFuture<StoreResult<Vec<Record>>> {
        Box::pin(async move {
            debug!(table = %query.table, single = query.single, "select");
            let mut request = self
                .request(Method::GET, &query)
                .query(&[("select", "*")]);
            if query.single {
                request = request.header(header::ACCEPT, "application/vnd.pgrst.object+json");
            }

            let response = checked(request.send().await.map_err(backend)?).await?;
            if query.single {
                let record: Record = response.json().await.map_err(malformed)?;
                Ok(vec![record])
            } else {
                response.json().await.map_err(malformed)
            }
        })
    }

    fn insert(&self, table: Table, rows: Vec<Record>) -> PinFuture<StoreResult<Vec<Record>>> {
        Box::pin(async move {
            debug!(table = %table, rows = rows.len(), "insert");
            let response = self
                .client
                .post(self.endpoint(table))
                .header("Prefer", "return=representation")
                .json(&rows)
                .send()
                .await
                .map_err(backend)?;

            let response = checked(response).await?;
            response.json().await.map_err(malformed)
        })
    }

    fn update(&self, query: Query, patch: Record) -> PinFuture<StoreResult<()>> {
        Box::pin(async move {
            debug!(table = %query.table, "update");
            let response = self
                .request(Method::PATCH, &query)
                .json(&patch)
                .send()
                .await
                .map_err(backend)?;

            checked(response).await?;
            Ok(())
        })
    }

    fn delete(&self, query: Query) -> PinFuture<StoreResult<()>> {
        Box::pin(async move {
            debug!(table = %query.table, "delete");
            let response = self
                .request(Method::DELETE, &query)
                .send()
                .await
                .map_err(backend)?;

            checked(response).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_params_wire_form() {
        let query = Query::table(Table::Tasks)
            .eq("owner", "u1")
            .eq("order", 3);

        let params = filter_params(&query.filters);
        assert_eq!(
            params,
            vec![
                ("owner".to_string(), "eq.u1".to_string()),
                ("order".to_string(), "eq.3".to_string()),
            ]
        );
    }

    #[test]
    fn test_plain_value_keeps_strings_unquoted() {
        assert_eq!(plain_value(&json!("abc")), "abc");
        assert_eq!(plain_value(&json!(42)), "42");
        assert_eq!(plain_value(&json!(true)), "true");
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            error_for(
                StatusCode::NOT_ACCEPTABLE,
                "The result contains 0 rows"
            ),
            StoreError::NotFound
        ));
        assert!(matches!(
            error_for(StatusCode::NOT_ACCEPTABLE, "Results contain 3 rows"),
            StoreError::NotSingular
        ));
        assert!(matches!(
            error_for(StatusCode::CONFLICT, "duplicate key"),
            StoreError::Conflict(_)
        ));
        assert!(matches!(
            error_for(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let result = RestStore::try_new(RestStoreConfig::default());
        assert!(result.is_err());
    }
}
