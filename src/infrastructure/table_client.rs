//! HTTP client for the instance's Table API and update set export endpoints.
//!
//! Every request is a single authenticated GET; there is no retry and no
//! pagination.

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AppError, Credentials, ExportConfig, ExportTarget, Result};

/// Page size requested from the Table API. Only the first page is read.
pub const PAGE_LIMIT: u32 = 1;

/// Envelope of a Table API list response.
#[derive(Debug, Deserialize)]
struct TableResponse {
    #[serde(default)]
    result: Option<Vec<Value>>,
}

/// Envelope of the legacy JSON processor's `getRecords` response.
#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<RemoteUpdateSetRow>,
}

#[derive(Debug, Deserialize)]
struct RemoteUpdateSetRow {
    sys_id: String,
}

/// Authenticated client bound to one instance.
pub struct TableClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl TableClient {
    /// Builds a client for the configured instance.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// URL of a table's record collection.
    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/api/now/table/{table}", self.base_url)
    }

    /// Fetches the first page of records for a target.
    ///
    /// Records come back as raw JSON so one malformed row does not sink the
    /// whole page.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, an unparsable
    /// body, or a body without a `result` array.
    pub async fn fetch_records(&self, target: &ExportTarget) -> Result<Vec<Value>> {
        let limit = PAGE_LIMIT.to_string();
        let mut query = vec![("sysparm_limit", limit.as_str())];
        if !target.filter.is_empty() {
            query.push(("sysparm_query", target.filter.as_str()));
        }

        let body = self.get_text(&self.table_url(&target.table), &query).await?;
        let parsed: TableResponse = serde_json::from_str(&body).map_err(AppError::json_parse)?;

        let records = parsed
            .result
            .ok_or_else(|| AppError::malformed("response has no `result` array"))?;

        tracing::debug!("Fetched {} records from {}", records.len(), target.table);
        Ok(records)
    }

    /// Looks up the sys_ids of remote update sets with an exact name.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status or unparsable body.
    pub async fn find_remote_update_sets(&self, name: &str) -> Result<Vec<String>> {
        let url = format!("{}/sys_remote_update_set.do?JSON", self.base_url);
        let filter = format!("name={name}");
        let query = [
            ("sysparm_action", "getRecords"),
            ("sysparm_query", filter.as_str()),
        ];

        let body = self.get_text(&url, &query).await?;
        let parsed: RecordsResponse = serde_json::from_str(&body).map_err(AppError::json_parse)?;

        Ok(parsed.records.into_iter().map(|r| r.sys_id).collect())
    }

    /// Downloads the XML export of a remote update set.
    ///
    /// # Errors
    /// Returns error on transport failure or non-success status.
    pub async fn export_update_set(&self, sys_id: &str) -> Result<String> {
        let url = format!("{}/export_update_set.do", self.base_url);
        let query = [
            ("sysparm_delete_when_done", "false"),
            ("sysparm_sys_id", sys_id),
        ];

        self.get_text(&url, &query).await
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.get(url, query).await?;
        Ok(response.text().await?)
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .query(query)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TableClient {
        let config = ExportConfig::with_base_url(
            server.uri(),
            Credentials::new("admin", "secret"),
            ".",
        );
        TableClient::new(&config).unwrap()
    }

    #[test]
    fn test_table_url() {
        let config = ExportConfig::new("dev1", Credentials::new("u", "p"), ".");
        let client = TableClient::new(&config).unwrap();
        assert_eq!(
            client.table_url("sys_ui_script"),
            "https://dev1.service-now.com/api/now/table/sys_ui_script"
        );
    }

    #[tokio::test]
    async fn test_fetch_records_sends_limit_and_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/now/table/sys_script_include"))
            .and(query_param("sysparm_limit", "1"))
            .and(query_param_is_missing("sysparm_query"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": [{"name": "Util", "script": "var x;"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .fetch_records(&ExportTarget::new("sys_script_include", "", ".js"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Util");
    }

    #[tokio::test]
    async fn test_fetch_records_adds_non_empty_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/now/table/sys_ui_script"))
            .and(query_param("sysparm_query", "active=true"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .fetch_records(&ExportTarget::new("sys_ui_script", "active=true", ".js"))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_records_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_records(&ExportTarget::new("sys_ui_script", "", ".js"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status { status, .. } if status.as_u16() == 401));
    }

    #[tokio::test]
    async fn test_fetch_records_requires_result_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "nope"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_records(&ExportTarget::new("sys_ui_script", "", ".js"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_records_rejects_non_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_records(&ExportTarget::new("sys_ui_script", "", ".js"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::JsonParse { .. }));
    }

    #[tokio::test]
    async fn test_find_remote_update_sets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sys_remote_update_set.do"))
            .and(query_param("sysparm_action", "getRecords"))
            .and(query_param("sysparm_query", "name=Release 1"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [{"sys_id": "abc123", "name": "Release 1"}]
            })))
            .mount(&server)
            .await;

        let ids = client_for(&server)
            .find_remote_update_sets("Release 1")
            .await
            .unwrap();
        assert_eq!(ids, vec!["abc123".to_string()]);
    }
}
