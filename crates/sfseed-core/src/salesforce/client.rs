//! # Salesforce REST Client
//!
//! Authenticates against an org and serves the two calls object generation
//! needs: `describe` for field metadata and a `SELECT Id` query for existing
//! record identifiers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Result, SfSeedError};
use crate::salesforce::auth::{self, Session};
use crate::salesforce::describe::{parse_describe, QueryResponse};
use crate::schema::introspect::{validate_object_name, RecordSource, SchemaSource};
use crate::schema::types::FieldDescriptor;

/// REST/SOAP API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Maximum time to wait for a Salesforce response before aborting.
const API_TIMEOUT: Duration = Duration::from_secs(45);

/// How the client obtains its session.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// An existing session id or OAuth access token.
    Session {
        instance_url: String,
        access_token: String,
    },
    /// Username/password login through the SOAP partner API.
    Password {
        username: String,
        password: String,
        security_token: String,
        login_url: String,
    },
}

/// Authenticated REST client for one org.
#[derive(Debug, Clone)]
pub struct SalesforceClient {
    http: reqwest::Client,
    instance_url: Url,
    access_token: String,
    api_version: String,
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(API_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

impl SalesforceClient {
    /// Authenticate with `credentials` and return a ready client.
    pub async fn connect(credentials: &Credentials, api_version: &str) -> Result<Self> {
        match credentials {
            Credentials::Session {
                instance_url,
                access_token,
            } => Self::from_session(instance_url, access_token, api_version),
            Credentials::Password {
                username,
                password,
                security_token,
                login_url,
            } => {
                let http = build_http_client();
                let session =
                    login(&http, login_url, api_version, username, password, security_token)
                        .await?;
                debug!(instance = %session.instance_url, "Logged in");
                Self::build(http, &session.instance_url, session.access_token, api_version)
            }
        }
    }

    /// Client for an already established session.
    pub fn from_session(
        instance_url: &str,
        access_token: &str,
        api_version: &str,
    ) -> Result<Self> {
        if access_token.is_empty() {
            return Err(SfSeedError::Auth {
                message: "access token is empty".to_string(),
            });
        }
        let origin = auth::instance_origin(instance_url)?;
        Self::build(build_http_client(), &origin, access_token.to_string(), api_version)
    }

    fn build(
        http: reqwest::Client,
        instance_url: &str,
        access_token: String,
        api_version: &str,
    ) -> Result<Self> {
        let instance_url = Url::parse(instance_url).map_err(|e| SfSeedError::Config {
            message: format!("Invalid instance URL '{}': {}", instance_url, e),
        })?;
        Ok(Self {
            http,
            instance_url,
            access_token,
            api_version: api_version.trim_start_matches('v').to_string(),
        })
    }

    pub fn instance_url(&self) -> &str {
        self.instance_url.as_str()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `{instance}/services/data/v{version}/{path}`
    fn data_url(&self, path: &str) -> Result<Url> {
        let full = format!("services/data/v{}/{}", self.api_version, path);
        self.resolve(&full)
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.instance_url
            .join(path)
            .map_err(|e| SfSeedError::Config {
                message: format!("Cannot build URL for '{}': {}", path, e),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, url: Url) -> Result<T> {
        let body = self.get_text(operation, url).await?;
        serde_json::from_str(&body).map_err(|e| {
            SfSeedError::upstream(operation, format!("unexpected response body: {}", e))
        })
    }

    async fn get_text(&self, operation: &str, url: Url) -> Result<String> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SfSeedError::upstream(operation, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SfSeedError::upstream(operation, format!("reading response: {}", e)))?;

        if !status.is_success() {
            return Err(SfSeedError::upstream(
                operation,
                format!("HTTP {}: {}", status, truncate(&body, 500)),
            ));
        }
        Ok(body)
    }
}

async fn login(
    http: &reqwest::Client,
    login_url: &str,
    api_version: &str,
    username: &str,
    password: &str,
    security_token: &str,
) -> Result<Session> {
    let endpoint = format!(
        "{}/services/Soap/u/{}",
        login_url.trim_end_matches('/'),
        api_version.trim_start_matches('v')
    );
    let response = http
        .post(&endpoint)
        .header("Content-Type", "text/xml; charset=UTF-8")
        .header("SOAPAction", "login")
        .body(auth::login_envelope(username, password, security_token))
        .send()
        .await
        .map_err(|e| SfSeedError::Auth {
            message: format!("request to {} failed: {}", endpoint, e),
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| SfSeedError::Auth {
        message: format!("reading login response: {}", e),
    })?;

    match auth::parse_login_response(&body) {
        Ok(session) => Ok(session),
        Err(err) if status.is_success() => Err(err),
        Err(SfSeedError::Auth { message }) => Err(SfSeedError::Auth {
            message: format!("HTTP {}: {}", status, message),
        }),
        Err(err) => Err(err),
    }
}

impl SchemaSource for SalesforceClient {
    async fn describe(&self, object_name: &str) -> Result<Vec<FieldDescriptor>> {
        validate_object_name(object_name)?;
        let operation = format!("describe {}", object_name);
        let url = self.data_url(&format!("sobjects/{}/describe", object_name))?;

        let body = self.get_text(&operation, url).await?;
        let fields = parse_describe(&body)
            .map_err(|e| SfSeedError::upstream(&operation, format!("malformed describe: {}", e)))?;
        debug!(object = object_name, fields = fields.len(), "Described object");
        Ok(fields)
    }
}

impl RecordSource for SalesforceClient {
    async fn query_identifiers(&self, object_name: &str, limit: usize) -> Result<Vec<String>> {
        validate_object_name(object_name)?;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let operation = format!("query {}", object_name);
        let soql = format!("SELECT Id FROM {} LIMIT {}", object_name, limit);

        let mut url = self.data_url("query")?;
        url.query_pairs_mut().append_pair("q", &soql);

        let mut ids = Vec::new();
        loop {
            let page: QueryResponse = self.get_json(&operation, url).await?;
            ids.extend(page.records.into_iter().map(|r| r.id));
            match page.next_records_url {
                Some(next) if ids.len() < limit => url = self.resolve(&next)?,
                _ => break,
            }
        }
        ids.truncate(limit);
        Ok(ids)
    }
}

/// Truncate a string to at most `max_bytes` on a char boundary.
fn truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_normalizes_instance() {
        let client = SalesforceClient::from_session(
            "https://acme.my.salesforce.com/home/home.jsp",
            "00D!token",
            "v59.0",
        )
        .unwrap();
        assert_eq!(client.instance_url(), "https://acme.my.salesforce.com/");
        assert_eq!(client.api_version(), "59.0");
    }

    #[test]
    fn test_from_session_rejects_empty_token() {
        let err = SalesforceClient::from_session("https://acme.my.salesforce.com", "", "59.0")
            .unwrap_err();
        assert!(matches!(err, SfSeedError::Auth { .. }));
    }

    #[test]
    fn test_data_url() {
        let client =
            SalesforceClient::from_session("https://acme.my.salesforce.com", "t", "59.0").unwrap();
        let url = client.data_url("sobjects/Account/describe").unwrap();
        assert_eq!(
            url.as_str(),
            "https://acme.my.salesforce.com/services/data/v59.0/sobjects/Account/describe"
        );

        let next = client
            .resolve("/services/data/v59.0/query/01gD0000002HU6KIAW-2000")
            .unwrap();
        assert_eq!(
            next.as_str(),
            "https://acme.my.salesforce.com/services/data/v59.0/query/01gD0000002HU6KIAW-2000"
        );
    }

    #[tokio::test]
    async fn test_describe_rejects_bad_object_name() {
        let client =
            SalesforceClient::from_session("https://acme.my.salesforce.com", "t", "59.0").unwrap();
        let err = client.describe("Account/../../limits").await.unwrap_err();
        assert!(matches!(err, SfSeedError::InvalidArgument { .. }));
        let err = client
            .query_identifiers("Account LIMIT 1", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SfSeedError::InvalidArgument { .. }));
    }

    #[test]
    fn test_truncate_char_boundary() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("hello", 3), "hel");
    }
}
