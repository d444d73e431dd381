//! Username/password login through the SOAP partner API.
//!
//! This is the same handshake the usual Salesforce client libraries perform:
//! post a `login` envelope, then read `sessionId` and `serverUrl` out of the
//! response. The session id is used as a bearer token for REST calls.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{Result, SfSeedError};

/// Production login host.
pub const LOGIN_URL: &str = "https://login.salesforce.com";
/// Sandbox login host.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

static SESSION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?sessionId>([^<]+)</(?:\w+:)?sessionId>").unwrap()
});
static SERVER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?serverUrl>([^<]+)</(?:\w+:)?serverUrl>").unwrap()
});
static FAULT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?faultstring>([^<]*)</(?:\w+:)?faultstring>").unwrap()
});

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub instance_url: String,
}

/// Build the SOAP `login` request body.
pub fn login_envelope(username: &str, password: &str, security_token: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xmlns:env="http://schemas.xmlsoap.org/soap/envelope/"
    xmlns:urn="urn:partner.soap.sforce.com">
  <env:Body>
    <urn:login>
      <urn:username>{}</urn:username>
      <urn:password>{}{}</urn:password>
    </urn:login>
  </env:Body>
</env:Envelope>"#,
        xml_escape(username),
        xml_escape(password),
        xml_escape(security_token)
    )
}

/// Extract the session from a login response body.
pub fn parse_login_response(body: &str) -> Result<Session> {
    if let Some(fault) = FAULT_STRING.captures(body) {
        return Err(SfSeedError::Auth {
            message: fault[1].to_string(),
        });
    }

    let access_token = SESSION_ID
        .captures(body)
        .map(|c| c[1].to_string())
        .ok_or_else(|| SfSeedError::Auth {
            message: "login response has no sessionId".to_string(),
        })?;
    let server_url = SERVER_URL
        .captures(body)
        .map(|c| c[1].to_string())
        .ok_or_else(|| SfSeedError::Auth {
            message: "login response has no serverUrl".to_string(),
        })?;

    Ok(Session {
        access_token,
        instance_url: instance_origin(&server_url)?,
    })
}

/// Reduce a full server URL to its `scheme://host[:port]` origin.
pub fn instance_origin(server_url: &str) -> Result<String> {
    let parsed = Url::parse(server_url).map_err(|e| SfSeedError::Config {
        message: format!("Invalid Salesforce URL '{}': {}", server_url, e),
    })?;
    if parsed.host_str().is_none() {
        return Err(SfSeedError::Config {
            message: format!("Salesforce URL '{}' has no host", server_url),
        });
    }
    Ok(parsed.origin().ascii_serialization())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
