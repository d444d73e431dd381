//! Salesforce connectivity: SOAP login and the REST describe/query calls.

pub mod auth;
pub mod client;
mod describe;

pub use auth::{LOGIN_URL, SANDBOX_LOGIN_URL};
pub use client::{Credentials, SalesforceClient, DEFAULT_API_VERSION};
