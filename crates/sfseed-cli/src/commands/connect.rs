//! Shared setup for subcommands: config loading, authentication and the
//! object generator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use sfseed_core::config::{read_config, SfSeedConfig};
use sfseed_core::salesforce::{Credentials, SalesforceClient, SANDBOX_LOGIN_URL};
use sfseed_core::DefaultIds;

use crate::args::ConnectionArgs;

/// Load `sfseed.toml` from the working directory, or defaults when absent.
pub fn load_config() -> Result<SfSeedConfig> {
    let config = read_config(Path::new("."))?;
    match &config {
        Some(c) => debug!(
            dir = ?c.config_dir,
            overrides = c.fields.len(),
            "Loaded sfseed.toml"
        ),
        None => debug!("No sfseed.toml found, using defaults"),
    }
    Ok(config.unwrap_or_default())
}

/// Pick credentials from flags/env first, then sfseed.toml.
pub fn credentials(args: &ConnectionArgs, config: &SfSeedConfig) -> Result<Credentials> {
    if let Some(token) = &args.access_token {
        let instance_url = args
            .instance_url
            .clone()
            .or_else(|| config.salesforce.instance_url.clone())
            .context("SF_ACCESS_TOKEN is set but no instance URL was given (--instance-url or SF_INSTANCE_URL)")?;
        return Ok(Credentials::Session {
            instance_url,
            access_token: token.clone(),
        });
    }

    let username = args
        .username
        .clone()
        .or_else(|| config.salesforce.username.clone());
    let Some(username) = username else {
        bail!(
            "No Salesforce credentials found.\n  \
             Set SF_ACCESS_TOKEN and SF_INSTANCE_URL, or\n  \
             SF_USERNAME, SF_PASSWORD and SF_SECURITY_TOKEN (a .env file works too)."
        );
    };
    let Some(password) = args.password.clone() else {
        bail!("No password for {}. Set SF_PASSWORD.", username);
    };

    let login_url = if let Some(url) = &args.login_url {
        url.trim_end_matches('/').to_string()
    } else if args.sandbox {
        SANDBOX_LOGIN_URL.to_string()
    } else {
        config.login_url()
    };

    Ok(Credentials::Password {
        username,
        password,
        security_token: args.security_token.clone().unwrap_or_default(),
        login_url,
    })
}

/// Authenticate and return a client, with a spinner while it runs.
pub async fn connect(args: &ConnectionArgs, config: &SfSeedConfig) -> Result<SalesforceClient> {
    let creds = credentials(args, config)?;
    let api_version = args
        .api_version
        .clone()
        .unwrap_or_else(|| config.api_version().to_string());

    let pb = spinner("1/2", "Connecting to Salesforce...");
    let client = SalesforceClient::connect(&creds, &api_version)
        .await
        .context("Failed to connect to Salesforce")?;
    pb.finish_with_message(format!(
        "Connecting to Salesforce... ✓ {} (API v{})",
        client.instance_url(),
        client.api_version()
    ));
    Ok(client)
}

/// Default-id table from the flag, else sfseed.toml, else empty.
pub fn load_default_ids(flag: Option<&PathBuf>, config: &SfSeedConfig) -> Result<DefaultIds> {
    let path = flag.cloned().or_else(|| config.default_ids_path());
    match path {
        Some(path) => {
            let ids = DefaultIds::from_path(&path)
                .with_context(|| format!("Failed to load default ids from {}", path.display()))?;
            debug!(path = %path.display(), entries = ids.len(), "Loaded default ids");
            Ok(ids)
        }
        None => {
            debug!("No default-id table configured");
            Ok(DefaultIds::new())
        }
    }
}

pub fn spinner(prefix: &str, message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} [{prefix}] {msg}") {
        pb.set_style(style);
    }
    pb.set_prefix(prefix.to_string());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
