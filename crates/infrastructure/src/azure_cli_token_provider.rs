//! Developer-machine fallback that borrows the Azure CLI login.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use scopefinder_application::{AccessToken, AccessTokenProvider};
use scopefinder_core::{AppError, AppResult};
use serde::Deserialize;
use tokio::process::Command;

use crate::managed_identity_token_provider::GRAPH_RESOURCE;

const CLI_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliAccessToken {
    access_token: String,
    /// Local wall-clock time, e.g. `2026-10-16 14:05:12.000000`.
    expires_on: Option<String>,
    /// Unix timestamp, only emitted by newer CLI versions.
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
}

impl CliAccessToken {
    fn into_access_token(self) -> AccessToken {
        let expires_at = self
            .expires_on_unix
            .and_then(|timestamp| DateTime::<Utc>::from_timestamp(timestamp, 0))
            .or_else(|| self.expires_on.as_deref().and_then(parse_local_expiry));

        AccessToken::new(self.access_token, expires_at)
    }
}

fn parse_local_expiry(value: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Runs `az account get-access-token` for the Graph resource.
pub struct AzureCliTokenProvider {
    tenant_id: Option<String>,
}

impl AzureCliTokenProvider {
    /// Creates a provider, optionally pinned to a tenant.
    #[must_use]
    pub fn new(tenant_id: Option<String>) -> Self {
        Self {
            tenant_id: tenant_id.filter(|value| !value.trim().is_empty()),
        }
    }

    fn command(&self) -> Command {
        let program = if cfg!(windows) { "az.cmd" } else { "az" };
        let mut command = Command::new(program);
        command.args([
            "account",
            "get-access-token",
            "--resource",
            GRAPH_RESOURCE,
            "--output",
            "json",
        ]);
        if let Some(tenant_id) = &self.tenant_id {
            command.args(["--tenant", tenant_id.as_str()]);
        }
        command.kill_on_drop(true);
        command
    }
}

#[async_trait]
impl AccessTokenProvider for AzureCliTokenProvider {
    async fn access_token(&self) -> AppResult<AccessToken> {
        let operation = "Failed to acquire Azure CLI token";
        let mut command = self.command();
        let output = tokio::time::timeout(CLI_TIMEOUT, command.output())
            .await
            .map_err(|_| AppError::upstream(operation, "az did not answer within 30 seconds"))?
            .map_err(|error| AppError::upstream(operation, format!("could not run az: {error}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::upstream(operation, stderr.trim()));
        }

        serde_json::from_slice::<CliAccessToken>(&output.stdout)
            .map(CliAccessToken::into_access_token)
            .map_err(|error| AppError::upstream(operation, format!("invalid az output: {error}")))
    }

    fn strategy_name(&self) -> &'static str {
        "azure_cli"
    }
}
