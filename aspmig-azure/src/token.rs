//! Bearer token acquisition for Azure Resource Manager.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

/// Supplies a bearer token for management API calls.
pub trait TokenProvider {
    fn access_token(&self) -> anyhow::Result<String>;
}

/// A token handed in by the caller, e.g. from `--access-token` or `AZURE_ACCESS_TOKEN`.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn access_token(&self) -> anyhow::Result<String> {
        let token = self.token.trim();
        if token.is_empty() {
            bail!("access token is empty");
        }
        Ok(token.to_string())
    }
}

/// Asks the Azure CLI for a token scoped to the management endpoint.
#[derive(Debug, Clone)]
pub struct AzCliTokenProvider {
    resource: String,
}

impl AzCliTokenProvider {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    access_token: String,
}

impl TokenProvider for AzCliTokenProvider {
    fn access_token(&self) -> anyhow::Result<String> {
        debug!(resource = %self.resource, "requesting token from az cli");
        let output = Command::new(az_program())
            .args(["account", "get-access-token", "--output", "json", "--resource"])
            .arg(&self.resource)
            .output()
            .context("run `az account get-access-token` (is the Azure CLI installed?)")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`az account get-access-token` failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        parse_cli_token(&output.stdout)
    }
}

#[cfg(windows)]
fn az_program() -> &'static str {
    "az.cmd"
}

#[cfg(not(windows))]
fn az_program() -> &'static str {
    "az"
}

fn parse_cli_token(stdout: &[u8]) -> anyhow::Result<String> {
    let parsed: CliToken =
        serde_json::from_slice(stdout).context("parse `az account get-access-token` output")?;
    if parsed.access_token.trim().is_empty() {
        bail!("az cli returned an empty access token");
    }
    Ok(parsed.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token_is_trimmed() {
        let provider = StaticTokenProvider::new("  abc.def \n");
        assert_eq!(provider.access_token().expect("token"), "abc.def");
    }

    #[test]
    fn blank_static_token_is_rejected() {
        assert!(StaticTokenProvider::new("   ").access_token().is_err());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let text = format!("{:?}", StaticTokenProvider::new("secret-value"));
        assert!(!text.contains("secret-value"));
    }

    #[test]
    fn cli_output_yields_access_token() {
        let stdout = br#"{
            "accessToken": "eyJ0eXAi",
            "expiresOn": "2026-10-15 12:00:00.000000",
            "subscription": "00000000-0000-0000-0000-000000000000",
            "tokenType": "Bearer"
        }"#;
        assert_eq!(parse_cli_token(stdout).expect("token"), "eyJ0eXAi");
    }

    #[test]
    fn cli_output_without_token_is_an_error() {
        assert!(parse_cli_token(br#"{ "tokenType": "Bearer" }"#).is_err());
        assert!(parse_cli_token(br#"{ "accessToken": "" }"#).is_err());
        assert!(parse_cli_token(b"ERROR: Please run 'az login'").is_err());
    }
}
