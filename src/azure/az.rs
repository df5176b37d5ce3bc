// src/azure/az.rs
use tokio::process::Command;

use crate::error::{ApiError, Error, Result};

/// Execute az CLI command and return stdout
async fn run_az(args: &[&str]) -> Result<String> {
    let output = Command::new("az")
        .args(args)
        .output()
        .await
        .map_err(|e| {
            Error::Auth(format!(
                "Failed to execute az command. Is Azure CLI installed?\n{}",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ApiError::new(format!("az {}", args.join(" ")), stderr.trim()).into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get an access token for `resource` from the logged-in Azure CLI
pub async fn get_access_token(resource: &str) -> Result<String> {
    let token = run_az(&[
        "account",
        "get-access-token",
        "--resource",
        resource,
        "--query",
        "accessToken",
        "-o",
        "tsv",
    ])
    .await?;

    if token.is_empty() {
        return Err(Error::Auth(
            "Azure CLI returned an empty access token. Run 'az login' first.".to_string(),
        ));
    }
    Ok(token)
}
