// src/launch.rs
use std::net::Ipv4Addr;
use std::process::ExitStatus;
use tokio::process::Command;

use crate::error::{Error, Result};

pub const SSH_EXECUTABLE: &str = "ssh";

/// Accept only dotted-quad IPv4 literals, so hostnames and the
/// "(no public ip)" placeholder never reach the ssh client
pub fn validate_address(address: &str) -> Result<Ipv4Addr> {
    address
        .parse::<Ipv4Addr>()
        .map_err(|_| Error::Validation(address.to_string()))
}

/// How to start the external ssh client
#[derive(Debug, Clone)]
pub struct SshCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SshCommand {
    fn default() -> Self {
        Self {
            program: SSH_EXECUTABLE.to_string(),
            args: Vec::new(),
        }
    }
}

impl SshCommand {
    /// Arguments passed to the client, the address last
    pub fn argv(&self, address: Ipv4Addr) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.push(address.to_string());
        argv
    }

    /// Run `ssh [args] <address>` in the foreground with inherited stdio.
    /// A non-zero exit is returned as [`Error::Ssh`].
    pub async fn launch(&self, address: &str) -> Result<ExitStatus> {
        let address = validate_address(address)?;
        let argv = self.argv(address);
        tracing::info!(program = %self.program, args = ?argv, "starting ssh session");

        let status = Command::new(&self.program)
            .args(&argv)
            .status()
            .await
            .map_err(Error::Launch)?;

        if status.success() {
            Ok(status)
        } else {
            Err(Error::Ssh(status))
        }
    }
}
