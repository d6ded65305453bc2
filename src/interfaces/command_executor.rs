//! Injectable external-process boundary (§4.4, §10). Lets the Scanner and
//! Drive Controller be tested without a real `makemkvcon`/`bd_info`/`mount`
//! binary on the test machine.

use async_trait::async_trait;
use std::time::Duration;

use crate::shared::error::ExternalToolError;

pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(
        &self,
        binary: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExternalToolError>;
}

/// Invokes a real child process via `tokio::process::Command`.
pub struct SystemCommandExecutor;

#[async_trait]
impl CommandExecutor for SystemCommandExecutor {
    async fn run(
        &self,
        binary: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExternalToolError> {
        let mut command = tokio::process::Command::new(binary);
        command.args(args);
        let run = command.output();

        let output = match timeout {
            Some(duration) => tokio::time::timeout(duration, run)
                .await
                .map_err(|_| ExternalToolError::Timeout {
                    binary: binary.to_string(),
                    timeout: duration,
                })?
                .map_err(|e| ExternalToolError::Io {
                    binary: binary.to_string(),
                    source: e,
                })?,
            None => run.await.map_err(|e| ExternalToolError::Io {
                binary: binary.to_string(),
                source: e,
            })?,
        };

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
