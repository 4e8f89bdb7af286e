//! Infrastructure implementation of the `RemoteExecutor` port.
//!
//! Commands run over one SSH session as the instance's system user, with the
//! password supplied to `sshpass` through the environment rather than argv.

use anyhow::{Context, Result};

use crate::application::ports::{RemoteExecutor, RemoteOutput};
use crate::domain::Config;
use crate::infra::command_runner::{CommandRunner, TokioCommandRunner};

/// SSH-based remote executor, generic over `R: CommandRunner` so tests can
/// inject a runner that returns canned output without spawning processes.
pub struct SshExecutor<R> {
    runner: R,
    host: String,
}

impl SshExecutor<TokioCommandRunner> {
    /// Production executor targeting the configured base domain.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_runner(TokioCommandRunner::default(), config.domain.clone())
    }
}

impl<R: CommandRunner> SshExecutor<R> {
    /// Executor with an explicit runner and host.
    pub fn with_runner(runner: R, host: String) -> Self {
        Self { runner, host }
    }
}

impl<R: CommandRunner> RemoteExecutor for SshExecutor<R> {
    async fn run_remote(
        &self,
        user: &str,
        password: &str,
        command: &str,
    ) -> Result<RemoteOutput> {
        let target = format!("{user}@{}", self.host);
        let args = [
            "-e",
            "ssh",
            "-oStrictHostKeyChecking=no",
            target.as_str(),
            command,
        ];
        let envs = [("SSHPASS".to_string(), password.to_string())];
        let output = self
            .runner
            .run("sshpass", &args, &envs)
            .await
            .context("running remote command over ssh")?;

        // Fold stderr into the captured output so callers see the whole
        // session transcript.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(RemoteOutput {
            exit_code: output.status.code().unwrap_or(-1),
            output: combined,
        })
    }
}
