//! Running `agenda-provider-<name>` executables: one JSON request line in,
//! one JSON response out.

use crate::error::{AgendaError, AgendaResult};
use crate::remote::protocol::{Command, ProviderCommand, Request, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("agenda-provider-{}", self.0)
    }

    fn binary_path(&self) -> AgendaResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| AgendaError::ProviderNotInstalled(binary_name))
    }

    /// Run `cmd` against the provider, giving up after [`PROVIDER_TIMEOUT`].
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> AgendaResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| AgendaError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> AgendaResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| AgendaError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| AgendaError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;
        debug!(provider = %self.0, ?command, "calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AgendaError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgendaError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(AgendaError::Provider(format!(
                "{} exited with status {}",
                self.binary_name(),
                output.status.code().unwrap_or(-1)
            )));
        }

        decode_response(&output.stdout)
    }
}

/// Unwrap a provider's stdout into its payload or its reported error.
fn decode_response<R: serde::de::DeserializeOwned>(stdout: &[u8]) -> AgendaResult<R> {
    let body = String::from_utf8_lossy(stdout);
    if body.trim().is_empty() {
        return Err(AgendaError::Provider("Provider returned no response".into()));
    }

    match serde_json::from_str::<Response<R>>(&body) {
        Ok(Response::Success { data }) => Ok(data),
        Ok(Response::Error { error }) => Err(AgendaError::Provider(error)),
        Err(e) => Err(AgendaError::Provider(format!("Unreadable provider response: {e}"))),
    }
}
