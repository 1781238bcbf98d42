//! LLM provider that shells out to `ollama run <model>`
//!
//! The prompt goes to the child's stdin; stdout is the answer. A nonzero exit
//! becomes a generation failure carrying stderr.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::LlmProvider;

/// Ollama CLI provider
pub struct OllamaCliLlm {
    program: String,
    model: String,
}

impl OllamaCliLlm {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            program: config.cli_program.clone(),
            model: config.generate_model.clone(),
        }
    }

    /// Use an arbitrary program that accepts `run <model>` and reads stdin
    pub fn with_program(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaCliLlm {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Running {} run {}", self.program, self.model);

        // Dropping the future (e.g. on timeout) kills the child
        let mut child = Command::new(&self.program)
            .args(["run", self.model.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::generation(format!("Failed to start {}: {}", self.program, e)))?;

        // Feed stdin while draining stdout/stderr so neither side can fill
        // its pipe and block the other
        let stdin = child.stdin.take();
        let send_prompt = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(prompt.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (sent, output) = tokio::join!(send_prompt, child.wait_with_output());

        let output = output
            .map_err(|e| Error::generation(format!("Failed to read model output: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!("{} exited with {}", self.program, output.status);

        if !output.status.success() {
            return Err(Error::generation(format!("{} ({})", stderr, output.status)));
        }

        // A child that exits cleanly without reading the whole prompt closes
        // the pipe; its output still stands
        match sent {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::warn!("{} exited before reading the full prompt", self.program);
            }
            Err(e) => {
                return Err(Error::generation(format!("Failed to send prompt: {}", e)));
            }
            Ok(()) => {}
        }

        Ok(stdout)
    }

    async fn health_check(&self) -> Result<bool> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        Ok(status.map(|s| s.success()).unwrap_or(false))
    }

    fn name(&self) -> &str {
        "ollama-cli"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
