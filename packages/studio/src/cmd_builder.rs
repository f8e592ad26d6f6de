//! Command builder for piping text into platform tools

use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Fluent builder for running external commands
#[derive(Debug, Clone, Default)]
pub struct CmdBuilder {
    program: String,
    args: Vec<String>,
}

impl CmdBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run the command with `input` written to its stdin, then wait for it.
    pub fn run_with_input(&self, input: &[u8]) -> Result<()> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to start: {} {}", self.program, self.args.join(" ")))?;

        // Dropping stdin closes the pipe so the tool sees EOF.
        {
            let mut stdin = child
                .stdin
                .take()
                .context("child stdin was not captured")?;
            stdin
                .write_all(input)
                .with_context(|| format!("failed to write to {}", self.program))?;
        }

        let output = child.wait_with_output().with_context(|| {
            format!(
                "failed to wait for: {} {}",
                self.program,
                self.args.join(" ")
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} exited with code {:?}: {}",
                self.program,
                output.status.code(),
                stderr.trim()
            ));
        }
        Ok(())
    }
}
