//! Spawning `codex mcp-server`.

use async_trait::async_trait;
use pilot_application::{
    AgentLauncher, AgentOutput, AgentProcess, AgentStreams, LaunchError, MCP_SUBCOMMAND,
};
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

/// Launches the Codex CLI in MCP server mode.
#[derive(Debug, Clone)]
pub struct CodexLauncher {
    program: String,
}

impl CodexLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CodexLauncher {
    fn default() -> Self {
        Self::new("codex")
    }
}

#[async_trait]
impl AgentLauncher for CodexLauncher {
    async fn launch(&self, working_dir: Option<&Path>) -> Result<AgentStreams, LaunchError> {
        let resolved = which::which(&self.program).map_err(|_| LaunchError::NotFound {
            program: self.program.clone(),
        })?;
        debug!("Spawning Codex: {} {}", resolved.display(), MCP_SUBCOMMAND);

        let mut cmd = Command::new(&resolved);
        cmd.arg(MCP_SUBCOMMAND)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            info!("Setting Codex working directory to: {}", dir.display());
            cmd.current_dir(dir);
        }

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let output = child.stdout.take().ok_or(LaunchError::MissingPipe("stdout"))?;
        let input = child.stdin.take().ok_or(LaunchError::MissingPipe("stdin"))?;
        let diagnostics = child.stderr.take();
        info!("Codex MCP server started (pid {:?})", child.id());

        Ok(AgentStreams {
            output: Box::new(output),
            diagnostics: diagnostics.map(|d| Box::new(d) as AgentOutput),
            input: Box::new(input),
            process: Box::new(ChildProcess { child }),
        })
    }
}

/// A spawned Codex child process.
struct ChildProcess {
    child: Child,
}

#[async_trait]
impl AgentProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn terminate(&mut self) -> io::Result<()> {
        self.child.kill().await
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        debug!("Codex process handle dropping, killing child");
        let _ = self.child.start_kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_executable_is_not_found() {
        let launcher = CodexLauncher::new("definitely-not-a-codex-binary-7f3a");
        match launcher.launch(None).await {
            Err(LaunchError::NotFound { program }) => {
                assert_eq!(program, "definitely-not-a-codex-binary-7f3a")
            }
            Err(other) => panic!("expected NotFound, got {other}"),
            Ok(_) => panic!("expected NotFound, got a process"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launches_in_working_directory() {
        use tokio::io::{AsyncBufReadExt, BufReader};

        // `sh mcp-server` runs the script relative to the working directory.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MCP_SUBCOMMAND), "pwd\n").unwrap();
        let launcher = CodexLauncher::new("sh");
        let mut streams = launcher.launch(Some(dir.path())).await.unwrap();

        let mut line = String::new();
        BufReader::new(&mut streams.output)
            .read_line(&mut line)
            .await
            .unwrap();
        let printed = std::fs::canonicalize(line.trim()).unwrap();
        assert_eq!(printed, std::fs::canonicalize(dir.path()).unwrap());

        let _ = streams.process.terminate().await;
    }
}
