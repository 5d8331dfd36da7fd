//! Shell command execution.

use crate::error::{DotstepError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed for exceeding its timeout.
    pub timed_out: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Timeout (None = no timeout).
    pub timeout: Option<Duration>,
}

/// Execute a shell command, capturing its output.
///
/// A command that outlives `options.timeout` is killed and reported with
/// `timed_out` set rather than as an error.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(detect_shell());
    cmd.arg(shell_flag());
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| DotstepError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    // Drain both pipes on their own threads so a chatty child can't block on a full pipe.
    let stdout_handle = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = out.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).to_string()
        })
    });
    let stderr_handle = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).to_string()
        })
    });

    let (exit_code, success, timed_out) = wait_with_timeout(&mut child, command, options.timeout)?;
    let duration = start.elapsed();

    // Grandchildren of a killed shell may still hold the pipes open, so the
    // readers are left detached after a timeout.
    let (stdout, stderr) = if timed_out {
        (String::new(), String::new())
    } else {
        (
            stdout_handle
                .and_then(|h| h.join().ok())
                .unwrap_or_default(),
            stderr_handle
                .and_then(|h| h.join().ok())
                .unwrap_or_default(),
        )
    };

    Ok(CommandResult {
        exit_code,
        stdout,
        stderr,
        duration,
        success,
        timed_out,
    })
}

fn wait_with_timeout(
    child: &mut Child,
    command: &str,
    timeout: Option<Duration>,
) -> Result<(Option<i32>, bool, bool)> {
    let failed = || DotstepError::CommandFailed {
        command: command.to_string(),
        code: None,
    };

    let Some(limit) = timeout else {
        let status = child.wait().map_err(|_| failed())?;
        return Ok((status.code(), status.success(), false));
    };

    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait().map_err(|_| failed())? {
            return Ok((status.code(), status.success(), false));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok((None, false, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Execute a command and return success/failure.
pub fn execute_check(command: &str, cwd: Option<&Path>) -> bool {
    let options = CommandOptions {
        cwd: cwd.map(|p| p.to_path_buf()),
        ..Default::default()
    };

    execute(command, &options)
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Detect the shell used to run step commands.
fn detect_shell() -> String {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        "/bin/sh".to_string()
    }
}

/// Get the flag to pass commands to the shell.
fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-c"
    }
}
