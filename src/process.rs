use crate::error::{BuildError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Out(String),
    Err(String),
}

/// Render a command line for log and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn(program: &str, args: &[&str], cwd: &Path) -> std::io::Result<Child> {
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Read `pipe` to EOF, sending each non-blank line through `tx`.
///
/// Lines are split on raw bytes and decoded lossily; invalid UTF-8 never
/// stops the pipe from being drained.
async fn pump_lines<R>(pipe: R, tx: mpsc::UnboundedSender<OutputLine>, wrap: fn(String) -> OutputLine)
where
    R: AsyncRead + Unpin,
{
    let mut r = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match r.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                if !line.trim().is_empty() {
                    let _ = tx.send(wrap(line));
                }
            }
        }
    }
}

/// Forward both output pipes of `child` into one channel.
fn forward_output(child: &mut Child) -> mpsc::UnboundedReceiver<OutputLine> {
    let (tx, rx) = mpsc::unbounded_channel::<OutputLine>();

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(pump_lines(stdout, tx.clone(), OutputLine::Out));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(pump_lines(stderr, tx, OutputLine::Err));
    }

    rx
}

/// Run `program` to completion in `cwd`, logging its output line by line.
///
/// Returns every output line (both streams, in arrival order) on a zero exit
/// status; spawn failures and non-zero exits both come back as
/// [`BuildError::CommandFailed`].
pub async fn run_streamed(program: &str, args: &[&str], cwd: &Path) -> Result<Vec<String>> {
    let command = display_command(program, args);
    debug!("Running `{command}` in {}", cwd.display());

    let mut child = spawn(program, args, cwd).map_err(|e| BuildError::CommandFailed {
        command: command.clone(),
        reason: e.to_string(),
    })?;

    let mut rx = forward_output(&mut child);
    let mut output = Vec::new();
    // Both senders drop once the pipes hit EOF, which ends this loop.
    while let Some(line) = rx.recv().await {
        match line {
            OutputLine::Out(l) => {
                info!("{l}");
                output.push(l);
            }
            OutputLine::Err(l) => {
                info!("[ERR] {l}");
                output.push(l);
            }
        }
    }

    let status = child.wait().await.map_err(|e| BuildError::CommandFailed {
        command: command.clone(),
        reason: e.to_string(),
    })?;

    if status.success() {
        Ok(output)
    } else {
        let reason = match status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        Err(BuildError::CommandFailed { command, reason })
    }
}
