// src/runner/process.rs
use crate::utils::error::RunnerError;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Runs a command to completion, echoing its stdout and stderr lines to the console as
/// they arrive and returning both streams merged in arrival order.
///
/// Ctrl-C kills and reaps the child and returns `RunnerError::Interrupted`; a non-zero
/// exit returns `RunnerError::Failed` with the captured output.
pub async fn run_command(program: &str, args: &[String], cwd: Option<&Path>) -> Result<String, RunnerError> {
    let command_line = describe(program, args);
    tracing::debug!("Spawning: {}", command_line);

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RunnerError::NotFound(program.to_string()),
        _ => RunnerError::Spawn {
            program: program.to_string(),
            source: e,
        },
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "child stderr was not captured"))?;
    let mut out_lines = BufReader::new(stdout).split(b'\n');
    let mut err_lines = BufReader::new(stderr).split(b'\n');

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut interrupt_armed = true;

    let mut captured = String::new();
    let mut out_done = false;
    let mut err_done = false;

    let status = loop {
        tokio::select! {
            segment = out_lines.next_segment(), if !out_done => match segment? {
                Some(bytes) => echo_line(&mut captured, &bytes),
                None => out_done = true,
            },
            segment = err_lines.next_segment(), if !err_done => match segment? {
                Some(bytes) => echo_line(&mut captured, &bytes),
                None => err_done = true,
            },
            status = child.wait(), if out_done && err_done => break status?,
            signal = &mut interrupt, if interrupt_armed => match signal {
                Ok(()) => {
                    child.kill().await?;
                    println!("\nCommand interrupted by user.");
                    return Err(RunnerError::Interrupted(command_line));
                }
                Err(e) => {
                    tracing::warn!("Could not listen for Ctrl-C: {}", e);
                    interrupt_armed = false;
                }
            },
        }
    };

    if !status.success() {
        return Err(RunnerError::Failed {
            command: command_line,
            code: status.code(),
            output: captured,
        });
    }

    tracing::debug!("{} finished, captured {} bytes", program, captured.len());
    Ok(captured)
}

fn echo_line(captured: &mut String, bytes: &[u8]) {
    let line = String::from_utf8_lossy(bytes);
    let line = line.strip_suffix('\r').unwrap_or(&line);
    println!("{}", line);
    captured.push_str(line);
    captured.push('\n');
}

fn describe(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
