//! External process execution with streaming capture and a time budget.
//!
//! Both pipes are drained on their own reader threads which forward chunks
//! over a channel as soon as they arrive, so a chatty linter never blocks on
//! a full pipe. The calling thread collects chunks, polls for exit, and kills
//! the whole process group once the deadline passes.

use std::ffi::OsString;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::error::LinterError;

/// Default time budget for one linter invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(120_000);

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Which pipe a chunk of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// A program, its arguments and its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl CommandLine {
    /// Creates a command line for `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Creates a command line that runs `script` through `interpreter`.
    ///
    /// With an empty interpreter the script is executed directly.
    pub fn for_script(interpreter: &str, script: &str, cwd: impl AsRef<Path>) -> Self {
        let command = if interpreter.is_empty() {
            Self::new(script)
        } else {
            Self::new(interpreter).arg(script)
        };
        command.current_dir(cwd)
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Returns the program.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Returns the arguments.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in std::iter::once(&self.program).chain(&self.args) {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            let part = part.to_string_lossy();
            if part.is_empty() || part.contains(char::is_whitespace) {
                write!(f, "\"{}\"", part)?;
            } else {
                f.write_str(&part)?;
            }
        }
        Ok(())
    }
}

/// Result of one finished (or killed) process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code. `None` when the process was killed or ended by a signal.
    pub exit_code: Option<i32>,
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
    /// Whether the time budget was exceeded.
    pub timed_out: bool,
}

impl ProcessOutcome {
    /// Returns `true` if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

struct Chunk {
    kind: OutputKind,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct Output {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Output {
    fn push(&mut self, chunk: Chunk, listener: &mut dyn FnMut(OutputKind, &str)) {
        listener(chunk.kind, &String::from_utf8_lossy(&chunk.bytes));
        match chunk.kind {
            OutputKind::Stdout => self.stdout.extend_from_slice(&chunk.bytes),
            OutputKind::Stderr => self.stderr.extend_from_slice(&chunk.bytes),
        }
    }
}

/// Runs external processes under a time budget.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Creates a runner with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a runner with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Returns the time budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `command` and fails with [`LinterError::Timeout`] if it does not
    /// finish in time.
    pub fn execute(&self, command: &CommandLine) -> Result<ProcessOutcome, LinterError> {
        let outcome = self.capture(command, &mut |_, _| {})?;
        if outcome.timed_out {
            return Err(LinterError::Timeout {
                command: command.to_string(),
                timeout: self.timeout,
            });
        }
        Ok(outcome)
    }

    /// Runs `command`, calling `listener` for every chunk of output as it
    /// arrives. A timeout is reported through [`ProcessOutcome::timed_out`].
    ///
    /// Chunks are decoded independently, so a multi-byte character split
    /// across two reads shows up as replacement characters in the listener;
    /// the collected output is decoded as a whole.
    pub fn capture(
        &self,
        command: &CommandLine,
        listener: &mut dyn FnMut(OutputKind, &str),
    ) -> Result<ProcessOutcome, LinterError> {
        info!("Running coffeelint command: {}", command);

        let mut process = command.to_command();
        process
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            process.process_group(0);
        }

        let mut child = process.spawn().map_err(|source| LinterError::ProcessLaunch {
            command: command.to_string(),
            source,
        })?;

        let (tx, rx) = crossbeam_channel::unbounded::<Chunk>();
        let mut readers = Vec::with_capacity(2);
        let spawned = spawn_reader(child.stdout.take(), OutputKind::Stdout, tx.clone(), &mut readers)
            .and_then(|()| spawn_reader(child.stderr.take(), OutputKind::Stderr, tx, &mut readers));
        if let Err(e) = spawned {
            kill_and_reap(&mut child);
            return Err(LinterError::Io(e));
        }

        let deadline = Instant::now() + self.timeout;
        let mut output = Output::default();

        let mut status: Option<ExitStatus> = None;
        let mut streams_open = true;
        let timed_out = loop {
            if status.is_none() {
                match child.try_wait() {
                    Ok(s) => status = s,
                    Err(e) => {
                        kill_and_reap(&mut child);
                        return Err(LinterError::Io(e));
                    }
                }
            }
            if status.is_some() && !streams_open {
                break false;
            }

            let now = Instant::now();
            if now >= deadline {
                break true;
            }
            let wait = (deadline - now).min(POLL_INTERVAL);

            if streams_open {
                match rx.recv_timeout(wait) {
                    Ok(chunk) => output.push(chunk, listener),
                    Err(RecvTimeoutError::Disconnected) => streams_open = false,
                    Err(RecvTimeoutError::Timeout) => {}
                }
            } else {
                thread::sleep(wait);
            }
        };

        if timed_out {
            warn!(
                "Command '{}' exceeded {}ms, killing it",
                command,
                self.timeout.as_millis()
            );
            kill_and_reap(&mut child);
            for chunk in rx.try_iter() {
                output.push(chunk, listener);
            }
        } else {
            for reader in readers {
                if reader.join().is_err() {
                    debug!("Output reader thread panicked");
                }
            }
        }

        let exit_code = if timed_out {
            None
        } else {
            status.and_then(|s| s.code())
        };
        debug!("Command finished: exit code {:?}, timed out {}", exit_code, timed_out);

        Ok(ProcessOutcome {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            timed_out,
        })
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_reader<R>(
    pipe: Option<R>,
    kind: OutputKind,
    tx: Sender<Chunk>,
    readers: &mut Vec<JoinHandle<()>>,
) -> io::Result<()>
where
    R: Read + Send + 'static,
{
    let Some(mut pipe) = pipe else {
        return Ok(());
    };
    let name = match kind {
        OutputKind::Stdout => "coffeelint-stdout",
        OutputKind::Stderr => "coffeelint-stderr",
    };
    let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = Chunk {
                        kind,
                        bytes: buf[..n].to_vec(),
                    };
                    if tx.send(chunk).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("Failed to read {:?}: {}", kind, e);
                    break;
                }
            }
        }
    })?;
    readers.push(handle);
    Ok(())
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        let _ = child.kill();
        return;
    };
    // SAFETY: plain syscall; the child leads its own process group since it
    // was spawned with `process_group(0)`.
    let rc = unsafe { libc::kill(-pid, libc::SIGKILL) };
    if rc != 0 {
        let _ = child.kill();
    }
}

/// Kills the process tree and waits for the child so it is not left behind.
fn kill_and_reap(child: &mut Child) {
    kill_tree(child);
    if let Err(e) = child.wait() {
        debug!("Failed to reap killed process: {}", e);
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}
