//! External process invocation.
//!
//! [`SystemProcessRunner`] spawns the program with piped stdout and stderr.
//! Helper threads drain both pipes line by line into a channel; the calling
//! thread forwards stdout lines to the caller's callback and keeps stderr for
//! diagnostics. When a timeout elapses the child is killed.

use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use logging::{debug_log, info_log};
use thiserror::Error;

use crate::request::bounded;

#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external command to completion.
pub trait ProcessRunner {
    /// Runs `program` with `args`.
    ///
    /// Each line the program writes to stdout is passed to `on_output`
    /// without its line terminator, on the calling thread. A non-zero exit,
    /// a launch failure, signal termination or an elapsed `timeout` is an
    /// error. A zero `timeout` is no limit.
    fn run(
        &self,
        program: &OsStr,
        args: &[OsString],
        on_output: Option<&mut dyn FnMut(&str)>,
        timeout: Option<Duration>,
    ) -> Result<(), ProcessError>;
}

/// Failure reported by a [`ProcessRunner`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started.
    #[error("failed to launch '{}': {source}", Path::new(program).display())]
    Launch {
        /// Program that failed to start.
        program: OsString,
        /// Underlying error.
        source: io::Error,
    },
    /// The program exited with a non-zero status.
    #[error("'{}' exited with status {code}{}", Path::new(program).display(), diagnostic_suffix(stderr))]
    ExitStatus {
        /// Program that failed.
        program: OsString,
        /// Exit code.
        code: i32,
        /// Captured stderr.
        stderr: String,
    },
    /// The program was terminated by a signal.
    #[error("'{}' was terminated{}{}", Path::new(program).display(), signal_suffix(*signal), diagnostic_suffix(stderr))]
    Terminated {
        /// Program that was terminated.
        program: OsString,
        /// Terminating signal, when the platform reports one.
        signal: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },
    /// The timeout elapsed and the program was killed.
    #[error("'{}' timed out after {:.3} seconds{}", Path::new(program).display(), timeout.as_secs_f64(), diagnostic_suffix(stderr))]
    TimedOut {
        /// Program that was killed.
        program: OsString,
        /// The configured limit.
        timeout: Duration,
        /// Stderr captured before the program was killed.
        stderr: String,
    },
    /// Communicating with the running program failed.
    #[error("failed to {action} '{}': {source}", Path::new(program).display())]
    Io {
        /// Program being supervised.
        program: OsString,
        /// Action being performed.
        action: &'static str,
        /// Underlying error.
        source: io::Error,
    },
}

impl ProcessError {
    /// Returns the program the error concerns.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        match self {
            Self::Launch { program, .. }
            | Self::ExitStatus { program, .. }
            | Self::Terminated { program, .. }
            | Self::TimedOut { program, .. }
            | Self::Io { program, .. } => program,
        }
    }

    /// Returns the diagnostic text the program wrote to stderr, if any.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ExitStatus { stderr, .. }
            | Self::Terminated { stderr, .. }
            | Self::TimedOut { stderr, .. }
                if !stderr.is_empty() =>
            {
                Some(stderr)
            }
            _ => None,
        }
    }

    /// Returns the exit code for [`ProcessError::ExitStatus`] values.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

fn diagnostic_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

fn signal_suffix(signal: Option<i32>) -> String {
    signal.map_or_else(String::new, |signal| format!(" by signal {signal}"))
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Creates a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(
        &self,
        program: &OsStr,
        args: &[OsString],
        mut on_output: Option<&mut dyn FnMut(&str)>,
        timeout: Option<Duration>,
    ) -> Result<(), ProcessError> {
        let mut command = Command::new(program);
        command.args(args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        debug_log!(Exec, 1, "spawning {:?}", program);
        let mut child = command.spawn().map_err(|source| ProcessError::Launch {
            program: program.to_os_string(),
            source,
        })?;
        // Zero means no limit, as does one past the end of the clock.
        let deadline = bounded(timeout).and_then(|limit| Instant::now().checked_add(limit));

        let (sender, receiver) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(handle) = child.stdout.take() {
            readers.push(spawn_reader(handle, StreamKind::Stdout, sender.clone()));
        }
        if let Some(handle) = child.stderr.take() {
            readers.push(spawn_reader(handle, StreamKind::Stderr, sender.clone()));
        }
        drop(sender);

        let mut stderr = String::new();
        let mut open = readers.len();
        while open > 0 {
            let message = match next_message(&receiver, deadline) {
                Ok(Some(message)) => message,
                Ok(None) => break,
                Err(Elapsed) => {
                    terminate_child(&mut child);
                    // Readers are detached: grandchildren may still hold the pipes.
                    return Err(timed_out(program, timeout, stderr));
                }
            };

            match message {
                StreamMessage::Line(StreamKind::Stdout, line) => {
                    info_log!(Progress, 2, "{line}");
                    if let Some(callback) = on_output.as_mut() {
                        callback(&line);
                    }
                }
                StreamMessage::Line(StreamKind::Stderr, line) => {
                    if !stderr.is_empty() {
                        stderr.push('\n');
                    }
                    stderr.push_str(&line);
                }
                StreamMessage::Failed(kind, source) => {
                    terminate_child(&mut child);
                    return Err(ProcessError::Io {
                        program: program.to_os_string(),
                        action: kind.read_action(),
                        source,
                    });
                }
                StreamMessage::Finished => open -= 1,
            }
        }

        for reader in readers {
            // A reader only panics if the channel machinery does.
            let _ = reader.join();
        }

        let status = wait_for_exit(&mut child, program, deadline)?;
        let Some(status) = status else {
            return Err(timed_out(program, timeout, stderr));
        };
        debug_log!(Exec, 1, "{:?} finished with {status}", program);
        classify_status(program, status, stderr)
    }
}

fn timed_out(program: &OsStr, timeout: Option<Duration>, stderr: String) -> ProcessError {
    ProcessError::TimedOut {
        program: program.to_os_string(),
        timeout: timeout.unwrap_or_default(),
        stderr,
    }
}

fn classify_status(program: &OsStr, status: ExitStatus, stderr: String) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ProcessError::ExitStatus {
            program: program.to_os_string(),
            code,
            stderr,
        }),
        None => Err(ProcessError::Terminated {
            program: program.to_os_string(),
            signal: exit_signal(status),
            stderr,
        }),
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

/// Waits for the child to exit. Returns `Ok(None)` when the deadline passes
/// first, after killing the child.
fn wait_for_exit(
    child: &mut Child,
    program: &OsStr,
    deadline: Option<Instant>,
) -> Result<Option<ExitStatus>, ProcessError> {
    let wait_error = |source: io::Error| ProcessError::Io {
        program: program.to_os_string(),
        action: "wait for",
        source,
    };

    let Some(deadline) = deadline else {
        return child.wait().map(Some).map_err(wait_error);
    };

    loop {
        if let Some(status) = child.try_wait().map_err(wait_error)? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            terminate_child(child);
            return Ok(None);
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

fn terminate_child(child: &mut Child) {
    if matches!(child.try_wait(), Ok(Some(_))) {
        return;
    }
    // Best effort: the child may exit between the check and the kill.
    let _ = child.kill();
    let _ = child.wait();
}

struct Elapsed;

fn next_message(
    receiver: &Receiver<StreamMessage>,
    deadline: Option<Instant>,
) -> Result<Option<StreamMessage>, Elapsed> {
    match deadline {
        None => Ok(receiver.recv().ok()),
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match receiver.recv_timeout(remaining) {
                Ok(message) => Ok(Some(message)),
                Err(RecvTimeoutError::Disconnected) => Ok(None),
                Err(RecvTimeoutError::Timeout) => Err(Elapsed),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    const fn read_action(self) -> &'static str {
        match self {
            Self::Stdout => "read stdout from",
            Self::Stderr => "read stderr from",
        }
    }
}

enum StreamMessage {
    Line(StreamKind, String),
    Failed(StreamKind, io::Error),
    Finished,
}

fn spawn_reader<R>(handle: R, kind: StreamKind, sender: Sender<StreamMessage>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(handle);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(trim_line_terminator(&buffer)).into_owned();
                    if sender.send(StreamMessage::Line(kind, line)).is_err() {
                        return;
                    }
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => {
                    let _ = sender.send(StreamMessage::Failed(kind, error));
                    return;
                }
            }
        }
        let _ = sender.send(StreamMessage::Finished);
    })
}

fn trim_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
