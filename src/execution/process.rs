//! Process Handles
//!
//! A [`ProcessHandle`] owns one spawned child and tracks where it is in
//! its lifecycle:
//!
//! ```text
//! Running ──(exits on its own)──▶ Exited
//!    │
//!    └──(terminate requested)──▶ Terminated
//! ```
//!
//! Both end states are final. A process that was never started has no
//! handle at all.

use std::io;
use std::process::{Child, ExitStatus};

use log::{debug, info, warn};

/// Lifecycle state of a handled process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Still running (as of the last poll)
    Running,
    /// Exited without being asked to
    Exited(ExitStatus),
    /// Exited after a termination request
    Terminated(ExitStatus),
}

impl ProcessState {
    /// Returns true for `Exited` and `Terminated`.
    pub fn is_finished(&self) -> bool {
        !matches!(self, ProcessState::Running)
    }

    /// Short lowercase name, used in logs and the run report.
    pub fn label(&self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Exited(_) => "exited",
            ProcessState::Terminated(_) => "terminated",
        }
    }
}

/// Exclusive handle over a spawned child process.
#[derive(Debug)]
pub struct ProcessHandle {
    name: String,
    child: Child,
    state: ProcessState,
}

impl ProcessHandle {
    /// Wraps a freshly spawned child.
    pub fn new(name: impl Into<String>, child: Child) -> Self {
        Self {
            name: name.into(),
            child,
            state: ProcessState::Running,
        }
    }

    /// Name used when logging about this process.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Last observed state, without polling.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Checks, without blocking, whether the process has exited.
    pub fn poll(&mut self) -> io::Result<ProcessState> {
        if self.state == ProcessState::Running {
            if let Some(status) = self.child.try_wait()? {
                debug!("{} (pid {}) exited with {}", self.name, self.id(), status);
                self.state = ProcessState::Exited(status);
            }
        }
        Ok(self.state)
    }

    /// Returns true while the process has not been seen to exit.
    pub fn is_running(&mut self) -> io::Result<bool> {
        Ok(self.poll()? == ProcessState::Running)
    }

    /// Blocks until the process exits on its own.
    pub fn wait(&mut self) -> io::Result<ProcessState> {
        if self.state == ProcessState::Running {
            let status = self.child.wait()?;
            self.state = ProcessState::Exited(status);
        }
        Ok(self.state)
    }

    /// Asks a running process to stop and blocks until it has been reaped.
    ///
    /// A process that already finished is left alone, so this may be
    /// called any number of times. There is no timeout on the wait.
    pub fn terminate(&mut self) -> io::Result<ProcessState> {
        if self.poll()?.is_finished() {
            return Ok(self.state);
        }

        info!("Terminating {} (pid {})", self.name, self.id());
        request_termination(&mut self.child)?;

        let status = self.child.wait()?;
        debug!("{} (pid {}) reaped with {}", self.name, self.id(), status);
        self.state = ProcessState::Terminated(status);
        Ok(self.state)
    }
}

/// Sends SIGTERM to the child.
#[cfg(unix)]
fn request_termination(child: &mut Child) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM) {
        // Exited between the poll and the signal; the wait still reaps it.
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::from(e)),
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> io::Result<()> {
    child.kill()
}

/// Stops a process if there is one and it is still running.
///
/// `None` is a no-op. Failures are logged rather than returned: cleanup
/// runs after the simulation and must not abort the rest of the teardown.
pub fn cleanup_process(handle: Option<&mut ProcessHandle>) -> Option<ProcessState> {
    let handle = handle?;

    match handle.terminate() {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("Failed to clean up {} (pid {}): {}", handle.name(), handle.id(), e);
            Some(handle.state())
        }
    }
}
