//! Guaranteed return of the microscope to a safe state on every exit path.

use std::fmt;

use tracing::{error, info, warn};

use crate::error::{MicroedError, Result};

/// Process exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Stopped before the work was complete.
    EarlyExit,
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::EarlyExit => 1,
            Self::Success => 0,
            Self::Failure => -1,
        }
    }

    /// Status that ends a run with `result`.
    pub fn for_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(MicroedError::Cancelled) => Self::EarlyExit,
            Err(_) => Self::Failure,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EarlyExit => write!(f, "early exit"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Handle on controllable microscope hardware.
pub trait Microscope: Send {
    /// Put the instrument into a safe state (close the beam blanker, retract
    /// the camera, ...). Blocks until the instrument acknowledges.
    fn make_safe(&mut self) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitState {
    Running,
    Terminated(ExitStatus),
}

/// Exit context owning the optional microscope handle.
///
/// The microscope is made safe exactly once: on `shutdown`/`exit`, or when
/// the context is dropped while still running (early return or panic).
pub struct SafeExit {
    microscope: Option<Box<dyn Microscope>>,
    state: ExitState,
}

impl SafeExit {
    pub fn new(microscope: Option<Box<dyn Microscope>>) -> Self {
        Self {
            microscope,
            state: ExitState::Running,
        }
    }

    /// Context for pure software runs; no hardware call ever happens.
    pub fn without_microscope() -> Self {
        Self::new(None)
    }

    pub fn state(&self) -> ExitState {
        self.state
    }

    pub fn has_microscope(&self) -> bool {
        self.microscope.is_some()
    }

    pub fn microscope_mut(&mut self) -> Option<&mut (dyn Microscope + 'static)> {
        self.microscope.as_deref_mut()
    }

    /// Make the microscope safe (if present) and mark the context terminated.
    /// Returns the exit code for `status`. Later calls only return the code.
    pub fn shutdown(&mut self, status: ExitStatus) -> i32 {
        if self.state == ExitState::Running {
            self.make_safe();
            self.state = ExitState::Terminated(status);
            info!(%status, code = status.code(), "Terminating");
        }
        status.code()
    }

    /// Shut down and terminate the process with `status`.
    pub fn exit(mut self, status: ExitStatus) -> ! {
        let code = self.shutdown(status);
        std::process::exit(code)
    }

    /// Run `work` inside the context and shut down afterwards, whatever the
    /// outcome. If `work` panics, dropping the context makes the microscope
    /// safe instead.
    ///
    /// A status set by `work` calling `shutdown` itself wins; otherwise the
    /// status follows the result (`Cancelled` maps to `EarlyExit`).
    pub fn run<T, F>(&mut self, work: F) -> (ExitStatus, Result<T>)
    where
        F: FnOnce(&mut SafeExit) -> Result<T>,
    {
        let result = work(self);
        let status = match self.state {
            ExitState::Terminated(status) => status,
            ExitState::Running => ExitStatus::for_result(&result),
        };
        if let Err(ref e) = result {
            error!(error = %e, "Run failed");
        }
        self.shutdown(status);
        (status, result)
    }

    fn make_safe(&mut self) {
        if let Some(microscope) = self.microscope.as_mut() {
            warn!("Returning the microscope to a safe state...");
            if let Err(e) = microscope.make_safe() {
                error!(error = %e, "Failed to return the microscope to a safe state");
            }
        }
    }
}

impl Drop for SafeExit {
    fn drop(&mut self) {
        if self.state == ExitState::Running {
            self.make_safe();
            self.state = ExitState::Terminated(ExitStatus::EarlyExit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::EarlyExit.code(), 1);
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Failure.code(), -1);
    }

    #[test]
    fn test_status_for_result() {
        assert_eq!(ExitStatus::for_result(&Ok(())), ExitStatus::Success);
        let cancelled: Result<()> = Err(MicroedError::Cancelled);
        assert_eq!(ExitStatus::for_result(&cancelled), ExitStatus::EarlyExit);
        let failed: Result<()> = Err(MicroedError::EmptySequence);
        assert_eq!(ExitStatus::for_result(&failed), ExitStatus::Failure);
    }
}
