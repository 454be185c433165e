//! Job control: hand the terminal back to the shell on Ctrl-Z.
//!
//! Raw mode turns off signal generation, so Ctrl-Z arrives as a key and the
//! editor stops itself. Execution resumes after `raise` returns, i.e. once
//! the shell has continued the process.

use crate::TerminalBackend;
use anyhow::Result;
use tracing::info;

/// Leave the terminal, stop via `stop`, then re-enter.
///
/// Returns the terminal size read after re-entering; the caller must
/// repaint everything since the screen content is gone.
pub fn suspend<B, F>(backend: &mut B, stop: F) -> Result<(u16, u16)>
where
    B: TerminalBackend + ?Sized,
    F: FnOnce() -> std::io::Result<()>,
{
    backend.leave()?;
    info!(target: "runtime", "suspend");
    stop()?;
    info!(target: "runtime", "resume");
    backend.enter()?;
    backend.size()
}

/// Send `SIGTSTP` to the current process.
#[cfg(unix)]
pub fn stop_process() -> std::io::Result<()> {
    signal_hook::low_level::raise(signal_hook::consts::SIGTSTP)
}

#[cfg(not(unix))]
pub fn stop_process() -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recording {
        calls: Rc<RefCell<Vec<&'static str>>>,
        size: (u16, u16),
    }

    impl TerminalBackend for Recording {
        fn enter(&mut self) -> Result<()> {
            self.calls.borrow_mut().push("enter");
            Ok(())
        }
        fn leave(&mut self) -> Result<()> {
            self.calls.borrow_mut().push("leave");
            Ok(())
        }
        fn set_title(&mut self, _title: &str) -> Result<()> {
            Ok(())
        }
        fn size(&self) -> Result<(u16, u16)> {
            Ok(self.size)
        }
    }

    #[test]
    fn suspend_leaves_stops_and_reenters() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut backend = Recording {
            calls: calls.clone(),
            size: (100, 40),
        };
        let stop_calls = calls.clone();
        let size = suspend(&mut backend, move || {
            stop_calls.borrow_mut().push("stop");
            Ok(())
        })
        .unwrap();
        assert_eq!(size, (100, 40));
        assert_eq!(*calls.borrow(), vec!["leave", "stop", "enter"]);
    }

    #[test]
    fn failed_stop_keeps_terminal_released() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut backend = Recording {
            calls: calls.clone(),
            size: (1, 1),
        };
        let err = suspend(&mut backend, || Err(std::io::Error::other("no job control")));
        assert!(err.is_err());
        assert_eq!(*calls.borrow(), vec!["leave"]);
    }
}
