//! Process signals forwarded into the event loop.
//!
//! `SIGCONT` becomes `Event::Resume` (repaint after an external stop);
//! `SIGTERM` and `SIGHUP` become `Event::Shutdown`. Ctrl-Z is not a signal
//! here: raw mode delivers it as a key.

use anyhow::Result;
use core_events::Event;
use tokio::sync::mpsc::Sender;

#[cfg(unix)]
pub(crate) struct SignalForwarder {
    handle: signal_hook::iterator::Handle,
}

#[cfg(unix)]
impl SignalForwarder {
    pub(crate) fn spawn(tx: Sender<Event>) -> Result<Self> {
        use signal_hook::consts::{SIGCONT, SIGHUP, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGCONT, SIGTERM, SIGHUP])?;
        let handle = signals.handle();
        std::thread::Builder::new()
            .name("quill-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    let event = if signal == SIGCONT {
                        Event::Resume
                    } else {
                        Event::Shutdown
                    };
                    tracing::debug!(target: "runtime", signal, ?event, "signal_forwarded");
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self { handle })
    }

    pub(crate) fn close(self) {
        self.handle.close();
    }
}

#[cfg(not(unix))]
pub(crate) struct SignalForwarder;

#[cfg(not(unix))]
impl SignalForwarder {
    pub(crate) fn spawn(_tx: Sender<Event>) -> Result<Self> {
        Ok(Self)
    }

    pub(crate) fn close(self) {}
}
