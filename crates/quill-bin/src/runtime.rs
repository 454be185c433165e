//! The event loop: one event is fully handled, including file I/O and the
//! repaint, before the next one is received.

use core_actions::{KeyTranslator, handle_key};
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, KeyEvent,
};
use core_input::AsyncInputShutdown;
use core_model::Session;
use core_render::{RenderContext, render, writer::Writer};
use core_terminal::TerminalBackend;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

enum LoopControl {
    Continue { repaint: bool },
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownReason {
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

/// Render inputs that come from outside the session.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuntimeSettings {
    pub branch: Option<String>,
}

pub(crate) struct EditorRuntime<B: TerminalBackend, W: Write> {
    session: Session,
    translator: KeyTranslator,
    settings: RuntimeSettings,
    backend: B,
    out: W,
    stop: fn() -> io::Result<()>,
    rx: mpsc::Receiver<Event>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
}

impl<B: TerminalBackend, W: Write> EditorRuntime<B, W> {
    pub(crate) fn new(
        session: Session,
        settings: RuntimeSettings,
        backend: B,
        out: W,
        rx: mpsc::Receiver<Event>,
    ) -> Self {
        Self {
            session,
            translator: KeyTranslator::new(),
            settings,
            backend,
            out,
            stop: core_terminal::stop_process,
            rx,
            input_task: None,
            input_shutdown: None,
        }
    }

    pub(crate) fn with_input(mut self, task: JoinHandle<()>, shutdown: AsyncInputShutdown) -> Self {
        self.input_task = Some(task);
        self.input_shutdown = Some(shutdown);
        self
    }

    /// Replace the job-control stop (`SIGTSTP`) used on Ctrl-Z.
    #[cfg(test)]
    fn with_stop(mut self, stop: fn() -> io::Result<()>) -> Self {
        self.stop = stop;
        self
    }

    #[cfg(test)]
    fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) async fn run(&mut self) -> ShutdownReason {
        self.paint();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match event {
                Event::Key(key) => self.handle_key(&key),
                Event::Resize(w, h) => self.handle_resize(w, h),
                Event::Resume => self.handle_resume(),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { repaint } => {
                    if repaint {
                        self.paint();
                    }
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        shutdown_reason
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LoopControl {
        let result = handle_key(&mut self.session, &mut self.translator, key);
        trace!(target: "runtime", %key, dirty = result.dirty, "key_handled");
        if result.quit {
            return LoopControl::Break {
                reason: ShutdownReason::Quit,
            };
        }
        if result.suspend {
            self.suspend();
            return LoopControl::Continue { repaint: true };
        }
        LoopControl::Continue {
            repaint: result.dirty,
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> LoopControl {
        trace!(target: "runtime", width, height, "resize");
        self.session.resize(width, height);
        LoopControl::Continue { repaint: true }
    }

    /// Continued after a stop we did not initiate: the shell may have
    /// reset the terminal, so re-enter and redraw at the current size.
    fn handle_resume(&mut self) -> LoopControl {
        if let Err(e) = self.backend.enter() {
            error!(target: "runtime", ?e, "resume_enter_failed");
        }
        if let Ok((w, h)) = self.backend.size() {
            self.session.resize(w, h);
        }
        LoopControl::Continue { repaint: true }
    }

    fn suspend(&mut self) {
        match core_terminal::suspend(&mut self.backend, self.stop) {
            Ok((w, h)) => self.session.resize(w, h),
            Err(e) => {
                warn!(target: "runtime", ?e, "suspend_failed");
                if let Err(e) = self.backend.enter() {
                    error!(target: "runtime", ?e, "reenter_failed");
                }
            }
        }
    }

    fn paint(&mut self) {
        let ctx = RenderContext {
            branch: self.settings.branch.as_deref(),
        };
        let frame = render(&self.session, &ctx);
        if let Err(e) = Writer::from_frame(&frame).flush_to(&mut self.out) {
            error!(target: "render", ?e, "render_error");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(())) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_timeout"
                ),
            }
        }

        info!(
            target: "runtime.shutdown",
            starts = ASYNC_INPUT_STARTS.load(Ordering::Relaxed),
            stop_signal = ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed),
            stop_channel = ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed),
            stop_stream = ASYNC_INPUT_STOP_STREAM.load(Ordering::Relaxed),
            stop_error = ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            "input_counters"
        );

        if let Err(e) = self.backend.leave() {
            error!(target: "runtime.shutdown", ?e, "terminal_leave_failed");
        }
        log_shutdown_stage(reason, "complete");
    }
}
