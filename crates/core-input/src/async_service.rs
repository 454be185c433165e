use crate::key_map::map_key_event;
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event,
};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();
        AsyncEventStreamTask::new(sender, EventStream::new(), listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }

    fn count(&self) {
        let counter = match self {
            ExitReason::ShutdownSignal => &ASYNC_INPUT_STOP_SIGNAL,
            ExitReason::ChannelClosed => &ASYNC_INPUT_STOP_CHANNEL,
            ExitReason::StreamEnded => &ASYNC_INPUT_STOP_STREAM,
            ExitReason::StreamError => &ASYNC_INPUT_STOP_ERROR,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        let reason = loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                next = self.stream.next() => next,
            };
            let event = match next {
                None => break ExitReason::StreamEnded,
                Some(Err(err)) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
                Some(Ok(CEvent::Key(key))) => match map_key_event(&key) {
                    Some(key) => Event::Key(key),
                    None => continue,
                },
                Some(Ok(CEvent::Resize(w, h))) => {
                    trace!(target: "input.event", w, h, "resize");
                    Event::Resize(w, h)
                }
                Some(Ok(_)) => continue,
            };
            if self.sender.send(event).await.is_err() {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                break ExitReason::ChannelClosed;
            }
        };
        reason.count();
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent};
    use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CMods};
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};

    fn key(code: CKeyCode) -> io::Result<CEvent> {
        Ok(CEvent::Key(CKeyEvent::new(code, CMods::NONE)))
    }

    async fn run_scenario(events: Vec<io::Result<CEvent>>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(16);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, tokio_stream::iter(events), listener)
            .run()
            .await;
        let mut out = Vec::new();
        while let Some(e) = rx.recv().await {
            out.push(e);
        }
        out
    }

    #[tokio::test]
    async fn forwards_keys_and_resizes_in_order() {
        let out = run_scenario(vec![
            key(CKeyCode::Char('i')),
            Ok(CEvent::Resize(100, 30)),
            Ok(CEvent::FocusGained),
            key(CKeyCode::Esc),
        ])
        .await;
        assert_eq!(
            out,
            vec![
                Event::Key(KeyEvent::from('i')),
                Event::Resize(100, 30),
                Event::Key(KeyEvent::from(KeyCode::Esc)),
            ]
        );
    }

    #[tokio::test]
    async fn stream_error_stops_forwarding() {
        let base = ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed);
        let out = run_scenario(vec![
            key(CKeyCode::Char('a')),
            Err(io::Error::other("tty gone")),
            key(CKeyCode::Char('b')),
        ])
        .await;
        assert_eq!(out, vec![Event::Key(KeyEvent::from('a'))]);
        assert!(ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed) > base);
    }

    #[tokio::test]
    async fn closed_channel_ends_task() {
        let base = ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        let stream = tokio_stream::iter(vec![key(CKeyCode::Char('x'))]);
        AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert!(ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed) > base);
    }

    #[tokio::test]
    async fn shutdown_signal_interrupts_pending_stream() {
        let (tx, _rx) = mpsc::channel(1);
        let (shutdown, listener) = ShutdownListener::new_pair();
        let stream = tokio_stream::pending::<io::Result<CEvent>>();
        let handle = tokio::spawn(AsyncEventStreamTask::new(tx, stream, listener).run());
        shutdown.signal();
        let joined = timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }
}
