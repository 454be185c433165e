//! Terminal input task.
//!
//! A tokio task reads `crossterm::event::EventStream`, converts key and
//! resize events into `core_events::Event` and forwards them on the bounded
//! runtime channel. It never touches editor state.

mod async_service;
mod key_map;

pub use async_service::AsyncInputShutdown;
pub use key_map::{map_key_event, map_mods};

use async_service::spawn_async_event_task;
use core_events::Event;
use tokio::task::JoinHandle;

/// Spawn the input task backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}
