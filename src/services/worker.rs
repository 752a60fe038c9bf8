//! Off-thread filter worker.
//!
//! Runs a [`FeedFilter`] on a dedicated thread fed by an ordered command
//! channel, so batches, resets and debug toggles are applied in submission
//! order. If the thread cannot be spawned the same pipeline runs inline on
//! the caller's thread.

use super::pipeline::FeedFilter;
use crate::config::FilterConfig;
use crate::models::{BatchOutcome, BlockList, FeedItem};
use crate::observability::EventBus;
use crate::{Error, Result};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

const WORKER_THREAD_NAME: &str = "feedfilter-worker";

enum Command {
    Process {
        items: Vec<FeedItem>,
        block: BlockList,
        reply: oneshot::Sender<BatchOutcome>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    SetDebug(bool),
}

enum Placement {
    Threaded {
        commands: mpsc::UnboundedSender<Command>,
        handle: Option<JoinHandle<()>>,
    },
    Inline(Mutex<FeedFilter>),
}

/// Handle to a filter pipeline running on its own thread (or inline).
///
/// Results are identical in both placements.
pub struct FilterWorker {
    placement: Placement,
}

impl FilterWorker {
    /// Starts a worker thread running a pipeline built from `config`.
    ///
    /// Falls back to inline execution if the thread cannot be spawned.
    #[must_use]
    pub fn start(config: &FilterConfig, events: Option<EventBus>) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let thread_config = config.clone();
        let thread_events = events.clone();

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(build_filter(&thread_config, thread_events), receiver));

        match spawned {
            Ok(handle) => Self {
                placement: Placement::Threaded {
                    commands,
                    handle: Some(handle),
                },
            },
            Err(e) => {
                tracing::warn!(error = %e, "Worker thread unavailable, filtering inline");
                Self::inline(build_filter(config, events))
            },
        }
    }

    /// Wraps a pipeline that runs on the caller's thread.
    #[must_use]
    pub fn inline(filter: FeedFilter) -> Self {
        Self {
            placement: Placement::Inline(Mutex::new(filter)),
        }
    }

    /// Returns true when commands run on a dedicated thread.
    #[must_use]
    pub const fn is_threaded(&self) -> bool {
        matches!(self.placement, Placement::Threaded { .. })
    }

    /// Processes a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread has stopped.
    pub async fn process(&self, items: Vec<FeedItem>, block: BlockList) -> Result<BatchOutcome> {
        match &self.placement {
            Placement::Threaded { commands, .. } => {
                let (reply, response) = oneshot::channel();
                send(commands, Command::Process { items, block, reply })?;
                response.await.map_err(|e| Error::operation("worker_process", e))
            },
            Placement::Inline(filter) => {
                let mut filter = lock(filter)?;
                Ok(filter.process_with(&items, &block))
            },
        }
    }

    /// Clears seen ids and counters. Completes after every previously
    /// submitted batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread has stopped.
    pub async fn reset(&self) -> Result<()> {
        match &self.placement {
            Placement::Threaded { commands, .. } => {
                let (reply, response) = oneshot::channel();
                send(commands, Command::Reset { reply })?;
                response.await.map_err(|e| Error::operation("worker_reset", e))
            },
            Placement::Inline(filter) => {
                lock(filter)?.reset();
                Ok(())
            },
        }
    }

    /// Toggles debug diagnostics for subsequent commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread has stopped.
    pub fn set_debug_enabled(&self, enabled: bool) -> Result<()> {
        match &self.placement {
            Placement::Threaded { commands, .. } => send(commands, Command::SetDebug(enabled)),
            Placement::Inline(filter) => {
                lock(filter)?.set_debug_enabled(enabled);
                Ok(())
            },
        }
    }

    /// Stops the worker thread after it drains queued commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread panicked.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        if let Placement::Threaded { commands, handle } = &mut self.placement {
            // Closing the channel ends the command loop.
            let (closed, _) = mpsc::unbounded_channel();
            drop(std::mem::replace(commands, closed));
            if let Some(handle) = handle.take() {
                handle
                    .join()
                    .map_err(|_| Error::operation("worker_shutdown", "worker thread panicked"))?;
            }
        }
        Ok(())
    }
}

impl Drop for FilterWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(error = %e, "Worker did not stop cleanly");
        }
    }
}

fn build_filter(config: &FilterConfig, events: Option<EventBus>) -> FeedFilter {
    let filter = FeedFilter::new(config);
    match events {
        Some(bus) => filter.with_event_bus(bus),
        None => filter,
    }
}

fn run(mut filter: FeedFilter, mut receiver: mpsc::UnboundedReceiver<Command>) {
    tracing::debug!("Worker started");
    while let Some(command) = receiver.blocking_recv() {
        match command {
            Command::Process { items, block, reply } => {
                let outcome = filter.process_with(&items, &block);
                // The caller may have given up waiting.
                let _ = reply.send(outcome);
            },
            Command::Reset { reply } => {
                filter.reset();
                let _ = reply.send(());
            },
            Command::SetDebug(enabled) => filter.set_debug_enabled(enabled),
        }
    }
    tracing::debug!("Worker stopped");
}

fn send(commands: &mpsc::UnboundedSender<Command>, command: Command) -> Result<()> {
    commands
        .send(command)
        .map_err(|_| Error::operation("worker_send", "worker has stopped"))
}

fn lock(filter: &Mutex<FeedFilter>) -> Result<std::sync::MutexGuard<'_, FeedFilter>> {
    filter
        .lock()
        .map_err(|e| Error::operation("worker_lock", e))
}
