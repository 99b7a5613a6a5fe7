// ============================================
// src/generator.rs
// Simulated generation service and the in-flight task it runs on
// ============================================

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::activity::{ActivityType, GeneratedActivity, compose};
use crate::error::{AppError, Result};
use crate::session::Ticket;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Result of one generation, tagged with the epoch it was started in.
#[derive(Debug)]
pub struct Completion {
    pub epoch: u64,
    pub outcome: Result<GeneratedActivity>,
}

/// Stands in for a text-generation service: waits, then fills the
/// canned templates.
#[derive(Debug, Clone)]
pub struct Generator {
    delay: Duration,
}

impl Generator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn generate(&self, ticket: Ticket, activity_type: ActivityType) -> Completion {
        tokio::time::sleep(self.delay).await;
        Completion {
            epoch: ticket.epoch,
            outcome: Ok(compose(&ticket.input, activity_type)),
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

/// Runs at most one generation at a time on the runtime and hands
/// results back to the UI loop without blocking it.
pub struct Dispatcher {
    runtime: Handle,
    generator: Arc<Generator>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    /// Epoch and task of the generation in flight.
    in_flight: Option<(u64, JoinHandle<()>)>,
}

impl Dispatcher {
    pub fn new(runtime: Handle, generator: Generator) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            generator: Arc::new(generator),
            tx,
            rx,
            in_flight: None,
        }
    }

    /// Spawns a generation, aborting any earlier one first.
    pub fn start(&mut self, ticket: Ticket, activity_type: ActivityType) {
        self.cancel();
        debug!("spawning {} generation for epoch {}", activity_type, ticket.epoch);

        let epoch = ticket.epoch;
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let completion = generator.generate(ticket, activity_type).await;
            // The receiver only goes away when the app is quitting.
            let _ = tx.send(completion);
        });
        self.in_flight = Some((epoch, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((epoch, handle)) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("aborting in-flight generation for epoch {}", epoch);
            }
            handle.abort();
        }
    }

    /// Non-blocking poll used by the UI loop.
    pub fn try_next(&mut self) -> Option<Completion> {
        if let Ok(completion) = self.rx.try_recv() {
            // A queued result from a superseded task leaves the current one tracked.
            if matches!(self.in_flight, Some((epoch, _)) if epoch == completion.epoch) {
                self.in_flight = None;
            }
            return Some(completion);
        }

        let (epoch, handle) = self.in_flight.as_ref()?;
        if !handle.is_finished() {
            return None;
        }
        let epoch = *epoch;
        self.in_flight = None;
        // The task sends before it finishes, so look once more.
        match self.rx.try_recv() {
            Ok(completion) => Some(completion),
            Err(_) => Some(lost(epoch, "generation task ended without a result")),
        }
    }

    /// Waits for the generation in flight. `None` when nothing is running.
    pub async fn next(&mut self) -> Option<Completion> {
        let (epoch, handle) = self.in_flight.take()?;
        match handle.await {
            Ok(()) => Some(
                self.rx
                    .recv()
                    .await
                    .unwrap_or_else(|| lost(epoch, "generation channel closed")),
            ),
            Err(err) => Some(lost(epoch, &err.to_string())),
        }
    }
}

fn lost(epoch: u64, reason: &str) -> Completion {
    warn!("generation for epoch {} failed: {}", epoch, reason);
    Completion {
        epoch,
        outcome: Err(AppError::GenerationFailed(reason.to_string())),
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
