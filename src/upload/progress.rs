//! Timer-driven progress for accepted files.
//!
//! Each accepted id gets its own task that wakes every tick, asks its
//! [`ProgressSource`] for an increment and applies it to the queue. The task
//! ends when the entry completes or disappears from the queue.

use crate::upload::queue::{Advance, IntakeQueue};
use crate::upload::types::FileId;
use derivative::Derivative;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Supplies per-tick progress increments in percentage points.
///
/// The simulated source stands in for real transfer accounting; a real
/// implementation would report `bytes_sent / bytes_total` deltas instead.
pub trait ProgressSource: Send + 'static {
    fn next_increment(&mut self) -> f32;
}

/// Uniform increments in `[0, max_step)`.
#[derive(Debug)]
pub struct SimulatedProgress {
    rng: StdRng,
    max_step: f32,
}

impl SimulatedProgress {
    pub fn new(max_step: f32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_step,
        }
    }

    pub fn seeded(seed: u64, max_step: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_step,
        }
    }
}

impl ProgressSource for SimulatedProgress {
    fn next_increment(&mut self) -> f32 {
        if self.max_step > 0.0 {
            self.rng.gen_range(0.0..self.max_step)
        } else {
            0.0
        }
    }
}

type SourceFactory = Arc<dyn Fn() -> Box<dyn ProgressSource> + Send + Sync>;

/// Spawns one progress task per accepted file.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ProgressDriver {
    handle: Handle,
    tick: Duration,
    #[derivative(Debug = "ignore")]
    make_source: SourceFactory,
}

impl ProgressDriver {
    /// Simulated progress with increments up to `max_step`.
    pub fn simulated(handle: Handle, tick: Duration, max_step: f32) -> Self {
        Self::with_source(handle, tick, move || {
            Box::new(SimulatedProgress::new(max_step)) as Box<dyn ProgressSource>
        })
    }

    pub fn with_source<F>(handle: Handle, tick: Duration, make_source: F) -> Self
    where
        F: Fn() -> Box<dyn ProgressSource> + Send + Sync + 'static,
    {
        Self {
            handle,
            tick,
            make_source: Arc::new(make_source),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn spawn(&self, queue: IntakeQueue, id: FileId) -> DriverHandle {
        let source = (self.make_source)();
        let task = self.handle.spawn(drive(queue, id, self.tick, source));
        DriverHandle { id, task }
    }
}

async fn drive(
    queue: IntakeQueue,
    id: FileId,
    tick: Duration,
    mut source: Box<dyn ProgressSource>,
) -> Advance {
    loop {
        tokio::time::sleep(tick).await;

        let outcome = queue.advance(id, source.next_increment());
        match outcome {
            Advance::Progressed(progress) => {
                debug!(file_id = %id, progress, "upload progressed");
            }
            Advance::Completed => {
                info!(file_id = %id, "upload completed");
                return outcome;
            }
            Advance::Terminal | Advance::Missing => {
                debug!(file_id = %id, ?outcome, "stopping progress driver");
                return outcome;
            }
        }
    }
}

/// The running task for one tracked file.
#[derive(Debug)]
pub struct DriverHandle {
    id: FileId,
    task: JoinHandle<Advance>,
}

impl DriverHandle {
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task and returns how it ended. `None` if the task was
    /// cancelled with its runtime.
    pub async fn join(self) -> Option<Advance> {
        self.task.await.ok()
    }
}
