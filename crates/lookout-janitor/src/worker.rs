//! Background worker for continuous Janitor operation

use crate::janitor::current_timestamp;
use crate::{Janitor, JanitorError, JanitorMetrics, SweepReport};
use lookout_domain::traits::{MetadataStore, SampleStore, StateStore};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Hook invoked with the report of every completed sweep
///
/// Runs on the sweep's blocking thread; keep it cheap.
pub trait SweepObserver: Send + Sync {
    /// Called once per completed sweep
    fn sweep_completed(&self, report: &SweepReport);
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for the next tick
    Idle,

    /// A sweep is in flight
    Running,

    /// Shut down; no further sweeps
    Stopped,
}

/// Single-flight gate over the scheduler state
#[derive(Debug)]
struct SweepGate {
    state: Mutex<WorkerState>,
}

impl SweepGate {
    fn lock(&self) -> MutexGuard<'_, WorkerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self) -> WorkerState {
        *self.lock()
    }

    /// Idle -> Running; `None` if a sweep is in flight or the worker stopped
    fn try_begin(self: &Arc<Self>) -> Option<RunningGuard> {
        let mut state = self.lock();
        if *state != WorkerState::Idle {
            return None;
        }
        *state = WorkerState::Running;
        Some(RunningGuard {
            gate: Arc::clone(self),
        })
    }

    fn stop(&self) {
        *self.lock() = WorkerState::Stopped;
    }
}

/// Returns the gate to Idle when the sweep ends, even by panic
struct RunningGuard {
    gate: Arc<SweepGate>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        let mut state = self.gate.lock();
        if *state == WorkerState::Running {
            *state = WorkerState::Idle;
        }
    }
}

struct Shared<M, S, T> {
    janitor: Janitor<M, S, T>,
    gate: Arc<SweepGate>,
    metrics: Mutex<JanitorMetrics>,
    observer: Option<Arc<dyn SweepObserver>>,
}

impl<M, S, T> Shared<M, S, T>
where
    M: MetadataStore,
    S: SampleStore,
    T: StateStore,
{
    fn metrics(&self) -> MutexGuard<'_, JanitorMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocking: runs one sweep while holding the gate
    fn run_sweep(&self, _running: RunningGuard) -> SweepReport {
        let report = self.janitor.sweep(current_timestamp());

        self.metrics().record_sweep(&report);
        if let Some(observer) = &self.observer {
            observer.sweep_completed(&report);
        }

        report
    }

    fn drop_tick(&self) {
        self.metrics().record_dropped_tick();
        tracing::debug!("Sweep still running, dropping tick");
    }
}

/// Background worker that runs Janitor on a schedule
///
/// Ticks every [`RetentionPolicy::sweep_interval`](crate::RetentionPolicy::sweep_interval),
/// first tick immediately on [`start`](Self::start). Sweeps run on tokio's
/// blocking pool, one at a time: a tick that arrives while a sweep is still
/// running is dropped, never queued.
///
/// # Examples
///
/// ```no_run
/// use lookout_janitor::{Janitor, JanitorConfig, JanitorWorker};
/// use lookout_store::SqliteStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(SqliteStore::new("lookout.db")?);
///     let janitor = Janitor::shared(store, JanitorConfig::default().policy()?);
///     let mut worker = JanitorWorker::new(janitor);
///
///     worker.start()?;
///     tokio::signal::ctrl_c().await?;
///     worker.stop().await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker<M, S, T> {
    shared: Arc<Shared<M, S, T>>,
    interval: Duration,
    shutdown: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl<M, S, T> JanitorWorker<M, S, T>
where
    M: MetadataStore + Send + Sync + 'static,
    S: SampleStore + Send + Sync + 'static,
    T: StateStore + Send + Sync + 'static,
{
    /// Create a new background worker around a Janitor
    pub fn new(janitor: Janitor<M, S, T>) -> Self {
        Self::build(janitor, None)
    }

    /// Create a worker that reports every sweep to `observer`
    pub fn with_observer(janitor: Janitor<M, S, T>, observer: Arc<dyn SweepObserver>) -> Self {
        Self::build(janitor, Some(observer))
    }

    fn build(janitor: Janitor<M, S, T>, observer: Option<Arc<dyn SweepObserver>>) -> Self {
        let interval = janitor.policy().sweep_interval();
        Self {
            shared: Arc::new(Shared {
                janitor,
                gate: Arc::new(SweepGate {
                    state: Mutex::new(WorkerState::Idle),
                }),
                metrics: Mutex::new(JanitorMetrics::new()),
                observer,
            }),
            interval,
            shutdown: None,
            handle: None,
        }
    }

    /// Begin ticking
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::Worker`] if the worker is already started,
    /// has been stopped, or is called outside a tokio runtime.
    pub fn start(&mut self) -> Result<(), JanitorError> {
        if self.handle.is_some() {
            return Err(JanitorError::Worker("worker already started".to_string()));
        }
        if self.state() == WorkerState::Stopped {
            return Err(JanitorError::Worker("worker stopped, cannot restart".to_string()));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| JanitorError::Worker(e.to_string()))?;
        let (tx, rx) = watch::channel(false);

        self.handle = Some(runtime.spawn(tick_loop(
            Arc::clone(&self.shared),
            self.interval,
            rx,
        )));
        self.shutdown = Some(tx);

        tracing::info!("Janitor worker started (interval: {:?})", self.interval);
        Ok(())
    }

    /// Stop ticking and wait for any in-flight sweep to finish
    ///
    /// The worker cannot be started again afterwards.
    pub async fn stop(&mut self) -> Result<(), JanitorError> {
        if let Some(shutdown) = self.shutdown.take() {
            // The loop may already be gone; nothing to signal then
            let _ = shutdown.send(true);
        }

        let joined = match self.handle.take() {
            Some(handle) => handle.await.map_err(|e| JanitorError::Worker(e.to_string())),
            None => Ok(()),
        };
        self.shared.gate.stop();

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.metrics().summary());
        joined
    }

    /// Run a single sweep now, through the same single-flight gate
    ///
    /// Returns `None` (and counts a dropped tick) if a sweep is already in
    /// flight or the worker has stopped.
    ///
    /// The sweep runs on the blocking pool and is not cancelled if this
    /// future is dropped. [`stop`](Self::stop) only waits for sweeps started
    /// by the tick loop, so await `run_once` before stopping.
    pub async fn run_once(&self) -> Result<Option<SweepReport>, JanitorError> {
        let Some(running) = self.shared.gate.try_begin() else {
            self.shared.drop_tick();
            return Ok(None);
        };

        let shared = Arc::clone(&self.shared);
        let report = tokio::task::spawn_blocking(move || shared.run_sweep(running))
            .await
            .map_err(|e| JanitorError::Worker(e.to_string()))?;

        Ok(Some(report))
    }

    /// Current scheduler state
    pub fn state(&self) -> WorkerState {
        self.shared.gate.get()
    }

    /// Sweep cadence
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot of the cumulative metrics
    pub fn metrics(&self) -> JanitorMetrics {
        self.shared.metrics().clone()
    }

    /// Reset the cumulative metrics counters
    pub fn reset_metrics(&self) {
        self.shared.metrics().reset();
    }
}

async fn tick_loop<M, S, T>(
    shared: Arc<Shared<M, S, T>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    M: MetadataStore + Send + Sync + 'static,
    S: SampleStore + Send + Sync + 'static,
    T: StateStore + Send + Sync + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<JoinHandle<SweepReport>> = None;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => {
                tracing::info!("Shutdown signal received, stopping janitor");
                break;
            }
            _ = ticker.tick() => {
                match shared.gate.try_begin() {
                    Some(running) => {
                        // The gate is free again, so the previous sweep is done or finishing
                        if let Some(previous) = in_flight.take() {
                            reap(previous).await;
                        }
                        tracing::debug!("Starting sweep cycle");
                        let shared = Arc::clone(&shared);
                        in_flight = Some(tokio::task::spawn_blocking(move || shared.run_sweep(running)));
                    }
                    None => shared.drop_tick(),
                }
            }
        }
    }

    // Let the running sweep finish its multi-store deletes
    if let Some(handle) = in_flight {
        reap(handle).await;
    }
}

async fn reap(handle: JoinHandle<SweepReport>) {
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Sweep task failed");
    }
}
