//! Engine - lifecycle state machine, batching worker, and fan-out dispatch.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use contracts::{
    Driver, InstanceDescriptor, Level, LogEntry, LogError, OutputConfig, DEFAULT_BUFFER,
    DEFAULT_FLUSH_INTERVAL, DEFAULT_NAME,
};
use serde_json::{Map, Value};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::instance::Instance;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::registry::DriverRegistry;

/// Entries accumulated before an early flush.
const BATCH_CAPACITY: usize = 256;

/// Registries, lifecycle flags, and the started-only channel handles.
///
/// Lifecycle: `Unopened → Opened → Started ⇄ Stopped → Closed`. Registries
/// are mutable only before Open; instances exist between Open and Close;
/// the queue and signals exist between Start and Stop.
struct State {
    opened: bool,
    started: bool,
    drivers: DriverRegistry,
    configs: HashMap<String, OutputConfig>,
    instances: HashMap<String, Arc<Instance>>,
    queue: Option<mpsc::Sender<LogEntry>>,
    stop: Option<oneshot::Sender<()>>,
    done: Option<oneshot::Receiver<()>>,
}

struct Shared {
    state: RwLock<State>,
    metrics: EngineMetrics,
}

/// Asynchronous log dispatch engine.
///
/// Leveled writes from any number of concurrent callers are queued to a
/// single background worker, batched, and fanned out to every open
/// instance that admits the entry's level. Producers never block: when the
/// queue is saturated or the engine is not started, the entry is delivered
/// synchronously through the same filter/write path.
///
/// Cheap to clone; clones share one engine.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with an empty driver registry.
    pub fn new() -> Self {
        Self::with_registry(DriverRegistry::new())
    }

    /// Engine starting from an explicitly populated driver registry.
    pub fn with_registry(drivers: DriverRegistry) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    opened: false,
                    started: false,
                    drivers,
                    configs: HashMap::new(),
                    instances: HashMap::new(),
                    queue: None,
                    stop: None,
                    done: None,
                }),
                metrics: EngineMetrics::new(),
            }),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    pub fn opened(&self) -> bool {
        self.shared.read_state().opened
    }

    pub fn started(&self) -> bool {
        self.shared.read_state().started
    }

    /// Names of the currently open instances.
    pub fn instance_names(&self) -> Vec<String> {
        self.shared.read_state().instances.keys().cloned().collect()
    }

    /// One open instance by name, if the engine is opened.
    pub fn instance(&self, name: &str) -> Option<Arc<Instance>> {
        self.shared.read_state().instances.get(name).cloned()
    }

    // ===== Registration =====

    /// Register a driver. An empty name maps to `"default"`. Drivers may be
    /// registered at any time, but registrations after Open have no effect
    /// on already-open instances.
    pub fn register_driver(&self, name: impl Into<String>, driver: Arc<dyn Driver>) {
        self.shared.write_state().drivers.register(name, driver);
    }

    /// Register a config under a name; ignored once the engine is opened.
    ///
    /// Unlike driver registration, a later config replaces an earlier one
    /// under the same name; loose settings applied via [`Engine::configure`]
    /// still merge on top, so the two compose in either order.
    pub fn register_config(&self, name: impl Into<String>, config: OutputConfig) {
        let mut state = self.shared.write_state();
        if state.opened {
            return;
        }
        let mut name = name.into();
        if name.is_empty() {
            name = DEFAULT_NAME.to_string();
        }
        state.configs.insert(name, config);
    }

    /// Register several configs at once; ignored once opened.
    pub fn register_configs(&self, configs: HashMap<String, OutputConfig>) {
        for (name, config) in configs {
            self.register_config(name, config);
        }
    }

    /// Apply a raw settings tree (see [`config_loader::split_instances`]);
    /// ignored once opened. Malformed values fall back silently.
    pub fn configure(&self, raw: &Map<String, Value>) {
        let mut state = self.shared.write_state();
        if state.opened {
            return;
        }
        for (name, settings) in config_loader::split_instances(raw) {
            let mut config = state.configs.remove(&name).unwrap_or_default();
            config_loader::merge_settings(&mut config, &settings);
            state.configs.insert(name, config);
        }
    }

    // ===== Lifecycle =====

    /// Normalize every registered config; with none registered, synthesize
    /// one default config (default driver, most permissive level).
    pub fn setup(&self) {
        let mut state = self.shared.write_state();
        if state.opened {
            return;
        }

        if state.configs.is_empty() {
            state.configs.insert(
                DEFAULT_NAME.to_string(),
                OutputConfig::default().normalize(),
            );
            return;
        }

        let configs = std::mem::take(&mut state.configs);
        state.configs = configs
            .into_iter()
            .map(|(name, config)| (name, config.normalize()))
            .collect();
    }

    /// Resolve each config's driver, connect, open, and materialize one
    /// instance per config. Idempotent.
    ///
    /// # Errors
    /// An unresolvable driver name or any connect/open failure aborts the
    /// sequence; connections opened so far are closed again.
    pub fn open(&self) -> Result<(), LogError> {
        let mut state = self.shared.write_state();
        if state.opened {
            return Ok(());
        }

        let mut instances = HashMap::with_capacity(state.configs.len());
        for (name, config) in &state.configs {
            let result = state
                .drivers
                .get(&config.driver)
                .ok_or_else(|| LogError::unknown_driver(&config.driver))
                .and_then(|driver| {
                    let descriptor =
                        Arc::new(InstanceDescriptor::new(name.clone(), config.clone()));
                    let connection = driver.connect(Arc::clone(&descriptor))?;
                    connection.open()?;
                    Ok(Instance::new(descriptor, connection))
                });

            match result {
                Ok(instance) => {
                    instances.insert(name.clone(), Arc::new(instance));
                }
                Err(e) => {
                    close_instances(&instances);
                    return Err(e);
                }
            }
        }

        state.instances = instances;
        state.opened = true;
        debug!(instances = state.instances.len(), "log engine opened");
        Ok(())
    }

    /// Allocate the bounded queue and the stop/done signals, then launch
    /// exactly one background batching worker. Idempotent. Must be called
    /// from within a tokio runtime.
    ///
    /// Queue capacity is the largest instance buffer (floor 1024); the
    /// flush interval is the smallest positive instance timeout (ceiling
    /// 200ms).
    pub fn start(&self) {
        let mut state = self.shared.write_state();
        if state.started {
            return;
        }

        let mut capacity = DEFAULT_BUFFER;
        let mut flush_every = DEFAULT_FLUSH_INTERVAL;
        for instance in state.instances.values() {
            let config = instance.config();
            capacity = capacity.max(config.buffer);
            if !config.timeout.is_zero() && config.timeout < flush_every {
                flush_every = config.timeout;
            }
        }

        let (tx, rx) = mpsc::channel(capacity);
        let (stop_tx, stop_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(worker_loop(
            Arc::clone(&self.shared),
            rx,
            stop_rx,
            done_tx,
            flush_every,
        ));

        state.queue = Some(tx);
        state.stop = Some(stop_tx);
        state.done = Some(done_rx);
        state.started = true;
        debug!(
            capacity,
            flush_ms = flush_every.as_millis() as u64,
            "log engine started"
        );
    }

    /// Signal the worker to stop and wait for it to drain.
    ///
    /// Every entry enqueued before this call is flushed before it returns.
    /// No timeout: callers needing a bounded shutdown must wrap it.
    /// Idempotent.
    pub async fn stop(&self) {
        let (stop, done) = {
            let mut state = self.shared.write_state();
            if !state.started {
                return;
            }
            state.started = false;
            state.queue = None;
            (state.stop.take(), state.done.take())
        };

        if let Some(stop) = stop {
            let _ = stop.send(());
        }
        if let Some(done) = done {
            let _ = done.await;
        }
        debug!("log engine stopped");
    }

    /// Close every instance's connection and clear the instance registry.
    /// Close failures are reported and do not stop the teardown. Idempotent.
    pub fn close(&self) {
        let mut state = self.shared.write_state();
        if !state.opened {
            return;
        }
        close_instances(&state.instances);
        state.instances.clear();
        state.opened = false;
        debug!("log engine closed");
    }

    // ===== Write surface =====

    /// Accept one entry.
    ///
    /// When started, a non-blocking enqueue is attempted first; if the
    /// engine is not started or the queue is full, the entry is dispatched
    /// synchronously through the same filter/write path. Never blocks,
    /// never drops.
    pub fn write(&self, entry: LogEntry) {
        let queue = {
            let state = self.shared.read_state();
            if state.started {
                state.queue.clone()
            } else {
                None
            }
        };

        let entry = match queue {
            Some(queue) => match queue.try_send(entry) {
                Ok(()) => {
                    self.shared.metrics.inc_enqueued();
                    return;
                }
                Err(TrySendError::Full(entry)) => {
                    self.shared.metrics.inc_fallback();
                    entry
                }
                // Worker already gone; deliver directly.
                Err(TrySendError::Closed(entry)) => entry,
            },
            None => entry,
        };

        self.shared.dispatch(std::slice::from_ref(&entry));
    }

    /// Build and write one entry stamped with the current time.
    pub fn log(&self, level: Level, body: impl Into<String>) {
        self.write(LogEntry::new(level, body));
    }

    pub fn debug(&self, body: impl Into<String>) {
        self.log(Level::Debug, body);
    }

    pub fn trace(&self, body: impl Into<String>) {
        self.log(Level::Trace, body);
    }

    pub fn info(&self, body: impl Into<String>) {
        self.log(Level::Info, body);
    }

    pub fn notice(&self, body: impl Into<String>) {
        self.log(Level::Notice, body);
    }

    pub fn warning(&self, body: impl Into<String>) {
        self.log(Level::Warning, body);
    }

    pub fn error(&self, body: impl Into<String>) {
        self.log(Level::Error, body);
    }

    pub fn panic(&self, body: impl Into<String>) {
        self.log(Level::Panic, body);
    }

    pub fn fatal(&self, body: impl Into<String>) {
        self.log(Level::Fatal, body);
    }
}

impl Shared {
    // Lock poisoning only happens when a writer panicked; the registries
    // stay usable, so keep going with the inner value.
    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fan a batch out to every instance that admits it.
    ///
    /// The instance set is snapshotted under the shared lock; the lock is
    /// released before any I/O. A write failure is reported and does not
    /// abort dispatch to the remaining instances.
    fn dispatch(&self, entries: &[LogEntry]) {
        if entries.is_empty() {
            return;
        }

        let instances: Vec<Arc<Instance>> = {
            let state = self.read_state();
            state.instances.values().cloned().collect()
        };

        for instance in instances {
            let filtered: Vec<LogEntry> = entries
                .iter()
                .filter(|entry| instance.allow(entry.level))
                .cloned()
                .collect();
            if filtered.is_empty() {
                continue;
            }

            match instance.connection().write(&filtered) {
                Ok(()) => self.metrics.add_entries_written(filtered.len() as u64),
                Err(e) => {
                    self.metrics.inc_write_failures();
                    error!(instance = instance.name(), error = %e, "log write failed");
                }
            }
        }
    }
}

fn close_instances(instances: &HashMap<String, Arc<Instance>>) {
    for instance in instances.values() {
        if let Err(e) = instance.connection().close() {
            warn!(instance = instance.name(), error = %e, "log connection close failed");
        }
    }
}

/// Single background worker: batches entries and flushes them on size,
/// tick, or stop.
async fn worker_loop(
    shared: Arc<Shared>,
    mut rx: mpsc::Receiver<LogEntry>,
    mut stop: oneshot::Receiver<()>,
    done: oneshot::Sender<()>,
    flush_every: Duration,
) {
    let mut ticker = tokio::time::interval(flush_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut batch: Vec<LogEntry> = Vec::with_capacity(BATCH_CAPACITY);

    debug!("log worker started");

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(entry) => {
                    batch.push(entry);
                    if batch.len() >= BATCH_CAPACITY {
                        flush(&shared, &mut batch);
                    }
                }
                // Every sender is gone; nothing more can arrive.
                None => break,
            },
            _ = ticker.tick() => flush(&shared, &mut batch),
            _ = &mut stop => break,
        }
    }

    // Drain whatever already sits in the queue without blocking, then
    // perform one final flush.
    while let Ok(entry) = rx.try_recv() {
        batch.push(entry);
    }
    flush(&shared, &mut batch);

    let _ = done.send(());
    debug!("log worker stopped");
}

/// No-op on an empty batch.
fn flush(shared: &Shared, batch: &mut Vec<LogEntry>) {
    if batch.is_empty() {
        return;
    }
    shared.metrics.inc_batches_flushed();
    shared.dispatch(batch);
    batch.clear();
}
