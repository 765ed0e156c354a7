//! Traffic light actor
//!
//! A [`TrafficLight`] owns its phase and a private [`MessageQueue`]. Once
//! started, a background thread flips the phase after a randomly drawn cycle
//! duration and pushes every new phase onto the queue. Callers block in
//! [`TrafficLight::wait_for_green`] until a `Go` comes through.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, TrafficLightError};
use crate::phase::Phase;
use crate::queue::MessageQueue;
use crate::random::{RandomSource, RngSource};
use crate::task::BackgroundTask;

/// Default lower bound of a cycle, in units
pub const DEFAULT_MIN_SECONDS: u64 = 4;

/// Default upper bound of a cycle, in units
pub const DEFAULT_MAX_SECONDS: u64 = 6;

/// Default sleep between two elapsed-time checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

const TASK_NAME: &str = "traffic-light";

/// How long each phase lasts
///
/// Every cycle draws an integer uniformly from `[min, max]` and multiplies it
/// by `unit` (one second unless overridden).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    /// Inclusive lower bound, in units
    pub min: u64,
    /// Inclusive upper bound, in units
    pub max: u64,
    /// Length of one unit
    pub unit: Duration,
    /// Sleep between two checks of the elapsed time
    pub poll_interval: Duration,
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SECONDS,
            max: DEFAULT_MAX_SECONDS,
            unit: Duration::from_secs(1),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl CycleTiming {
    /// Bounds in seconds with the default poll interval
    pub fn new(min: u64, max: u64) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// Scale the drawn integers by `unit` instead of seconds
    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    /// Set the sleep between two elapsed-time checks
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Reject bounds and intervals the cycle loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(TrafficLightError::InvalidTiming(format!(
                "min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.unit.is_zero() {
            return Err(TrafficLightError::InvalidTiming("unit must be non-zero".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(TrafficLightError::InvalidTiming(
                "poll interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Shortest cycle this timing can produce
    pub fn shortest(&self) -> Duration {
        self.unit.saturating_mul(self.min.min(u32::MAX as u64) as u32)
    }

    /// Longest cycle this timing can produce
    pub fn longest(&self) -> Duration {
        self.unit.saturating_mul(self.max.min(u32::MAX as u64) as u32)
    }

    fn draw(&self, source: &mut dyn RandomSource) -> Duration {
        let units = source.next_in_range(self.min, self.max);
        self.unit.saturating_mul(units.min(u32::MAX as u64) as u32)
    }
}

/// State shared between the light and its cycling thread
#[derive(Debug)]
struct Signal {
    phase: AtomicU8,
    queue: MessageQueue<Phase>,
}

impl Signal {
    fn current(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    fn cycle_through_phases(&self, timing: CycleTiming, mut source: Box<dyn RandomSource>) {
        let mut cycle = timing.draw(source.as_mut());
        let mut cycle_start = Instant::now();
        log::info!("Traffic light cycling, first change in {:?}", cycle);

        loop {
            thread::sleep(timing.poll_interval);
            if cycle_start.elapsed() < cycle {
                continue;
            }

            // Publish the phase before the notification so a receiver never
            // reads an older phase than the one it was handed.
            let next = self.current().toggled();
            self.phase.store(next.as_u8(), Ordering::Release);
            self.queue.send(next);

            cycle = timing.draw(source.as_mut());
            cycle_start = Instant::now();
            log::debug!("Phase changed to {}, next change in {:?}", next, cycle);
        }
    }
}

/// A traffic light that toggles between `Stopped` and `Go` on its own thread
pub struct TrafficLight {
    signal: Arc<Signal>,
    timing: CycleTiming,
    source: Mutex<Option<Box<dyn RandomSource>>>,
    task: Mutex<Option<BackgroundTask>>,
}

impl TrafficLight {
    /// A stopped light cycling every 4 to 6 seconds, seeded from the OS
    pub fn new() -> Self {
        Self::build(CycleTiming::default(), Box::new(RngSource::from_entropy()))
    }

    /// A stopped light with custom timing, seeded from the OS
    pub fn with_timing(timing: CycleTiming) -> Result<Self> {
        Self::with_source(timing, RngSource::from_entropy())
    }

    /// A stopped light drawing its cycle durations from `source`
    pub fn with_source(timing: CycleTiming, source: impl RandomSource + 'static) -> Result<Self> {
        timing.validate()?;
        Ok(Self::build(timing, Box::new(source)))
    }

    fn build(timing: CycleTiming, source: Box<dyn RandomSource>) -> Self {
        Self {
            signal: Arc::new(Signal {
                phase: AtomicU8::new(Phase::Stopped.as_u8()),
                queue: MessageQueue::new(),
            }),
            timing,
            source: Mutex::new(Some(source)),
            task: Mutex::new(None),
        }
    }

    /// Timing this light was built with
    pub fn timing(&self) -> CycleTiming {
        self.timing
    }

    /// Launch the cycling thread and return immediately.
    ///
    /// A light cycles at most once: a second call fails with
    /// [`TrafficLightError::AlreadyStarted`], as does any call after a failed
    /// spawn.
    pub fn start(&self) -> Result<()> {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.is_some() {
            return Err(TrafficLightError::AlreadyStarted);
        }
        let source = self
            .source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(TrafficLightError::AlreadyStarted)?;

        let signal = Arc::clone(&self.signal);
        let timing = self.timing;
        *task = Some(BackgroundTask::spawn(TASK_NAME, move || {
            signal.cycle_through_phases(timing, source)
        })?);
        Ok(())
    }

    /// Whether the cycling thread has been launched
    pub fn is_started(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current phase, without blocking.
    ///
    /// Around a change this may still return the previous phase; use
    /// [`wait_for_green`](Self::wait_for_green) to observe changes reliably.
    pub fn get_current_phase(&self) -> Phase {
        self.signal.current()
    }

    /// Block until the light hands out a `Go`.
    ///
    /// Each `Stopped` delivered in the meantime is consumed and ignored. Blocks
    /// forever on a light that was never started.
    pub fn wait_for_green(&self) {
        while !self.signal.queue.receive().is_go() {}
    }

    /// Like [`wait_for_green`](Self::wait_for_green), but gives up after `timeout`.
    ///
    /// Returns `true` if a `Go` was received in time. A timeout too large to
    /// form a deadline waits like `wait_for_green`.
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait_for_green();
            return true;
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.signal.queue.receive_timeout(remaining) {
                Some(Phase::Go) => return true,
                Some(Phase::Stopped) => continue,
                None => return false,
            }
        }
    }
}

impl Drop for TrafficLight {
    // The cycle loop never ends, so the light lets its thread go rather than join it.
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            task.detach();
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrafficLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficLight")
            .field("phase", &self.get_current_phase())
            .field("timing", &self.timing)
            .field("started", &self.is_started())
            .finish()
    }
}
