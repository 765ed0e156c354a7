//! Trafficlight - a traffic light actor with a blocking handoff queue
//!
//! A [`TrafficLight`] toggles between `Stopped` and `Go` on a background
//! thread after randomly drawn cycle durations. Every change is pushed onto a
//! [`MessageQueue`], so observers block until a `Go` arrives instead of
//! polling shared state.

pub mod config;
pub mod error;
pub mod light;
pub mod phase;
pub mod queue;
pub mod random;
pub mod task;

pub use error::{Result, TrafficLightError};
pub use light::{CycleTiming, TrafficLight};
pub use phase::Phase;
pub use queue::MessageQueue;
pub use random::{FixedSource, RandomSource, RngSource, SequenceSource};
pub use task::BackgroundTask;
