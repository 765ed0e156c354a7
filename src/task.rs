//! Background task handle
//!
//! Owns one named OS thread. Dropping the handle detaches the thread.

use std::thread::{self, JoinHandle};

use crate::error::{Result, TrafficLightError};

/// A named thread running a long-lived loop
#[derive(Debug)]
pub struct BackgroundTask {
    name: String,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    /// Spawn `body` on a new thread called `name`.
    ///
    /// Fails with [`TrafficLightError::Spawn`] when the OS cannot create the thread.
    pub fn spawn<F>(name: impl Into<String>, body: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let name = name.into();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(body)
            .map_err(TrafficLightError::Spawn)?;
        log::debug!("Spawned background task '{}'", name);
        Ok(Self { name, handle })
    }

    /// Thread name given at spawn time
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the thread to finish
    pub fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| TrafficLightError::TaskPanicked(self.name))
    }

    /// Let the thread run on without a handle
    pub fn detach(self) {
        log::debug!("Detaching background task '{}'", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_spawn_and_join() {
        let counter = Arc::new(AtomicU32::new(0));
        let task = {
            let counter = Arc::clone(&counter);
            BackgroundTask::spawn("counter", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap()
        };

        assert_eq!(task.name(), "counter");
        task.join().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_thread_carries_name() {
        let (tx, rx) = std::sync::mpsc::channel();
        let task = BackgroundTask::spawn("named-task", move || {
            let name = thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        })
        .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("named-task"));
        task.join().unwrap();
    }

    #[test]
    fn test_join_reports_panic() {
        let task = BackgroundTask::spawn("doomed", || panic!("boom")).unwrap();
        let err = task.join().unwrap_err();
        assert!(matches!(err, TrafficLightError::TaskPanicked(ref name) if name == "doomed"));
    }

    #[test]
    fn test_detach_keeps_thread_running() {
        let (tx, rx) = std::sync::mpsc::channel();
        let task = BackgroundTask::spawn("detached", move || {
            tx.send(5).unwrap();
        })
        .unwrap();

        task.detach();
        assert_eq!(rx.recv().unwrap(), 5);
    }
}
