use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

use crate::error::Result;

/// Cooperative stop signal shared with a worker loop.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        StopFlag::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Handle to a spawned background worker.
///
/// There is no way to kill a thread outright, so forced termination trips
/// the worker's [`StopFlag`] and detaches; loops poll the flag every
/// iteration and exit on their own within one.
#[derive(Debug)]
pub struct Worker {
    stop: StopFlag,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns a named worker thread running `body` until its flag is set.
    pub fn spawn<F>(name: &str, body: F) -> Result<Worker>
    where
        F: FnOnce(StopFlag) + Send + 'static,
    {
        let stop = StopFlag::new();
        let flag = stop.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(flag))?;
        Ok(Worker {
            stop,
            handle: Some(handle),
        })
    }

    /// Trips the stop flag and detaches without joining.
    pub fn terminate(mut self) {
        self.stop.set();
        if let Some(handle) = self.handle.take() {
            log::debug!("terminating worker {:?}", handle.thread().name());
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop.set();
    }
}
