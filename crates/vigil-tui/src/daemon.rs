use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

/// A panel's background work, polling something on its own thread.
///
/// Daemons never touch the display. They update state the panel shares with
/// them and the next redraw picks it up.
pub trait Daemon: Send + Sync {
    fn name(&self) -> &str;

    /// Begins the polling loop. Starting twice is a no-op.
    fn start(&self) -> Result<()>;

    /// Suspends polling without ending the loop.
    fn pause(&self);

    fn resume(&self);

    /// Asks the loop to end. The loop notices on its next iteration; a poll
    /// already running is never interrupted.
    fn stop(&self);

    /// Blocks until the loop has exited. Returns at once if it never started.
    fn join(&self);
}

/// A unit of background work run by a [`PollLoop`].
pub trait Poll: Send + 'static {
    fn poll(&mut self) -> anyhow::Result<()>;
}

impl<F> Poll for F
where
    F: FnMut() -> anyhow::Result<()> + Send + 'static,
{
    fn poll(&mut self) -> anyhow::Result<()> {
        self()
    }
}

#[derive(Debug, Default)]
struct LoopState {
    paused: bool,
    stopped: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<LoopState>,
    wake: Condvar,
}

/// Standard [`Daemon`]: a named thread calling its task once per interval.
pub struct PollLoop {
    name: String,
    interval: Duration,
    shared: Arc<Shared>,
    task: Mutex<Option<Box<dyn Poll>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PollLoop {
    pub fn new(name: impl Into<String>, interval: Duration, task: impl Poll) -> Self {
        Self {
            name: name.into(),
            interval,
            shared: Arc::new(Shared::default()),
            task: Mutex::new(Some(Box::new(task))),
            handle: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.state.lock().stopped
    }
}

impl Daemon for PollLoop {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self) -> Result<()> {
        let Some(task) = self.task.lock().take() else {
            debug!(daemon = %self.name, "already started");
            return Ok(());
        };

        let shared = Arc::clone(&self.shared);
        let name = self.name.clone();
        let interval = self.interval;

        let handle = std::thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || run_loop(&name, &shared, interval, task))?;

        *self.handle.lock() = Some(handle);
        debug!(daemon = %self.name, ?interval, "started");
        Ok(())
    }

    fn pause(&self) {
        self.shared.state.lock().paused = true;
    }

    fn resume(&self) {
        self.shared.state.lock().paused = false;
        self.shared.wake.notify_all();
    }

    fn stop(&self) {
        self.shared.state.lock().stopped = true;
        self.shared.wake.notify_all();
    }

    fn join(&self) {
        let handle = self.handle.lock().take();

        if let Some(handle) = handle
            && handle.join().is_err()
        {
            warn!(daemon = %self.name, "polling thread panicked");
        }
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        // detached threads end on their own once they see the flag
        self.stop();
    }
}

fn run_loop(name: &str, shared: &Shared, interval: Duration, mut task: Box<dyn Poll>) {
    let mut state = shared.state.lock();

    while !state.stopped {
        if !state.paused {
            let result = MutexGuard::unlocked(&mut state, || task.poll());

            if let Err(err) = result {
                warn!(daemon = %name, error = %err, "poll failed");
            }

            if state.stopped {
                break;
            }
        }

        shared.wake.wait_for(&mut state, interval);
    }

    debug!(daemon = %name, "stopped");
}
