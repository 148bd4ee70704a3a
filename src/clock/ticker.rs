//! Frame ticker: dedicated thread generating paced tick events.
//!
//! This is the crate's stand-in for a display-refresh callback. A named
//! thread wakes at a fixed interval and, when a tick request is armed,
//! delivers a single [`Tick`] on a bounded channel. Delivery disarms the
//! request, so at most one tick is ever in flight per
//! [`schedule`](TickScheduler::schedule) call; the engine re-arms from inside
//! its tick handler for as long as it keeps draining.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::scheduler::{TickHandle, TickScheduler};

/// A tick event delivered for an armed request.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number (monotonically increasing over the ticker's lifetime).
    pub frame: u64,
    /// Time elapsed since the ticker was started.
    ///
    /// Pass this to [`Typewriter::tick`](crate::Typewriter::tick) as the
    /// tick timestamp.
    pub elapsed: Duration,
}

/// Thread-backed fixed-interval tick source.
///
/// Use it with `select!` in a driving loop:
///
/// ```ignore
/// let ticks = ticker.receiver().clone();
/// loop {
///     select! {
///         recv(commands) -> cmd => handle_command(cmd),
///         recv(ticks) -> tick => if let Ok(tick) = tick {
///             typewriter.tick(tick.elapsed);
///         }
///     }
/// }
/// ```
pub struct FrameTicker {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Raw id of the armed request; 0 when disarmed.
    armed: Arc<AtomicU64>,
    /// Id for the next handle this ticker hands out.
    next_id: u64,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
}

impl FrameTicker {
    /// Spawn a ticker waking every `interval` (e.g. 16ms for ~60 FPS).
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let armed = Arc::new(AtomicU64::new(0));
        let armed_clone = armed.clone();

        // Bounded channel with a small buffer - ticks must not queue up.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("teletype-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, &armed_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            armed,
            next_id: 0,
            tick_rx,
        }
    }

    /// Get a reference to the tick receiver.
    ///
    /// The receiver is cheap to clone, so a driving loop can keep its own
    /// copy while the ticker itself is moved into a
    /// [`Typewriter`](crate::Typewriter) as its scheduler.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(
        tick_tx: &Sender<Tick>,
        shutdown: &Arc<AtomicBool>,
        armed: &Arc<AtomicU64>,
        interval: Duration,
    ) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                // Deliver only while a request is armed; delivery disarms it.
                if armed.swap(0, Ordering::AcqRel) != 0 {
                    let tick = Tick {
                        frame,
                        elapsed: now - start,
                    };

                    // Non-blocking send - if the buffer is full, skip this
                    // tick (receiver is too slow, prevent queue buildup).
                    let _ = tick_tx.try_send(tick);
                }

                frame += 1;
                next_tick += interval;

                // Handle case where we're behind (catch up without queuing).
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                // Sleep until the next wake, in small slices so shutdown and
                // newly armed requests are noticed promptly.
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }
    }
}

impl TickScheduler for FrameTicker {
    fn schedule(&mut self) -> TickHandle {
        self.next_id += 1;
        self.armed.store(self.next_id, Ordering::Release);
        TickHandle::from_raw(self.next_id)
    }

    fn cancel(&mut self, handle: TickHandle) {
        // Only the matching request is withdrawn; a newer one stays armed.
        let _ = self.armed.compare_exchange(
            handle.raw(),
            0,
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
