//! Typist actor: a typewriter running on its own thread.
//!
//! The engine core is strictly single-threaded; this actor gives it a
//! realtime home. It owns a [`Typewriter`] driven by a [`FrameTicker`] and
//! serializes everything - commands from other threads and ticks from the
//! ticker - onto one loop, so the engine's no-locking model holds by
//! construction. Output and state changes flow back out as [`TypistEvent`]s.

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::messages::{TypistCommand, TypistEvent};
use crate::clock::FrameTicker;
use crate::engine::{PacingConfig, Typewriter};

/// Handle to a typewriter running on a dedicated thread.
///
/// Dropping the handle (or calling [`join`](Self::join)) shuts the thread
/// down; the engine, its ticker, and any queued text go with it.
pub struct TypistActor {
    /// Handle to the typist thread.
    handle: Option<JoinHandle<()>>,
    /// Command sender.
    cmd_tx: Sender<TypistCommand>,
    /// Receiver for output and state events.
    event_rx: Receiver<TypistEvent>,
}

impl TypistActor {
    /// Spawn a typist with the given pacing, ticking every `frame_interval`
    /// (e.g. 16ms for ~60 FPS).
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the typist thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(pacing: PacingConfig, frame_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = unbounded::<TypistCommand>();
        let (event_tx, event_rx) = unbounded::<TypistEvent>();

        let handle = thread::Builder::new()
            .name("teletype-typist".to_string())
            .spawn(move || {
                run_loop(pacing, frame_interval, &cmd_rx, &event_tx);
            })
            .expect("Failed to spawn typist thread");

        Self {
            handle: Some(handle),
            cmd_tx,
            event_rx,
        }
    }

    /// Get a reference to the event receiver.
    ///
    /// Use this with `select!` alongside input events in a driving loop.
    #[inline]
    pub const fn events(&self) -> &Receiver<TypistEvent> {
        &self.event_rx
    }

    /// Send a raw command to the typist thread.
    pub fn send(&self, command: TypistCommand) {
        let _ = self.cmd_tx.send(command);
    }

    /// Append text to the queue (auto-starts from `Idle`/`Done`).
    pub fn push(&self, text: impl Into<String>) {
        self.send(TypistCommand::Push(text.into()));
    }

    /// Begin draining.
    pub fn start(&self) {
        self.send(TypistCommand::Start);
    }

    /// Suspend draining, keeping the queue.
    pub fn pause(&self) {
        self.send(TypistCommand::Pause);
    }

    /// Continue a paused drain.
    pub fn resume(&self) {
        self.send(TypistCommand::Resume);
    }

    /// Emit the entire remaining queue at once.
    pub fn flush(&self) {
        self.send(TypistCommand::Flush);
    }

    /// Halt output until a [`reset`](Self::reset).
    pub fn stop(&self) {
        self.send(TypistCommand::Stop);
    }

    /// Clear the queue and return to `Idle`.
    pub fn reset(&self) {
        self.send(TypistCommand::Reset);
    }

    /// Change the base emission rate (characters per second).
    pub fn set_speed(&self, chars_per_second: u32) {
        self.send(TypistCommand::SetSpeed(chars_per_second));
    }

    /// Shut down and wait for the typist thread to finish.
    pub fn join(mut self) {
        let _ = self.cmd_tx.send(TypistCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TypistActor {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(TypistCommand::Shutdown);
    }
}

/// Main typist loop: one engine, one ticker, one thread.
fn run_loop(
    pacing: PacingConfig,
    frame_interval: Duration,
    cmd_rx: &Receiver<TypistCommand>,
    event_tx: &Sender<TypistEvent>,
) {
    let ticker = FrameTicker::spawn(frame_interval);
    let ticks = ticker.receiver().clone();

    let out_tx = event_tx.clone();
    let state_tx = event_tx.clone();
    let mut typewriter = Typewriter::with_config(pacing, ticker, move |delta: &str| {
        let _ = out_tx.send(TypistEvent::Output(delta.to_string()));
    })
    .on_state_change(move |state| {
        let _ = state_tx.send(TypistEvent::StateChanged(state));
    });

    loop {
        select! {
            recv(cmd_rx) -> cmd => match cmd {
                Ok(TypistCommand::Push(text)) => typewriter.push(&text),
                Ok(TypistCommand::Start) => typewriter.start(),
                Ok(TypistCommand::Pause) => typewriter.pause(),
                Ok(TypistCommand::Resume) => typewriter.resume(),
                Ok(TypistCommand::Flush) => typewriter.flush(),
                Ok(TypistCommand::Stop) => typewriter.stop(),
                Ok(TypistCommand::Reset) => typewriter.reset(),
                Ok(TypistCommand::SetSpeed(cps)) => typewriter.set_speed(cps),
                // All senders gone means the handle was dropped.
                Ok(TypistCommand::Shutdown) | Err(_) => break,
            },
            recv(ticks) -> tick => if let Ok(tick) = tick {
                typewriter.tick(tick.elapsed);
            },
        }
    }
}
