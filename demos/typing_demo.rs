//! Typing demo: interactive paced streaming with keyboard control.
//!
//! A producer thread feeds a sample response into the typist in uneven
//! chunks (simulating a token stream) while the main thread prints paced
//! output and handles keyboard commands.
//!
//! Keys: space pause/resume | f flush | s stop | r reset | +/- speed | q quit.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use teletype::{PacingConfig, TypistActor, TypistEvent, TypewriterState};

/// Sample text to stream (simulating an LLM response).
const SAMPLE_TEXT: &str = r"I'd be happy to explain how the teletype engine paces its output!

## The Drain Loop

Every frame the engine receives a tick with a timestamp and converts
the elapsed time into a character budget:

1. Base budget: chars-per-second times elapsed seconds, floored
2. Structural boost: headings, list items and line breaks snap in faster
3. Per-tick cap: no single frame ever dumps a slab of text

## Lifecycle

Pause keeps the queue and suspends the schedule. Stop is a dead-end:
the engine refuses to run again until you reset it. Flush empties the
whole queue in one piece when you are done waiting.

Try the keys now - pause this stream, speed it up, flush the rest.
";

fn main() -> io::Result<()> {
    println!("Teletype Typing Demo");
    println!("====================");
    println!("space: pause/resume | f: flush | s: stop | r: reset | +/-: speed | q: quit\n");

    let actor = Arc::new(TypistActor::spawn(
        PacingConfig::default(),
        Duration::from_millis(16),
    ));

    // Producer: hand the sample over in uneven chunks at stream-like pace.
    let _producer = {
        let actor = Arc::clone(&actor);
        std::thread::spawn(move || {
            let chars: Vec<char> = SAMPLE_TEXT.chars().collect();
            let mut index = 0;
            while index < chars.len() {
                let size = (index * 7) % 29 + 3; // pseudo-random 3-31 chars
                let end = (index + size).min(chars.len());
                actor.push(chars[index..end].iter().collect::<String>());
                index = end;
                std::thread::sleep(Duration::from_millis(30));
            }
        })
    };

    terminal::enable_raw_mode()?;
    let result = run(&actor);
    terminal::disable_raw_mode()?;
    println!();
    result
}

/// Event loop: keyboard commands in, paced output out.
fn run(actor: &TypistActor) -> io::Result<()> {
    let mut stdout = io::stdout();
    let mut paused = false;
    let mut speed: u32 = 60;

    loop {
        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') => {
                        if paused {
                            actor.resume();
                        } else {
                            actor.pause();
                        }
                        paused = !paused;
                    }
                    KeyCode::Char('f') => actor.flush(),
                    KeyCode::Char('s') => actor.stop(),
                    KeyCode::Char('r') => {
                        actor.reset();
                        paused = false;
                    }
                    KeyCode::Char('+') => {
                        speed = (speed + 20).min(400);
                        actor.set_speed(speed);
                    }
                    KeyCode::Char('-') => {
                        speed = speed.saturating_sub(20).max(10);
                        actor.set_speed(speed);
                    }
                    _ => {}
                }
            }
        }

        while let Ok(event) = actor.events().try_recv() {
            match event {
                TypistEvent::Output(delta) => {
                    // Raw mode: newline alone does not return the carriage.
                    write!(stdout, "{}", delta.replace('\n', "\r\n"))?;
                    stdout.flush()?;
                }
                TypistEvent::StateChanged(TypewriterState::Stopped) => {
                    write!(stdout, "\r\n[stopped - press r to reset, q to quit]\r\n")?;
                    stdout.flush()?;
                }
                TypistEvent::StateChanged(TypewriterState::Done) => {
                    write!(stdout, "\r\n[done - q to quit]\r\n")?;
                    stdout.flush()?;
                }
                TypistEvent::StateChanged(_) => {}
            }
        }
    }
}
