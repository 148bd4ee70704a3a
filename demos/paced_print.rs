//! Paced print: the smallest useful teletype setup.
//!
//! Pushes a sample markdown response into a typist actor in a few chunks,
//! then prints the paced output to stdout until the drain finishes.

use std::io::{self, Write};
use std::time::Duration;
use teletype::{PacingConfig, TypistActor, TypistEvent, TypewriterState};

/// Sample text to type out (simulating an LLM response).
const SAMPLE_TEXT: &str = r"Here is what makes paced output pleasant to read:

## Pacing

- A base rate in characters per second, converted per tick
- A per-tick cap so no single frame dumps a slab of text
- A structural boost so headings and list items snap into view

Push as much as you like, whenever you like; the engine re-emits it
at reading speed and tells you when it is done.
";

fn main() -> io::Result<()> {
    let actor = TypistActor::spawn(
        PacingConfig {
            chars_per_second: 220,
            ..PacingConfig::default()
        },
        Duration::from_millis(16),
    );

    // Hand the text over in uneven chunks, the way a stream would arrive.
    let chars: Vec<char> = SAMPLE_TEXT.chars().collect();
    for chunk in chars.chunks(97) {
        actor.push(chunk.iter().collect::<String>());
    }

    let mut stdout = io::stdout();
    loop {
        match actor.events().recv_timeout(Duration::from_secs(5)) {
            Ok(TypistEvent::Output(delta)) => {
                write!(stdout, "{delta}")?;
                stdout.flush()?;
            }
            Ok(TypistEvent::StateChanged(TypewriterState::Done)) => break,
            Ok(TypistEvent::StateChanged(_)) => {}
            Err(_) => break,
        }
    }

    actor.join();
    Ok(())
}
