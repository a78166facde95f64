//! Terminal sound output.

use std::io::{self, Write};

use pomo_core::error::Result;
use pomo_core::ports::{SoundCue, SoundPlayer};

/// Rings the terminal bell on stderr.
///
/// A terminal has one tone, so cues differ only in how many times the bell
/// rings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl TerminalBell {
    /// The bell sequence for a cue.
    pub fn sequence(cue: SoundCue) -> &'static str {
        match cue {
            SoundCue::Start | SoundCue::Reset => "\x07",
            SoundCue::Break => "\x07\x07",
        }
    }
}

impl SoundPlayer for TerminalBell {
    fn play(&self, cue: SoundCue) -> Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(Self::sequence(cue).as_bytes())?;
        stderr.flush()?;
        Ok(())
    }
}
