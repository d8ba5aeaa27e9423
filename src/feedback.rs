//! Sound and haptic feedback triggers
//!
//! The engine decides *when* feedback happens; playback belongs to the
//! presentation layer behind [`FeedbackSink`]. Triggers respect the player's
//! [`Settings`].

use std::io::Write;

use crate::consts::REJECT_BUZZ_MS;
use crate::session::GameEvent;
use crate::settings::Settings;
use crate::sim::Rejection;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player hopped to a new tile
    Move,
    /// Answer rejected
    Snap,
}

/// Haptic patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Buzz { millis: u32 },
}

/// Playback backend supplied by the presentation layer
pub trait FeedbackSink {
    fn play(&mut self, effect: SoundEffect);
    fn vibrate(&mut self, haptic: Haptic);
}

/// Feedback an event calls for, before settings are applied
pub fn triggers(event: &GameEvent) -> (Option<SoundEffect>, Option<Haptic>) {
    match event {
        GameEvent::Moved { .. } => (Some(SoundEffect::Move), None),
        GameEvent::Rejected(Rejection::NoMatch | Rejection::InvalidInput) => (
            Some(SoundEffect::Snap),
            Some(Haptic::Buzz {
                millis: REJECT_BUZZ_MS,
            }),
        ),
        _ => (None, None),
    }
}

/// Forward the feedback for `event` to `sink`, honoring the toggles
pub fn dispatch(settings: &Settings, event: &GameEvent, sink: &mut impl FeedbackSink) {
    let (sound, haptic) = triggers(event);
    if let Some(effect) = sound.filter(|_| settings.enable_sfx) {
        sink.play(effect);
    }
    if let Some(haptic) = haptic.filter(|_| settings.enable_haptics) {
        sink.vibrate(haptic);
    }
}

/// Terminal backend: rings the bell for rejections, logs everything
#[derive(Debug)]
pub struct TerminalFeedback<W: Write> {
    out: W,
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FeedbackSink for TerminalFeedback<W> {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("Playing {effect:?}");
        if effect == SoundEffect::Snap {
            // Best effort, a closed terminal must not end the game
            let _ = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
        }
    }

    fn vibrate(&mut self, haptic: Haptic) {
        // Terminals have no haptics
        log::debug!("Haptic {haptic:?}");
    }
}
