//! HUD state snapshot.
//!
//! The HUD layer is a pure consumer: once per frame the session hands it
//! this snapshot and it draws text from it. Nothing flows back into the
//! controller or monitor.

use serde::{Deserialize, Serialize};

/// Everything the HUD needs for one frame.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HudState {
    /// Frames rendered during the last full second.
    pub fps: u32,
    /// Level has been won.
    pub won: bool,
    /// Level has been lost.
    pub lost: bool,
    /// Seconds left on the level clock.
    pub time_remaining: f64,
}

impl HudState {
    /// The end-of-level banner, if any.
    pub fn message(&self) -> Option<&'static str> {
        if self.won {
            Some("yay, you won!")
        } else if self.lost {
            Some("you failed :(")
        } else {
            None
        }
    }

    /// Countdown text in `minutes:seconds.tenths` form.
    pub fn time_display(&self) -> String {
        let mins = (self.time_remaining / 60.0) as u32;
        let secs = (self.time_remaining as u32) % 60;
        let tenths = ((self.time_remaining - f64::from(mins * 60 + secs)) * 10.0) as u32;
        format!("Time left: {}:{}.{}", mins, secs, tenths)
    }
}
