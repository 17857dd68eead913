//! Session clock with a time scale, so menus can freeze play.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::numbers::secs_to_duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionClock {
    elapsed_secs: f64,
    time_scale: f64,
    /// Scale to restore on resume.
    resume_scale: f64,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self {
            elapsed_secs: 0.0,
            time_scale: 1.0,
            resume_scale: 1.0,
        }
    }
}

impl SessionClock {
    /// Seconds of play time accumulated so far.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        secs_to_duration(self.elapsed_secs)
    }

    #[must_use]
    pub const fn time_scale(&self) -> f64 {
        self.time_scale
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.time_scale == 0.0
    }

    /// Accumulate one frame of real time; returns the new `now`.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        if real_dt.is_finite() && real_dt > 0.0 {
            self.elapsed_secs += real_dt * self.time_scale;
        }
        self.elapsed_secs
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        let scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
        if scale > 0.0 {
            self.resume_scale = scale;
        }
        self.time_scale = scale;
    }

    pub fn pause(&mut self) {
        if !self.is_paused() {
            self.resume_scale = self.time_scale;
            self.time_scale = 0.0;
        }
    }

    pub fn resume(&mut self) {
        self.time_scale = self.resume_scale;
    }
}
