//! Time-based scalar animation with interruption.
//!
//! Values are evaluated lazily from an `Instant`; nothing ticks. Starting a new
//! animation replaces any step that has not started yet and begins from
//! whatever value the running schedule reaches at the new start time.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    fn end(&self) -> Instant {
        self.start + self.duration
    }

    fn value_at(&self, now: Instant) -> f32 {
        if now <= self.start {
            return self.from;
        }
        if self.duration.is_zero() || now >= self.end() {
            return self.to;
        }
        let t = now.duration_since(self.start).as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

/// An animatable scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue {
    rest: f32,
    active: Option<Tween>,
    /// A step scheduled to start later (second half of a sequence)
    queued: Option<Tween>,
}

impl AnimatedValue {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            rest: value,
            active: None,
            queued: None,
        }
    }

    #[must_use]
    pub fn value_at(&self, now: Instant) -> f32 {
        if let Some(queued) = &self.queued
            && now >= queued.start
        {
            return queued.value_at(now);
        }
        self.active.as_ref().map_or(self.rest, |t| t.value_at(now))
    }

    /// Animate toward `target`, starting at `start` (which may be in the future).
    ///
    /// Until `start`, the value keeps following whatever was already running.
    pub fn animate_to(
        &mut self,
        target: f32,
        duration: Duration,
        easing: Easing,
        start: Instant,
        now: Instant,
    ) {
        if let Some(queued) = self.queued.take()
            && now >= queued.start
        {
            self.active = Some(queued);
        }

        let from = self.value_at(start);
        let tween = Tween {
            from,
            to: target,
            start,
            duration,
            easing,
        };

        if start <= now {
            self.active = Some(tween);
        } else {
            self.queued = Some(tween);
        }
    }

    /// Jump to `value` with no animation.
    pub fn snap(&mut self, value: f32) {
        self.rest = value;
        self.active = None;
        self.queued = None;
    }

    /// When the current schedule finishes, if it has anything scheduled at all.
    #[must_use]
    pub fn settles_at(&self) -> Option<Instant> {
        self.queued
            .as_ref()
            .or(self.active.as_ref())
            .map(Tween::end)
    }

    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.settles_at().is_some_and(|end| end > now)
    }
}
