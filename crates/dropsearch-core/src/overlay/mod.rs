//! Overlay state machine.
//!
//! Two states, `Closed` and `Open`. Focus opens, the cancel control closes;
//! every other event is ignored. Each transition flips the state at once and
//! retargets three animated scalars: the results surface height and the
//! cancel control's width and opacity. The cancel pair runs as a sequence
//! (width then opacity when opening, opacity then width when closing).

mod animation;

pub use animation::{AnimatedValue, Easing};

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// Where a transition is in its animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Opening,
    Open,
    Closing,
    Closed,
}

/// When the host should treat a transition as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitPolicy {
    /// The overlay counts as open (or closed) the moment the transition starts
    #[default]
    Immediate,
    /// The overlay counts as open only once expanded, and stays mounted until collapsed
    OnSettle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed,
}

/// Geometry and timing of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMetrics {
    pub surface_duration: Duration,
    pub cancel_step_duration: Duration,
    /// Revealed width of the cancel control
    pub cancel_width: f32,
    /// Fixed height of the input bar, subtracted from the available extent
    pub input_bar_height: f32,
    pub easing: Easing,
    pub commit: CommitPolicy,
}

impl Default for OverlayMetrics {
    fn default() -> Self {
        Self {
            surface_duration: Duration::from_millis(500),
            cancel_step_duration: Duration::from_millis(200),
            cancel_width: 63.0,
            input_bar_height: 30.0,
            easing: Easing::default(),
            commit: CommitPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Overlay {
    state: OverlayState,
    metrics: OverlayMetrics,
    available_extent: f32,
    cancel_extent: AnimatedValue,
    cancel_opacity: AnimatedValue,
    surface_extent: AnimatedValue,
}

impl Overlay {
    /// A collapsed, closed overlay. `available_extent` is the full vertical
    /// space the widget may grow into.
    #[must_use]
    pub fn new(metrics: OverlayMetrics, available_extent: f32) -> Self {
        Self {
            state: OverlayState::Closed,
            metrics,
            available_extent,
            cancel_extent: AnimatedValue::new(0.0),
            cancel_opacity: AnimatedValue::new(0.0),
            surface_extent: AnimatedValue::new(0.0),
        }
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[must_use]
    pub fn metrics(&self) -> &OverlayMetrics {
        &self.metrics
    }

    /// Surface height when fully open.
    #[must_use]
    pub fn open_extent(&self) -> f32 {
        (self.available_extent - self.metrics.input_bar_height).max(0.0)
    }

    /// Input gained focus. Opens a closed overlay.
    pub fn focus_gained(&mut self, now: Instant) -> Option<Transition> {
        if self.state == OverlayState::Open {
            return None;
        }
        self.state = OverlayState::Open;

        let open_extent = self.open_extent();
        let OverlayMetrics {
            surface_duration,
            cancel_step_duration: step,
            cancel_width,
            easing,
            ..
        } = self.metrics;

        self.surface_extent
            .animate_to(open_extent, surface_duration, easing, now, now);
        self.cancel_extent
            .animate_to(cancel_width, step, easing, now, now);
        self.cancel_opacity
            .animate_to(1.0, step, easing, now + step, now);

        debug!("Overlay opened, surface target {open_extent}");
        Some(Transition::Opened)
    }

    /// Cancel control activated. Closes an open overlay.
    pub fn cancel(&mut self, now: Instant) -> Option<Transition> {
        if self.state == OverlayState::Closed {
            return None;
        }
        self.state = OverlayState::Closed;

        let OverlayMetrics {
            surface_duration,
            cancel_step_duration: step,
            easing,
            ..
        } = self.metrics;

        self.surface_extent
            .animate_to(0.0, surface_duration, easing, now, now);
        self.cancel_opacity.animate_to(0.0, step, easing, now, now);
        self.cancel_extent
            .animate_to(0.0, step, easing, now + step, now);

        debug!("Overlay closed");
        Some(Transition::Closed)
    }

    /// The host's available extent changed. An open surface follows it at once.
    pub fn resize(&mut self, available_extent: f32) {
        self.available_extent = available_extent;
        if self.state == OverlayState::Open {
            self.surface_extent.snap(self.open_extent());
        }
    }

    #[must_use]
    pub fn cancel_extent(&self, now: Instant) -> f32 {
        self.cancel_extent.value_at(now)
    }

    #[must_use]
    pub fn cancel_opacity(&self, now: Instant) -> f32 {
        self.cancel_opacity.value_at(now)
    }

    #[must_use]
    pub fn surface_extent(&self, now: Instant) -> f32 {
        self.surface_extent.value_at(now)
    }

    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.surface_extent.is_animating(now)
            || self.cancel_extent.is_animating(now)
            || self.cancel_opacity.is_animating(now)
    }

    #[must_use]
    pub fn phase(&self, now: Instant) -> Phase {
        match (self.state, self.is_animating(now)) {
            (OverlayState::Open, true) => Phase::Opening,
            (OverlayState::Open, false) => Phase::Open,
            (OverlayState::Closed, true) => Phase::Closing,
            (OverlayState::Closed, false) => Phase::Closed,
        }
    }

    /// Whether the results surface is mounted, per the commit policy.
    #[must_use]
    pub fn is_open(&self, now: Instant) -> bool {
        match self.metrics.commit {
            CommitPolicy::Immediate => self.state == OverlayState::Open,
            CommitPolicy::OnSettle => matches!(self.phase(now), Phase::Open | Phase::Closing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn linear() -> OverlayMetrics {
        OverlayMetrics {
            easing: Easing::Linear,
            ..OverlayMetrics::default()
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_initial_state_collapsed() {
        let t0 = Instant::now();
        let overlay = Overlay::new(OverlayMetrics::default(), 800.0);

        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(!overlay.is_open(t0));
        assert!(approx(overlay.surface_extent(t0), 0.0));
        assert!(approx(overlay.cancel_extent(t0), 0.0));
        assert!(approx(overlay.cancel_opacity(t0), 0.0));
        assert_eq!(overlay.phase(t0), Phase::Closed);
    }

    #[test]
    fn test_focus_opens_immediately() {
        let t0 = Instant::now();
        let mut overlay = Overlay::new(linear(), 800.0);

        assert_eq!(overlay.focus_gained(t0), Some(Transition::Opened));
        assert_eq!(overlay.state(), OverlayState::Open);
        assert!(overlay.is_open(t0));
        assert_eq!(overlay.phase(t0), Phase::Opening);
    }

    #[test]
    fn test_open_animation_schedule() {
        let t0 = Instant::now();
        let mut overlay = Overlay::new(linear(), 830.0);
        overlay.focus_gained(t0);

        // Surface: 0 -> 800 over 500ms
        assert!(approx(overlay.surface_extent(t0 + 250 * MS), 400.0));
        assert!(approx(overlay.surface_extent(t0 + 500 * MS), 800.0));

        // Cancel width first, then opacity
        assert!(approx(overlay.cancel_extent(t0 + 100 * MS), 31.5));
        assert!(approx(overlay.cancel_opacity(t0 + 100 * MS), 0.0));
        assert!(approx(overlay.cancel_extent(t0 + 200 * MS), 63.0));
        assert!(approx(overlay.cancel_opacity(t0 + 300 * MS), 0.5));
        assert!(approx(overlay.cancel_opacity(t0 + 400 * MS), 1.0));

        assert!(overlay.is_animating(t0 + 499 * MS));
        assert!(!overlay.is_animating(t0 + 500 * MS));
        assert_eq!(overlay.phase(t0 + 500 * MS), Phase::Open);
    }

    #[test]
    fn test_cancel_animation_schedule() {
        let t0 = Instant::now();
        let mut overlay = Overlay::new(linear(), 830.0);
        overlay.focus_gained(t0);

        let t1 = t0 + 1000 * MS;
        assert_eq!(overlay.cancel(t1), Some(Transition::Closed));
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(!overlay.is_open(t1));

        // Opacity first, then width
        assert!(approx(overlay.cancel_opacity(t1 + 100 * MS), 0.5));
        assert!(approx(overlay.cancel_extent(t1 + 100 * MS), 63.0));
        assert!(approx(overlay.cancel_opacity(t1 + 200 * MS), 0.0));
        assert!(approx(overlay.cancel_extent(t1 + 300 * MS), 31.5));
        assert!(approx(overlay.cancel_extent(t1 + 400 * MS), 0.0));

        assert!(approx(overlay.surface_extent(t1 + 250 * MS), 400.0));
        assert!(approx(overlay.surface_extent(t1 + 500 * MS), 0.0));
    }

    #[test]
    fn test_other_events_ignored() {
        let t0 = Instant::now();
        let mut overlay = Overlay::new(linear(), 800.0);

        assert_eq!(overlay.cancel(t0), None);
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(!overlay.is_animating(t0));

        overlay.focus_gained(t0);
        assert_eq!(overlay.focus_gained(t0 + 10 * MS), None);
    }

    #[test]
    fn test_cancel_mid_open_reverses_from_current_value() {
        let t0 = Instant::now();
        let mut overlay = Overlay::new(linear(), 830.0);
        overlay.focus_gained(t0);

        let t1 = t0 + 150 * MS;
        overlay.cancel(t1);

        assert!(approx(overlay.surface_extent(t1), 240.0));
        assert!(overlay.surface_extent(t1 + 100 * MS) < 240.0);
        // Opacity step had not started yet, so it stays at zero
        assert!(approx(overlay.cancel_opacity(t1 + 100 * MS), 0.0));
        // Width finishes revealing before its own collapse step begins
        assert!(approx(overlay.cancel_extent(t1 + 50 * MS), 63.0));
        assert!(approx(overlay.cancel_extent(t1 + 400 * MS), 0.0));
    }

    #[test]
    fn test_on_settle_commit_policy() {
        let t0 = Instant::now();
        let metrics = OverlayMetrics {
            commit: CommitPolicy::OnSettle,
            ..linear()
        };
        let mut overlay = Overlay::new(metrics, 830.0);

        overlay.focus_gained(t0);
        assert!(!overlay.is_open(t0 + 100 * MS));
        assert!(overlay.is_open(t0 + 500 * MS));

        let t1 = t0 + 600 * MS;
        overlay.cancel(t1);
        assert!(overlay.is_open(t1 + 100 * MS));
        assert!(!overlay.is_open(t1 + 500 * MS));
    }

    #[test]
    fn test_resize_open_surface_snaps() {
        let t0 = Instant::now();
        let mut overlay = Overlay::new(linear(), 830.0);
        overlay.focus_gained(t0);

        overlay.resize(430.0);
        assert!(approx(overlay.surface_extent(t0 + 10 * MS), 400.0));

        overlay.cancel(t0 + 20 * MS);
        overlay.resize(1000.0);
        assert!(approx(overlay.surface_extent(t0 + 2000 * MS), 0.0));
    }

    #[test]
    fn test_open_extent_never_negative() {
        let overlay = Overlay::new(OverlayMetrics::default(), 10.0);
        assert!(approx(overlay.open_extent(), 0.0));
    }
}
