//! Timed animations driving view transitions.
//!
//! An animation is plain data advanced once per tick — no threads, no
//! captured closures. The owner applies the effect from the eased progress
//! value and interprets the finish payload after completion. Cancellation
//! is dropping the record (the payload never fires); fast-forward is
//! advancing by a computed amount before the first real tick.

use glam::Vec2;

/// Standard easing functions. Input `t` is clamped to `[0, 1]`.
pub mod easing {
    /// Linear (no acceleration).
    pub fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Cubic ease-out (fast start, slow end) — camera slides.
    pub fn ease_out_cubic(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0) - 1.0;
        t * t * t + 1.0
    }
}

/// What an animation drives. Interpretation lives with the owner; the
/// animation itself only produces a progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Full-screen opacity ramp 0→1 over progress.
    Fade,
    /// Camera translation interpolates between two points.
    MoveCamera { from: Vec2, to: Vec2 },
    /// Camera moves while opacity rises (launch handoff leg) or falls
    /// (return leg).
    LaunchZoom { from: Vec2, to: Vec2, fade_in: bool },
}

/// One slot-sized animation record.
#[derive(Clone, Debug)]
pub struct TimedAnimation<A> {
    pub effect: Effect,
    duration_ms: i32,
    delay_ms: i32,
    elapsed_ms: i32,
    reverse: bool,
    easing: fn(f32) -> f32,
    on_finish: Option<A>,
}

impl<A> TimedAnimation<A> {
    pub fn new(effect: Effect, duration_ms: i32) -> Self {
        Self {
            effect,
            duration_ms: duration_ms.max(0),
            delay_ms: 0,
            elapsed_ms: 0,
            reverse: false,
            easing: easing::linear,
            on_finish: None,
        }
    }

    /// Hold at zero progress for `ms` before the ramp starts.
    pub fn with_delay(mut self, ms: i32) -> Self {
        self.delay_ms = ms.max(0);
        self
    }

    /// Play the ramp backwards (progress runs 1→0).
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_easing(mut self, easing: fn(f32) -> f32) -> Self {
        self.easing = easing;
        self
    }

    /// Payload handed back exactly once when the animation completes.
    pub fn then(mut self, payload: A) -> Self {
        self.on_finish = Some(payload);
        self
    }

    /// Advance by `dt_ms`. Returns true once the total time (delay plus
    /// duration) has been consumed.
    pub fn advance(&mut self, dt_ms: i32) -> bool {
        let total = self.delay_ms + self.duration_ms;
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0)).min(total);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.delay_ms + self.duration_ms
    }

    /// Milliseconds left until completion, delay included.
    pub fn remaining_ms(&self) -> i32 {
        self.delay_ms + self.duration_ms - self.elapsed_ms
    }

    /// Eased progress in `[0, 1]`; holds at the start value through the
    /// delay, runs 1→0 when reversed.
    pub fn progress(&self) -> f32 {
        let ramp_ms = (self.elapsed_ms - self.delay_ms).clamp(0, self.duration_ms);
        let t = if self.duration_ms > 0 {
            ramp_ms as f32 / self.duration_ms as f32
        } else {
            1.0
        };
        let eased = (self.easing)(t);
        if self.reverse { 1.0 - eased } else { eased }
    }

    /// The finish payload, if any. Call after completion; the payload is
    /// only yielded once.
    pub fn take_finish(&mut self) -> Option<A> {
        self.on_finish.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_progress_tracks_elapsed_time() {
        let mut anim: TimedAnimation<()> = TimedAnimation::new(Effect::Fade, 100);
        assert_eq!(anim.progress(), 0.0);
        anim.advance(25);
        assert!((anim.progress() - 0.25).abs() < 1e-6);
        anim.advance(75);
        assert!(anim.is_finished());
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn delay_holds_progress_at_start() {
        let mut anim: TimedAnimation<()> = TimedAnimation::new(Effect::Fade, 100).with_delay(50);
        anim.advance(50);
        assert_eq!(anim.progress(), 0.0);
        assert!(!anim.is_finished());
        anim.advance(100);
        assert!(anim.is_finished());
    }

    #[test]
    fn reversed_runs_one_to_zero() {
        let mut anim: TimedAnimation<()> =
            TimedAnimation::new(Effect::Fade, 100).reversed().with_delay(40);
        // Held at 1.0 through the delay — a fade-out stays opaque while
        // it waits.
        anim.advance(40);
        assert_eq!(anim.progress(), 1.0);
        anim.advance(50);
        assert!((anim.progress() - 0.5).abs() < 1e-6);
        anim.advance(50);
        assert_eq!(anim.progress(), 0.0);
    }

    #[test]
    fn fast_forward_leaves_the_remainder() {
        // Advancing by p × duration before the first tick must leave
        // exactly (1 - p) × duration — resuming a transition's second
        // half, not restarting it.
        let mut anim: TimedAnimation<()> = TimedAnimation::new(Effect::Fade, 240);
        let p = 0.4;
        anim.advance((p * 240.0) as i32);
        assert_eq!(anim.remaining_ms(), 240 - (0.4f32 * 240.0) as i32);
        assert!((anim.progress() - p).abs() < 0.01);
    }

    #[test]
    fn finish_payload_yields_once() {
        let mut anim = TimedAnimation::new(Effect::Fade, 10).then("done");
        anim.advance(10);
        assert!(anim.is_finished());
        assert_eq!(anim.take_finish(), Some("done"));
        assert_eq!(anim.take_finish(), None);
    }

    #[test]
    fn zero_duration_completes_immediately_at_full_progress() {
        let mut anim: TimedAnimation<()> = TimedAnimation::new(Effect::Fade, 0);
        assert_eq!(anim.progress(), 1.0);
        assert!(anim.advance(0));
    }

    #[test]
    fn ease_out_cubic_hits_both_endpoints() {
        assert_eq!(easing::ease_out_cubic(0.0), 0.0);
        assert_eq!(easing::ease_out_cubic(1.0), 1.0);
        assert!(easing::ease_out_cubic(0.5) > 0.5);
    }
}
