//! Smoothed followers.
//!
//! Every animated value on the page is a first-order decay toward a moving
//! target: event handlers move the target instantly, and the frame update
//! advances `current ← current + (target − current) × factor`.
//!
//! `current` has no public setter. The only way to move it is [`Smoothed::step`],
//! which keeps follow-up writes confined to the frame update.

use crate::error::{EffectsError, EffectsResult};
use crate::math::Vec2;

/// Linear interpolation.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Per-frame easing factor in `(0, 1]`.
///
/// `1.0` is a direct follow (the value lands on its target every frame).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingFactor(f32);

impl EasingFactor {
    /// Direct follow.
    pub const DIRECT: Self = Self(1.0);

    /// Validates and wraps a factor.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`] if `value` is not in `(0, 1]`.
    pub fn new(value: f32) -> EffectsResult<Self> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(EffectsError::InvalidConfig(format!(
                "easing factor must be in (0, 1], got {value}"
            )))
        }
    }

    /// Returns the raw factor.
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }

    /// Factor to apply for a frame that lasted `frames` reference frames.
    ///
    /// `1 − (1 − f)^frames`; equal to `f` when `frames == 1` and `0` when no
    /// time elapsed. The result stays in `[0, 1]`. A direct follower
    /// (`f == 1`) always lands on its target; NaN counts as one frame.
    #[must_use]
    pub fn scaled(self, frames: f32) -> f32 {
        if self.0 >= 1.0 {
            return 1.0;
        }
        if frames.is_nan() || (frames - 1.0).abs() < f32::EPSILON {
            return self.0;
        }
        if frames <= 0.0 {
            return 0.0;
        }
        let scaled = 1.0 - (1.0 - self.0).powf(frames);
        scaled.clamp(0.0, 1.0)
    }
}

/// Values that can be eased.
pub trait Lerp: Copy + PartialEq {
    /// Neutral resting value (what a pointer-leave resets the target to).
    const REST: Self;

    /// Interpolates from `self` toward `target` by `t`.
    #[must_use]
    fn lerp_to(self, target: Self, t: f32) -> Self;

    /// Largest absolute component distance to `other`.
    #[must_use]
    fn gap(self, other: Self) -> f32;
}

impl Lerp for f32 {
    const REST: Self = 0.0;

    fn lerp_to(self, target: Self, t: f32) -> Self {
        lerp(self, target, t)
    }

    fn gap(self, other: Self) -> f32 {
        (self - other).abs()
    }
}

impl Lerp for Vec2 {
    const REST: Self = Vec2::ZERO;

    fn lerp_to(self, target: Self, t: f32) -> Self {
        Vec2::new(lerp(self.x, target.x, t), lerp(self.y, target.y, t))
    }

    fn gap(self, other: Self) -> f32 {
        (self - other).max_abs()
    }
}

/// A value easing toward a target.
#[derive(Debug, Clone)]
pub struct Smoothed<T: Lerp> {
    current: T,
    target: T,
    factor: EasingFactor,
}

impl<T: Lerp> Smoothed<T> {
    /// Creates a follower resting at `value`.
    #[must_use]
    pub fn new(value: T, factor: EasingFactor) -> Self {
        Self {
            current: value,
            target: value,
            factor,
        }
    }

    /// Creates a follower resting at the neutral value.
    #[must_use]
    pub fn at_rest(factor: EasingFactor) -> Self {
        Self::new(T::REST, factor)
    }

    /// Returns the current value.
    #[must_use]
    pub fn current(&self) -> T {
        self.current
    }

    /// Returns the target value.
    #[must_use]
    pub fn target(&self) -> T {
        self.target
    }

    /// Returns the easing factor.
    #[must_use]
    pub fn factor(&self) -> EasingFactor {
        self.factor
    }

    /// Moves the target. Takes effect on the next [`step`](Self::step).
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Resets the target to the neutral value.
    pub fn release(&mut self) {
        self.target = T::REST;
    }

    /// Advances `current` toward `target` for a frame lasting `frames`
    /// reference frames.
    pub fn step(&mut self, frames: f32) {
        let t = self.factor.scaled(frames);
        self.current = self.current.lerp_to(self.target, t);
    }

    /// True once `current` is within `epsilon` of `target`.
    #[must_use]
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.current.gap(self.target) <= epsilon
    }
}
