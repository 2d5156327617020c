//! Shared page context.
//!
//! The runtime is the only writer of [`SharedState`]. Systems receive it by
//! shared reference on every event and frame.

use serde::{Deserialize, Serialize};

use crate::easing::{EasingFactor, Smoothed};
use crate::math::Vec2;

/// Opaque handle for a page element, assigned by the host at discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl ViewportSize {
    /// Creates a viewport size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the viewport.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Pointer position: target set by move events, current eased per frame.
#[derive(Debug, Clone)]
pub struct PointerState {
    position: Smoothed<Vec2>,
    seen: bool,
}

impl PointerState {
    /// Creates a pointer at the origin.
    #[must_use]
    pub fn new(factor: EasingFactor) -> Self {
        Self {
            position: Smoothed::at_rest(factor),
            seen: false,
        }
    }

    /// Records a pointer move.
    pub fn move_to(&mut self, position: Vec2) {
        self.position.set_target(position);
        self.seen = true;
    }

    /// Advances the eased position.
    pub fn step(&mut self, frames: f32) {
        self.position.step(frames);
    }

    /// Last reported pointer position.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        self.position.target()
    }

    /// Eased pointer position.
    #[must_use]
    pub fn current(&self) -> Vec2 {
        self.position.current()
    }

    /// True once any pointer move has been seen.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.seen
    }
}

/// The context record shared by every system.
#[derive(Debug, Clone)]
pub struct SharedState {
    /// Pointer position.
    pub pointer: PointerState,
    /// Viewport size (refreshed on debounced resize).
    pub viewport: ViewportSize,
    /// Vertical scroll offset of the page.
    pub scroll_y: f32,
}

impl SharedState {
    /// Creates the shared context.
    #[must_use]
    pub fn new(viewport: ViewportSize, pointer_factor: EasingFactor) -> Self {
        Self {
            pointer: PointerState::new(pointer_factor),
            viewport,
            scroll_y: 0.0,
        }
    }
}
