//! # AURORA Core
//!
//! Host-independent building blocks for the portfolio effects engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      AURORA CORE                           │
//! ├───────────────────────────────────────────────────────────┤
//! │  host time ──> Ticker ──> FrameTime ──> Smoothed::step    │
//! │  host time ──> TimerQueue / Debouncer ──> deferred action │
//! │  SharedState: pointer, viewport, scroll (one writer)      │
//! │  EffectsConfig: TOML, validated once at startup           │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate reads a clock. Every time value comes from the
//! host, which keeps the whole engine deterministic under test.

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod config;
pub mod context;
pub mod easing;
pub mod error;
pub mod math;
pub mod ticker;
pub mod timer;

pub use color::{Color, Hsl};
pub use config::{EffectsConfig, ModuleToggles, TimingConfig, MAX_PARTICLES};
pub use context::{NodeId, PointerState, SharedState, ViewportSize};
pub use easing::{lerp, EasingFactor, Lerp, Smoothed};
pub use error::{EffectsError, EffectsResult};
pub use math::{Rect, Vec2};
pub use ticker::{FrameClock, FrameTime, TickHandle, Ticker};
pub use timer::{Debouncer, TimerId, TimerQueue};
