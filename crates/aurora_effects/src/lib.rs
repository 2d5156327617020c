//! # AURORA Effects
//!
//! The portfolio page's visual systems, driven without a browser.
//!
//! ```text
//! host ──PageEvent──> EffectsRuntime ──Command──> host
//!                      ├─ CursorSystem
//!                      ├─ SectionObserver
//!                      ├─ TiltSystem
//!                      ├─ MagneticSystem
//!                      ├─ ParticlesSystem
//!                      ├─ NavigationSystem
//!                      ├─ ContactForm
//!                      └─ ParallaxOrbs
//! ```
//!
//! A system is activated only when its module is enabled and its elements
//! are present in the [`PageLayout`].
//!
//! ```
//! use aurora_core::{EffectsConfig, NodeId, ViewportSize};
//! use aurora_effects::{EffectsRuntime, PageLayout};
//!
//! let layout = PageLayout {
//!     nav: Some(NodeId(1)),
//!     ..PageLayout::default()
//! };
//! let mut runtime = EffectsRuntime::builder(EffectsConfig::default())
//!     .layout(layout)
//!     .viewport(ViewportSize::new(1280.0, 720.0))
//!     .build(0.0)
//!     .unwrap();
//! runtime.frame(16.0);
//! let _commands = runtime.take_commands();
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod command;
pub mod effect;
pub mod event;
pub mod layout;
pub mod runtime;
pub mod systems;

pub use command::{classes, Background, Command, CommandBuffer, DrawOp, Transform, ACCENT_HUE_VAR};
pub use effect::{Deferred, Effect, EffectContext, TimerAction};
pub use event::{EventBus, EventReceiver, EventSender, PageEvent, StampedEvent};
pub use layout::{
    ContactFormNode, CursorNodes, MagneticNode, PageLayout, SectionNode, TextReveal, TiltCardNode,
};
pub use runtime::{EffectsRuntime, FrameStats, RuntimeBuilder, DEFAULT_EVENT_CAPACITY};
