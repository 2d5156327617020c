//! The page systems.
//!
//! | System | Reads | Renders |
//! |--------|-------|---------|
//! | [`CursorSystem`] | pointer | dot/glow position, `hovering` |
//! | [`SectionObserver`] | section visibility | reveals, `--accent-h` |
//! | [`TiltSystem`] | pointer within cards | card transform, shine |
//! | [`MagneticSystem`] | pointer within elements | translate, ripple |
//! | [`ParticlesSystem`] | frame time, viewport | canvas |
//! | [`NavigationSystem`] | scroll, anchor clicks | `scrolled`, scrolling |
//! | [`ContactForm`] | field validity, submit | `error`, sent state |
//! | [`ParallaxOrbs`] | pointer, scroll | orb translate |

pub mod contact;
pub mod cursor;
pub mod magnetic;
pub mod navigation;
pub mod parallax;
pub mod particles;
pub mod sections;
pub mod tilt;

pub use contact::ContactForm;
pub use cursor::CursorSystem;
pub use magnetic::MagneticSystem;
pub use navigation::NavigationSystem;
pub use parallax::ParallaxOrbs;
pub use particles::{FieldStats, Particle, ParticleField, ParticlesSystem};
pub use sections::SectionObserver;
pub use tilt::TiltSystem;

#[cfg(test)]
pub(crate) mod harness {
    //! Drives a single system without the runtime.

    use aurora_core::{
        EasingFactor, FrameClock, FrameTime, SharedState, TickHandle, Ticker, TimerQueue,
        TimingConfig, ViewportSize,
    };

    use crate::command::{Command, CommandBuffer};
    use crate::effect::{Deferred, Effect, EffectContext};
    use crate::event::PageEvent;

    pub struct Harness {
        pub shared: SharedState,
        pub timers: TimerQueue<Deferred>,
        pub commands: CommandBuffer,
        owner: TickHandle,
        clock: FrameClock,
    }

    impl Harness {
        pub fn new() -> Self {
            let mut ticker = Ticker::new(&TimingConfig::default());
            let owner = ticker.register(());
            Self {
                shared: SharedState::new(ViewportSize::new(1280.0, 720.0), EasingFactor::DIRECT),
                timers: TimerQueue::new(),
                commands: CommandBuffer::new(),
                owner,
                clock: FrameClock::new(&TimingConfig::default()),
            }
        }

        fn cx(&mut self, now_ms: f64) -> EffectContext<'_> {
            EffectContext::new(
                now_ms,
                self.owner,
                &self.shared,
                &mut self.timers,
                &mut self.commands,
            )
        }

        pub fn start(&mut self, effect: &mut dyn Effect, now_ms: f64) {
            let mut cx = self.cx(now_ms);
            effect.start(&mut cx);
        }

        pub fn event(&mut self, effect: &mut dyn Effect, now_ms: f64, event: PageEvent) {
            self.fire(effect, now_ms);
            let mut cx = self.cx(now_ms);
            effect.on_event(&event, &mut cx);
        }

        /// Fires every timer due at or before `now_ms`.
        pub fn fire(&mut self, effect: &mut dyn Effect, now_ms: f64) {
            while let Some((id, due, deferred)) = self.timers.pop_due(now_ms) {
                let mut cx = self.cx(due);
                effect.on_timer(id, deferred.action, &mut cx);
            }
        }

        pub fn resize(&mut self, effect: &mut dyn Effect, now_ms: f64, viewport: ViewportSize) {
            self.shared.viewport = viewport;
            let mut cx = self.cx(now_ms);
            effect.on_viewport_resized(viewport, &mut cx);
        }

        pub fn frame(&mut self, effect: &mut dyn Effect, now_ms: f64) -> FrameTime {
            self.fire(effect, now_ms);
            let time = self.clock.advance(now_ms);
            self.shared.pointer.step(time.frames);
            let mut cx = self.cx(now_ms);
            effect.update(&time, &mut cx);
            time
        }

        pub fn take(&mut self) -> Vec<Command> {
            self.commands.take()
        }
    }
}
