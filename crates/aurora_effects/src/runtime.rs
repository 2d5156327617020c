//! # Effects Runtime
//!
//! Owns every system, the shared state, the timers and the command buffer.
//!
//! ```text
//! frame(now_ms):
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. DRAIN BUS      each stamped event: fire due timers, then  │
//! │                   update SharedState and broadcast it        │
//! │ 2. FIRE TIMERS    everything due at or before now            │
//! │ 3. BEGIN FRAME    Ticker → FrameTime (clamped, normalized)   │
//! │ 4. STEP POINTER   SharedState.pointer.current → target       │
//! │ 5. UPDATE         each system, registration order            │
//! └──────────────────────────────────────────────────────────────┘
//! take_commands() → host applies them
//! ```
//!
//! The runtime is the only writer of [`SharedState`]: pointer target on
//! `PointerMove`, scroll offset on `Scroll`, viewport once a burst of
//! `Resize` events has been quiet for `resize_debounce_ms`. It also owns
//! the hero reveal, `hero_reveal_ms` after start, whichever modules run.

use aurora_core::{
    Debouncer, EasingFactor, EffectsConfig, EffectsResult, SharedState, TickHandle, Ticker, TimerId,
    TimerQueue, ViewportSize,
};

use crate::command::{classes, Command, CommandBuffer};
use crate::effect::{Deferred, Effect, EffectContext, TimerAction};
use crate::event::{EventBus, EventReceiver, EventSender, PageEvent};
use crate::layout::PageLayout;
use crate::systems::{
    ContactForm, CursorSystem, MagneticSystem, NavigationSystem, ParallaxOrbs, ParticlesSystem,
    SectionObserver, TiltSystem,
};

/// Event bus capacity used unless the builder overrides it.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Counters for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Events drained from the bus.
    pub events_processed: u32,
    /// Timers that fired.
    pub timers_fired: u32,
    /// Commands waiting for the host after the frame.
    pub commands_pending: usize,
}

/// Assembles an [`EffectsRuntime`].
pub struct RuntimeBuilder {
    config: EffectsConfig,
    layout: PageLayout,
    viewport: ViewportSize,
    seed: u64,
    event_capacity: usize,
}

impl RuntimeBuilder {
    /// Starts from `config` with an empty page.
    #[must_use]
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            layout: PageLayout::default(),
            viewport: ViewportSize::default(),
            seed: 0,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Elements present on the page.
    #[must_use]
    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Initial viewport.
    #[must_use]
    pub fn viewport(mut self, viewport: ViewportSize) -> Self {
        self.viewport = viewport;
        self
    }

    /// Seed for particle generation.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Event bus capacity.
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Validates the configuration, activates every system whose module is
    /// enabled and whose elements are present, and starts them at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`](aurora_core::EffectsError)
    /// if the configuration is out of range.
    pub fn build(self, now_ms: f64) -> EffectsResult<EffectsRuntime> {
        let Self {
            config,
            layout,
            viewport,
            seed,
            event_capacity,
        } = self;
        config.validate()?;

        let systems = assemble(&config, &layout, viewport, seed)?;
        let hero = layout.hero;
        let bus = EventBus::new(event_capacity);
        let mut runtime = EffectsRuntime {
            ticker: Ticker::new(&config.timing),
            shared: SharedState::new(viewport, EasingFactor::new(config.cursor.easing)?),
            timers: TimerQueue::new(),
            commands: CommandBuffer::new(),
            receiver: bus.receiver(),
            bus,
            resize: Debouncer::new(config.timing.resize_debounce_ms),
            pending_viewport: None,
            last_stats: FrameStats::default(),
        };

        for system in systems {
            let handle = runtime.ticker.register(system);
            if let Some(effect) = runtime.ticker.get_mut(handle) {
                let mut cx = EffectContext::new(
                    now_ms,
                    handle,
                    &runtime.shared,
                    &mut runtime.timers,
                    &mut runtime.commands,
                );
                effect.start(&mut cx);
            }
        }

        if let Some(node) = hero {
            let deferred = Deferred {
                owner: None,
                action: TimerAction::RevealHero { node },
            };
            runtime
                .timers
                .schedule_after(now_ms, config.sections.hero_reveal_ms, deferred);
        }

        tracing::info!(
            "effects runtime started: {} systems [{}]",
            runtime.ticker.len(),
            runtime
                .active_effects()
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(runtime)
    }
}

fn decline(module: &str, reason: &str) {
    tracing::debug!("{module}: not activated, {reason}");
}

/// Builds the enabled systems whose elements are present, in page order.
fn assemble(
    config: &EffectsConfig,
    layout: &PageLayout,
    viewport: ViewportSize,
    seed: u64,
) -> EffectsResult<Vec<Box<dyn Effect>>> {
    let modules = &config.modules;
    let mut systems: Vec<Box<dyn Effect>> = Vec::with_capacity(8);

    match (modules.cursor, layout.cursor) {
        (false, _) => decline("cursor", "disabled"),
        (true, None) => decline("cursor", "no follower elements"),
        (true, Some(nodes)) => {
            systems.push(Box::new(CursorSystem::new(nodes, &layout.interactive)));
        }
    }

    if !modules.sections {
        decline("sections", "disabled");
    } else if layout.sections.is_empty() {
        decline("sections", "no sections");
    } else {
        systems.push(Box::new(SectionObserver::new(&config.sections, &layout.sections)?));
    }

    if !modules.tilt {
        decline("tilt", "disabled");
    } else if layout.tilt_cards.is_empty() {
        decline("tilt", "no cards");
    } else {
        systems.push(Box::new(TiltSystem::new(config.tilt.clone(), &layout.tilt_cards)?));
    }

    if !modules.magnetic {
        decline("magnetic", "disabled");
    } else if layout.magnetic.is_empty() {
        decline("magnetic", "no magnetic elements");
    } else {
        systems.push(Box::new(MagneticSystem::new(&config.magnetic, &layout.magnetic)?));
    }

    match (modules.particles, layout.particle_canvas) {
        (false, _) => decline("particles", "disabled"),
        (true, None) => decline("particles", "no canvas"),
        (true, Some(surface)) => systems.push(Box::new(ParticlesSystem::new(
            &config.particles,
            surface,
            viewport,
            seed,
        ))),
    }

    match (modules.navigation, layout.nav) {
        (false, _) => decline("navigation", "disabled"),
        (true, None) => decline("navigation", "no nav bar"),
        (true, Some(nav)) => systems.push(Box::new(NavigationSystem::new(
            &config.navigation,
            nav,
            &layout.anchors,
        ))),
    }

    match (modules.contact, &layout.contact) {
        (false, _) => decline("contact", "disabled"),
        (true, None) => decline("contact", "no form"),
        (true, Some(form)) => {
            systems.push(Box::new(ContactForm::new(config.contact.clone(), form.clone())));
        }
    }

    if !modules.parallax {
        decline("parallax", "disabled");
    } else if layout.orbs.is_empty() {
        decline("parallax", "no orbs");
    } else {
        systems.push(Box::new(ParallaxOrbs::new(&config.parallax, &layout.orbs)?));
    }

    Ok(systems)
}

/// The running effects layer.
pub struct EffectsRuntime {
    ticker: Ticker<Box<dyn Effect>>,
    shared: SharedState,
    timers: TimerQueue<Deferred>,
    commands: CommandBuffer,
    bus: EventBus,
    receiver: EventReceiver,
    resize: Debouncer,
    pending_viewport: Option<ViewportSize>,
    last_stats: FrameStats,
}

impl EffectsRuntime {
    /// Starts a builder.
    #[must_use]
    pub fn builder(config: EffectsConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    /// A sender for host listeners. Events sent here are handled at the
    /// start of the next frame.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.bus.sender()
    }

    /// Shared page state.
    #[must_use]
    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    /// Active systems in registration order.
    #[must_use]
    pub fn active_effects(&self) -> Vec<(TickHandle, &'static str)> {
        self.ticker.iter().map(|(handle, effect)| (handle, effect.name())).collect()
    }

    /// Handle of the active system called `name`.
    #[must_use]
    pub fn handle_of(&self, name: &str) -> Option<TickHandle> {
        self.ticker
            .iter()
            .find(|(_, effect)| effect.name() == name)
            .map(|(handle, _)| handle)
    }

    /// True until [`shutdown`](Self::shutdown).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Counters from the last frame.
    #[must_use]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Commands emitted since the last [`take_commands`](Self::take_commands).
    #[must_use]
    pub fn pending_commands(&self) -> &[Command] {
        self.commands.as_slice()
    }

    /// Takes every pending command for the host to apply.
    pub fn take_commands(&mut self) -> Vec<Command> {
        self.commands.take()
    }

    /// Handles one page event at host time `at_ms`.
    ///
    /// Timers due at or before `at_ms` fire first. No-op after shutdown.
    pub fn handle_event(&mut self, at_ms: f64, event: PageEvent) {
        if !self.ticker.is_running() {
            return;
        }
        self.fire_due(at_ms);

        match event {
            PageEvent::PointerMove { position } => self.shared.pointer.move_to(position),
            PageEvent::Scroll { y } => self.shared.scroll_y = y,
            PageEvent::Resize { width, height } => {
                self.pending_viewport = Some(ViewportSize::new(width, height));
                let deferred = Deferred {
                    owner: None,
                    action: TimerAction::ViewportResize,
                };
                self.resize.trigger(&mut self.timers, at_ms, deferred);
            }
            _ => {}
        }

        for (handle, effect) in self.ticker.iter_mut() {
            let mut cx = EffectContext::new(
                at_ms,
                handle,
                &self.shared,
                &mut self.timers,
                &mut self.commands,
            );
            effect.on_event(&event, &mut cx);
        }
    }

    /// Runs one display frame at host time `now_ms`.
    ///
    /// Returns `None` once the runtime has been shut down.
    pub fn frame(&mut self, now_ms: f64) -> Option<FrameStats> {
        if !self.ticker.is_running() {
            return None;
        }

        let mut events_processed = 0;
        let mut timers_fired = 0;
        while let Some(stamped) = self.receiver.try_recv() {
            timers_fired += self.fire_due(stamped.at_ms);
            self.handle_event(stamped.at_ms, stamped.event);
            events_processed += 1;
        }
        timers_fired += self.fire_due(now_ms);

        let time = self.ticker.begin_frame(now_ms)?;
        self.shared.pointer.step(time.frames);

        for (handle, effect) in self.ticker.iter_mut() {
            let mut cx = EffectContext::new(
                now_ms,
                handle,
                &self.shared,
                &mut self.timers,
                &mut self.commands,
            );
            effect.update(&time, &mut cx);
        }

        self.last_stats = FrameStats {
            frame: time.frame,
            events_processed,
            timers_fired,
            commands_pending: self.commands.len(),
        };
        Some(self.last_stats)
    }

    /// Removes one system and its pending timers. Returns false if it was
    /// not registered.
    pub fn dispose(&mut self, handle: TickHandle) -> bool {
        let Some(effect) = self.ticker.dispose(handle) else {
            return false;
        };
        self.timers.retain(|deferred| deferred.owner != Some(handle));
        tracing::debug!("{}: disposed", effect.name());
        true
    }

    /// Stops every system and drops all pending timers, events and
    /// commands. Later calls to [`frame`](Self::frame) and
    /// [`handle_event`](Self::handle_event) do nothing.
    pub fn shutdown(&mut self) {
        let systems = self.ticker.stop();
        self.timers.clear();
        self.commands.clear();
        while self.receiver.try_recv().is_some() {}
        tracing::info!("effects runtime stopped, {} systems dropped", systems.len());
    }

    /// Fires every timer due at or before `now_ms`, earliest first.
    fn fire_due(&mut self, now_ms: f64) -> u32 {
        let mut fired = 0;
        while let Some((id, due_ms, deferred)) = self.timers.pop_due(now_ms) {
            fired += 1;
            match deferred.owner {
                None => self.runtime_timer(id, due_ms, deferred.action),
                Some(owner) => {
                    let Some(effect) = self.ticker.get_mut(owner) else {
                        continue;
                    };
                    tracing::trace!("{}: timer {:?} at {due_ms}", effect.name(), deferred.action);
                    let mut cx = EffectContext::new(
                        due_ms,
                        owner,
                        &self.shared,
                        &mut self.timers,
                        &mut self.commands,
                    );
                    effect.on_timer(id, deferred.action, &mut cx);
                }
            }
        }
        fired
    }

    fn runtime_timer(&mut self, id: TimerId, due_ms: f64, action: TimerAction) {
        if let TimerAction::RevealHero { node } = action {
            self.commands.push(Command::AddClass {
                node,
                class: classes::IN_VIEW,
            });
            return;
        }
        if !self.resize.fired(id) {
            return;
        }
        let Some(viewport) = self.pending_viewport.take() else {
            return;
        };
        self.shared.viewport = viewport;
        tracing::debug!("viewport resized to {}x{}", viewport.width, viewport.height);

        for (handle, effect) in self.ticker.iter_mut() {
            let mut cx = EffectContext::new(
                due_ms,
                handle,
                &self.shared,
                &mut self.timers,
                &mut self.commands,
            );
            effect.on_viewport_resized(viewport, &mut cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use aurora_core::{NodeId, Vec2};

    use super::*;
    use crate::layout::CursorNodes;

    fn cursor_page() -> PageLayout {
        PageLayout {
            cursor: Some(CursorNodes {
                dot: NodeId(1),
                glow: NodeId(2),
            }),
            particle_canvas: Some(NodeId(3)),
            ..PageLayout::default()
        }
    }

    fn runtime(config: EffectsConfig) -> EffectsRuntime {
        EffectsRuntime::builder(config)
            .layout(cursor_page())
            .viewport(ViewportSize::new(800.0, 600.0))
            .seed(9)
            .build(0.0)
            .unwrap()
    }

    #[test]
    fn test_absent_elements_decline() {
        let runtime = runtime(EffectsConfig::default());
        let names: Vec<_> = runtime.active_effects().into_iter().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["cursor", "particles"]);
    }

    #[test]
    fn test_disabled_module_declines() {
        let mut config = EffectsConfig::default();
        config.modules.particles = false;
        let runtime = runtime(config);
        assert!(runtime.handle_of("particles").is_none());
        assert!(runtime.handle_of("cursor").is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EffectsConfig::default();
        config.tilt.easing = 2.0;
        assert!(EffectsRuntime::builder(config).build(0.0).is_err());
    }

    #[test]
    fn test_bus_events_drained_at_frame() {
        let mut runtime = runtime(EffectsConfig::default());
        let sender = runtime.event_sender();
        sender.send(5.0, PageEvent::PointerMove { position: Vec2::new(40.0, 30.0) });
        sender.send(6.0, PageEvent::Scroll { y: 120.0 });
        assert_eq!(runtime.shared().scroll_y, 0.0);

        let stats = runtime.frame(16.0).unwrap();
        assert_eq!(stats.events_processed, 2);
        assert_eq!(runtime.shared().scroll_y, 120.0);
        assert_eq!(runtime.shared().pointer.current(), Vec2::new(40.0, 30.0));
    }

    #[test]
    fn test_dispose_stops_commands() {
        let mut runtime = runtime(EffectsConfig::default());
        runtime.frame(0.0);
        runtime.take_commands();

        let particles = runtime.handle_of("particles").unwrap();
        assert!(runtime.dispose(particles));
        assert!(!runtime.dispose(particles));

        runtime.frame(16.0);
        assert!(runtime
            .take_commands()
            .iter()
            .all(|c| !matches!(c, Command::Draw { .. })));
    }

    #[test]
    fn test_hero_revealed_without_section_observer() {
        let mut config = EffectsConfig::default();
        config.modules.sections = false;
        let hero = NodeId(10);
        let mut runtime = EffectsRuntime::builder(config)
            .layout(PageLayout {
                hero: Some(hero),
                ..PageLayout::default()
            })
            .build(1000.0)
            .unwrap();
        assert!(runtime.active_effects().is_empty());
        assert_eq!(runtime.pending_timers(), 1);

        let reveal = Command::AddClass {
            node: hero,
            class: classes::IN_VIEW,
        };
        runtime.frame(1199.0);
        assert!(!runtime.take_commands().contains(&reveal));
        let stats = runtime.frame(1200.0).unwrap();
        assert_eq!(stats.timers_fired, 1);
        assert_eq!(runtime.take_commands(), vec![reveal]);
        assert_eq!(runtime.pending_timers(), 0);
    }

    #[test]
    fn test_shutdown_makes_frames_noops() {
        let mut runtime = runtime(EffectsConfig::default());
        runtime.frame(0.0);
        runtime.shutdown();

        assert!(!runtime.is_running());
        assert!(runtime.active_effects().is_empty());
        assert!(runtime.frame(16.0).is_none());
        runtime.handle_event(20.0, PageEvent::Scroll { y: 10.0 });
        assert!(runtime.take_commands().is_empty());
        assert_eq!(runtime.pending_timers(), 0);
    }
}
