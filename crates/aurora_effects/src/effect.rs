//! The contract every page system implements.

use aurora_core::{
    Debouncer, FrameTime, NodeId, SharedState, TickHandle, TimerId, TimerQueue, ViewportSize,
};

use crate::command::{Command, CommandBuffer};
use crate::event::PageEvent;

/// Work a system defers to a later time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Mark a text element revealed.
    RevealText {
        /// The element.
        node: NodeId,
    },
    /// Mark the hero in view.
    RevealHero {
        /// The hero.
        node: NodeId,
    },
    /// Drop a card's leave transition.
    ClearTransition {
        /// The card.
        card: NodeId,
    },
    /// Put the submit control back to rest.
    RestoreSubmit {
        /// The form.
        form: NodeId,
    },
    /// Apply the last reported viewport size.
    ViewportResize,
}

/// A queued timer with the system it belongs to. `owner` is `None` for
/// the runtime's own timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    /// Owning system.
    pub owner: Option<TickHandle>,
    /// What to do.
    pub action: TimerAction,
}

/// What a system sees while handling an event, timer or frame.
pub struct EffectContext<'a> {
    now_ms: f64,
    owner: TickHandle,
    shared: &'a SharedState,
    timers: &'a mut TimerQueue<Deferred>,
    commands: &'a mut CommandBuffer,
}

impl<'a> EffectContext<'a> {
    /// Creates a context for `owner` at `now_ms`.
    pub fn new(
        now_ms: f64,
        owner: TickHandle,
        shared: &'a SharedState,
        timers: &'a mut TimerQueue<Deferred>,
        commands: &'a mut CommandBuffer,
    ) -> Self {
        Self {
            now_ms,
            owner,
            shared,
            timers,
            commands,
        }
    }

    /// Host time (ms).
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Handle of the system being called.
    #[must_use]
    pub fn owner(&self) -> TickHandle {
        self.owner
    }

    /// Shared page state.
    #[must_use]
    pub fn shared(&self) -> &SharedState {
        self.shared
    }

    /// Emits a command.
    #[inline]
    pub fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// The command buffer, for systems that emit in bulk.
    pub fn commands(&mut self) -> &mut CommandBuffer {
        &mut *self.commands
    }

    /// Schedules `action` `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: f64, action: TimerAction) -> TimerId {
        let deferred = Deferred {
            owner: Some(self.owner),
            action,
        };
        self.timers.schedule_after(self.now_ms, delay_ms, deferred)
    }

    /// Schedules `action` through `debouncer`, replacing its pending timer.
    pub fn restart(&mut self, debouncer: &mut Debouncer, action: TimerAction) -> TimerId {
        let deferred = Deferred {
            owner: Some(self.owner),
            action,
        };
        debouncer.trigger(&mut *self.timers, self.now_ms, deferred)
    }
}

/// A page system driven by the runtime.
///
/// Event and timer handlers move targets and may emit immediate commands.
/// [`update`](Effect::update) advances the eased values and renders them.
pub trait Effect {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Called once right after registration.
    fn start(&mut self, _cx: &mut EffectContext<'_>) {}

    /// Called for every page event, after the runtime updated shared state.
    fn on_event(&mut self, _event: &PageEvent, _cx: &mut EffectContext<'_>) {}

    /// Called when one of this system's timers comes due.
    fn on_timer(&mut self, _id: TimerId, _action: TimerAction, _cx: &mut EffectContext<'_>) {}

    /// Called after a debounced resize was applied to shared state.
    fn on_viewport_resized(&mut self, _viewport: ViewportSize, _cx: &mut EffectContext<'_>) {}

    /// Called once per frame.
    fn update(&mut self, frame: &FrameTime, cx: &mut EffectContext<'_>);
}
