//! # 3D Card Tilt
//!
//! Each card rotates toward the pointer and lights a shine highlight under
//! it. Rotation targets are normalized by the card's half extents, so the
//! card edge always maps to `max_angle_deg`:
//!
//! ```text
//! target_y =  (px − cx) / (w/2) × max
//! target_x = −(py − cy) / (h/2) × max
//! ```
//!
//! Leaving a card releases the targets and applies an easing transition
//! for `leave_transition_ms`; a second leave restarts that window.

use aurora_core::config::TiltConfig;
use aurora_core::{
    Debouncer, EasingFactor, EffectsResult, FrameTime, NodeId, Smoothed, TimerId, Vec2,
};

use crate::command::{Background, Command, Transform};
use crate::effect::{Effect, EffectContext, TimerAction};
use crate::event::PageEvent;
use crate::layout::TiltCardNode;

/// Per-card state.
#[derive(Debug)]
struct CardState {
    card: TiltCardNode,
    /// `x` is rotateX, `y` is rotateY.
    rotation: Smoothed<Vec2>,
    shine_at: Vec2,
    leave: Debouncer,
    rendered: Option<Transform>,
}

/// Tilts every `.tilt-card` on the page.
pub struct TiltSystem {
    config: TiltConfig,
    cards: Vec<CardState>,
}

impl TiltSystem {
    /// Creates the system for `cards`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured easing is out of range.
    pub fn new(config: TiltConfig, cards: &[TiltCardNode]) -> EffectsResult<Self> {
        let factor = EasingFactor::new(config.easing)?;
        let cards = cards
            .iter()
            .map(|&card| CardState {
                card,
                rotation: Smoothed::at_rest(factor),
                shine_at: Vec2::new(50.0, 50.0),
                leave: Debouncer::new(config.leave_transition_ms),
                rendered: None,
            })
            .collect();
        Ok(Self { config, cards })
    }

    fn card_mut(&mut self, node: NodeId) -> Option<&mut CardState> {
        self.cards.iter_mut().find(|s| s.card.node == node)
    }

    /// Current rotation of a card as `(rotate_x, rotate_y)` degrees.
    #[must_use]
    pub fn rotation(&self, node: NodeId) -> Option<Vec2> {
        self.cards
            .iter()
            .find(|s| s.card.node == node)
            .map(|s| s.rotation.current())
    }

    /// Target rotation of a card as `(rotate_x, rotate_y)` degrees.
    #[must_use]
    pub fn target_rotation(&self, node: NodeId) -> Option<Vec2> {
        self.cards
            .iter()
            .find(|s| s.card.node == node)
            .map(|s| s.rotation.target())
    }
}

impl Effect for TiltSystem {
    fn name(&self) -> &'static str {
        "tilt"
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        let max_angle = self.config.max_angle_deg;
        let alpha = self.config.shine_alpha;
        let fade_percent = self.config.shine_fade_percent;

        match *event {
            PageEvent::PointerMoveWithin {
                node,
                position,
                bounds,
            } => {
                if bounds.is_degenerate() {
                    return;
                }
                let Some(state) = self.card_mut(node) else {
                    return;
                };
                let offset = bounds.normalized_from_center(position);
                state
                    .rotation
                    .set_target(Vec2::new(-offset.y * max_angle, offset.x * max_angle));
                state.shine_at = bounds.percent_of(position);

                if let Some(shine) = state.card.shine {
                    cx.emit(Command::SetBackground {
                        node: shine,
                        background: Some(Background::Shine {
                            at_percent: state.shine_at,
                            alpha,
                            fade_percent,
                        }),
                    });
                }
            }
            PageEvent::PointerLeave { node } => {
                let transition = self.config.leave_transition.clone();
                let Some(state) = self.card_mut(node) else {
                    return;
                };
                state.rotation.release();
                cx.emit(Command::SetTransition {
                    node,
                    transition: Some(transition),
                });
                cx.restart(&mut state.leave, TimerAction::ClearTransition { card: node });
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, id: TimerId, action: TimerAction, cx: &mut EffectContext<'_>) {
        let TimerAction::ClearTransition { card } = action else {
            return;
        };
        if let Some(state) = self.card_mut(card) {
            if state.leave.fired(id) {
                cx.emit(Command::SetTransition {
                    node: card,
                    transition: None,
                });
            }
        }
    }

    fn update(&mut self, frame: &FrameTime, cx: &mut EffectContext<'_>) {
        for state in &mut self.cards {
            state.rotation.step(frame.frames);
            let target = state.rotation.target();
            let scale = if target.max_abs() > self.config.rest_epsilon_deg {
                self.config.hover_scale
            } else {
                1.0
            };
            let current = state.rotation.current();
            let transform = Transform::Tilt {
                perspective_px: self.config.perspective_px,
                rotate_x_deg: current.x,
                rotate_y_deg: current.y,
                scale,
            };
            if state.rendered == Some(transform) {
                continue;
            }
            state.rendered = Some(transform);
            cx.emit(Command::SetTransform {
                node: state.card.node,
                transform,
            });
        }
    }
}
