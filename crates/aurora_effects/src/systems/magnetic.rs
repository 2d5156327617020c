//! Magnetic buttons.
//!
//! A hovered element drifts toward the pointer by `strength` of the
//! pointer's offset from its center and eases back on leave. Moves are
//! ignored unless the element's hover flag is set.

use aurora_core::config::MagneticConfig;
use aurora_core::{EasingFactor, EffectsResult, FrameTime, NodeId, Smoothed, Vec2};

use crate::command::{classes, Command, Transform};
use crate::effect::{Effect, EffectContext};
use crate::event::PageEvent;
use crate::layout::MagneticNode;

#[derive(Debug)]
struct MagnetState {
    element: MagneticNode,
    offset: Smoothed<Vec2>,
    hovered: bool,
    rendered: Option<Vec2>,
}

/// Pulls `.magnetic-element` / `.magnetic-btn` toward the pointer.
pub struct MagneticSystem {
    strength: f32,
    elements: Vec<MagnetState>,
}

impl MagneticSystem {
    /// Creates the system for `elements`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured easing is out of range.
    pub fn new(config: &MagneticConfig, elements: &[MagneticNode]) -> EffectsResult<Self> {
        let factor = EasingFactor::new(config.easing)?;
        Ok(Self {
            strength: config.strength,
            elements: elements
                .iter()
                .map(|&element| MagnetState {
                    element,
                    offset: Smoothed::at_rest(factor),
                    hovered: false,
                    rendered: None,
                })
                .collect(),
        })
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut MagnetState> {
        self.elements.iter_mut().find(|s| s.element.node == node)
    }

    /// Target offset of an element (px).
    #[must_use]
    pub fn target_offset(&self, node: NodeId) -> Option<Vec2> {
        self.elements
            .iter()
            .find(|s| s.element.node == node)
            .map(|s| s.offset.target())
    }
}

impl Effect for MagneticSystem {
    fn name(&self) -> &'static str {
        "magnetic"
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        let strength = self.strength;
        match *event {
            PageEvent::PointerEnter { node } => {
                if let Some(state) = self.element_mut(node) {
                    state.hovered = true;
                }
            }
            PageEvent::PointerMoveWithin {
                node,
                position,
                bounds,
            } => {
                let Some(state) = self.element_mut(node) else {
                    return;
                };
                if !state.hovered || bounds.is_degenerate() {
                    return;
                }
                state.offset.set_target((position - bounds.center()) * strength);
            }
            PageEvent::PointerLeave { node } => {
                if let Some(state) = self.element_mut(node) {
                    state.hovered = false;
                    state.offset.release();
                }
            }
            PageEvent::Click { node } => {
                let ripple = self.element_mut(node).and_then(|s| s.element.ripple);
                if let Some(ripple) = ripple {
                    cx.emit(Command::ReplayAnimation {
                        node: ripple,
                        class: classes::ACTIVE,
                    });
                }
            }
            _ => {}
        }
    }

    fn update(&mut self, frame: &FrameTime, cx: &mut EffectContext<'_>) {
        for state in &mut self.elements {
            state.offset.step(frame.frames);
            let offset = state.offset.current();
            if state.rendered == Some(offset) {
                continue;
            }
            state.rendered = Some(offset);
            cx.emit(Command::SetTransform {
                node: state.element.node,
                transform: Transform::Translate(offset),
            });
        }
    }
}
