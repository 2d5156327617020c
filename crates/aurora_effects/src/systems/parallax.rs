//! Background orb parallax.
//!
//! Orb `i` (0-based) is offset by `(i+1)` times the pointer's distance from
//! the viewport center scaled by `pointer_factor`, plus
//! `scroll_y × (i+1) × scroll_speed` vertically.
//!
//! The shared offset target moves on pointer moves and viewport resizes;
//! the frame update only eases toward it.

use aurora_core::config::ParallaxConfig;
use aurora_core::{EasingFactor, EffectsResult, FrameTime, NodeId, Smoothed, Vec2, ViewportSize};

use crate::command::{Command, Transform};
use crate::effect::{Effect, EffectContext};
use crate::event::PageEvent;

/// Offsets every `.gradient-orb`.
pub struct ParallaxOrbs {
    orbs: Vec<NodeId>,
    pointer_factor: f32,
    scroll_speed: f32,
    pointer: Vec2,
    offset: Smoothed<Vec2>,
    rendered: Vec<Option<Vec2>>,
}

impl ParallaxOrbs {
    /// Creates the system for `orbs` in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured easing is out of range.
    pub fn new(config: &ParallaxConfig, orbs: &[NodeId]) -> EffectsResult<Self> {
        Ok(Self {
            orbs: orbs.to_vec(),
            pointer_factor: config.pointer_factor,
            scroll_speed: config.scroll_speed,
            pointer: Vec2::ZERO,
            offset: Smoothed::at_rest(EasingFactor::new(config.easing)?),
            rendered: vec![None; orbs.len()],
        })
    }

    /// Offset target for the nearest orb (depth 1).
    #[must_use]
    pub fn target_offset(&self) -> Vec2 {
        self.offset.target()
    }

    fn retarget(&mut self, viewport: ViewportSize) {
        self.offset
            .set_target((self.pointer - viewport.center()) * self.pointer_factor);
    }
}

impl Effect for ParallaxOrbs {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn start(&mut self, cx: &mut EffectContext<'_>) {
        self.pointer = cx.shared().pointer.target();
        self.retarget(cx.shared().viewport);
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        if let PageEvent::PointerMove { position } = *event {
            self.pointer = position;
            self.retarget(cx.shared().viewport);
        }
    }

    fn on_viewport_resized(&mut self, viewport: ViewportSize, _cx: &mut EffectContext<'_>) {
        self.retarget(viewport);
    }

    fn update(&mut self, frame: &FrameTime, cx: &mut EffectContext<'_>) {
        let scroll_y = cx.shared().scroll_y;
        self.offset.step(frame.frames);
        let pointer = self.offset.current();

        for (i, (&node, rendered)) in self.orbs.iter().zip(&mut self.rendered).enumerate() {
            let depth = (i + 1) as f32;
            let offset = Vec2::new(
                pointer.x * depth,
                scroll_y * depth * self.scroll_speed + pointer.y * depth,
            );
            if *rendered == Some(offset) {
                continue;
            }
            *rendered = Some(offset);
            cx.emit(Command::SetTransform {
                node,
                transform: Transform::Translate(offset),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::harness::Harness;

    #[test]
    fn test_orb_offsets_scale_with_depth() {
        let mut harness = Harness::new();
        let mut system =
            ParallaxOrbs::new(&ParallaxConfig::default(), &[NodeId(70), NodeId(71)]).unwrap();

        // viewport 1280×720, pointer 100px right of center, scrolled 500px
        harness.start(&mut system, 0.0);
        harness.event(
            &mut system,
            0.0,
            PageEvent::PointerMove {
                position: Vec2::new(740.0, 360.0),
            },
        );
        harness.shared.scroll_y = 500.0;
        harness.frame(&mut system, 0.0);

        let offsets: Vec<Vec2> = harness
            .take()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetTransform {
                    transform: Transform::Translate(offset),
                    ..
                } => Some(offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets.len(), 2);
        assert!((offsets[0].x - 1.5).abs() < 1e-4);
        assert!((offsets[0].y - 10.0).abs() < 1e-4);
        assert!((offsets[1].x - 3.0).abs() < 1e-4);
        assert!((offsets[1].y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_target_moves_only_with_pointer_and_viewport() {
        let mut harness = Harness::new();
        let mut system = ParallaxOrbs::new(&ParallaxConfig::default(), &[NodeId(70)]).unwrap();
        harness.start(&mut system, 0.0);
        harness.event(
            &mut system,
            0.0,
            PageEvent::PointerMove {
                position: Vec2::new(740.0, 360.0),
            },
        );
        assert!((system.target_offset().x - 1.5).abs() < 1e-4);

        // a frame eases toward the target without moving it
        harness.shared.pointer.move_to(Vec2::new(0.0, 0.0));
        harness.frame(&mut system, 0.0);
        assert!((system.target_offset().x - 1.5).abs() < 1e-4);

        // wider viewport: the pointer now sits at the center
        harness.resize(&mut system, 20.0, ViewportSize::new(1480.0, 720.0));
        assert!(system.target_offset().x.abs() < 1e-4);
        assert!(system.target_offset().y.abs() < 1e-4);
    }
}
