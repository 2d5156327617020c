//! Pointer follower dot and glow.

use std::collections::HashSet;

use aurora_core::{FrameTime, NodeId, Vec2};

use crate::command::{classes, Command};
use crate::effect::{Effect, EffectContext};
use crate::event::PageEvent;
use crate::layout::CursorNodes;

/// Places the dot and glow at the eased pointer position.
pub struct CursorSystem {
    nodes: CursorNodes,
    interactive: HashSet<NodeId>,
    glow_visible: bool,
    rendered: Option<Vec2>,
}

impl CursorSystem {
    /// Creates the follower for `nodes`; hovering any of `interactive`
    /// switches the dot to its hovering style.
    #[must_use]
    pub fn new(nodes: CursorNodes, interactive: &[NodeId]) -> Self {
        Self {
            nodes,
            interactive: interactive.iter().copied().collect(),
            glow_visible: false,
            rendered: None,
        }
    }
}

impl Effect for CursorSystem {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        match *event {
            PageEvent::PointerMove { .. } if !self.glow_visible => {
                self.glow_visible = true;
                cx.emit(Command::SetOpacity {
                    node: self.nodes.glow,
                    opacity: 1.0,
                });
            }
            PageEvent::PointerEnter { node } if self.interactive.contains(&node) => {
                cx.emit(Command::AddClass {
                    node: self.nodes.dot,
                    class: classes::HOVERING,
                });
            }
            PageEvent::PointerLeave { node } if self.interactive.contains(&node) => {
                cx.emit(Command::RemoveClass {
                    node: self.nodes.dot,
                    class: classes::HOVERING,
                });
            }
            _ => {}
        }
    }

    fn update(&mut self, _frame: &FrameTime, cx: &mut EffectContext<'_>) {
        let position = cx.shared().pointer.current();
        if self.rendered == Some(position) {
            return;
        }
        self.rendered = Some(position);
        for node in [self.nodes.dot, self.nodes.glow] {
            cx.emit(Command::SetPosition { node, position });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::harness::Harness;

    fn cursor() -> CursorSystem {
        CursorSystem::new(
            CursorNodes {
                dot: NodeId(1),
                glow: NodeId(2),
            },
            &[NodeId(10)],
        )
    }

    #[test]
    fn test_follows_pointer() {
        let mut harness = Harness::new();
        let mut system = cursor();

        harness.shared.pointer.move_to(Vec2::new(300.0, 200.0));
        harness.event(
            &mut system,
            0.0,
            PageEvent::PointerMove {
                position: Vec2::new(300.0, 200.0),
            },
        );
        harness.frame(&mut system, 16.0);

        let commands = harness.take();
        assert!(commands.contains(&Command::SetOpacity { node: NodeId(2), opacity: 1.0 }));
        assert!(commands.contains(&Command::SetPosition {
            node: NodeId(1),
            position: Vec2::new(300.0, 200.0)
        }));

        // nothing moved, nothing rendered
        harness.frame(&mut system, 32.0);
        assert!(harness.take().is_empty());
    }

    #[test]
    fn test_hovering_only_for_interactive() {
        let mut harness = Harness::new();
        let mut system = cursor();

        harness.event(&mut system, 0.0, PageEvent::PointerEnter { node: NodeId(99) });
        assert!(harness.take().is_empty());

        harness.event(&mut system, 0.0, PageEvent::PointerEnter { node: NodeId(10) });
        harness.event(&mut system, 5.0, PageEvent::PointerLeave { node: NodeId(10) });
        assert_eq!(
            harness.take(),
            vec![
                Command::AddClass { node: NodeId(1), class: classes::HOVERING },
                Command::RemoveClass { node: NodeId(1), class: classes::HOVERING },
            ]
        );
    }
}
