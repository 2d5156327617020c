//! Navigation bar styling and in-page anchor scrolling.

use aurora_core::config::NavigationConfig;
use aurora_core::{FrameTime, NodeId};

use crate::command::{classes, Command};
use crate::effect::{Effect, EffectContext};
use crate::event::PageEvent;

/// Marks the nav bar `scrolled` past a threshold and smooth-scrolls anchors.
pub struct NavigationSystem {
    nav: NodeId,
    anchors: Vec<NodeId>,
    threshold_px: f32,
    scrolled: bool,
}

impl NavigationSystem {
    /// Creates the system for the bar `nav` and its in-page `anchors`.
    #[must_use]
    pub fn new(config: &NavigationConfig, nav: NodeId, anchors: &[NodeId]) -> Self {
        Self {
            nav,
            anchors: anchors.to_vec(),
            threshold_px: config.scrolled_threshold_px,
            scrolled: false,
        }
    }

    /// True while the bar is styled as scrolled.
    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}

impl Effect for NavigationSystem {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        match *event {
            PageEvent::Scroll { y } => {
                let scrolled = y > self.threshold_px;
                if scrolled == self.scrolled {
                    return;
                }
                self.scrolled = scrolled;
                let node = self.nav;
                let class = classes::SCROLLED;
                cx.emit(if scrolled {
                    Command::AddClass { node, class }
                } else {
                    Command::RemoveClass { node, class }
                });
            }
            PageEvent::AnchorClick { link, target } if self.anchors.contains(&link) => {
                match target {
                    Some(node) => cx.emit(Command::ScrollIntoView { node }),
                    None => tracing::debug!("anchor {link:?} points nowhere"),
                }
            }
            _ => {}
        }
    }

    fn update(&mut self, _frame: &FrameTime, _cx: &mut EffectContext<'_>) {}
}
