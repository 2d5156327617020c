//! # Section Observer
//!
//! Reveals sections as they scroll into view and eases the page accent hue
//! toward the section being read.
//!
//! A visibility report counts as an entry when the section intersects and
//! more than `enter_ratio` of it is visible. The first entry marks the
//! section `in-view` and schedules its text reveals, the i-th after
//! `delay_i + i × reveal_stagger_ms`. Every entry retargets the accent.

use aurora_core::config::SectionsConfig;
use aurora_core::{EasingFactor, EffectsResult, FrameTime, NodeId, Smoothed, TimerId};

use crate::command::{classes, Command, ACCENT_HUE_VAR};
use crate::effect::{Effect, EffectContext, TimerAction};
use crate::event::PageEvent;
use crate::layout::{SectionNode, TextReveal};

#[derive(Debug)]
struct SectionState {
    node: NodeId,
    accent_hue: Option<f32>,
    texts: Vec<TextReveal>,
    entered: bool,
}

/// Section reveals and the accent hue.
pub struct SectionObserver {
    enter_ratio: f32,
    reveal_stagger_ms: f64,
    sections: Vec<SectionState>,
    revealed: Vec<NodeId>,
    accent: Smoothed<f32>,
    rendered_hue: Option<f32>,
}

impl SectionObserver {
    /// Creates the observer. Accent tags missing from the palette are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the accent easing is out of range.
    pub fn new(config: &SectionsConfig, sections: &[SectionNode]) -> EffectsResult<Self> {
        let factor = EasingFactor::new(config.accent_easing)?;
        let sections = sections
            .iter()
            .map(|section| {
                let accent_hue = section.accent.as_deref().and_then(|tag| {
                    let hue = config.palette.get(tag).copied();
                    if hue.is_none() {
                        tracing::debug!("section {:?}: unknown accent tag {tag:?}", section.node);
                    }
                    hue
                });
                SectionState {
                    node: section.node,
                    accent_hue,
                    texts: section.texts.clone(),
                    entered: false,
                }
            })
            .collect();

        Ok(Self {
            enter_ratio: config.enter_ratio,
            reveal_stagger_ms: config.reveal_stagger_ms,
            sections,
            revealed: Vec::new(),
            accent: Smoothed::new(config.initial_hue, factor),
            rendered_hue: None,
        })
    }

    /// Current accent hue (degrees).
    #[must_use]
    pub fn accent_hue(&self) -> f32 {
        self.accent.current()
    }

    /// Target accent hue (degrees).
    #[must_use]
    pub fn target_hue(&self) -> f32 {
        self.accent.target()
    }

    /// True once `node` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.revealed.contains(&node)
    }

    fn enter(&mut self, node: NodeId, cx: &mut EffectContext<'_>) {
        let Some(section) = self.sections.iter_mut().find(|s| s.node == node) else {
            return;
        };

        if let Some(hue) = section.accent_hue {
            self.accent.set_target(hue);
        }
        if section.entered {
            return;
        }
        section.entered = true;
        cx.emit(Command::AddClass {
            node,
            class: classes::IN_VIEW,
        });

        let pending = section
            .texts
            .iter()
            .filter(|text| !self.revealed.contains(&text.node));
        for (i, text) in pending.enumerate() {
            let delay = text.delay_ms + i as f64 * self.reveal_stagger_ms;
            cx.schedule(delay, TimerAction::RevealText { node: text.node });
        }
    }
}

impl Effect for SectionObserver {
    fn name(&self) -> &'static str {
        "sections"
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        if let PageEvent::SectionVisibility {
            node,
            intersecting,
            ratio,
        } = *event
        {
            if intersecting && ratio > self.enter_ratio {
                self.enter(node, cx);
            }
        }
    }

    fn on_timer(&mut self, _id: TimerId, action: TimerAction, cx: &mut EffectContext<'_>) {
        if let TimerAction::RevealText { node } = action {
            if !self.revealed.contains(&node) {
                self.revealed.push(node);
                cx.emit(Command::AddClass {
                    node,
                    class: classes::REVEALED,
                });
            }
        }
    }

    fn update(&mut self, frame: &FrameTime, cx: &mut EffectContext<'_>) {
        self.accent.step(frame.frames);
        let hue = self.accent.current();
        if self.rendered_hue == Some(hue) {
            return;
        }
        self.rendered_hue = Some(hue);
        cx.emit(Command::SetRootVar {
            name: ACCENT_HUE_VAR,
            value: hue.to_string(),
        });
    }
}
