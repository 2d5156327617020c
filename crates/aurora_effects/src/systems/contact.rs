//! # Contact Form
//!
//! Client-side feedback only; nothing is ever sent. Invalid fields are
//! marked `error` until edited. A submit shows the sent state on the submit
//! control, then after `sent_duration_ms` restores it and resets the form.
//! Submitting again inside that window restarts it.

use aurora_core::config::ContactConfig;
use aurora_core::{Debouncer, FrameTime, TimerId};

use crate::command::{classes, Background, Command};
use crate::effect::{Effect, EffectContext, TimerAction};
use crate::event::PageEvent;
use crate::layout::ContactFormNode;

/// Validation feedback and the simulated submit.
pub struct ContactForm {
    config: ContactConfig,
    form: ContactFormNode,
    sent: Debouncer,
}

impl ContactForm {
    /// Creates the handler for `form`.
    #[must_use]
    pub fn new(config: ContactConfig, form: ContactFormNode) -> Self {
        Self {
            sent: Debouncer::new(config.sent_duration_ms),
            config,
            form,
        }
    }

    /// True while the sent state is showing.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.sent.is_pending()
    }
}

impl Effect for ContactForm {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn on_event(&mut self, event: &PageEvent, cx: &mut EffectContext<'_>) {
        match *event {
            PageEvent::FieldInvalid { node } if self.form.fields.contains(&node) => {
                cx.emit(Command::AddClass {
                    node,
                    class: classes::ERROR,
                });
            }
            PageEvent::FieldInput { node } if self.form.fields.contains(&node) => {
                cx.emit(Command::RemoveClass {
                    node,
                    class: classes::ERROR,
                });
            }
            PageEvent::FormSubmit { node } if node == self.form.form => {
                let Some(submit) = self.form.submit else {
                    tracing::debug!("contact form has no submit control");
                    return;
                };
                cx.emit(Command::SetHtml {
                    node: submit,
                    html: self.config.sent_html.clone(),
                });
                cx.emit(Command::SetBackground {
                    node: submit,
                    background: Some(Background::Css(self.config.sent_background.clone())),
                });
                cx.restart(&mut self.sent, TimerAction::RestoreSubmit { form: node });
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, id: TimerId, action: TimerAction, cx: &mut EffectContext<'_>) {
        if !matches!(action, TimerAction::RestoreSubmit { .. }) || !self.sent.fired(id) {
            return;
        }
        if let Some(submit) = self.form.submit {
            cx.emit(Command::SetHtml {
                node: submit,
                html: self.config.idle_html.clone(),
            });
            cx.emit(Command::SetBackground {
                node: submit,
                background: None,
            });
        }
        cx.emit(Command::ResetForm { node: self.form.form });
    }

    fn update(&mut self, _frame: &FrameTime, _cx: &mut EffectContext<'_>) {}
}
