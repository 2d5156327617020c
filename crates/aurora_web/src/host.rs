//! Applies [`Command`]s to the live document.

use std::collections::HashMap;
use std::f64::consts::TAU;

use aurora_core::{EffectsResult, NodeId};
use aurora_effects::{Command, DrawOp};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlFormElement,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::dom::{host_error, NodeRegistry};

struct Surface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

/// Owns the element handles and writes commands into the DOM.
pub struct DomHost {
    registry: NodeRegistry,
    root: Option<HtmlElement>,
    surfaces: HashMap<NodeId, Surface>,
}

impl DomHost {
    /// Creates a host over the discovered elements.
    pub fn new(document: &Document, registry: NodeRegistry) -> Self {
        let root = document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        Self {
            registry,
            root,
            surfaces: HashMap::new(),
        }
    }

    /// Applies `commands` in order. Returns how many failed.
    ///
    /// A failing command is logged and skipped.
    pub fn apply(&mut self, commands: &[Command]) -> usize {
        let mut failed = 0;
        for command in commands {
            if let Err(err) = self.apply_one(command) {
                tracing::warn!("command {command:?} failed: {err}");
                failed += 1;
            }
        }
        failed
    }

    fn apply_one(&mut self, command: &Command) -> EffectsResult<()> {
        match command {
            Command::SetPosition { node, position } => {
                if let Some(el) = self.html(*node) {
                    set_style(el, "left", &format!("{}px", position.x))?;
                    set_style(el, "top", &format!("{}px", position.y))?;
                }
            }
            Command::SetTransform { node, transform } => {
                if let Some(el) = self.html(*node) {
                    set_style(el, "transform", &transform.to_string())?;
                }
            }
            Command::SetOpacity { node, opacity } => {
                if let Some(el) = self.html(*node) {
                    set_style(el, "opacity", &opacity.to_string())?;
                }
            }
            Command::SetBackground { node, background } => {
                if let Some(el) = self.html(*node) {
                    match background {
                        Some(value) => set_style(el, "background", &value.to_string())?,
                        None => clear_style(el, "background")?,
                    }
                }
            }
            Command::SetTransition { node, transition } => {
                if let Some(el) = self.html(*node) {
                    match transition {
                        Some(value) => set_style(el, "transition", value)?,
                        None => clear_style(el, "transition")?,
                    }
                }
            }
            Command::AddClass { node, class } => {
                if let Some(el) = self.element(*node) {
                    el.class_list()
                        .add_1(class)
                        .map_err(|e| host_error("add class", &e))?;
                }
            }
            Command::RemoveClass { node, class } => {
                if let Some(el) = self.element(*node) {
                    el.class_list()
                        .remove_1(class)
                        .map_err(|e| host_error("remove class", &e))?;
                }
            }
            Command::ReplayAnimation { node, class } => {
                if let Some(el) = self.html(*node) {
                    let classes = el.class_list();
                    classes
                        .remove_1(class)
                        .map_err(|e| host_error("replay", &e))?;
                    // Reading layout restarts the animation on the next add.
                    let _ = el.offset_width();
                    classes.add_1(class).map_err(|e| host_error("replay", &e))?;
                }
            }
            Command::SetRootVar { name, value } => {
                if let Some(root) = &self.root {
                    set_style(root, name, value)?;
                }
            }
            Command::ScrollIntoView { node } => {
                if let Some(el) = self.element(*node) {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    el.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            Command::SetHtml { node, html } => {
                if let Some(el) = self.element(*node) {
                    el.set_inner_html(html);
                }
            }
            Command::ResetForm { node } => {
                if let Some(form) = self
                    .element(*node)
                    .and_then(|el| el.dyn_ref::<HtmlFormElement>())
                {
                    form.reset();
                }
            }
            Command::ResizeSurface {
                surface,
                width,
                height,
            } => {
                if let Some(surface) = self.surface(*surface)? {
                    surface.canvas.set_width(pixels(*width));
                    surface.canvas.set_height(pixels(*height));
                }
            }
            Command::Draw { surface, op } => {
                if let Some(surface) = self.surface(*surface)? {
                    draw(surface, op)?;
                }
            }
        }
        Ok(())
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        let element = self.registry.get(node);
        if element.is_none() {
            tracing::trace!("no element for {node:?}");
        }
        element
    }

    fn html(&self, node: NodeId) -> Option<&HtmlElement> {
        self.element(node).and_then(|el| el.dyn_ref::<HtmlElement>())
    }

    fn surface(&mut self, node: NodeId) -> EffectsResult<Option<&Surface>> {
        if !self.surfaces.contains_key(&node) {
            let Some(canvas) = self
                .registry
                .get(node)
                .and_then(|el| el.dyn_ref::<HtmlCanvasElement>())
                .cloned()
            else {
                return Ok(None);
            };
            let context = canvas
                .get_context("2d")
                .map_err(|e| host_error("canvas context", &e))?
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                .ok_or_else(|| host_error("canvas context", &JsValue::from_str("2d unavailable")))?;
            self.surfaces.insert(node, Surface { canvas, context });
        }
        Ok(self.surfaces.get(&node))
    }
}

fn pixels(value: f32) -> u32 {
    value.max(0.0).round() as u32
}

fn set_style(el: &HtmlElement, name: &str, value: &str) -> EffectsResult<()> {
    el.style()
        .set_property(name, value)
        .map_err(|e| host_error(name, &e))
}

fn clear_style(el: &HtmlElement, name: &str) -> EffectsResult<()> {
    el.style()
        .remove_property(name)
        .map(|_| ())
        .map_err(|e| host_error(name, &e))
}

fn draw(surface: &Surface, op: &DrawOp) -> EffectsResult<()> {
    let ctx = &surface.context;
    match *op {
        DrawOp::Clear => ctx.clear_rect(
            0.0,
            0.0,
            f64::from(surface.canvas.width()),
            f64::from(surface.canvas.height()),
        ),
        DrawOp::Circle {
            center,
            radius,
            color,
        } => {
            ctx.begin_path();
            ctx.arc(f64::from(center.x), f64::from(center.y), f64::from(radius), 0.0, TAU)
                .map_err(|e| host_error("arc", &e))?;
            ctx.set_fill_style_str(&color.to_css());
            ctx.fill();
        }
        DrawOp::Line {
            from,
            to,
            width,
            color,
        } => {
            ctx.begin_path();
            ctx.move_to(f64::from(from.x), f64::from(from.y));
            ctx.line_to(f64::from(to.x), f64::from(to.y));
            ctx.set_stroke_style_str(&color.to_css());
            ctx.set_line_width(f64::from(width));
            ctx.stroke();
        }
    }
    Ok(())
}
