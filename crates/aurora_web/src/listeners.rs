//! DOM listeners that translate browser events into [`PageEvent`]s.
//!
//! Every listener only stamps and forwards. State lives in the runtime;
//! events reach it when the next frame drains the bus.

use std::collections::BTreeSet;

use aurora_core::{EffectsResult, NodeId, Rect, Vec2};
use aurora_effects::{EventSender, PageEvent};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, Window,
};

use crate::dom::{host_error, DiscoveredPage, NodeRegistry};

const CANCELABLE: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: false,
};

/// Keeps listeners and the section observer alive. Dropping it detaches all.
pub struct PageListeners {
    listeners: Vec<EventListener>,
    sections: Option<SectionWatcher>,
}

impl PageListeners {
    /// Number of DOM listeners attached.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nothing was attached.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.sections.is_none()
    }
}

fn client_position(event: &Event) -> Option<Vec2> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32))
}

fn bounds_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Attaches every listener the discovered page needs.
///
/// # Errors
///
/// Fails if the section observer cannot be created.
#[allow(clippy::too_many_lines)]
pub fn attach(
    window: &Window,
    document: &Document,
    page: &DiscoveredPage,
    sender: &EventSender,
    thresholds: &[f32],
) -> EffectsResult<PageListeners> {
    let layout = &page.layout;
    let registry = &page.registry;
    let mut listeners = Vec::new();

    let sink = sender.clone();
    listeners.push(EventListener::new(document, "mousemove", move |event| {
        if let Some(position) = client_position(event) {
            sink.send(event.time_stamp(), PageEvent::PointerMove { position });
        }
    }));

    let sink = sender.clone();
    let scroller = window.clone();
    listeners.push(EventListener::new(window, "scroll", move |event| {
        let y = scroller.scroll_y().unwrap_or(0.0);
        sink.send(event.time_stamp(), PageEvent::Scroll { y: y as f32 });
    }));

    let sink = sender.clone();
    let resized = window.clone();
    listeners.push(EventListener::new(window, "resize", move |event| {
        let size = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        sink.send(
            event.time_stamp(),
            PageEvent::Resize {
                width: size(resized.inner_width()) as f32,
                height: size(resized.inner_height()) as f32,
            },
        );
    }));

    // One enter/leave pair per element, whatever roles it plays.
    let hover: BTreeSet<NodeId> = layout
        .interactive
        .iter()
        .copied()
        .chain(layout.tilt_cards.iter().map(|c| c.node))
        .chain(layout.magnetic.iter().map(|m| m.node))
        .collect();
    let tracked: BTreeSet<NodeId> = layout
        .tilt_cards
        .iter()
        .map(|c| c.node)
        .chain(layout.magnetic.iter().map(|m| m.node))
        .collect();

    for &node in &hover {
        let Some(element) = registry.get(node) else {
            continue;
        };
        let sink = sender.clone();
        listeners.push(EventListener::new(element, "mouseenter", move |event| {
            sink.send(event.time_stamp(), PageEvent::PointerEnter { node });
        }));
        let sink = sender.clone();
        listeners.push(EventListener::new(element, "mouseleave", move |event| {
            sink.send(event.time_stamp(), PageEvent::PointerLeave { node });
        }));
    }

    for &node in &tracked {
        let Some(element) = registry.get(node) else {
            continue;
        };
        let sink = sender.clone();
        let measured = element.clone();
        listeners.push(EventListener::new(element, "mousemove", move |event| {
            if let Some(position) = client_position(event) {
                sink.send(
                    event.time_stamp(),
                    PageEvent::PointerMoveWithin {
                        node,
                        position,
                        bounds: bounds_of(&measured),
                    },
                );
            }
        }));
    }

    for magnetic in &layout.magnetic {
        let node = magnetic.node;
        let Some(element) = registry.get(node) else {
            continue;
        };
        let sink = sender.clone();
        listeners.push(EventListener::new(element, "click", move |event| {
            sink.send(event.time_stamp(), PageEvent::Click { node });
        }));
    }

    for &(link, target) in &page.anchor_targets {
        let Some(element) = registry.get(link) else {
            continue;
        };
        let sink = sender.clone();
        listeners.push(EventListener::new_with_options(element, "click", CANCELABLE, move |event| {
            event.prevent_default();
            sink.send(event.time_stamp(), PageEvent::AnchorClick { link, target });
        }));
    }

    if let Some(contact) = &layout.contact {
        for &node in &contact.fields {
            let Some(element) = registry.get(node) else {
                continue;
            };
            let sink = sender.clone();
            let invalid = move |event: &Event| {
                event.prevent_default();
                sink.send(event.time_stamp(), PageEvent::FieldInvalid { node });
            };
            listeners.push(EventListener::new_with_options(
                element,
                "invalid",
                CANCELABLE,
                invalid,
            ));
            let sink = sender.clone();
            listeners.push(EventListener::new(element, "input", move |event| {
                sink.send(event.time_stamp(), PageEvent::FieldInput { node });
            }));
        }

        let node = contact.form;
        if let Some(form) = registry.get(node) {
            let sink = sender.clone();
            let submit = move |event: &Event| {
                event.prevent_default();
                sink.send(event.time_stamp(), PageEvent::FormSubmit { node });
            };
            listeners.push(EventListener::new_with_options(form, "submit", CANCELABLE, submit));
        }
    }

    let sections = if layout.sections.is_empty() {
        None
    } else {
        let watched = layout.sections.iter().filter_map(|s| registry.get(s.node));
        Some(SectionWatcher::observe(watched, sender.clone(), thresholds)?)
    };

    tracing::debug!(listeners = listeners.len(), "page listeners attached");
    Ok(PageListeners { listeners, sections })
}

/// An `IntersectionObserver` over the page sections.
pub struct SectionWatcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl SectionWatcher {
    fn observe<'a>(
        sections: impl Iterator<Item = &'a Element>,
        sink: EventSender,
        thresholds: &[f32],
    ) -> EffectsResult<Self> {
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(node) = NodeRegistry::id_of(&entry.target()) else {
                    continue;
                };
                sink.send(
                    entry.time(),
                    PageEvent::SectionVisibility {
                        node,
                        intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio() as f32,
                    },
                );
            }
        }) as Box<dyn FnMut(js_sys::Array)>);

        let steps: js_sys::Array = thresholds
            .iter()
            .map(|&t| JsValue::from_f64(f64::from(t)))
            .collect();
        let options = IntersectionObserverInit::new();
        options.set_threshold(&steps);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(|e| host_error("intersection observer", &e))?;
        for section in sections {
            observer.observe(section);
        }
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for SectionWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
