//! Page discovery: finds the effect elements and assigns their [`NodeId`]s.

use aurora_core::{EffectsError, EffectsResult, NodeId};
use aurora_effects::{
    ContactFormNode, CursorNodes, MagneticNode, PageLayout, SectionNode, TextReveal, TiltCardNode,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::markup;

/// Maps a JS exception into a host error.
pub(crate) fn host_error(context: &str, err: &JsValue) -> EffectsError {
    EffectsError::Host(format!("{context}: {err:?}"))
}

/// Every element the engine addresses, indexed by [`NodeId`].
///
/// An element keeps the same id however many roles it plays; the id is
/// stored on the element itself under [`markup::NODE_ATTR`].
#[derive(Default)]
pub struct NodeRegistry {
    elements: Vec<Element>,
}

impl NodeRegistry {
    /// Returns the id of `element`, assigning one on first sight.
    ///
    /// # Errors
    ///
    /// Fails if the id attribute cannot be written.
    pub fn register(&mut self, element: Element) -> EffectsResult<NodeId> {
        if let Some(id) = element
            .get_attribute(markup::NODE_ATTR)
            .as_deref()
            .and_then(markup::parse_node_id)
        {
            if self.get(id).is_some() {
                return Ok(id);
            }
        }

        let id = NodeId(u32::try_from(self.elements.len()).map_err(|_| {
            EffectsError::Host("too many effect elements".to_owned())
        })?);
        element
            .set_attribute(markup::NODE_ATTR, &id.0.to_string())
            .map_err(|e| host_error("tag element", &e))?;
        self.elements.push(element);
        Ok(id)
    }

    /// The element behind `id`.
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    /// Id previously assigned to `element`.
    pub fn id_of(element: &Element) -> Option<NodeId> {
        element
            .get_attribute(markup::NODE_ATTR)
            .as_deref()
            .and_then(markup::parse_node_id)
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// All elements matching `selector` under `scope`, in document order.
pub(crate) fn select_all(scope: &Element, selector: &str) -> EffectsResult<Vec<Element>> {
    let list = scope
        .query_selector_all(selector)
        .map_err(|e| host_error(selector, &e))?;
    Ok(collect(&list))
}

fn select_all_in(document: &Document, selector: &str) -> EffectsResult<Vec<Element>> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| host_error(selector, &e))?;
    Ok(collect(&list))
}

fn select_one(document: &Document, selector: &str) -> EffectsResult<Option<Element>> {
    document
        .query_selector(selector)
        .map_err(|e| host_error(selector, &e))
}

fn first_in(scope: &Element, selector: &str) -> EffectsResult<Option<Element>> {
    scope
        .query_selector(selector)
        .map_err(|e| host_error(selector, &e))
}

fn collect(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// The discovered page: layout for the runtime plus what the listeners need.
pub struct DiscoveredPage {
    /// Element handles.
    pub registry: NodeRegistry,
    /// Layout handed to the runtime.
    pub layout: PageLayout,
    /// In-page anchors with their resolved targets.
    pub anchor_targets: Vec<(NodeId, Option<NodeId>)>,
}

/// Walks `document` once and tags every element the effects use.
///
/// # Errors
///
/// Fails on selector or attribute errors from the DOM.
pub fn discover(document: &Document) -> EffectsResult<DiscoveredPage> {
    let mut registry = NodeRegistry::default();
    let mut layout = PageLayout::default();

    layout.cursor = match (
        select_one(document, markup::CURSOR_DOT)?,
        select_one(document, markup::CURSOR_GLOW)?,
    ) {
        (Some(dot), Some(glow)) => Some(CursorNodes {
            dot: registry.register(dot)?,
            glow: registry.register(glow)?,
        }),
        _ => None,
    };

    for element in select_all_in(document, markup::INTERACTIVE)? {
        let id = registry.register(element)?;
        layout.interactive.push(id);
    }

    for section in select_all_in(document, markup::SECTION)? {
        let accent = markup::accent_tag(section.get_attribute(markup::ACCENT_ATTR));
        let mut texts = Vec::new();
        for text in select_all(&section, markup::TEXT_REVEAL)? {
            let delay_ms = markup::parse_delay(text.get_attribute(markup::DELAY_ATTR).as_deref());
            texts.push(TextReveal {
                node: registry.register(text)?,
                delay_ms,
            });
        }
        layout.sections.push(SectionNode {
            node: registry.register(section)?,
            accent,
            texts,
        });
    }

    if let Some(hero) = document.get_element_by_id(markup::HERO_ID) {
        layout.hero = Some(registry.register(hero)?);
    }

    for card in select_all_in(document, markup::TILT_CARD)? {
        let shine = first_in(&card, markup::CARD_SHINE)?;
        let shine = shine.map(|s| registry.register(s)).transpose()?;
        layout.tilt_cards.push(TiltCardNode {
            node: registry.register(card)?,
            shine,
        });
    }

    for element in select_all_in(document, markup::MAGNETIC)? {
        let ripple = first_in(&element, markup::RIPPLE)?;
        let ripple = ripple.map(|r| registry.register(r)).transpose()?;
        layout.magnetic.push(MagneticNode {
            node: registry.register(element)?,
            ripple,
        });
    }

    if let Some(canvas) = document.get_element_by_id(markup::PARTICLES_CANVAS_ID) {
        layout.particle_canvas = Some(registry.register(canvas)?);
    }

    if let Some(nav) = document.get_element_by_id(markup::NAV_ID) {
        layout.nav = Some(registry.register(nav)?);
    }

    let mut anchor_targets = Vec::new();
    for anchor in select_all_in(document, markup::ANCHOR)? {
        let target = anchor
            .get_attribute("href")
            .as_deref()
            .and_then(markup::anchor_target_id)
            .and_then(|id| document.get_element_by_id(id));
        let target = target.map(|t| registry.register(t)).transpose()?;
        let link = registry.register(anchor)?;
        layout.anchors.push(link);
        anchor_targets.push((link, target));
    }

    if let Some(form) = document.get_element_by_id(markup::CONTACT_FORM_ID) {
        let mut fields = Vec::new();
        for field in select_all(&form, markup::FORM_FIELD)? {
            fields.push(registry.register(field)?);
        }
        let submit = first_in(&form, markup::SUBMIT_BUTTON)?;
        let submit = submit.map(|s| registry.register(s)).transpose()?;
        layout.contact = Some(ContactFormNode {
            form: registry.register(form)?,
            fields,
            submit,
        });
    }

    for orb in select_all_in(document, markup::GRADIENT_ORB)? {
        let id = registry.register(orb)?;
        layout.orbs.push(id);
    }

    tracing::debug!(elements = registry.len(), "page discovered");
    Ok(DiscoveredPage {
        registry,
        layout,
        anchor_targets,
    })
}
