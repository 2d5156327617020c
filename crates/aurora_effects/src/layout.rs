//! What the page contains.
//!
//! The host resolves every element once at startup and hands the result to
//! the runtime builder. Systems only ever see [`NodeId`]s from here.

use aurora_core::NodeId;

/// Pointer follower elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorNodes {
    /// Follower dot.
    pub dot: NodeId,
    /// Follower glow.
    pub glow: NodeId,
}

/// A text element revealed when its section is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextReveal {
    /// The element.
    pub node: NodeId,
    /// Declared reveal delay (ms).
    pub delay_ms: f64,
}

/// A page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionNode {
    /// The section.
    pub node: NodeId,
    /// Accent tag, if declared.
    pub accent: Option<String>,
    /// Text elements in document order.
    pub texts: Vec<TextReveal>,
}

/// A tilt card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltCardNode {
    /// The card.
    pub node: NodeId,
    /// Shine overlay, if present.
    pub shine: Option<NodeId>,
}

/// A magnetic element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagneticNode {
    /// The element.
    pub node: NodeId,
    /// Ripple overlay, if present.
    pub ripple: Option<NodeId>,
}

/// The contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFormNode {
    /// The form.
    pub form: NodeId,
    /// Input and textarea fields.
    pub fields: Vec<NodeId>,
    /// Submit control, if present.
    pub submit: Option<NodeId>,
}

/// Every element the systems may act on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Pointer follower.
    pub cursor: Option<CursorNodes>,
    /// Elements that put the cursor in its hovering state.
    pub interactive: Vec<NodeId>,
    /// Sections in document order.
    pub sections: Vec<SectionNode>,
    /// Hero element.
    pub hero: Option<NodeId>,
    /// Tilt cards.
    pub tilt_cards: Vec<TiltCardNode>,
    /// Magnetic elements.
    pub magnetic: Vec<MagneticNode>,
    /// Particle canvas.
    pub particle_canvas: Option<NodeId>,
    /// Navigation bar.
    pub nav: Option<NodeId>,
    /// In-page anchor links.
    pub anchors: Vec<NodeId>,
    /// Contact form.
    pub contact: Option<ContactFormNode>,
    /// Background orbs in document order.
    pub orbs: Vec<NodeId>,
}
