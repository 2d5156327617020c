//! The page contract: selectors, attributes and how their values parse.

use aurora_core::NodeId;

/// Follower dot.
pub const CURSOR_DOT: &str = ".cursor-dot";
/// Follower glow.
pub const CURSOR_GLOW: &str = ".cursor-glow";
/// Elements that put the cursor in its hovering state.
pub const INTERACTIVE: &str = "a, button, .magnetic-element, .magnetic-btn, .tilt-card, input, textarea";
/// Page sections.
pub const SECTION: &str = ".section";
/// Text revealed when its section is entered.
pub const TEXT_REVEAL: &str = ".text-reveal";
/// Hero element id.
pub const HERO_ID: &str = "hero";
/// Tilt cards.
pub const TILT_CARD: &str = ".tilt-card";
/// Shine overlay inside a card.
pub const CARD_SHINE: &str = ".card-shine";
/// Magnetic elements.
pub const MAGNETIC: &str = ".magnetic-element, .magnetic-btn";
/// Ripple overlay inside a magnetic element.
pub const RIPPLE: &str = ".btn-ripple";
/// Particle canvas id.
pub const PARTICLES_CANVAS_ID: &str = "particles-canvas";
/// Navigation bar id.
pub const NAV_ID: &str = "nav";
/// In-page anchors.
pub const ANCHOR: &str = r##"a[href^="#"]"##;
/// Contact form id.
pub const CONTACT_FORM_ID: &str = "contactForm";
/// Fields inside the contact form.
pub const FORM_FIELD: &str = "input, textarea";
/// Submit control inside the contact form.
pub const SUBMIT_BUTTON: &str = ".submit-btn";
/// Background orbs.
pub const GRADIENT_ORB: &str = ".gradient-orb";

/// Accent tag attribute on sections.
pub const ACCENT_ATTR: &str = "data-accent";
/// Reveal delay attribute on text elements (ms).
pub const DELAY_ATTR: &str = "data-delay";
/// Attribute carrying the node id assigned at discovery.
pub const NODE_ATTR: &str = "data-fx-node";

/// Parses a `data-delay` value the way the page markup expects: leading
/// whitespace, an optional sign, then as many decimal digits as present.
/// A `0x`/`0X` prefix switches to hex digits. Anything unparsable is `0`.
///
/// ```
/// use aurora_web::markup::parse_delay;
///
/// assert_eq!(parse_delay(Some("  150ms")), 150.0);
/// assert_eq!(parse_delay(Some("1.9")), 1.0);
/// assert_eq!(parse_delay(Some("0x10")), 16.0);
/// assert_eq!(parse_delay(Some("abc")), 0.0);
/// assert_eq!(parse_delay(None), 0.0);
/// ```
#[must_use]
pub fn parse_delay(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        _ => (10, digits),
    };
    let end = digits
        .bytes()
        .position(|b| !char::from(b).is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return 0.0;
    }
    let magnitude = digits[..end]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// The element id an in-page `href` points at (`"#about"` → `"about"`).
#[must_use]
pub fn anchor_target_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// An accent tag, if the attribute is present and not blank.
#[must_use]
pub fn accent_tag(value: Option<String>) -> Option<String> {
    value.filter(|tag| !tag.trim().is_empty())
}

/// Reads back an id written to [`NODE_ATTR`].
#[must_use]
pub fn parse_node_id(value: &str) -> Option<NodeId> {
    value.parse().ok().map(NodeId)
}
