//! Declarative page mutations.
//!
//! Systems never touch the page. They push [`Command`]s into a
//! [`CommandBuffer`] and the host applies them in order after each event
//! and each frame.

use std::fmt;

use aurora_core::{Color, NodeId, Vec2};

/// Class names the systems toggle.
pub mod classes {
    /// Cursor dot while an interactive element is hovered.
    pub const HOVERING: &str = "hovering";
    /// Section (and hero) once entered.
    pub const IN_VIEW: &str = "in-view";
    /// Text element once revealed.
    pub const REVEALED: &str = "revealed";
    /// Ripple overlay while its animation plays.
    pub const ACTIVE: &str = "active";
    /// Navigation bar past the scroll threshold.
    pub const SCROLLED: &str = "scrolled";
    /// Form field that failed validation.
    pub const ERROR: &str = "error";
}

/// Custom property carrying the accent hue.
pub const ACCENT_HUE_VAR: &str = "--accent-h";

/// A CSS transform the systems produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Card tilt.
    Tilt {
        /// Perspective distance (px).
        perspective_px: f32,
        /// Rotation around the horizontal axis (degrees).
        rotate_x_deg: f32,
        /// Rotation around the vertical axis (degrees).
        rotate_y_deg: f32,
        /// Uniform scale.
        scale: f32,
    },
    /// Plain 2D offset (px).
    Translate(Vec2),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Tilt {
                perspective_px,
                rotate_x_deg,
                rotate_y_deg,
                scale,
            } => write!(
                f,
                "perspective({perspective_px}px) rotateX({rotate_x_deg}deg) \
                 rotateY({rotate_y_deg}deg) scale3d({scale},{scale},{scale})"
            ),
            Self::Translate(offset) => write!(f, "translate({}px, {}px)", offset.x, offset.y),
        }
    }
}

/// A background override.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Radial highlight centered at a percent position.
    Shine {
        /// Highlight center (percent of each side).
        at_percent: Vec2,
        /// Alpha at the center.
        alpha: f32,
        /// Fade-out stop (percent of radius).
        fade_percent: f32,
    },
    /// Any CSS background value.
    Css(String),
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shine {
                at_percent,
                alpha,
                fade_percent,
            } => write!(
                f,
                "radial-gradient(circle at {}% {}%, {} 0%, transparent {}%)",
                at_percent.x,
                at_percent.y,
                Color::WHITE.with_alpha(*alpha),
                fade_percent
            ),
            Self::Css(value) => f.write_str(value),
        }
    }
}

/// A 2D canvas operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    /// Clear the whole surface.
    Clear,
    /// Filled circle.
    Circle {
        /// Center (px).
        center: Vec2,
        /// Radius (px).
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Stroked segment.
    Line {
        /// Start (px).
        from: Vec2,
        /// End (px).
        to: Vec2,
        /// Stroke width (px).
        width: f32,
        /// Stroke color.
        color: Color,
    },
}

/// One page mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set `left`/`top` in pixels.
    SetPosition {
        /// Target element.
        node: NodeId,
        /// Position (px).
        position: Vec2,
    },
    /// Set `transform`.
    SetTransform {
        /// Target element.
        node: NodeId,
        /// Transform.
        transform: Transform,
    },
    /// Set `opacity`.
    SetOpacity {
        /// Target element.
        node: NodeId,
        /// Opacity.
        opacity: f32,
    },
    /// Set or clear the `background` override.
    SetBackground {
        /// Target element.
        node: NodeId,
        /// New value; `None` removes the override.
        background: Option<Background>,
    },
    /// Set or clear the `transition` override.
    SetTransition {
        /// Target element.
        node: NodeId,
        /// New value; `None` removes the override.
        transition: Option<String>,
    },
    /// Add a class.
    AddClass {
        /// Target element.
        node: NodeId,
        /// Class name.
        class: &'static str,
    },
    /// Remove a class.
    RemoveClass {
        /// Target element.
        node: NodeId,
        /// Class name.
        class: &'static str,
    },
    /// Remove a class, force layout, add it back (restarts a CSS animation).
    ReplayAnimation {
        /// Target element.
        node: NodeId,
        /// Class name.
        class: &'static str,
    },
    /// Set a custom property on the document root.
    SetRootVar {
        /// Property name including the leading dashes.
        name: &'static str,
        /// Value.
        value: String,
    },
    /// Smoothly scroll an element to the top of the viewport.
    ScrollIntoView {
        /// Target element.
        node: NodeId,
    },
    /// Replace an element's markup.
    SetHtml {
        /// Target element.
        node: NodeId,
        /// Markup.
        html: String,
    },
    /// Reset a form's fields.
    ResetForm {
        /// The form.
        node: NodeId,
    },
    /// Resize a canvas backing store.
    ResizeSurface {
        /// The canvas.
        surface: NodeId,
        /// Width (px).
        width: f32,
        /// Height (px).
        height: f32,
    },
    /// Draw on a canvas.
    Draw {
        /// The canvas.
        surface: NodeId,
        /// Operation.
        op: DrawOp,
    },
}

/// Collects commands between host flushes.
#[derive(Debug)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
        }
    }

    /// Adds a command.
    #[inline]
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Adds multiple commands.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Adds a canvas operation.
    #[inline]
    pub fn draw(&mut self, surface: NodeId, op: DrawOp) {
        self.commands.push(Command::Draw { surface, op });
    }

    /// Pending commands, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// Takes every pending command, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Drops every pending command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}
