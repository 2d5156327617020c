//! # Effects Configuration
//!
//! Loaded once at startup from TOML. Every section is optional and every
//! field defaults to the tuned value the page was designed with:
//!
//! ```toml
//! [modules]
//! particles = false        # turn the canvas field off entirely
//!
//! [tilt]
//! max_angle_deg = 6.0
//!
//! [sections.palette]
//! cyan = 195.0
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Hsl;
use crate::easing::EasingFactor;
use crate::error::{EffectsError, EffectsResult};

/// Upper bound on the particle count. The connection pass is O(n²).
pub const MAX_PARTICLES: usize = 500;

/// Which systems may activate. A system also needs its elements present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct ModuleToggles {
    /// Pointer follower dot and glow.
    pub cursor: bool,
    /// Section reveals and accent theming.
    pub sections: bool,
    /// 3D card tilt.
    pub tilt: bool,
    /// Magnetic buttons.
    pub magnetic: bool,
    /// Canvas particle field.
    pub particles: bool,
    /// Navigation bar styling and anchor scrolling.
    pub navigation: bool,
    /// Contact form feedback.
    pub contact: bool,
    /// Background orb parallax.
    pub parallax: bool,
}

impl Default for ModuleToggles {
    fn default() -> Self {
        Self {
            cursor: true,
            sections: true,
            tilt: true,
            magnetic: true,
            particles: true,
            navigation: true,
            contact: true,
            parallax: true,
        }
    }
}

/// Frame timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Frame length the easing factors were tuned for (ms).
    pub reference_frame_ms: f64,
    /// Longest frame counted toward easing and particle motion (ms).
    pub max_frame_ms: f64,
    /// Rescale easing factors by measured frame time.
    pub normalize_easing: bool,
    /// Quiet period before a resize is applied (ms).
    pub resize_debounce_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reference_frame_ms: 1000.0 / 60.0,
            max_frame_ms: 100.0,
            normalize_easing: true,
            resize_debounce_ms: 200.0,
        }
    }
}

/// Pointer follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
    /// Easing of the follower toward the pointer (1 = direct).
    pub easing: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { easing: 1.0 }
    }
}

/// Card tilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TiltConfig {
    /// Rotation at the card edge (degrees).
    pub max_angle_deg: f32,
    /// Rotation easing.
    pub easing: f32,
    /// Scale while tilted.
    pub hover_scale: f32,
    /// Target angle below which the card counts as resting (degrees).
    pub rest_epsilon_deg: f32,
    /// CSS perspective distance (px).
    pub perspective_px: f32,
    /// How long the leave transition override stays applied (ms).
    pub leave_transition_ms: f64,
    /// CSS transition applied on leave.
    pub leave_transition: String,
    /// Alpha at the center of the shine highlight.
    pub shine_alpha: f32,
    /// Where the shine gradient fades out (percent of radius).
    pub shine_fade_percent: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_angle_deg: 8.0,
            easing: 0.1,
            hover_scale: 1.02,
            rest_epsilon_deg: 0.01,
            perspective_px: 1000.0,
            leave_transition_ms: 500.0,
            leave_transition: "transform 0.5s cubic-bezier(0.25, 0.46, 0.45, 0.94)".to_owned(),
            shine_alpha: 0.12,
            shine_fade_percent: 60.0,
        }
    }
}

/// Magnetic elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MagneticConfig {
    /// Fraction of the pointer's offset from center the element moves.
    pub strength: f32,
    /// Offset easing.
    pub easing: f32,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: 0.25,
            easing: 0.15,
        }
    }
}

/// Particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticlesConfig {
    /// Number of particles (at most [`MAX_PARTICLES`]).
    pub count: usize,
    /// Velocity spread per axis (px per reference frame).
    pub speed: f32,
    /// Pairs closer than this are connected (px).
    pub connection_distance: f32,
    /// Smallest particle radius (px).
    pub radius_min: f32,
    /// Random radius added on top of `radius_min` (px).
    pub radius_spread: f32,
    /// Lowest particle opacity.
    pub opacity_min: f32,
    /// Random opacity added on top of `opacity_min`.
    pub opacity_spread: f32,
    /// Opacity of a connection at zero distance.
    pub line_opacity: f32,
    /// Connection stroke width (px).
    pub line_width: f32,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            count: 40,
            speed: 0.2,
            connection_distance: 120.0,
            radius_min: 1.0,
            radius_spread: 2.0,
            opacity_min: 0.1,
            opacity_spread: 0.3,
            line_opacity: 0.12,
            line_width: 0.5,
        }
    }
}

/// Section reveals and accent theming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    /// Visibility thresholds the host observes.
    pub thresholds: Vec<f32>,
    /// Visible ratio a section must exceed to count as entered.
    pub enter_ratio: f32,
    /// Extra delay per subsequent text element (ms).
    pub reveal_stagger_ms: f64,
    /// Accent hue easing.
    pub accent_easing: f32,
    /// Accent hue before any section is entered (degrees).
    pub initial_hue: f32,
    /// Accent tag to hue (degrees).
    pub palette: BTreeMap<String, f32>,
    /// Delay before the hero gets `in-view` (ms). Applies whether or not
    /// `modules.sections` is on.
    pub hero_reveal_ms: f64,
}

fn default_palette() -> BTreeMap<String, f32> {
    [
        ("cyan", 195.0),
        ("violet", 270.0),
        ("rose", 340.0),
        ("amber", 35.0),
        ("emerald", 160.0),
    ]
    .into_iter()
    .map(|(tag, hue)| (tag.to_owned(), hue))
    .collect()
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![0.15, 0.5],
            enter_ratio: 0.15,
            reveal_stagger_ms: 80.0,
            accent_easing: 0.02,
            initial_hue: 195.0,
            palette: default_palette(),
            hero_reveal_ms: 200.0,
        }
    }
}

/// Navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Scroll offset past which the bar is styled as scrolled (px).
    pub scrolled_threshold_px: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 80.0,
        }
    }
}

/// Contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// How long the sent state is shown (ms).
    pub sent_duration_ms: f64,
    /// Submit control markup while sent.
    pub sent_html: String,
    /// Submit control markup at rest.
    pub idle_html: String,
    /// Submit control background while sent.
    pub sent_background: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            sent_duration_ms: 2500.0,
            sent_html: r#"<span class="btn-text">✓ Đã gửi!</span>"#.to_owned(),
            idle_html: concat!(
                r#"<span class="btn-text">Gửi tin nhắn</span>"#,
                r#"<span class="btn-icon">→</span>"#,
                r#"<div class="btn-glow"></div>"#,
            )
            .to_owned(),
            sent_background: Hsl::new(160.0, 100.0, 45.0).to_string(),
        }
    }
}

/// Background orb parallax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    /// Offset per pixel of pointer distance from the viewport center.
    pub pointer_factor: f32,
    /// Scroll offset multiplier for the first orb; the i-th orb uses `i+1` times this.
    pub scroll_speed: f32,
    /// Pointer offset easing (1 = direct).
    pub easing: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            pointer_factor: 0.015,
            scroll_speed: 0.02,
            easing: 1.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Module toggles.
    pub modules: ModuleToggles,
    /// Frame timing.
    pub timing: TimingConfig,
    /// Pointer follower.
    pub cursor: CursorConfig,
    /// Card tilt.
    pub tilt: TiltConfig,
    /// Magnetic elements.
    pub magnetic: MagneticConfig,
    /// Particle field.
    pub particles: ParticlesConfig,
    /// Sections and accent.
    pub sections: SectionsConfig,
    /// Navigation bar.
    pub navigation: NavigationConfig,
    /// Contact form.
    pub contact: ContactConfig,
    /// Orb parallax.
    pub parallax: ParallaxConfig,
}

impl EffectsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`EffectsError::ConfigParse`] for malformed TOML or unknown keys,
    /// [`EffectsError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> EffectsResult<Self> {
        let config: Self = toml::from_str(source).map_err(|err| {
            tracing::debug!("effects configuration is not valid TOML: {err}");
            EffectsError::from(err)
        })?;
        if let Err(err) = config.validate() {
            tracing::debug!("effects configuration out of range: {err}");
            return Err(err);
        }
        Ok(config)
    }

    /// Checks every value against its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> EffectsResult<()> {
        for (name, value) in [
            ("cursor.easing", self.cursor.easing),
            ("tilt.easing", self.tilt.easing),
            ("magnetic.easing", self.magnetic.easing),
            ("sections.accent_easing", self.sections.accent_easing),
            ("parallax.easing", self.parallax.easing),
        ] {
            EasingFactor::new(value).map_err(|e| named(name, &e))?;
        }

        let timing = &self.timing;
        ensure(timing.reference_frame_ms > 0.0, "timing.reference_frame_ms must be positive")?;
        ensure(
            timing.max_frame_ms >= timing.reference_frame_ms,
            "timing.max_frame_ms must be at least one reference frame",
        )?;
        ensure(timing.resize_debounce_ms >= 0.0, "timing.resize_debounce_ms must not be negative")?;

        let particles = &self.particles;
        ensure(
            particles.count <= MAX_PARTICLES,
            "particles.count exceeds the connection-pass limit",
        )?;
        ensure(
            particles.connection_distance > 0.0,
            "particles.connection_distance must be positive",
        )?;
        ensure(
            particles.radius_min > 0.0 && particles.radius_spread >= 0.0,
            "particles radius must be positive",
        )?;
        ensure(
            (0.0..=1.0).contains(&particles.opacity_min)
                && (0.0..=1.0).contains(&(particles.opacity_min + particles.opacity_spread))
                && (0.0..=1.0).contains(&particles.line_opacity),
            "particles opacities must stay within 0..=1",
        )?;

        let sections = &self.sections;
        ensure(
            sections.thresholds.iter().all(|t| (0.0..=1.0).contains(t)),
            "sections.thresholds must be within 0..=1",
        )?;
        ensure(
            (0.0..1.0).contains(&sections.enter_ratio),
            "sections.enter_ratio must be within 0..1",
        )?;
        ensure(
            sections.palette.values().all(|h| (0.0..=360.0).contains(h))
                && (0.0..=360.0).contains(&sections.initial_hue),
            "accent hues must be within 0..=360 degrees",
        )?;

        ensure(self.tilt.max_angle_deg >= 0.0, "tilt.max_angle_deg must not be negative")?;
        ensure(
            self.contact.sent_duration_ms >= 0.0,
            "contact.sent_duration_ms must not be negative",
        )?;
        Ok(())
    }
}

fn ensure(condition: bool, message: &str) -> EffectsResult<()> {
    if condition {
        Ok(())
    } else {
        Err(EffectsError::InvalidConfig(message.to_owned()))
    }
}

fn named(name: &str, error: &EffectsError) -> EffectsError {
    EffectsError::InvalidConfig(format!("{name}: {error}"))
}
