//! # Particle Field
//!
//! A fixed batch of drifting particles on a full-viewport canvas, with a
//! faint line between every pair closer than `connection_distance`.
//!
//! ```text
//! per frame:
//!   Clear
//!   for p in particles: p += v × frames; wrap each axis; Circle
//!   for i < j:          d = |p_i − p_j|;  d < D → Line(alpha = L × (1 − d/D))
//! ```
//!
//! The pair pass is exactly `n(n−1)/2` distance checks; the count is capped
//! at [`MAX_PARTICLES`](aurora_core::MAX_PARTICLES) by configuration
//! validation.
//!
//! Particles are generated once from a seeded [`ChaCha8Rng`]. A resize only
//! changes the wrap bounds.

use aurora_core::config::ParticlesConfig;
use aurora_core::{Color, FrameTime, NodeId, Vec2, ViewportSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::command::{Command, CommandBuffer, DrawOp};
use crate::effect::{Effect, EffectContext};

/// One particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position (px).
    pub position: Vec2,
    /// Velocity (px per reference frame).
    pub velocity: Vec2,
    /// Radius (px).
    pub radius: f32,
    /// Fill opacity.
    pub opacity: f32,
}

/// Counters from one frame of the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Pair distances computed.
    pub pairs_checked: usize,
    /// Connections drawn.
    pub lines: usize,
}

/// Opacity of a connection between two particles `distance` apart.
///
/// Falls linearly from `max_opacity` at zero distance to `0` at
/// `threshold`; `None` at or beyond the threshold.
#[inline]
#[must_use]
pub fn connection_opacity(distance: f32, threshold: f32, max_opacity: f32) -> Option<f32> {
    (distance < threshold).then(|| max_opacity * (1.0 - distance / threshold))
}

/// Wraps one coordinate into `[0, bound]`, jumping to the opposite edge.
#[inline]
fn wrap(value: f32, bound: f32) -> f32 {
    if value < 0.0 {
        bound
    } else if value > bound {
        0.0
    } else {
        value
    }
}

/// The particles and their bounds. Host independent.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: ViewportSize,
    connection_distance: f32,
    line_opacity: f32,
    line_width: f32,
}

impl ParticleField {
    /// Generates `config.count` particles inside `bounds`.
    #[must_use]
    pub fn new(config: &ParticlesConfig, bounds: ViewportSize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let particles = (0..config.count)
            .map(|_| Particle {
                position: Vec2::new(
                    rng.gen::<f32>() * bounds.width,
                    rng.gen::<f32>() * bounds.height,
                ),
                radius: config.radius_min + rng.gen::<f32>() * config.radius_spread,
                velocity: Vec2::new(
                    (rng.gen::<f32>() - 0.5) * config.speed,
                    (rng.gen::<f32>() - 0.5) * config.speed,
                ),
                opacity: config.opacity_min + rng.gen::<f32>() * config.opacity_spread,
            })
            .collect();

        Self::from_particles(config, bounds, particles)
    }

    /// Builds a field from explicit particles.
    #[must_use]
    pub fn from_particles(
        config: &ParticlesConfig,
        bounds: ViewportSize,
        particles: Vec<Particle>,
    ) -> Self {
        Self {
            particles,
            bounds,
            connection_distance: config.connection_distance,
            line_opacity: config.line_opacity,
            line_width: config.line_width,
        }
    }

    /// The particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Wrap bounds.
    #[must_use]
    pub fn bounds(&self) -> ViewportSize {
        self.bounds
    }

    /// Changes the wrap bounds. Particles keep their positions.
    pub fn resize(&mut self, bounds: ViewportSize) {
        self.bounds = bounds;
    }

    /// Moves every particle by `frames` reference frames of velocity.
    pub fn advance(&mut self, frames: f32) {
        let ViewportSize { width, height } = self.bounds;
        for particle in &mut self.particles {
            particle.position += particle.velocity * frames;
            particle.position.x = wrap(particle.position.x, width);
            particle.position.y = wrap(particle.position.y, height);
        }
    }

    /// Calls `connect(a, b, opacity)` for every connected pair.
    pub fn for_each_connection(&self, mut connect: impl FnMut(Vec2, Vec2, f32)) -> FieldStats {
        let mut stats = FieldStats::default();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                stats.pairs_checked += 1;
                let distance = a.position.distance(b.position);
                let opacity =
                    connection_opacity(distance, self.connection_distance, self.line_opacity);
                if let Some(opacity) = opacity {
                    stats.lines += 1;
                    connect(a.position, b.position, opacity);
                }
            }
        }
        stats
    }

    /// Advances one frame and draws it onto `surface`.
    pub fn render(
        &mut self,
        frames: f32,
        surface: NodeId,
        commands: &mut CommandBuffer,
    ) -> FieldStats {
        commands.draw(surface, DrawOp::Clear);
        self.advance(frames);
        for particle in &self.particles {
            commands.draw(
                surface,
                DrawOp::Circle {
                    center: particle.position,
                    radius: particle.radius,
                    color: Color::WHITE.with_alpha(particle.opacity),
                },
            );
        }
        let width = self.line_width;
        self.for_each_connection(|from, to, opacity| {
            commands.draw(
                surface,
                DrawOp::Line {
                    from,
                    to,
                    width,
                    color: Color::WHITE.with_alpha(opacity),
                },
            );
        })
    }
}

/// Runs the field on `#particles-canvas`.
pub struct ParticlesSystem {
    surface: NodeId,
    field: ParticleField,
    last_stats: FieldStats,
}

impl ParticlesSystem {
    /// Creates the system for the canvas `surface`.
    #[must_use]
    pub fn new(
        config: &ParticlesConfig,
        surface: NodeId,
        viewport: ViewportSize,
        seed: u64,
    ) -> Self {
        Self {
            surface,
            field: ParticleField::new(config, viewport, seed),
            last_stats: FieldStats::default(),
        }
    }

    /// The field.
    #[must_use]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Counters from the last frame.
    #[must_use]
    pub fn last_stats(&self) -> FieldStats {
        self.last_stats
    }

    fn resize_surface(&self, cx: &mut EffectContext<'_>) {
        let bounds = self.field.bounds();
        cx.emit(Command::ResizeSurface {
            surface: self.surface,
            width: bounds.width,
            height: bounds.height,
        });
    }
}

impl Effect for ParticlesSystem {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn start(&mut self, cx: &mut EffectContext<'_>) {
        self.resize_surface(cx);
    }

    fn on_viewport_resized(&mut self, viewport: ViewportSize, cx: &mut EffectContext<'_>) {
        self.field.resize(viewport);
        self.resize_surface(cx);
    }

    fn update(&mut self, frame: &FrameTime, cx: &mut EffectContext<'_>) {
        self.last_stats = self.field.render(frame.frames, self.surface, cx.commands());
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::systems::harness::Harness;

    fn config() -> ParticlesConfig {
        ParticlesConfig::default()
    }

    fn still(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 1.0,
            opacity: 0.2,
        }
    }

    #[test]
    fn test_generation_ranges_and_determinism() {
        let bounds = ViewportSize::new(800.0, 600.0);
        let field = ParticleField::new(&config(), bounds, 7);
        assert_eq!(field.particles().len(), 40);
        for p in field.particles() {
            assert!((0.0..=800.0).contains(&p.position.x));
            assert!((0.0..=600.0).contains(&p.position.y));
            assert!((1.0..=3.0).contains(&p.radius));
            assert!((0.1..=0.4).contains(&p.opacity));
            assert!(p.velocity.x.abs() <= 0.1 && p.velocity.y.abs() <= 0.1);
        }
        let again = ParticleField::new(&config(), bounds, 7);
        assert_eq!(field.particles(), again.particles());
    }

    #[test]
    fn test_wrap_each_axis_keeps_velocity() {
        let bounds = ViewportSize::new(100.0, 100.0);
        let particle = Particle {
            position: Vec2::new(99.95, 50.0),
            velocity: Vec2::new(0.1, 0.0),
            radius: 1.0,
            opacity: 0.2,
        };
        let mut field = ParticleField::from_particles(&config(), bounds, vec![particle]);
        field.advance(1.0);
        let moved = field.particles()[0];
        assert_eq!(moved.position.x, 0.0);
        assert_eq!(moved.position.y, 50.0);
        assert_eq!(moved.velocity, Vec2::new(0.1, 0.0));

        let mut field = ParticleField::from_particles(
            &config(),
            bounds,
            vec![Particle {
                position: Vec2::new(20.0, 0.05),
                velocity: Vec2::new(0.0, -0.1),
                ..particle
            }],
        );
        field.advance(1.0);
        assert_eq!(field.particles()[0].position, Vec2::new(20.0, 100.0));
    }

    #[test]
    fn test_connection_opacity_falloff() {
        assert_eq!(connection_opacity(120.0, 120.0, 0.12), None);
        assert_eq!(connection_opacity(150.0, 120.0, 0.12), None);
        assert_eq!(connection_opacity(0.0, 120.0, 0.12), Some(0.12));
        let near_edge = connection_opacity(119.999, 120.0, 0.12).unwrap();
        assert!(near_edge > 0.0 && near_edge < 1e-4);
        assert!((connection_opacity(60.0, 120.0, 0.12).unwrap() - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_forty_particles_check_780_pairs() {
        let mut field = ParticleField::new(&config(), ViewportSize::new(1280.0, 720.0), 42);
        let mut commands = CommandBuffer::new();
        let stats = field.render(1.0, NodeId(3), &mut commands);
        assert_eq!(stats.pairs_checked, 780);
        assert_eq!(commands.len(), 1 + 40 + stats.lines);
        assert_eq!(commands.as_slice()[0], Command::Draw { surface: NodeId(3), op: DrawOp::Clear });
    }

    #[test]
    fn test_lines_only_below_threshold() {
        let field = ParticleField::from_particles(
            &config(),
            ViewportSize::new(1000.0, 1000.0),
            vec![still(0.0, 0.0), still(100.0, 0.0), still(220.0, 0.0)],
        );
        let mut pairs = Vec::new();
        let stats = field.for_each_connection(|a, b, _| pairs.push((a.x, b.x)));
        assert_eq!(stats.pairs_checked, 3);
        // 100-220 sits exactly on the threshold
        assert_eq!(pairs, vec![(0.0, 100.0)]);
        assert_eq!(stats.lines, 1);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut harness = Harness::new();
        let mut system =
            ParticlesSystem::new(&config(), NodeId(3), ViewportSize::new(800.0, 600.0), 1);
        let before = system.field().particles().to_vec();

        harness.start(&mut system, 0.0);
        assert_eq!(
            harness.take(),
            vec![Command::ResizeSurface { surface: NodeId(3), width: 800.0, height: 600.0 }]
        );

        let resized = ViewportSize::new(400.0, 300.0);
        harness.resize(&mut system, 10.0, resized);
        assert_eq!(
            harness.take(),
            vec![Command::ResizeSurface { surface: NodeId(3), width: 400.0, height: 300.0 }]
        );
        assert_eq!(system.field().particles(), before.as_slice());
        assert_eq!(system.field().bounds(), resized);
    }

    proptest! {
        #[test]
        fn test_wrapped_particles_stay_in_bounds(
            x in 0.0_f32..=800.0,
            y in 0.0_f32..=600.0,
            vx in -0.1_f32..=0.1,
            vy in -0.1_f32..=0.1,
            frames in 0.0_f32..=6.0,
        ) {
            let bounds = ViewportSize::new(800.0, 600.0);
            let particle = Particle {
                position: Vec2::new(x, y),
                velocity: Vec2::new(vx, vy),
                radius: 1.0,
                opacity: 0.2,
            };
            let mut field = ParticleField::from_particles(&config(), bounds, vec![particle]);
            field.advance(frames);

            let moved = field.particles()[0];
            prop_assert!((0.0..=800.0).contains(&moved.position.x));
            prop_assert!((0.0..=600.0).contains(&moved.position.y));
            prop_assert_eq!(moved.velocity, particle.velocity);
        }

        #[test]
        fn test_connection_opacity_bounded(distance in 0.0_f32..400.0) {
            match connection_opacity(distance, 120.0, 0.12) {
                Some(alpha) => {
                    prop_assert!(distance < 120.0);
                    prop_assert!((0.0..=0.12).contains(&alpha));
                }
                None => prop_assert!(distance >= 120.0),
            }
        }
    }
}
