//! # Page Scenario Tests
//!
//! Drives the whole runtime through a full page layout with virtual time.

use aurora_core::{EffectsConfig, NodeId, Rect, Vec2, ViewportSize};
use aurora_effects::{
    classes, Background, Command, ContactFormNode, CursorNodes, DrawOp, EffectsRuntime,
    MagneticNode, PageEvent, PageLayout, SectionNode, TextReveal, TiltCardNode, Transform,
};

const DOT: NodeId = NodeId(1);
const GLOW: NodeId = NodeId(2);
const HERO: NodeId = NodeId(10);
const ABOUT: NodeId = NodeId(11);
const ABOUT_TITLE: NodeId = NodeId(12);
const CARD: NodeId = NodeId(20);
const SHINE: NodeId = NodeId(21);
const BUTTON: NodeId = NodeId(30);
const RIPPLE: NodeId = NodeId(31);
const CANVAS: NodeId = NodeId(40);
const NAV: NodeId = NodeId(50);
const LINK: NodeId = NodeId(51);
const FORM: NodeId = NodeId(60);
const FIELD: NodeId = NodeId(61);
const SUBMIT: NodeId = NodeId(62);
const ORB: NodeId = NodeId(70);

fn full_page() -> PageLayout {
    PageLayout {
        cursor: Some(CursorNodes { dot: DOT, glow: GLOW }),
        interactive: vec![CARD, BUTTON, LINK, FIELD],
        sections: vec![SectionNode {
            node: ABOUT,
            accent: Some("rose".to_owned()),
            texts: vec![TextReveal {
                node: ABOUT_TITLE,
                delay_ms: 0.0,
            }],
        }],
        hero: Some(HERO),
        tilt_cards: vec![TiltCardNode {
            node: CARD,
            shine: Some(SHINE),
        }],
        magnetic: vec![MagneticNode {
            node: BUTTON,
            ripple: Some(RIPPLE),
        }],
        particle_canvas: Some(CANVAS),
        nav: Some(NAV),
        anchors: vec![LINK],
        contact: Some(ContactFormNode {
            form: FORM,
            fields: vec![FIELD],
            submit: Some(SUBMIT),
        }),
        orbs: vec![ORB],
    }
}

fn start() -> EffectsRuntime {
    EffectsRuntime::builder(EffectsConfig::default())
        .layout(full_page())
        .viewport(ViewportSize::new(1280.0, 720.0))
        .seed(2024)
        .build(0.0)
        .unwrap()
}

/// Test: Every system activates on a complete page.
#[test]
fn test_full_page_activates_all_systems() {
    let runtime = start();
    let names: Vec<&str> = runtime.active_effects().into_iter().map(|(_, n)| n).collect();
    assert_eq!(
        names,
        vec![
            "cursor",
            "sections",
            "tilt",
            "magnetic",
            "particles",
            "navigation",
            "contact",
            "parallax",
        ]
    );
}

/// Test: Toggles turn systems off even when their elements exist.
#[test]
fn test_module_toggles() {
    let config =
        EffectsConfig::from_toml_str("[modules]\ntilt = false\ncontact = false\n").unwrap();
    let runtime = EffectsRuntime::builder(config)
        .layout(full_page())
        .build(0.0)
        .unwrap();
    assert!(runtime.handle_of("tilt").is_none());
    assert!(runtime.handle_of("contact").is_none());
    assert_eq!(runtime.active_effects().len(), 6);
}

/// Test: Five resizes 50 ms apart produce one surface resize, 200 ms after the last.
#[test]
fn test_resize_burst_debounced() {
    let mut runtime = start();
    runtime.take_commands();
    let sender = runtime.event_sender();

    for (i, width) in [900.0, 901.0, 902.0, 903.0, 904.0].into_iter().enumerate() {
        let at = 1000.0 + 50.0 * i as f64;
        sender.send(at, PageEvent::Resize { width, height: 500.0 });
        runtime.frame(at);
    }

    let resizes = |commands: Vec<Command>| {
        commands
            .into_iter()
            .filter(|c| matches!(c, Command::ResizeSurface { .. }))
            .collect::<Vec<_>>()
    };

    runtime.frame(1399.0);
    assert!(resizes(runtime.take_commands()).is_empty());
    assert_eq!(runtime.shared().viewport, ViewportSize::new(1280.0, 720.0));

    runtime.frame(1400.0);
    assert_eq!(
        resizes(runtime.take_commands()),
        vec![Command::ResizeSurface { surface: CANVAS, width: 904.0, height: 500.0 }]
    );
    assert_eq!(runtime.shared().viewport, ViewportSize::new(904.0, 500.0));

    runtime.frame(5000.0);
    assert!(resizes(runtime.take_commands()).is_empty());
}

/// Test: Forty particles draw forty circles and connect only close pairs.
#[test]
fn test_particle_frame_draws_field() {
    let mut runtime = start();
    runtime.take_commands();
    runtime.frame(16.0);

    let commands = runtime.take_commands();
    let draws: Vec<DrawOp> = commands
        .iter()
        .filter_map(|c| match c {
            Command::Draw { surface, op } if *surface == CANVAS => Some(*op),
            _ => None,
        })
        .collect();
    assert_eq!(draws[0], DrawOp::Clear);
    assert_eq!(draws.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count(), 40);
    for op in &draws {
        if let DrawOp::Line { from, to, width, color } = op {
            assert!(from.distance(*to) < 120.0);
            assert_eq!(*width, 0.5);
            assert!(color.a > 0.0 && color.a <= 0.12);
        }
    }
}

/// Test: The tilt scenario through the runtime.
#[test]
fn test_tilt_targets_and_leave() {
    let mut runtime = start();
    let bounds = Rect::from_center(Vec2::new(450.0, 300.0), Vec2::new(100.0, 50.0));

    runtime.handle_event(100.0, PageEvent::PointerEnter { node: CARD });
    runtime.handle_event(
        101.0,
        PageEvent::PointerMoveWithin {
            node: CARD,
            position: Vec2::new(500.0, 300.0),
            bounds,
        },
    );
    assert!(runtime.pending_commands().contains(&Command::SetBackground {
        node: SHINE,
        background: Some(Background::Shine {
            at_percent: Vec2::new(75.0, 50.0),
            alpha: 0.12,
            fade_percent: 60.0,
        }),
    }));

    for i in 0..200 {
        runtime.frame(100.0 + f64::from(i) * (1000.0 / 60.0));
    }
    let settled = runtime.take_commands().into_iter().rev().find_map(|c| match c {
        Command::SetTransform {
            node: CARD,
            transform: Transform::Tilt { rotate_x_deg, rotate_y_deg, .. },
        } => Some((rotate_x_deg, rotate_y_deg)),
        _ => None,
    });
    let (rotate_x, rotate_y) = settled.unwrap();
    assert!(rotate_x.abs() < 1e-3);
    assert!((rotate_y - 4.0).abs() < 1e-3);

    runtime.handle_event(5000.0, PageEvent::PointerLeave { node: CARD });
    runtime.frame(5499.0);
    assert!(!runtime
        .take_commands()
        .contains(&Command::SetTransition { node: CARD, transition: None }));
    runtime.frame(5500.0);
    assert!(runtime
        .take_commands()
        .contains(&Command::SetTransition { node: CARD, transition: None }));
}

/// Test: Hero in view at 200 ms, section reveal and accent on entry.
#[test]
fn test_hero_and_section_reveal() {
    let mut runtime = start();
    runtime.frame(199.0);
    assert!(!runtime
        .take_commands()
        .contains(&Command::AddClass { node: HERO, class: classes::IN_VIEW }));
    runtime.frame(200.0);
    assert!(runtime
        .take_commands()
        .contains(&Command::AddClass { node: HERO, class: classes::IN_VIEW }));

    runtime.handle_event(
        300.0,
        PageEvent::SectionVisibility {
            node: ABOUT,
            intersecting: true,
            ratio: 0.5,
        },
    );
    runtime.frame(316.0);
    let commands = runtime.take_commands();
    assert!(commands.contains(&Command::AddClass { node: ABOUT, class: classes::IN_VIEW }));
    assert!(commands.contains(&Command::AddClass { node: ABOUT_TITLE, class: classes::REVEALED }));

    // rose = 340: the hue moves up from 195
    let hue = commands.iter().rev().find_map(|c| match c {
        Command::SetRootVar { value, .. } => value.parse::<f32>().ok(),
        _ => None,
    });
    assert!(hue.unwrap() > 195.0);
}

/// Test: Submit shows the sent state now and reverts once, 2500 ms later.
#[test]
fn test_contact_submit_flow() {
    let mut runtime = start();
    runtime.take_commands();

    runtime.handle_event(1000.0, PageEvent::FieldInvalid { node: FIELD });
    runtime.handle_event(1000.0, PageEvent::FormSubmit { node: FORM });
    let shown = runtime.take_commands();
    assert!(shown.contains(&Command::AddClass { node: FIELD, class: classes::ERROR }));
    assert!(shown.contains(&Command::SetBackground {
        node: SUBMIT,
        background: Some(Background::Css("hsl(160, 100%, 45%)".to_owned())),
    }));

    runtime.frame(3499.0);
    assert!(!runtime.take_commands().contains(&Command::ResetForm { node: FORM }));

    runtime.frame(3500.0);
    let reverted = runtime.take_commands();
    assert_eq!(
        reverted.iter().filter(|c| **c == Command::ResetForm { node: FORM }).count(),
        1
    );

    runtime.frame(7000.0);
    assert!(!runtime.take_commands().contains(&Command::ResetForm { node: FORM }));
}

/// Test: Cursor, magnetic ripple, nav styling and anchors together.
#[test]
fn test_pointer_and_navigation() {
    let mut runtime = start();
    runtime.take_commands();

    runtime.handle_event(10.0, PageEvent::PointerMove { position: Vec2::new(200.0, 100.0) });
    runtime.handle_event(11.0, PageEvent::PointerEnter { node: BUTTON });
    runtime.handle_event(12.0, PageEvent::Click { node: BUTTON });
    runtime.handle_event(13.0, PageEvent::Scroll { y: 120.0 });
    runtime.handle_event(14.0, PageEvent::AnchorClick { link: LINK, target: Some(ABOUT) });
    runtime.frame(16.0);

    let commands = runtime.take_commands();
    for expected in [
        Command::SetOpacity { node: GLOW, opacity: 1.0 },
        Command::AddClass { node: DOT, class: classes::HOVERING },
        Command::ReplayAnimation { node: RIPPLE, class: classes::ACTIVE },
        Command::AddClass { node: NAV, class: classes::SCROLLED },
        Command::ScrollIntoView { node: ABOUT },
        Command::SetPosition { node: DOT, position: Vec2::new(200.0, 100.0) },
    ] {
        assert!(commands.contains(&expected), "missing {expected:?}");
    }
    assert!(commands.iter().any(|c| matches!(c, Command::SetTransform { node: ORB, .. })));
}
