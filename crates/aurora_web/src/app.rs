//! Boot sequence and the animation-frame loop.
//!
//! ```text
//! DOMContentLoaded ─> discover ─> build runtime ─> attach listeners
//!                                                       │
//!        ┌──────────────── requestAnimationFrame ◄──────┘
//!        └─> runtime.frame(ts) ─> host.apply(commands) ─> re-request
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use aurora_core::{EffectsError, EffectsResult, ViewportSize};
use aurora_effects::EffectsRuntime;
use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

use crate::dom;
use crate::host::DomHost;
use crate::listeners::{self, PageListeners};
use crate::settings;

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// The running page.
pub struct App {
    runtime: RefCell<EffectsRuntime>,
    host: RefCell<DomHost>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Option<PageListeners>>,
}

impl App {
    fn boot(window: &Window, document: &Document) -> EffectsResult<Rc<Self>> {
        let config = settings::load_config(settings::EMBEDDED_CONFIG);
        let page = dom::discover(document)?;
        let now = window.performance().map_or(0.0, |p| p.now());

        let thresholds = config.sections.thresholds.clone();
        let runtime = EffectsRuntime::builder(config)
            .layout(page.layout.clone())
            .viewport(viewport_of(window))
            .seed(random_seed())
            .build(now)?;
        let listeners = listeners::attach(
            window,
            document,
            &page,
            &runtime.event_sender(),
            &thresholds,
        )?;

        let app = Rc::new(Self {
            runtime: RefCell::new(runtime),
            host: RefCell::new(DomHost::new(document, page.registry)),
            frame: RefCell::new(None),
            listeners: RefCell::new(Some(listeners)),
        });
        app.flush();
        app.schedule_frame();
        Ok(app)
    }

    fn schedule_frame(self: &Rc<Self>) {
        let app = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| app.on_frame(timestamp));
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        let stats = self.runtime.borrow_mut().frame(timestamp);
        if stats.is_none() {
            return;
        }
        self.flush();
        self.schedule_frame();
    }

    fn flush(&self) {
        let commands = self.runtime.borrow_mut().take_commands();
        if !commands.is_empty() {
            self.host.borrow_mut().apply(&commands);
        }
    }

    fn stop(&self) {
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().take();
        self.runtime.borrow_mut().shutdown();
    }
}

fn viewport_of(window: &Window) -> ViewportSize {
    let size = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    ViewportSize::new(
        size(window.inner_width()) as f32,
        size(window.inner_height()) as f32,
    )
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
}

fn start_now() {
    let result = (|| {
        let window = web_sys::window().ok_or_else(|| EffectsError::Host("no window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| EffectsError::Host("no document".to_owned()))?;
        App::boot(&window, &document)
    })();

    match result {
        Ok(app) => {
            APP.with(|slot| *slot.borrow_mut() = Some(app));
            tracing::info!("portfolio loaded");
        }
        Err(err) => tracing::error!("effects failed to start: {err}"),
    }
}

/// Boots now, or on `DOMContentLoaded` while the document is still loading.
pub fn start() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::error!("effects need a browser document");
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| start_now()).forget();
    } else {
        start_now();
    }
}

/// Detaches every listener and stops the frame loop.
pub fn stop() {
    if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
        app.stop();
        tracing::info!("effects stopped");
    }
}
