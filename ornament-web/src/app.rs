use std::cell::RefCell;
use std::rc::Rc;

use ornament_gpu_shared::SceneRenderer;
use ornament_sim::{FrameLoop, LoopControl, SceneConfig, Simulation, StopSignal};
use ornament_wgpu::WgpuRenderer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use crate::dom::DomCountdown;
use crate::input::{PointerState, Viewport};
use crate::runtime_slot::RuntimeSlot;

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {e}"))
}

fn read_viewport(window: &Window) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(1.0);
    let height = window.inner_height()?.as_f64().unwrap_or(1.0);
    Ok(Viewport::new(width, height, window.device_pixel_ratio()))
}

fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let lo = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (hi << 32) | lo
}

/// Everything the animation frame and the event listeners share.
struct Runtime {
    simulation: Simulation,
    renderer: WgpuRenderer,
    frame_loop: FrameLoop,
    pointer: PointerState,
    viewport: Viewport,
    canvas: HtmlCanvasElement,
    first_timestamp: Option<f64>,
}

impl Runtime {
    fn frame(&mut self, timestamp: f64) -> LoopControl {
        let first = *self.first_timestamp.get_or_insert(timestamp);
        let elapsed = (timestamp - first) / 1000.0;
        self.frame_loop
            .iterate(&mut self.simulation, elapsed, &mut self.renderer)
    }

    fn pointer_moved(&mut self, client_x: f64, client_y: f64) {
        self.pointer.move_to(client_x, client_y, &self.viewport);
        self.simulation.set_pointer(self.pointer.ndc);
    }

    fn touch_ended(&mut self) {
        self.pointer.touch_end();
        self.simulation.set_pointer(self.pointer.ndc);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (width, height) = viewport.physical_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.simulation
            .resize(viewport.width as f32, viewport.height as f32);
        self.renderer.resize(
            viewport.width.round() as u32,
            viewport.height.round() as u32,
            viewport.pixel_ratio,
        );
    }
}

/// A DOM event listener removed again on drop.
struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    fn register(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn register_listeners(window: &Window, runtime: &RuntimeSlot<Runtime>) -> Result<Vec<EventListener>, JsValue> {
    let mut listeners = Vec::with_capacity(4);

    let rt = runtime.clone();
    let resize_window = window.clone();
    listeners.push(EventListener::register(window, "resize", move |_event| {
        let Ok(viewport) = read_viewport(&resize_window) else {
            return;
        };
        rt.with(|runtime| runtime.resize(viewport));
    })?);

    let rt = runtime.clone();
    listeners.push(EventListener::register(window, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        rt.with(|runtime| runtime.pointer_moved(f64::from(event.client_x()), f64::from(event.client_y())));
    })?);

    let rt = runtime.clone();
    listeners.push(EventListener::register(window, "touchmove", move |event| {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
        else {
            return;
        };
        rt.with(|runtime| runtime.pointer_moved(f64::from(touch.client_x()), f64::from(touch.client_y())));
    })?);

    let rt = runtime.clone();
    listeners.push(EventListener::register(window, "touchend", move |_event| {
        rt.with(Runtime::touch_ended);
    })?);

    Ok(listeners)
}

fn request_animation_frame(window: &Window, callback: &Closure<dyn FnMut(f64)>) {
    if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

/// Schedule frames until the loop stops. The stopping frame drops the
/// runtime, and the callback itself is freed once it has returned.
fn start_animation(window: Window, runtime: RuntimeSlot<Runtime>) {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let frame_window = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        match runtime.frame(|runtime| runtime.frame(timestamp)) {
            LoopControl::Continue => {
                if let Some(callback) = f.borrow().as_ref() {
                    request_animation_frame(&frame_window, callback);
                }
            }
            LoopControl::Stop => {
                let slot = f.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    slot.borrow_mut().take();
                });
                log::info!("Scene stopped");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(&window, callback);
    }
}

/// Handle to a running scene, returned to JavaScript by `launch`.
#[wasm_bindgen]
pub struct SceneHandle {
    stop: StopSignal,
    countdown: DomCountdown,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl SceneHandle {
    /// Stop the frame loop, cancel the countdown and detach event listeners.
    pub fn stop(&mut self) {
        self.stop.stop();
        self.countdown.cancel();
        self.listeners.clear();
    }

    #[wasm_bindgen(js_name = isStopped)]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    #[wasm_bindgen(js_name = countdownActive)]
    pub fn countdown_active(&self) -> bool {
        self.countdown.is_active()
    }
}

impl Drop for SceneHandle {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

/// Parse the configuration, build the renderer and the scene, mount the
/// countdown and start the animation loop.
pub async fn launch(config_toml: Option<String>) -> Result<SceneHandle, JsValue> {
    let config = match config_toml {
        Some(source) => SceneConfig::from_toml_str(&source).map_err(|e| js_error("Invalid configuration", e))?,
        None => SceneConfig::default(),
    };

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document
        .query_selector("canvas")?
        .ok_or("Canvas not found")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| "Element is not a canvas")?;

    let viewport = read_viewport(&window)?;
    let (width, height) = viewport.physical_size();
    canvas.set_width(width);
    canvas.set_height(height);

    let renderer = WgpuRenderer::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), width, height)
        .await
        .map_err(|e| js_error("Failed to initialize renderer", e))?;

    let countdown_settings = config.countdown.clone();
    let seed = config.world.seed.unwrap_or_else(random_seed);
    let mut simulation =
        Simulation::new(config, seed, viewport.aspect()).map_err(|e| js_error("Failed to build scene", e))?;
    let pointer = PointerState::new();
    simulation.set_pointer(pointer.ndc);

    let stop = StopSignal::new();
    let runtime = RuntimeSlot::new(Runtime {
        simulation,
        renderer,
        frame_loop: FrameLoop::new(stop.clone()),
        pointer,
        viewport,
        canvas,
        first_timestamp: None,
    });

    let listeners = register_listeners(&window, &runtime)?;
    let countdown = DomCountdown::mount(
        &document,
        &countdown_settings.selector,
        countdown_settings.month,
        countdown_settings.day,
    )?;

    start_animation(window, runtime);
    log::info!("Scene running");

    Ok(SceneHandle {
        stop,
        countdown,
        listeners,
    })
}
