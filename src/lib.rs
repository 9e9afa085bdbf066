#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod audio;
mod constants;
mod core;
mod dom;
mod frame;
mod input;
mod render;
mod scene;

use crate::core::{default_stems, SceneDiagnostics};
use dom::Listener;
use frame::FrameLoop;
use render::GpuState;
use scene::{report_error, spawn_stem_loads, SceneController};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("song-exploder starting");
    Ok(())
}

struct Mounted {
    scene: Rc<RefCell<SceneController>>,
    frame_loop: Rc<RefCell<FrameLoop>>,
    listeners: Vec<Listener>,
}

impl Mounted {
    fn dispose(self) {
        self.frame_loop.borrow_mut().cancel();
        drop(self.listeners);
        self.scene.borrow_mut().dispose();
    }
}

enum MountState {
    Initializing,
    Running(Mounted),
    Disposed,
}

/// Handle returned to the host page. Dropping it on the JS side does not stop
/// the scene; call `dispose()`.
#[wasm_bindgen]
pub struct SceneHandle {
    state: Rc<RefCell<MountState>>,
}

#[wasm_bindgen]
impl SceneHandle {
    /// Stop the loop, remove listeners and release every GPU and audio resource.
    pub fn dispose(&self) {
        let prev = std::mem::replace(&mut *self.state.borrow_mut(), MountState::Disposed);
        match prev {
            MountState::Running(mounted) => mounted.dispose(),
            MountState::Initializing => log::info!("[mount] disposed before initialization finished"),
            MountState::Disposed => {}
        }
    }

    /// Plain object snapshot: frames, preload state and per-stem asset states
    /// and history statistics. `null` until the scene is running.
    pub fn diagnostics(&self) -> Result<JsValue, JsValue> {
        match &*self.state.borrow() {
            MountState::Running(mounted) => diagnostics_to_js(&mounted.scene.borrow().diagnostics()),
            _ => Ok(JsValue::NULL),
        }
    }
}

/// Mount the default three-stem scene on `canvas`.
///
/// `decode_mesh(url)` must return (a promise of) `{ positions, normals?, indices? }`.
/// `on_ready()` fires after the first frame that follows preloading;
/// `on_error(message)` receives initialization and per-asset failures.
#[wasm_bindgen]
pub fn mount(
    canvas: web::HtmlCanvasElement,
    decode_mesh: js_sys::Function,
    on_ready: js_sys::Function,
    on_error: js_sys::Function,
) -> Result<SceneHandle, JsValue> {
    let audio_ctx = web::AudioContext::new()?;
    let viewport = dom::canvas_viewport(&canvas);
    dom::sync_canvas_backing_size(&canvas, &viewport);

    let state = Rc::new(RefCell::new(MountState::Initializing));
    let weak = Rc::downgrade(&state);
    spawn_local(async move {
        let report_to = on_error.clone();
        if let Err(e) = init(weak, canvas, audio_ctx, decode_mesh, on_ready, on_error).await {
            log::error!("[mount] init error: {:?}", e);
            report_error(&report_to, &format!("{e:#}"));
        }
    });
    Ok(SceneHandle { state })
}

fn still_initializing(state: &Rc<RefCell<MountState>>) -> bool {
    matches!(*state.borrow(), MountState::Initializing)
}

async fn init(
    state: Weak<RefCell<MountState>>,
    canvas: web::HtmlCanvasElement,
    audio_ctx: web::AudioContext,
    decode_mesh: js_sys::Function,
    on_ready: js_sys::Function,
    on_error: js_sys::Function,
) -> anyhow::Result<()> {
    let gpu = match GpuState::new(&canvas).await {
        Ok(gpu) => gpu,
        Err(e) => {
            audio::close_context(&audio_ctx);
            return Err(e);
        }
    };
    let Some(state) = state.upgrade().filter(still_initializing) else {
        log::info!("[mount] handle disposed while the GPU was initializing");
        gpu.dispose();
        audio::close_context(&audio_ctx);
        return Ok(());
    };

    let report_to = on_error.clone();
    let scene = Rc::new(RefCell::new(SceneController::new(
        canvas.clone(),
        gpu,
        audio_ctx,
        on_ready,
        on_error,
    )));
    for (config, offset) in default_stems() {
        let name = config.name.clone();
        let added = scene.borrow_mut().add_stem(config, offset);
        if let Err(e) = added {
            log::error!("[mount] stem {} rejected: {:#}", name, e);
            report_error(&report_to, &format!("{name}: {e:#}"));
        }
    }

    let listeners = match attach_listeners(&canvas, &scene) {
        Ok(listeners) => listeners,
        Err(e) => {
            scene.borrow_mut().dispose();
            return Err(e);
        }
    };
    // on_error may have disposed the handle while stems were being built
    if !still_initializing(&state) {
        scene.borrow_mut().dispose();
        return Ok(());
    }

    let frame_loop = Rc::new(RefCell::new(FrameLoop::default()));
    *state.borrow_mut() = MountState::Running(Mounted {
        scene: scene.clone(),
        frame_loop: frame_loop.clone(),
        listeners,
    });
    log::info!("[mount] {} stems mounted", scene.borrow().stem_count());
    spawn_stem_loads(&scene, &frame_loop, &decode_mesh);
    Ok(())
}

fn attach_listeners(
    canvas: &web::HtmlCanvasElement,
    scene: &Rc<RefCell<SceneController>>,
) -> anyhow::Result<Vec<Listener>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let mut listeners = input::attach_orbit(canvas, Rc::downgrade(scene))?;
    listeners.push(input::attach_playback_toggle(&document, Rc::downgrade(scene))?);
    listeners.push(input::attach_resize(&window, Rc::downgrade(scene))?);
    Ok(listeners)
}

fn set(obj: &js_sys::Object, key: &str, value: impl Into<JsValue>) -> Result<(), JsValue> {
    js_sys::Reflect::set(obj, &JsValue::from_str(key), &value.into()).map(|_| ())
}

fn diagnostics_to_js(d: &SceneDiagnostics) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    set(&obj, "frames", d.frames as f64)?;
    set(&obj, "preloadComplete", d.preload_complete)?;
    set(&obj, "loadsFailed", d.loads_failed as u32)?;
    let stems = js_sys::Array::new();
    for s in &d.stems {
        let o = js_sys::Object::new();
        set(&o, "name", s.name.as_str())?;
        set(&o, "texture", s.texture.as_str())?;
        set(&o, "mesh", s.mesh.as_str())?;
        set(&o, "audio", s.audio.as_str())?;
        set(&o, "playing", s.playing)?;
        set(&o, "disposed", s.disposed)?;
        set(&o, "historyLen", s.history_len as u32)?;
        set(&o, "historyPeak", s.history_peak as u32)?;
        set(&o, "historyMean", s.history_mean)?;
        set(&o, "time", s.time)?;
        stems.push(&o);
    }
    set(&obj, "stems", stems)?;
    Ok(obj.into())
}
