use crate::assets::{load_audio_buffer, load_matcap, load_mesh};
use crate::audio::{close_context, update_listener_to_camera, StemAudio, StemChannel};
use crate::constants::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_Z, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE,
    ORBIT_ROTATE_SPEED, ORBIT_ZOOM_STEP,
};
use crate::core::{
    Camera, LoadProgress, LoadTracker, MeshData, OrbitControls, SceneDiagnostics, Stem, StemConfig,
    StemPlatform, VizError,
};
use crate::dom::{canvas_viewport, sync_canvas_backing_size};
use crate::frame::{Clock, FrameLoop};
use crate::render::{GpuState, MatcapTexture, MeshGpu, ParticleGpu};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Binds stems to wgpu resources and WebAudio nodes.
pub struct WebPlatform;

impl StemPlatform for WebPlatform {
    type Texture = MatcapTexture;
    type Mesh = MeshGpu;
    type Audio = StemAudio;
    type Analyser = StemChannel;
    type Particles = ParticleGpu;
}

pub type WebStem = Stem<WebPlatform>;

/// Result of folding one finished asset load into the scene.
pub struct Settled {
    pub progress: LoadProgress,
    pub error: Option<VizError>,
}

/// Owns every stem plus the renderer, camera and shared audio context, and
/// drives them once per animation frame.
pub struct SceneController {
    canvas: web::HtmlCanvasElement,
    gpu: Option<GpuState>,
    audio_ctx: web::AudioContext,
    stems: Vec<WebStem>,
    clock: Clock,
    camera: Camera,
    controls: OrbitControls,
    loads: LoadTracker,
    frames: u64,
    ready_notified: bool,
    on_ready: js_sys::Function,
    on_error: js_sys::Function,
    disposed: bool,
}

impl SceneController {
    pub fn new(
        canvas: web::HtmlCanvasElement,
        gpu: GpuState,
        audio_ctx: web::AudioContext,
        on_ready: js_sys::Function,
        on_error: js_sys::Function,
    ) -> Self {
        let mut camera = Camera::perspective(CAMERA_FOV_DEGREES, 1.0, CAMERA_NEAR, CAMERA_FAR);
        camera.eye = Vec3::new(0.0, 0.0, CAMERA_Z);
        let controls = OrbitControls::new(camera.eye, camera.target, ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE)
            .with_speeds(ORBIT_ROTATE_SPEED, ORBIT_ZOOM_STEP);
        let mut scene = Self {
            canvas,
            gpu: Some(gpu),
            audio_ctx,
            stems: Vec::new(),
            clock: Clock::new(),
            camera,
            controls,
            loads: LoadTracker::default(),
            frames: 0,
            ready_notified: false,
            on_ready,
            on_error,
            disposed: false,
        };
        scene.resize();
        scene
    }

    /// Build a stem's synchronous part and place it. Asset loads are started
    /// separately by [`spawn_stem_loads`].
    pub fn add_stem(&mut self, config: StemConfig, offset: Vec3) -> anyhow::Result<usize> {
        config.validate()?;
        let gpu = self
            .gpu
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("renderer already released"))?;
        let channel = StemChannel::new(&self.audio_ctx, config.fft_size())?;
        let mut stem = WebStem::new(config, channel, |field| gpu.create_particles(field))?;
        stem.set_position(offset.x, offset.y, offset.z);
        if let Some(channel) = stem.analyser() {
            channel.set_position(offset);
        }
        self.stems.push(stem);
        Ok(self.stems.len() - 1)
    }

    pub fn stem_count(&self) -> usize {
        self.stems.len()
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn on_error(&self) -> &js_sys::Function {
        &self.on_error
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn resize(&mut self) {
        if self.disposed {
            return;
        }
        let viewport = canvas_viewport(&self.canvas);
        let (w, h) = sync_canvas_backing_size(&self.canvas, &viewport);
        self.camera.apply_viewport(&viewport);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(w, h);
        }
        log::debug!(
            "[scene] resize {}x{} css, {}x{} px, aspect {:.3}",
            viewport.css_width,
            viewport.css_height,
            w,
            h,
            self.camera.aspect
        );
    }

    /// One frame. Returns the host's ready callback the first time a frame
    /// reaches the screen; the caller invokes it outside the scene borrow.
    pub fn tick(&mut self) -> Option<js_sys::Function> {
        if self.disposed {
            return None;
        }
        let time = self.clock.elapsed_secs();
        for stem in &mut self.stems {
            if let Err(e) = stem.update(time) {
                log::error!("[scene] {} update: {}", stem.name(), e);
            }
        }

        self.camera.eye = self.controls.eye();
        self.camera.target = self.controls.target();
        for stem in &self.stems {
            if let Some(channel) = stem.analyser() {
                channel.set_position(stem.offset());
            }
        }
        update_listener_to_camera(
            &self.audio_ctx.listener(),
            self.camera.eye,
            self.camera.forward(),
            self.camera.up,
        );

        let gpu = self.gpu.as_mut()?;
        match gpu.render(&self.camera, &mut self.stems) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[scene] surface lost; reconfiguring");
                gpu.reconfigure();
                return None;
            }
            Err(e) => {
                log::error!("[scene] render error: {:?}", e);
                return None;
            }
        }
        self.frames += 1;
        if self.ready_notified {
            return None;
        }
        self.ready_notified = true;
        log::info!("[scene] first frame rendered");
        Some(self.on_ready.clone())
    }

    /// Click handler: wake the audio context and flip every loaded stem.
    pub fn toggle_playback(&mut self) {
        if self.disposed {
            return;
        }
        if self.audio_ctx.state() == web::AudioContextState::Suspended {
            if let Ok(promise) = self.audio_ctx.resume() {
                spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("[audio] resume failed: {:?}", e);
                    }
                });
            }
        }
        for stem in &mut self.stems {
            if let Some(playing) = stem.toggle_playback() {
                log::info!("[scene] {} {}", stem.name(), if playing { "playing" } else { "paused" });
            }
        }
    }

    pub fn resolve_texture(&mut self, index: usize, result: anyhow::Result<image::RgbaImage>) -> Settled {
        if self.disposed {
            return self.ignored();
        }
        let Some(stem) = self.stems.get_mut(index) else {
            return self.ignored();
        };
        let outcome = match (result, self.gpu.as_ref()) {
            (Ok(img), Some(gpu)) => Ok(gpu.create_matcap(&format!("matcap_{}", stem.name()), &img)),
            (Ok(_), None) => Err("renderer already released".to_string()),
            (Err(e), _) => Err(format!("{e:#}")),
        };
        let res = stem.on_texture_loaded(outcome);
        self.settle(res)
    }

    pub fn resolve_mesh(&mut self, index: usize, result: anyhow::Result<MeshData>) -> Settled {
        if self.disposed {
            return self.ignored();
        }
        let Some(stem) = self.stems.get_mut(index) else {
            return self.ignored();
        };
        let outcome = match (result, self.gpu.as_ref()) {
            (Ok(data), Some(gpu)) => Ok(gpu.create_mesh(&data)),
            (Ok(_), None) => Err("renderer already released".to_string()),
            (Err(e), _) => Err(format!("{e:#}")),
        };
        let res = stem.on_mesh_loaded(outcome);
        self.settle(res)
    }

    pub fn resolve_audio(&mut self, index: usize, result: anyhow::Result<web::AudioBuffer>) -> Settled {
        if self.disposed {
            return self.ignored();
        }
        let Some(stem) = self.stems.get_mut(index) else {
            return self.ignored();
        };
        let outcome = match (result, stem.analyser()) {
            (Ok(buffer), Some(channel)) => Ok(StemAudio::new(&self.audio_ctx, buffer, channel.input())),
            (Ok(_), None) => Err("analyser already disconnected".to_string()),
            (Err(e), _) => Err(format!("{e:#}")),
        };
        let res = stem.on_audio_loaded(outcome);
        self.settle(res)
    }

    fn settle(&mut self, res: Result<(), VizError>) -> Settled {
        let error = res.err();
        if let Some(e) = &error {
            log::error!("[scene] {}", e);
        }
        Settled {
            progress: self.loads.finish(error.is_none()),
            error,
        }
    }

    fn ignored(&self) -> Settled {
        Settled {
            progress: LoadProgress::Pending {
                finished: self.loads.finished(),
                total: self.loads.total(),
            },
            error: None,
        }
    }

    pub fn diagnostics(&self) -> SceneDiagnostics {
        SceneDiagnostics::capture(
            self.frames,
            self.loads.is_complete(),
            self.loads.failed(),
            &self.stems,
        )
    }

    /// Release everything: stems depth-first, then the audio context and the
    /// renderer. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for stem in &mut self.stems {
            stem.dispose();
        }
        close_context(&self.audio_ctx);
        if let Some(gpu) = self.gpu.take() {
            gpu.dispose();
        }
        log::info!("[scene] disposed after {} frames", self.frames);
    }
}

pub fn report_error(on_error: &js_sys::Function, message: &str) {
    if let Err(e) = on_error.call1(&JsValue::NULL, &JsValue::from_str(message)) {
        log::error!("[scene] on_error callback threw: {:?}", e);
    }
}

/// Start the animation loop; each frame ticks the scene if it is still alive.
pub fn start_render_loop(scene: &Rc<RefCell<SceneController>>, frame_loop: &Rc<RefCell<FrameLoop>>) {
    let weak = Rc::downgrade(scene);
    frame_loop.borrow_mut().start(move || {
        let ready = match weak.upgrade() {
            Some(scene) => scene.borrow_mut().tick(),
            None => None,
        };
        if let Some(on_ready) = ready {
            if let Err(e) = on_ready.call0(&JsValue::NULL) {
                log::error!("[scene] on_ready callback threw: {:?}", e);
            }
        }
    });
    log::info!("[scene] render loop started");
}

/// Weak handles a load continuation needs once its asset arrives.
#[derive(Clone)]
struct LoadContext {
    scene: Weak<RefCell<SceneController>>,
    frame_loop: Weak<RefCell<FrameLoop>>,
}

impl LoadContext {
    fn settle(&self, resolve: impl FnOnce(&mut SceneController) -> Settled) {
        let Some(scene) = self.scene.upgrade() else {
            log::debug!("[assets] scene gone; dropping late load");
            return;
        };
        let settled = resolve(&mut scene.borrow_mut());
        if let Some(e) = settled.error {
            let on_error = scene.borrow().on_error().clone();
            report_error(&on_error, &e.to_string());
        }
        if let LoadProgress::Complete { failed } = settled.progress {
            if scene.borrow().is_disposed() {
                return;
            }
            log::info!("[assets] preload complete ({} failed)", failed);
            if let Some(frame_loop) = self.frame_loop.upgrade() {
                start_render_loop(&scene, &frame_loop);
            }
        }
    }
}

/// Kick off the three asset legs of every stem. The render loop starts once
/// all of them have settled, successfully or not.
pub fn spawn_stem_loads(
    scene: &Rc<RefCell<SceneController>>,
    frame_loop: &Rc<RefCell<FrameLoop>>,
    decode_mesh: &js_sys::Function,
) {
    let (jobs, audio_ctx) = {
        let s = scene.borrow();
        let jobs: Vec<(usize, StemConfig)> = s
            .stems
            .iter()
            .enumerate()
            .map(|(i, stem)| (i, stem.config().clone()))
            .collect();
        (jobs, s.audio_ctx.clone())
    };
    let ctx = LoadContext {
        scene: Rc::downgrade(scene),
        frame_loop: Rc::downgrade(frame_loop),
    };

    for (index, config) in jobs {
        {
            let mut s = scene.borrow_mut();
            s.loads.begin();
            s.loads.begin();
            s.loads.begin();
        }
        log::info!("[assets] loading {}", config.name);

        let texture_ctx = ctx.clone();
        let url = config.matcap_texture.clone();
        spawn_local(async move {
            let result = load_matcap(&url).await;
            texture_ctx.settle(|s| s.resolve_texture(index, result));
        });

        let mesh_ctx = ctx.clone();
        let url = config.model.clone();
        let decoder = decode_mesh.clone();
        spawn_local(async move {
            let result = load_mesh(&decoder, &url).await;
            mesh_ctx.settle(|s| s.resolve_mesh(index, result));
        });

        let audio_ctx_leg = ctx.clone();
        let url = config.audio.clone();
        let audio_ctx = audio_ctx.clone();
        spawn_local(async move {
            let result = load_audio_buffer(&audio_ctx, &url).await;
            audio_ctx_leg.settle(|s| s.resolve_audio(index, result));
        });
    }

    if scene.borrow_mut().loads.complete_if_idle() {
        start_render_loop(scene, frame_loop);
    }
}
