use crate::constants::{PANNER_MAX_DISTANCE, PANNER_REF_DISTANCE, PANNER_ROLLOFF, STEM_GAIN};
use crate::core::{FrequencySource, Playback, Release};
use crate::dom::js_err;
use glam::Vec3;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn create_gain(audio_ctx: &web::AudioContext, value: f32) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx).map_err(js_err)?;
    g.gain().set_value(value);
    Ok(g)
}

/// Per-stem signal chain: `gain -> panner -> destination`, with the panner
/// also feeding an analyser sized to the stem's particle density.
pub struct StemChannel {
    gain: web::GainNode,
    panner: web::PannerNode,
    analyser: web::AnalyserNode,
}

impl StemChannel {
    pub fn new(audio_ctx: &web::AudioContext, fft_size: u32) -> anyhow::Result<Self> {
        let gain = create_gain(audio_ctx, STEM_GAIN)?;
        let panner = web::PannerNode::new(audio_ctx).map_err(js_err)?;
        panner.set_panning_model(web::PanningModelType::Hrtf);
        panner.set_distance_model(web::DistanceModelType::Inverse);
        panner.set_ref_distance(PANNER_REF_DISTANCE as f64);
        panner.set_max_distance(PANNER_MAX_DISTANCE as f64);
        panner.set_rolloff_factor(PANNER_ROLLOFF as f64);

        let analyser = web::AnalyserNode::new(audio_ctx).map_err(js_err)?;
        analyser.set_fft_size(fft_size);

        gain.connect_with_audio_node(&panner).map_err(js_err)?;
        panner
            .connect_with_audio_node(&audio_ctx.destination())
            .map_err(js_err)?;
        panner.connect_with_audio_node(&analyser).map_err(js_err)?;
        Ok(Self {
            gain,
            panner,
            analyser,
        })
    }

    /// Node that playback sources connect to.
    pub fn input(&self) -> &web::GainNode {
        &self.gain
    }

    pub fn set_position(&self, pos: Vec3) {
        self.panner.position_x().set_value(pos.x);
        self.panner.position_y().set_value(pos.y);
        self.panner.position_z().set_value(pos.z);
    }
}

impl FrequencySource for StemChannel {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn read_frequency_data(&self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }

    fn disconnect(&mut self) {
        _ = self.gain.disconnect();
        _ = self.panner.disconnect();
        _ = self.analyser.disconnect();
    }
}

/// A decoded track that loops and can be paused and resumed where it stopped.
///
/// Buffer sources are single-shot in WebAudio, so each play creates a new one.
pub struct StemAudio {
    audio_ctx: web::AudioContext,
    buffer: web::AudioBuffer,
    input: web::GainNode,
    source: Option<web::AudioBufferSourceNode>,
    started_at: f64,
    offset: f64,
}

impl StemAudio {
    pub fn new(audio_ctx: &web::AudioContext, buffer: web::AudioBuffer, input: &web::GainNode) -> Self {
        Self {
            audio_ctx: audio_ctx.clone(),
            buffer,
            input: input.clone(),
            source: None,
            started_at: 0.0,
            offset: 0.0,
        }
    }

    fn play(&mut self) -> anyhow::Result<()> {
        let src = web::AudioBufferSourceNode::new(&self.audio_ctx).map_err(js_err)?;
        src.set_buffer(Some(&self.buffer));
        src.set_loop(true);
        src.connect_with_audio_node(&self.input).map_err(js_err)?;
        src.start_with_when_and_grain_offset(0.0, self.offset)
            .map_err(js_err)?;
        self.started_at = self.audio_ctx.current_time() - self.offset;
        self.source = Some(src);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(src) = self.source.take() {
            _ = src.stop();
            _ = src.disconnect();
            let duration = self.buffer.duration();
            let played = (self.audio_ctx.current_time() - self.started_at).max(0.0);
            self.offset = if duration > 0.0 { played % duration } else { 0.0 };
        }
    }
}

impl Playback for StemAudio {
    fn toggle(&mut self) -> bool {
        if self.source.is_some() {
            self.pause();
        } else if let Err(e) = self.play() {
            log::error!("[audio] play failed: {:?}", e);
        }
        self.source.is_some()
    }

    fn is_playing(&self) -> bool {
        self.source.is_some()
    }
}

impl Release for StemAudio {
    fn release(mut self) {
        self.pause();
    }
}

/// Close the shared context without waiting for, or reporting, the outcome.
pub fn close_context(audio_ctx: &web::AudioContext) {
    if let Ok(promise) = audio_ctx.close() {
        spawn_local(async move {
            _ = JsFuture::from(promise).await;
        });
    }
}

pub fn update_listener_to_camera(listener: &web::AudioListener, cam_eye: Vec3, forward: Vec3, up: Vec3) {
    listener.set_position(cam_eye.x as f64, cam_eye.y as f64, cam_eye.z as f64);
    _ = listener.set_orientation(
        forward.x as f64,
        forward.y as f64,
        forward.z as f64,
        up.x as f64,
        up.y as f64,
        up.z as f64,
    );
}
