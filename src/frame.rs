use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Seconds since the scene started.
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Self-rescheduling `requestAnimationFrame` loop that can be cancelled.
///
/// The pending request id is kept so `cancel` can withdraw it synchronously;
/// the closure only holds a weak handle to itself, so cancelling also breaks
/// the reschedule chain when called from inside a frame.
#[derive(Default)]
pub struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
}

impl FrameLoop {
    pub fn is_running(&self) -> bool {
        self.tick.borrow().is_some()
    }

    pub fn start(&mut self, mut on_frame: impl FnMut() + 'static) {
        if self.is_running() {
            return;
        }
        let slot = Rc::downgrade(&self.tick);
        let raf_id = self.raf_id.clone();
        *self.tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            raf_id.set(None);
            on_frame();
            if let Some(slot) = slot.upgrade() {
                if let Some(tick) = slot.borrow().as_ref() {
                    raf_id.set(request_frame(tick));
                }
            }
        }) as Box<dyn FnMut()>));
        if let Some(tick) = self.tick.borrow().as_ref() {
            self.raf_id.set(request_frame(tick));
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.tick.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(tick: &Closure<dyn FnMut()>) -> Option<i32> {
    let w = web::window()?;
    match w.request_animation_frame(tick.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("[frame] requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

