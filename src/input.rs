use crate::dom::Listener;
use crate::scene::SceneController;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

type SceneRef = Weak<RefCell<SceneController>>;

#[inline]
fn client_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Pointer drag orbits the camera, wheel dollies. The drag is measured
/// against the canvas' CSS height so a full-height drag is one revolution.
pub fn attach_orbit(canvas: &web::HtmlCanvasElement, scene: SceneRef) -> anyhow::Result<Vec<Listener>> {
    let target: &web::EventTarget = canvas.as_ref();
    let last: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
    let mut listeners = Vec::with_capacity(5);

    {
        let last = last.clone();
        let canvas = canvas.clone();
        listeners.push(Listener::new(target, "pointerdown", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            last.set(Some(client_pos(ev)));
            _ = canvas.set_pointer_capture(ev.pointer_id());
        })?);
    }
    {
        let last = last.clone();
        let canvas = canvas.clone();
        let scene = scene.clone();
        listeners.push(Listener::new(target, "pointermove", move |ev| {
            let (Some(ev), Some(prev)) = (ev.dyn_ref::<web::PointerEvent>(), last.get()) else {
                return;
            };
            let pos = client_pos(ev);
            last.set(Some(pos));
            let delta = pos - prev;
            if let Some(scene) = scene.upgrade() {
                scene
                    .borrow_mut()
                    .controls_mut()
                    .rotate(delta.x, delta.y, canvas.client_height() as f32);
            }
        })?);
    }
    for name in ["pointerup", "pointercancel"] {
        let last = last.clone();
        let canvas = canvas.clone();
        listeners.push(Listener::new(target, name, move |ev| {
            last.set(None);
            if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
                _ = canvas.release_pointer_capture(ev.pointer_id());
            }
        })?);
    }
    listeners.push(Listener::new(target, "wheel", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::WheelEvent>() else {
            return;
        };
        ev.prevent_default();
        if let Some(scene) = scene.upgrade() {
            scene.borrow_mut().controls_mut().zoom(ev.delta_y() as f32);
        }
    })?);
    Ok(listeners)
}

/// A click anywhere on the page toggles playback of every loaded stem.
pub fn attach_playback_toggle(document: &web::Document, scene: SceneRef) -> anyhow::Result<Listener> {
    Listener::new(document.as_ref(), "click", move |_| {
        if let Some(scene) = scene.upgrade() {
            scene.borrow_mut().toggle_playback();
        }
    })
}

pub fn attach_resize(window: &web::Window, scene: SceneRef) -> anyhow::Result<Listener> {
    Listener::new(window.as_ref(), "resize", move |_| {
        if let Some(scene) = scene.upgrade() {
            scene.borrow_mut().resize();
        }
    })
}
