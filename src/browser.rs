//! Thin RAII wrappers around browser callbacks the wheel needs: the
//! `requestAnimationFrame` loop and window event listeners.

use log::warn;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Event;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Calls `on_frame` once per display refresh until dropped.
pub struct FrameLoop {
    callback: FrameCallback,
    request_id: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start<F>(mut on_frame: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let request_id = Rc::new(Cell::new(None));

        let next = callback.clone();
        let id_slot = request_id.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            on_frame();
            id_slot.set(request_frame(&next));
        }) as Box<dyn FnMut()>));

        request_id.set(request_frame(&callback));
        Self {
            callback,
            request_id,
        }
    }
}

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let callback = callback.borrow();
    let closure = callback.as_ref()?;
    match gloo_utils::window().request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("requestAnimationFrame failed: {:?}", err);
            None
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.request_id.take() {
            let _ = gloo_utils::window().cancel_animation_frame(id);
        }
        // Breaks the closure's reference back to itself
        self.callback.borrow_mut().take();
    }
}

/// A `window` event listener removed on drop.
pub struct WindowListener {
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn new<F>(event: &'static str, handler: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(err) = gloo_utils::window()
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!("Failed to listen for '{}': {:?}", event, err);
        }
        Self { event, closure }
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        let _ = gloo_utils::window()
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}
