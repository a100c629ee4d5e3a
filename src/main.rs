//! Main module for the spin wheel page using Yew.
//! Wires the canvas, the animation loop, sound effects and the modals around
//! a single `WheelWidget`.

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use spin_wheel::{
    audio,
    surface::{compute_scale, Surface},
    SpinOutcome, WheelWidget,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlCanvasElement, KeyboardEvent};
use yew::prelude::*;

mod browser;
mod components;
mod config;
mod hooks;
mod utils;

use browser::{FrameLoop, WindowListener};
use components::{ManageModal, SpinControls, WinnerModal};
use config::*;
use utils::{debounce, parse_entry_list};

// ──────────────────────────────────────────────────────────────────────────────
// Type aliases for better readability
type SharedWidget = Rc<RefCell<WheelWidget>>;
type SharedSurface = Rc<RefCell<Option<Surface>>>;
type TimerSlot = Rc<RefCell<Option<Timeout>>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Size the canvas backing store to its container and the current pixel ratio,
/// attaching the surface on first call.
fn fit_surface(canvas_ref: &NodeRef, container_ref: &NodeRef, surface: &SharedSurface) {
    let (Some(canvas), Some(container)) = (
        canvas_ref.cast::<HtmlCanvasElement>(),
        container_ref.cast::<Element>(),
    ) else {
        debug!("Canvas not mounted yet, skipping fit");
        return;
    };

    let scale = compute_scale(
        container.client_width() as f64,
        container.client_height() as f64,
        gloo_utils::window().device_pixel_ratio(),
    );

    let mut slot = surface.borrow_mut();
    if let Some(existing) = slot.as_mut() {
        if let Err(err) = existing.rescale(scale) {
            warn!("Failed to rescale wheel canvas: {}", err);
        }
        return;
    }
    match Surface::attach(canvas, scale) {
        Ok(attached) => *slot = Some(attached),
        Err(err) => warn!("Wheel canvas unavailable: {}", err),
    }
}

fn pixel_ratio_changed(surface: &SharedSurface) -> bool {
    surface.borrow().as_ref().is_some_and(|s| {
        s.scale().device_pixel_ratio != gloo_utils::window().device_pixel_ratio()
    })
}

/// Close the winner dialog, including one that is still waiting to open.
fn close_winner(
    widget: &SharedWidget,
    winner_timer: &TimerSlot,
    winner_dialog: &UseStateHandle<Option<AttrValue>>,
) {
    widget.borrow_mut().dismiss_winner();
    winner_timer.borrow_mut().take();
    winner_dialog.set(None);
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let widget: SharedWidget = use_mut_ref(|| WheelWidget::new(SEED_NAMES));
    let refresh = use_force_update();
    let surface: SharedSurface = use_mut_ref(|| None);
    let canvas_ref = use_node_ref();
    let container_ref = use_node_ref();
    // Winner shown in the dialog; set after a short delay once the wheel stops
    let winner_dialog = use_state(|| None::<AttrValue>);
    let winner_timer: TimerSlot = use_mut_ref(|| None);
    let resize_timer: TimerSlot = use_mut_ref(|| None);

    // --- Render loop, resize and keyboard listeners (page lifetime) ---
    {
        let widget = widget.clone();
        let refresh = refresh.clone();
        let surface = surface.clone();
        let canvas_ref = canvas_ref.clone();
        let container_ref = container_ref.clone();
        let winner_dialog = winner_dialog.clone();
        let winner_timer = winner_timer.clone();
        let resize_timer = resize_timer.clone();

        use_effect_with((), move |_| {
            fit_surface(&canvas_ref, &container_ref, &surface);

            let frame_loop = {
                let widget = widget.clone();
                let refresh = refresh.clone();
                let surface = surface.clone();
                let canvas_ref = canvas_ref.clone();
                let container_ref = container_ref.clone();
                let winner_dialog = winner_dialog.clone();
                let winner_timer = winner_timer.clone();
                FrameLoop::start(move || {
                    let report = widget.borrow_mut().frame(&mut rand::rng());
                    if report.tick {
                        audio::play_ticks(report.crossings.min(MAX_TICKS_PER_FRAME));
                    }
                    if let Some(result) = report.settled {
                        audio::play_win();
                        refresh.force_update();
                        let winner_dialog = winner_dialog.clone();
                        let winner = AttrValue::from(result.winner);
                        debounce(&winner_timer, WINNER_DIALOG_DELAY_MS, move || {
                            winner_dialog.set(Some(winner));
                        });
                    }

                    if pixel_ratio_changed(&surface) {
                        fit_surface(&canvas_ref, &container_ref, &surface);
                    }
                    if let Some(s) = surface.borrow().as_ref() {
                        if let Err(err) = s.paint(&widget.borrow().scene()) {
                            debug!("Wheel paint failed: {}", err);
                        }
                    }
                })
            };

            let resize_listener = {
                let surface = surface.clone();
                WindowListener::new("resize", move |_| {
                    let canvas_ref = canvas_ref.clone();
                    let container_ref = container_ref.clone();
                    let surface = surface.clone();
                    debounce(&resize_timer, RESIZE_DEBOUNCE_MS, move || {
                        fit_surface(&canvas_ref, &container_ref, &surface);
                    });
                })
            };

            let key_listener = WindowListener::new("keydown", move |event: Event| {
                let is_escape = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|e| e.key() == "Escape");
                if !is_escape {
                    return;
                }
                if widget.borrow().editor().is_some() {
                    widget.borrow_mut().discard_editor();
                    refresh.force_update();
                } else {
                    close_winner(&widget, &winner_timer, &winner_dialog);
                }
            });

            move || {
                drop(frame_loop);
                drop(resize_listener);
                drop(key_listener);
            }
        });
    }

    // --- Wheel actions ---
    let on_spin = {
        let widget = widget.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            // Spins always start from a gesture, which lets audio start too
            audio::unlock();
            debug!("Audio engine: {:?}", audio::lifecycle());
            let outcome = widget.borrow_mut().trigger_spin(&mut rand::rng());
            match outcome {
                SpinOutcome::Started { .. } => refresh.force_update(),
                other => debug!("Spin not started: {:?}", other),
            }
        })
    };
    let on_canvas_click = on_spin.reform(|_: MouseEvent| ());

    let on_shuffle = {
        let widget = widget.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            let shuffled = widget.borrow_mut().shuffle(&mut rand::rng());
            if shuffled {
                refresh.force_update();
            }
        })
    };

    let on_manage = {
        let widget = widget.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            widget.borrow_mut().open_editor();
            refresh.force_update();
        })
    };

    // --- Winner dialog ---
    let on_close_winner = {
        let widget = widget.clone();
        let winner_timer = winner_timer.clone();
        let winner_dialog = winner_dialog.clone();
        Callback::from(move |_: ()| close_winner(&widget, &winner_timer, &winner_dialog))
    };

    let on_remove_winner = {
        let widget = widget.clone();
        let winner_dialog = winner_dialog.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            widget.borrow_mut().remove_winner();
            winner_dialog.set(None);
            refresh.force_update();
        })
    };

    // --- Edit buffer ---
    let edit = |apply: fn(&mut WheelWidget, String)| {
        let widget = widget.clone();
        let refresh = refresh.clone();
        Callback::from(move |value: String| {
            apply(&mut widget.borrow_mut(), value);
            refresh.force_update();
        })
    };

    let on_add = edit(|w, name| {
        if let Some(buffer) = w.editor_mut() {
            buffer.push(&name);
        }
    });
    let on_import = edit(|w, text| {
        if let Some(buffer) = w.editor_mut() {
            let added = buffer.extend(parse_entry_list(&text));
            info!("Imported {} entries into the edit buffer", added);
        }
    });
    let on_clear = edit(|w, _| {
        if let Some(buffer) = w.editor_mut() {
            buffer.clear();
        }
    })
    .reform(|_: ()| String::new());
    let on_save = edit(|w, _| {
        w.save_editor();
    })
    .reform(|_: ()| String::new());
    let on_close_manage = edit(|w, _| w.discard_editor()).reform(|_: ()| String::new());

    let on_remove_entry = {
        let widget = widget.clone();
        let refresh = refresh.clone();
        Callback::from(move |index: usize| {
            if let Some(buffer) = widget.borrow_mut().editor_mut() {
                buffer.remove(index);
            }
            refresh.force_update();
        })
    };

    // --- View ---
    let (entry_count, can_spin, can_shuffle, editor_names) = {
        let w = widget.borrow();
        (
            w.entries().len(),
            w.can_spin(),
            w.can_shuffle(),
            w.editor().map(|buffer| Rc::new(buffer.names().to_vec())),
        )
    };

    html! {
        <div class="wheel-page">
            <div class="wheel-container" ref={container_ref}>
                <canvas id={CANVAS_ID} ref={canvas_ref} onclick={on_canvas_click} />
            </div>

            <SpinControls
                {entry_count}
                {can_spin}
                {can_shuffle}
                {on_spin}
                {on_shuffle}
                {on_manage}
            />

            if let Some(names) = editor_names {
                <ManageModal
                    {names}
                    {on_add}
                    {on_import}
                    on_remove={on_remove_entry}
                    {on_clear}
                    {on_save}
                    on_close={on_close_manage}
                />
            }

            if let Some(winner) = (*winner_dialog).clone() {
                <WinnerModal
                    {winner}
                    on_close={on_close_winner}
                    on_remove={on_remove_winner}
                />
            }
        </div>
    }
}

/// Entry point: installs logging and the panic hook, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) fails harmlessly
    let _ = console_log::init_with_level(log::Level::Info);
    info!("Spin wheel starting with {} names", SEED_NAMES.len());
    yew::Renderer::<App>::new().render();
}
