//! Pure Yew view components for the wheel page.
//!
//! Components render from props and report user intent through callbacks;
//! all state lives with the `WheelWidget` owned by `App`.

use crate::hooks::use_entry_input;
use std::rc::Rc;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

/// Spin / shuffle / manage buttons with the live entry count.
#[derive(Properties, PartialEq)]
pub struct SpinControlsProps {
    pub entry_count: usize,
    pub can_spin: bool,
    pub can_shuffle: bool,
    pub on_spin: Callback<()>,
    pub on_shuffle: Callback<()>,
    pub on_manage: Callback<()>,
}

#[function_component(SpinControls)]
pub fn spin_controls(props: &SpinControlsProps) -> Html {
    let on_spin = props.on_spin.reform(|_: MouseEvent| ());
    let on_shuffle = props.on_shuffle.reform(|_: MouseEvent| ());
    let on_manage = props.on_manage.reform(|_: MouseEvent| ());

    html! {
        <div class="wheel-controls">
            <span class="entries-count">{ format!("Entries: {}", props.entry_count) }</span>
            <button class="btn-spin" disabled={!props.can_spin} onclick={on_spin}>
                { "Spin" }
            </button>
            <button class="btn-shuffle" disabled={!props.can_shuffle} onclick={on_shuffle}>
                { "Shuffle" }
            </button>
            <button class="btn-manage" onclick={on_manage}>{ "Edit names" }</button>
        </div>
    }
}

/// Winner announcement. The backdrop, the × icon and the close button all
/// dismiss; "Remove" also deletes the winner from the wheel.
#[derive(Properties, PartialEq)]
pub struct WinnerModalProps {
    pub winner: AttrValue,
    pub on_close: Callback<()>,
    pub on_remove: Callback<()>,
}

#[function_component(WinnerModal)]
pub fn winner_modal(props: &WinnerModalProps) -> Html {
    let on_backdrop = props.on_close.reform(|_: MouseEvent| ());
    let on_close = props.on_close.reform(|_: MouseEvent| ());
    let on_close_x = props.on_close.reform(|_: MouseEvent| ());
    let on_remove = props.on_remove.reform(|_: MouseEvent| ());
    // Clicks inside the card must not reach the backdrop
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={on_backdrop}>
            <div class="modal-content winner-modal" onclick={keep_open}>
                <button class="modal-x" aria-label="Close" onclick={on_close_x}>{ "×" }</button>
                <p class="winner-label">{ "The winner is" }</p>
                <h2 class="winner-name">{ props.winner.clone() }</h2>
                <div class="modal-actions">
                    <button class="btn-secondary" onclick={on_close}>{ "Close" }</button>
                    <button class="btn-danger" onclick={on_remove}>{ "Remove" }</button>
                </div>
            </div>
        </div>
    }
}

/// One row of the edit buffer with its delete control.
#[derive(Properties, PartialEq)]
pub struct EntryRowProps {
    pub index: usize,
    pub name: AttrValue,
    pub on_remove: Callback<usize>,
}

#[function_component(EntryRow)]
pub fn entry_row(props: &EntryRowProps) -> Html {
    let index = props.index;
    let on_remove = props.on_remove.reform(move |_: MouseEvent| index);
    html! {
        <li class="entry-row">
            <span class="entry-name">{ props.name.clone() }</span>
            <button class="entry-delete" aria-label="Remove entry" onclick={on_remove}>{ "✕" }</button>
        </li>
    }
}

/// Management view over the edit buffer. Nothing here touches the wheel
/// until `on_save` fires; closing discards the buffer.
#[derive(Properties, PartialEq)]
pub struct ManageModalProps {
    pub names: Rc<Vec<String>>,
    pub on_add: Callback<String>,
    pub on_import: Callback<String>,
    pub on_remove: Callback<usize>,
    pub on_clear: Callback<()>,
    pub on_save: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(ManageModal)]
pub fn manage_modal(props: &ManageModalProps) -> Html {
    let entry = use_entry_input(props.on_add.clone());
    let bulk_text = use_state(String::new);

    let on_bulk_input = {
        let bulk_text = bulk_text.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            bulk_text.set(area.value());
        })
    };
    let on_import = {
        let bulk_text = bulk_text.clone();
        let on_import = props.on_import.clone();
        Callback::from(move |_: MouseEvent| {
            on_import.emit((*bulk_text).clone());
            bulk_text.set(String::new());
        })
    };

    let on_add_click = entry.on_commit.reform(|_: MouseEvent| ());
    let on_clear = props.on_clear.reform(|_: MouseEvent| ());
    let on_save = props.on_save.reform(|_: MouseEvent| ());
    let on_close = props.on_close.reform(|_: MouseEvent| ());
    let on_close_x = props.on_close.reform(|_: MouseEvent| ());
    let on_backdrop = props.on_close.reform(|_: MouseEvent| ());
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={on_backdrop}>
            <div class="modal-content manage-modal" onclick={keep_open}>
                <button class="modal-x" aria-label="Close" onclick={on_close_x}>{ "×" }</button>
                <h3>{ format!("Names ({})", props.names.len()) }</h3>

                <div class="entry-add">
                    <input type="text"
                        placeholder="Add a name"
                        value={entry.text.clone()}
                        oninput={entry.on_text_input.clone()}
                        onkeydown={entry.on_keydown.clone()}
                    />
                    <button class="btn-add" onclick={on_add_click}>{ "Add" }</button>
                </div>

                if props.names.is_empty() {
                    <p class="entry-empty">{ "No names yet." }</p>
                } else {
                    <ul class="entry-list">
                        { for props.names.iter().enumerate().map(|(index, name)| html! {
                            <EntryRow
                                key={index}
                                {index}
                                name={AttrValue::from(name.clone())}
                                on_remove={props.on_remove.clone()}
                            />
                        }) }
                    </ul>
                }

                <details class="entry-import">
                    <summary>{ "Paste a list" }</summary>
                    <textarea
                        rows="5"
                        placeholder="One name per line, or separated by commas"
                        value={(*bulk_text).clone()}
                        oninput={on_bulk_input}
                    />
                    <button class="btn-secondary" onclick={on_import}>{ "Add all" }</button>
                </details>

                <div class="modal-actions">
                    <button class="btn-secondary" onclick={on_clear}>{ "Clear all" }</button>
                    <button class="btn-secondary" onclick={on_close}>{ "Cancel" }</button>
                    <button class="btn-primary" onclick={on_save}>{ "Save" }</button>
                </div>
            </div>
        </div>
    }
}
