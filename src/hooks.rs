use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the state and callbacks for the add-entry text field.
#[derive(Clone)]
pub struct EntryInput {
    /// The current text content of the input field.
    pub text: String,
    /// Callback for the text input's `oninput` event. Updates the internal text state.
    pub on_text_input: Callback<InputEvent>,
    /// Submit the current text. Blank input is ignored and left in place;
    /// accepted input is emitted trimmed and the field is cleared.
    pub on_commit: Callback<()>,
    /// Commits on Enter.
    pub on_keydown: Callback<KeyboardEvent>,
}

/// Custom hook to manage the add-entry field of the management view.
#[hook]
pub fn use_entry_input(on_add: Callback<String>) -> EntryInput {
    let text_state_handle: UseStateHandle<String> = use_state(String::new);

    let on_text_input = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let on_commit = {
        let current_text_handle = text_state_handle.clone();
        Callback::from(move |_: ()| {
            let trimmed = current_text_handle.trim();
            if trimmed.is_empty() {
                return;
            }
            on_add.emit(trimmed.to_string());
            current_text_handle.set(String::new());
        })
    };

    let on_keydown = {
        let commit_handler = on_commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                commit_handler.emit(());
            }
        })
    };

    EntryInput {
        text: (*text_state_handle).clone(),
        on_text_input,
        on_commit,
        on_keydown,
    }
}
