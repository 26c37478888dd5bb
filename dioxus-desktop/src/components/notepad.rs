use dioxus::prelude::*;
use shared_types::AppInput;

use crate::desktop::state::ShellHandle;
use crate::interop::focus_element;

#[component]
pub fn NotepadView(window_id: String, props: serde_json::Value, shell: ShellHandle) -> Element {
    let text = props["text"].as_str().unwrap_or_default().to_string();
    let autofocus = props["autofocus"].as_bool().unwrap_or(false);
    let lines = props["lines"].as_u64().unwrap_or(1);
    let chars = props["chars"].as_u64().unwrap_or(0);
    let textarea_id = format!("{window_id}-text");

    {
        let textarea_id = textarea_id.clone();
        use_effect(move || {
            if autofocus {
                focus_element(&textarea_id);
            }
        });
    }

    rsx! {
        div {
            class: "notepad-app",
            style: "display: flex; flex-direction: column; height: 100%;",
            textarea {
                id: "{textarea_id}",
                class: "notepad-textarea",
                spellcheck: "false",
                style: "flex: 1; resize: none; border: none; outline: none; padding: 0.25rem; font-family: 'Lucida Console', monospace; font-size: 0.8125rem; background: white; color: black;",
                value: "{text}",
                oninput: move |e| shell.app_input(&window_id, AppInput::Text { text: e.value() }),
            }
            div {
                class: "status-bar",
                style: "padding: 0.125rem 0.5rem; font-size: 0.6875rem; border-top: 1px solid #aca899; color: #444;",
                "Ln {lines}, {chars} characters"
            }
        }
    }
}
