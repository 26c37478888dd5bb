use dioxus::prelude::*;
use shared_types::AppInput;

use crate::desktop::state::ShellHandle;

/// Button rows, left to right
const KEYPAD: [[&str; 4]; 5] = [
    ["C", "CE", "<-", "/"],
    ["7", "8", "9", "*"],
    ["4", "5", "6", "-"],
    ["1", "2", "3", "+"],
    ["0", ".", "=", ""],
];

fn is_operator(key: &str) -> bool {
    matches!(key, "+" | "-" | "*" | "/" | "=")
}

#[component]
pub fn CalculatorView(window_id: String, props: serde_json::Value, shell: ShellHandle) -> Element {
    let display = props["display"].as_str().unwrap_or("0").to_string();
    let error = props["error"].as_bool().unwrap_or(false);
    let display_color = if error { "#b00020" } else { "black" };

    rsx! {
        div {
            class: "calculator-app",
            style: "display: flex; flex-direction: column; gap: 0.5rem; height: 100%; padding: 0.5rem;",
            div {
                class: "calculator-display",
                style: "padding: 0.375rem 0.5rem; text-align: right; font-family: monospace; font-size: 1.375rem; background: white; color: {display_color}; border: 2px inset #d4d0c8; overflow: hidden; white-space: nowrap;",
                "{display}"
            }
            div {
                class: "calculator-buttons",
                style: "flex: 1; display: grid; grid-template-columns: repeat(4, 1fr); gap: 0.25rem;",
                for label in KEYPAD.iter().flatten().filter(|label| !label.is_empty()) {
                    CalculatorKey {
                        key: "{label}",
                        label: label.to_string(),
                        window_id: window_id.clone(),
                        shell,
                    }
                }
            }
        }
    }
}

#[component]
fn CalculatorKey(label: String, window_id: String, shell: ShellHandle) -> Element {
    let color = if is_operator(&label) { "#0033cc" } else { "black" };
    let value = label.clone();

    rsx! {
        button {
            style: "font-size: 1rem; color: {color}; background: #f4f3ee; border: 1px solid #8e8f8f; border-radius: 3px; cursor: pointer;",
            onclick: move |_| {
                shell.app_input(&window_id, AppInput::Button { value: value.clone() });
            },
            "{label}"
        }
    }
}
