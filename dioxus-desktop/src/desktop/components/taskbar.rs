use dioxus::prelude::*;
use shared_types::{DesktopCommand, TaskbarButton};

use crate::desktop::state::ShellHandle;

const START_ICON: &str = "icons/xp_icon.svg";

#[component]
pub fn Taskbar(
    buttons: Vec<TaskbarButton>,
    clock: String,
    height: i32,
    start_menu_open: bool,
    shell: ShellHandle,
    children: Element,
) -> Element {
    let start_shadow = if start_menu_open {
        "inset 1px 1px 3px rgba(0,0,0,0.6)"
    } else {
        "none"
    };

    rsx! {
        div {
            class: "taskbar",
            style: "position: relative; height: {height}px; flex-shrink: 0; display: flex; align-items: center; gap: 0.25rem; background: var(--taskbar-bg); z-index: 9999;",

            div {
                style: "position: relative; height: 100%;",
                button {
                    class: "start-button",
                    style: "height: 100%; display: flex; align-items: center; gap: 0.375rem; padding: 0 1rem 0 0.5rem; background: var(--start-bg); color: white; font-style: italic; font-weight: 700; font-size: 1rem; border: none; border-radius: 0 10px 10px 0; cursor: pointer; box-shadow: {start_shadow};",
                    onclick: move |e| {
                        e.stop_propagation();
                        shell.command(DesktopCommand::StartButton);
                    },
                    img { src: START_ICON, width: "20", height: "20", alt: "" }
                    "start"
                }
                {children}
            }

            div {
                class: "taskbar-apps",
                style: "flex: 1; display: flex; align-items: center; gap: 0.25rem; overflow: hidden; padding: 0 0.25rem;",
                for button in buttons {
                    TaskbarEntry { key: "{button.window_id}", button: button.clone(), shell }
                }
            }

            div {
                class: "taskbar-clock",
                style: "height: 100%; display: flex; align-items: center; padding: 0 0.75rem; background: rgba(0, 0, 0, 0.15); color: white; font-size: 0.75rem; border-left: 1px solid rgba(0,0,0,0.3);",
                "{clock}"
            }
        }
    }
}

#[component]
fn TaskbarEntry(button: TaskbarButton, shell: ShellHandle) -> Element {
    let window_id = button.window_id.clone();
    let background = if button.active {
        "#1e52b7"
    } else {
        "#3c81f3"
    };
    let shadow = if button.active {
        "inset 1px 1px 2px rgba(0,0,0,0.5)"
    } else {
        "none"
    };

    rsx! {
        button {
            class: if button.active { "taskbar-button active" } else { "taskbar-button" },
            style: "height: 28px; min-width: 0; max-width: 10rem; flex: 0 1 10rem; display: flex; align-items: center; gap: 0.25rem; padding: 0 0.5rem; background: {background}; color: white; border: none; border-radius: 3px; font-size: 0.75rem; white-space: nowrap; overflow: hidden; cursor: pointer; box-shadow: {shadow};",
            title: "{button.label}",
            onclick: move |_| {
                shell.command(DesktopCommand::TaskbarClick {
                    window_id: window_id.clone(),
                });
            },
            img { src: "{button.icon}", width: "16", height: "16", alt: "" }
            span { style: "overflow: hidden; text-overflow: ellipsis;", "{button.label}" }
        }
    }
}
