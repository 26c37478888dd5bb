use dioxus::prelude::*;
use shared_types::{
    DesktopCommand, PointerTarget, WindowState, APP_CALCULATOR, APP_MEDIA_PLAYER, APP_NOTEPAD,
    APP_PAINT, APP_SNAKE,
};

use crate::components::{CalculatorView, MediaPlayerView, NotepadView, PaintView, SnakeView};
use crate::desktop::state::ShellHandle;
use crate::interop::{capture_pointer, pointer_point, release_pointer};

const TITLEBAR_HEIGHT_PX: i32 = 30;

#[component]
pub fn FloatingWindow(
    window: WindowState,
    is_active: bool,
    dragging: bool,
    shell: ShellHandle,
) -> Element {
    let window_id = window.id.clone();
    let z_index = window.z_index;
    let display = if window.minimized { "none" } else { "flex" };

    let window_style = format!(
        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; z-index: \
         {z_index}; display: {display}; flex-direction: column; background: var(--window-bg, \
         #ece9d8); border: 3px solid var(--window-border, #0054e3); border-radius: {}; \
         overflow: hidden; box-shadow: var(--shadow-lg, 2px 2px 10px rgba(0,0,0,0.5));",
        window.x,
        window.y,
        window.width,
        window.height,
        if window.maximized { "0" } else { "8px 8px 0 0" },
    );
    let titlebar_background = if is_active {
        "var(--titlebar-bg, linear-gradient(to bottom, #0058e6, #3a93ff))"
    } else {
        "var(--titlebar-inactive-bg, linear-gradient(to bottom, #7a96df, #a6b8e8))"
    };

    let window_id_for_focus = window_id.clone();
    let window_id_for_pointer_down = window_id.clone();
    let window_id_for_double_click = window_id.clone();

    rsx! {
        div {
            class: if is_active { "window active" } else { "window" },
            id: "{window_id}",
            role: "dialog",
            "aria-label": window.title.clone(),
            style: "{window_style}",
            onpointerdown: move |_| {
                if !is_active {
                    shell.command(DesktopCommand::Focus {
                        window_id: window_id_for_focus.clone(),
                    });
                }
            },
            onpointermove: move |e| {
                if !dragging {
                    return;
                }
                let (x, y) = pointer_point(&e);
                shell.command(DesktopCommand::PointerMove { x, y });
            },
            onpointerup: move |e| {
                if !dragging {
                    return;
                }
                release_pointer(&e, ".window");
                shell.command(DesktopCommand::PointerUp);
            },
            onpointercancel: move |e| {
                if !dragging {
                    return;
                }
                release_pointer(&e, ".window");
                shell.command(DesktopCommand::PointerUp);
            },

            div {
                class: "window-titlebar",
                style: "display: flex; align-items: center; justify-content: space-between; height: {TITLEBAR_HEIGHT_PX}px; padding: 0 0.25rem 0 0.5rem; background: {titlebar_background}; color: white; cursor: default; user-select: none; touch-action: none; flex-shrink: 0;",
                onpointerdown: move |e| {
                    e.prevent_default();
                    let (x, y) = pointer_point(&e);
                    shell.command(DesktopCommand::PointerDown {
                        window_id: window_id_for_pointer_down.clone(),
                        x,
                        y,
                        target: PointerTarget::TitleBar,
                    });
                    capture_pointer(&e, ".window");
                },
                ondoubleclick: move |_| {
                    shell.command(DesktopCommand::ToggleMaximize {
                        window_id: window_id_for_double_click.clone(),
                    });
                },

                div {
                    style: "display: flex; align-items: center; gap: 0.375rem; overflow: hidden;",
                    img { src: "{window.icon}", width: "16", height: "16", alt: "" }
                    span {
                        class: "window-title",
                        style: "font-weight: 700; font-size: 0.8125rem; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                        "{window.title}"
                    }
                }

                WindowControls {
                    maximized: window.maximized,
                    window_id: window_id.clone(),
                    shell,
                }
            }

            div {
                class: "window-content",
                style: "flex: 1; overflow: hidden; position: relative;",

                match window.app_id.as_str() {
                    APP_NOTEPAD => rsx! {
                        NotepadView { key: "{window.id}", window_id: window.id.clone(), props: window.props.clone(), shell }
                    },
                    APP_CALCULATOR => rsx! {
                        CalculatorView { key: "{window.id}", window_id: window.id.clone(), props: window.props.clone(), shell }
                    },
                    APP_PAINT => rsx! {
                        PaintView { key: "{window.id}", window_id: window.id.clone(), props: window.props.clone(), shell }
                    },
                    APP_MEDIA_PLAYER => rsx! {
                        MediaPlayerView { key: "{window.id}", window_id: window.id.clone(), props: window.props.clone(), shell }
                    },
                    APP_SNAKE => rsx! {
                        SnakeView { key: "{window.id}", window_id: window.id.clone(), props: window.props.clone(), shell }
                    },
                    _ => rsx! {
                        div {
                            style: "display: flex; align-items: center; justify-content: center; height: 100%; color: var(--text-muted, #6b7280); padding: 1rem;",
                            "No view for this application"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn WindowControls(maximized: bool, window_id: String, shell: ShellHandle) -> Element {
    let window_id_for_minimize = window_id.clone();
    let window_id_for_max_restore = window_id.clone();
    let window_id_for_close = window_id;
    let button_style = "width: 21px; height: 21px; display: flex; align-items: center; justify-content: center; background: var(--control-bg, #2f6fed); color: white; border: 1px solid white; border-radius: 3px; cursor: pointer; font-size: 0.75rem; font-weight: 700; padding: 0;";

    rsx! {
        div {
            class: "window-controls",
            style: "display: flex; align-items: center; gap: 2px; flex-shrink: 0;",

            button {
                class: "window-minimize",
                style: "{button_style}",
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": "Minimize",
                onclick: move |e| {
                    e.stop_propagation();
                    shell.command(DesktopCommand::Minimize {
                        window_id: window_id_for_minimize.clone(),
                    });
                },
                "_"
            }
            button {
                class: "window-maximize",
                style: "{button_style}",
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": if maximized { "Restore" } else { "Maximize" },
                onclick: move |e| {
                    e.stop_propagation();
                    shell.command(DesktopCommand::ToggleMaximize {
                        window_id: window_id_for_max_restore.clone(),
                    });
                },
                if maximized { "❐" } else { "□" }
            }
            button {
                class: "window-close",
                style: "{button_style} background: var(--danger-bg, #e04343);",
                onpointerdown: move |e| e.stop_propagation(),
                "aria-label": "Close",
                onclick: move |e| {
                    e.stop_propagation();
                    shell.command(DesktopCommand::Close {
                        window_id: window_id_for_close.clone(),
                    });
                },
                "×"
            }
        }
    }
}
