use dioxus::prelude::*;
use shared_types::DesktopCommand;
use shell::start_menu::StartMenu as StartMenuModel;
use shell::{Desktop, ShellConfig};

use crate::components::styles::DESKTOP_STYLES;
use crate::desktop::components::start_menu::StartMenu;
use crate::desktop::components::taskbar::Taskbar;
use crate::desktop::components::workspace_canvas::WorkspaceCanvas;
use crate::desktop::effects;
use crate::desktop::state::ShellHandle;

#[component]
pub fn DesktopShell(config: ShellConfig) -> Element {
    let desktop = use_signal(move || Desktop::with_core_apps(config));
    let shell = use_hook(|| ShellHandle::new(desktop));

    use_effect(move || {
        effects::track_viewport(shell);
        effects::install_key_listener(shell);
    });
    use_future(move || effects::run_clock(shell));

    let desktop_ref = desktop.read();
    let state = desktop_ref.state();
    let wm = desktop_ref.window_manager();
    let taskbar_height = wm.config().taskbar_height;
    let dragging = state
        .windows
        .iter()
        .find(|w| wm.is_dragging(&w.id))
        .map(|w| w.id.clone());
    let menu_items = StartMenuModel::entries(wm.registry());
    drop(desktop_ref);
    let menu_open = state.start_menu_open;

    rsx! {
        style { {DESKTOP_STYLES} }

        div {
            class: "desktop-shell",
            style: "width: 100vw; height: 100dvh; display: flex; flex-direction: column; overflow: hidden; background: var(--desktop-bg);",
            onclick: move |_| {
                if menu_open {
                    shell.command(DesktopCommand::ClickOutside);
                }
            },

            WorkspaceCanvas {
                apps: state.apps.clone(),
                windows: state.windows.clone(),
                active_window: state.active_window.clone(),
                dragging,
                shell,
            }

            Taskbar {
                buttons: state.taskbar.clone(),
                clock: state.clock.clone(),
                height: taskbar_height,
                start_menu_open: menu_open,
                shell,

                if menu_open {
                    StartMenu {
                        items: menu_items,
                        apps: state.apps.clone(),
                        shell,
                    }
                }
            }
        }
    }
}
