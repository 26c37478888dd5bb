use dioxus::prelude::*;
use shared_types::{AppDefinition, DesktopCommand, StartMenuItem};

use crate::desktop::state::ShellHandle;

#[component]
pub fn StartMenu(items: Vec<StartMenuItem>, apps: Vec<AppDefinition>, shell: ShellHandle) -> Element {
    rsx! {
        div {
            class: "start-menu",
            style: "position: absolute; left: 0; bottom: 100%; width: 15rem; z-index: 10000; display: flex; flex-direction: column; background: white; border: 2px solid #0054e3; border-radius: 6px 6px 0 0; box-shadow: var(--shadow-lg); overflow: hidden;",
            // Clicks inside the menu are not "outside" clicks
            onclick: move |e| e.stop_propagation(),

            div {
                style: "padding: 0.5rem 0.75rem; background: var(--titlebar-bg); color: white; font-weight: 700;",
                "Webtop"
            }
            for item in items {
                StartMenuEntry {
                    item: item.clone(),
                    app: match &item {
                        StartMenuItem::App { app_id } => apps.iter().find(|app| &app.id == app_id).cloned(),
                        StartMenuItem::ShutDown => None,
                    },
                    shell,
                }
            }
        }
    }
}

#[component]
fn StartMenuEntry(item: StartMenuItem, app: Option<AppDefinition>, shell: ShellHandle) -> Element {
    let shut_down = item == StartMenuItem::ShutDown;
    let (label, icon) = match &app {
        Some(app) => (app.name.clone(), Some(app.icon.clone())),
        None => ("Shut Down".to_string(), None),
    };
    let border = if shut_down {
        "border-top: 1px solid #d4d0c8; margin-top: 0.25rem;"
    } else {
        ""
    };

    rsx! {
        button {
            class: "start-menu-item",
            style: "display: flex; align-items: center; gap: 0.5rem; padding: 0.375rem 0.75rem; background: transparent; border: none; text-align: left; font-size: 0.8125rem; cursor: pointer; {border}",
            onclick: move |_| {
                shell.command(DesktopCommand::StartMenuSelect { item: item.clone() });
            },
            if let Some(icon) = icon {
                img { src: "{icon}", width: "24", height: "24", alt: "" }
            }
            span { "{label}" }
        }
    }
}
