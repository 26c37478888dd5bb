use dioxus_logger::tracing;
use gloo_timers::future::TimeoutFuture;
use shared_types::DesktopCommand;
use shell::apps::KeyOutcome;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::desktop::state::ShellHandle;
use crate::interop::current_viewport_size;

/// Feed the browser viewport into the window manager and keep it current.
pub fn track_viewport(shell: ShellHandle) {
    if let Some((w, h)) = current_viewport_size() {
        shell.command(DesktopCommand::Resize {
            width: w,
            height: h,
        });
    }

    let Some(window) = web_sys::window() else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some((w, h)) = current_viewport_size() {
            shell.command(DesktopCommand::Resize {
                width: w,
                height: h,
            });
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    let _ = window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());

    // Keep listener alive for app lifetime.
    callback.forget();
}

/// Route document key presses to the active window. Keys an app consumes do
/// not scroll the page.
pub fn install_key_listener(shell: ShellHandle) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        if shell.key(&event.key()) == KeyOutcome::Consumed {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    if let Err(e) =
        document.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())
    {
        tracing::warn!("Failed to install keyboard listener: {:?}", e);
    }
    callback.forget();
}

/// Taskbar clock loop
pub async fn run_clock(shell: ShellHandle) {
    let interval = shell.desktop().peek().clock().interval();
    let millis = interval.as_millis().clamp(1, u32::MAX as u128) as u32;
    loop {
        shell.dispatch(|desktop| desktop.tick_clock_local());
        TimeoutFuture::new(millis).await;
    }
}
