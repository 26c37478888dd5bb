use std::collections::HashMap;

use dioxus::prelude::*;
use dioxus_logger::tracing;
use gloo_timers::callback::Interval;
use shared_types::{AppInput, DesktopCommand, DesktopEvent};
use shell::apps::KeyOutcome;
use shell::resources::{ResourceChange, TimerId};
use shell::{Desktop, ShellError};

/// Browser-side handle on the in-process desktop.
///
/// Every mutation goes through [`ShellHandle::dispatch`], which afterwards
/// mirrors timer starts and cancellations onto real intervals, revokes object
/// URLs the shell released and surfaces shell notices.
#[derive(Clone, Copy)]
pub struct ShellHandle {
    desktop: Signal<Desktop>,
    timers: Signal<HashMap<TimerId, Interval>>,
}

impl PartialEq for ShellHandle {
    fn eq(&self, other: &Self) -> bool {
        self.desktop == other.desktop
    }
}

impl ShellHandle {
    pub fn new(desktop: Signal<Desktop>) -> Self {
        Self {
            desktop,
            timers: Signal::new(HashMap::new()),
        }
    }

    pub fn desktop(&self) -> Signal<Desktop> {
        self.desktop
    }

    pub fn dispatch<R>(&self, f: impl FnOnce(&mut Desktop) -> R) -> R {
        let mut desktop = self.desktop;
        let result = {
            let mut guard = desktop.write();
            f(&mut guard)
        };
        self.reconcile();
        result
    }

    pub fn command(&self, command: DesktopCommand) {
        if let Err(e) = self.dispatch(|desktop| desktop.apply(command)) {
            report(&e);
        }
    }

    pub fn app_input(&self, window_id: &str, input: AppInput) {
        self.command(DesktopCommand::AppInput {
            window_id: window_id.to_string(),
            input,
        });
    }

    pub fn key(&self, key: &str) -> KeyOutcome {
        self.dispatch(|desktop| desktop.key(key))
    }

    fn fire(&self, timer: TimerId) {
        let live = self.dispatch(|desktop| desktop.window_manager_mut().fire_timer(timer));
        if !live {
            self.drop_timer(timer);
        }
    }

    fn drop_timer(&self, timer: TimerId) {
        let mut timers = self.timers;
        // Dropping the interval clears it
        let removed = timers.write().remove(&timer);
        drop(removed);
    }

    fn reconcile(&self) {
        let mut desktop = self.desktop;
        let (changes, events) = {
            let mut guard = desktop.write();
            let changes = guard.window_manager_mut().drain_resource_changes();
            let events = guard.drain_events();
            (changes, events)
        };

        for change in changes {
            match change {
                ResourceChange::TimerStarted {
                    timer,
                    window_id,
                    period,
                } => {
                    let handle = *self;
                    let millis = period.as_millis().clamp(1, u32::MAX as u128) as u32;
                    let interval = Interval::new(millis, move || handle.fire(timer));
                    tracing::debug!(timer = timer.0, %window_id, millis, "Interval started");
                    let mut timers = self.timers;
                    timers.write().insert(timer, interval);
                }
                ResourceChange::TimerCancelled { timer } => {
                    tracing::debug!(timer = timer.0, "Interval cleared");
                    self.drop_timer(timer);
                }
                ResourceChange::ObjectUrlRevoked { url } => revoke_object_url(&url),
            }
        }

        for event in events {
            if let DesktopEvent::Notice { message } = &event {
                show_notice(message);
            }
            tracing::trace!(?event, "Desktop event");
        }
    }
}

fn report(error: &ShellError) {
    tracing::warn!(error = %error, "Desktop command rejected");
}

fn revoke_object_url(url: &str) {
    // Only URLs the browser minted can be revoked
    if !url.starts_with("blob:") || url.starts_with("blob:shell/") {
        return;
    }
    if let Err(e) = web_sys::Url::revoke_object_url(url) {
        tracing::warn!(url, error = ?e, "Failed to revoke object URL");
    }
}

fn show_notice(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let _ = window.alert_with_message(message);
}
