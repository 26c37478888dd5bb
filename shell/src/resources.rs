//! Ephemeral resources applications acquire through their window.
//!
//! Timers, keyboard listeners and object URLs are all owned by the window that
//! requested them. Closing a window releases everything it owns. Timers are
//! only bookkeeping here; whoever drives the shell (the desktop actor or the
//! browser front end) turns [`ResourceChange`] records into real intervals.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ListenerToken(pub u64);

/// Work the host runtime has to mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    TimerStarted {
        timer: TimerId,
        window_id: String,
        period: Duration,
    },
    TimerCancelled {
        timer: TimerId,
    },
    ObjectUrlRevoked {
        url: String,
    },
}

/// What a window still held when it was released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    pub timers: usize,
    pub key_listeners: usize,
    pub object_urls: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceCounts {
    pub timers: usize,
    pub key_listeners: usize,
    pub object_urls: usize,
}

#[derive(Debug, Default)]
pub struct Resources {
    next_id: u64,
    /// timer -> owning window
    timers: BTreeMap<TimerId, String>,
    key_listeners: BTreeMap<ListenerToken, String>,
    /// url -> owning window
    object_urls: BTreeMap<String, String>,
    changes: Vec<ResourceChange>,
}

/// Whether `owner` may release a resource held by `holder`
fn owns(resource: &str, holder: Option<&String>, owner: &str) -> bool {
    match holder {
        Some(holder) if holder == owner => true,
        Some(holder) => {
            tracing::warn!(
                window_id = owner,
                owner = %holder,
                resource,
                "Refusing to release a resource owned by another window"
            );
            false
        }
        None => false,
    }
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn start_timer(&mut self, window_id: &str, period: Duration) -> TimerId {
        let timer = TimerId(self.allocate());
        self.timers.insert(timer, window_id.to_string());
        self.changes.push(ResourceChange::TimerStarted {
            timer,
            window_id: window_id.to_string(),
            period,
        });
        tracing::debug!(window_id, timer = timer.0, ?period, "Timer started");
        timer
    }

    /// Cancel a timer `window_id` started. Returns false when the timer is
    /// already gone or belongs to another window.
    pub fn cancel_timer(&mut self, window_id: &str, timer: TimerId) -> bool {
        if !owns("timer", self.timers.get(&timer), window_id) {
            return false;
        }
        self.drop_timer(timer);
        true
    }

    fn drop_timer(&mut self, timer: TimerId) {
        if self.timers.remove(&timer).is_some() {
            self.changes.push(ResourceChange::TimerCancelled { timer });
            tracing::debug!(timer = timer.0, "Timer cancelled");
        }
    }

    pub fn timer_owner(&self, timer: TimerId) -> Option<&str> {
        self.timers.get(&timer).map(String::as_str)
    }

    pub fn add_key_listener(&mut self, window_id: &str) -> ListenerToken {
        let token = ListenerToken(self.allocate());
        self.key_listeners.insert(token, window_id.to_string());
        token
    }

    pub fn remove_key_listener(&mut self, window_id: &str, token: ListenerToken) -> bool {
        if !owns("key listener", self.key_listeners.get(&token), window_id) {
            return false;
        }
        self.key_listeners.remove(&token);
        true
    }

    pub fn has_key_listener(&self, window_id: &str) -> bool {
        self.key_listeners.values().any(|owner| owner == window_id)
    }

    pub fn register_object_url(&mut self, window_id: &str, url: &str) {
        self.object_urls
            .insert(url.to_string(), window_id.to_string());
    }

    pub fn revoke_object_url(&mut self, window_id: &str, url: &str) -> bool {
        if !owns("object url", self.object_urls.get(url), window_id) {
            return false;
        }
        self.drop_object_url(url);
        true
    }

    fn drop_object_url(&mut self, url: &str) {
        if self.object_urls.remove(url).is_some() {
            self.changes.push(ResourceChange::ObjectUrlRevoked {
                url: url.to_string(),
            });
        }
    }

    /// Drop everything `window_id` still owns.
    pub fn release_window(&mut self, window_id: &str) -> ReleaseSummary {
        let timers: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, owner)| owner.as_str() == window_id)
            .map(|(id, _)| *id)
            .collect();
        for timer in &timers {
            self.drop_timer(*timer);
        }

        let listeners: Vec<ListenerToken> = self
            .key_listeners
            .iter()
            .filter(|(_, owner)| owner.as_str() == window_id)
            .map(|(token, _)| *token)
            .collect();
        for token in &listeners {
            self.key_listeners.remove(token);
        }

        let urls: Vec<String> = self
            .object_urls
            .iter()
            .filter(|(_, owner)| owner.as_str() == window_id)
            .map(|(url, _)| url.clone())
            .collect();
        for url in &urls {
            self.drop_object_url(url);
        }

        ReleaseSummary {
            timers: timers.len(),
            key_listeners: listeners.len(),
            object_urls: urls.len(),
        }
    }

    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            timers: self.timers.len(),
            key_listeners: self.key_listeners.len(),
            object_urls: self.object_urls.len(),
        }
    }

    pub fn owned_by(&self, window_id: &str) -> ResourceCounts {
        ResourceCounts {
            timers: self
                .timers
                .values()
                .filter(|owner| owner.as_str() == window_id)
                .count(),
            key_listeners: self
                .key_listeners
                .values()
                .filter(|owner| owner.as_str() == window_id)
                .count(),
            object_urls: self
                .object_urls
                .values()
                .filter(|owner| owner.as_str() == window_id)
                .count(),
        }
    }

    pub fn drain_changes(&mut self) -> Vec<ResourceChange> {
        std::mem::take(&mut self.changes)
    }
}
