//! DesktopActor - serializes every input to one [`Desktop`]
//!
//! Pointer, keyboard, timer and clock events all arrive as messages, so the
//! window manager only ever sees one event at a time. Application timers
//! become tokio interval tasks that cast `FireTimer` back to the actor and are
//! aborted as soon as the window manager cancels them.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde::Serialize;
use shared_types::{DesktopCommand, DesktopEvent, DesktopState, WindowState};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::apps::KeyOutcome;
use crate::config::ShellConfig;
use crate::desktop::Desktop;
use crate::registry::AppRegistry;
use crate::resources::{ResourceChange, ResourceCounts, TimerId};
use crate::window_manager::ShellError;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Actor that owns the desktop
#[derive(Debug, Default)]
pub struct DesktopActor;

/// Arguments for spawning DesktopActor
#[derive(Debug, Clone)]
pub struct DesktopArguments {
    pub desktop_id: String,
    pub config: ShellConfig,
    pub registry: AppRegistry,
}

impl DesktopArguments {
    pub fn with_core_apps(desktop_id: impl Into<String>, config: ShellConfig) -> Self {
        Self {
            desktop_id: desktop_id.into(),
            config,
            registry: AppRegistry::with_core_apps(),
        }
    }
}

/// State for DesktopActor
pub struct DesktopActorState {
    desktop_id: String,
    desktop: Desktop,
    timer_tasks: HashMap<TimerId, JoinHandle<()>>,
    clock_task: Option<JoinHandle<()>>,
    events: broadcast::Sender<DesktopEvent>,
}

/// Live resource bookkeeping plus the tokio tasks backing the timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeCounts {
    pub resources: ResourceCounts,
    pub timer_tasks: usize,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug)]
pub enum DesktopActorMsg {
    /// Apply a desktop command
    Command {
        command: DesktopCommand,
        reply: RpcReplyPort<Result<(), ShellError>>,
    },
    /// Open or focus an app's window and return it
    OpenApp {
        app_id: String,
        reply: RpcReplyPort<Option<WindowState>>,
    },
    /// Route a key press; replies whether it was consumed
    Key {
        key: String,
        reply: RpcReplyPort<bool>,
    },
    GetDesktopState {
        reply: RpcReplyPort<DesktopState>,
    },
    /// An application timer elapsed
    FireTimer { timer: TimerId },
    /// Clock refresh
    ClockTick,
    GetRuntimeCounts {
        reply: RpcReplyPort<RuntimeCounts>,
    },
    /// Receive every DesktopEvent emitted from now on
    Subscribe {
        reply: RpcReplyPort<broadcast::Receiver<DesktopEvent>>,
    },
    GetActorInfo {
        reply: RpcReplyPort<String>,
    },
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error, Clone)]
pub enum DesktopActorError {
    #[error("Desktop RPC failed: {0}")]
    Rpc(String),

    #[error(transparent)]
    Shell(#[from] ShellError),
}

impl From<ractor::RactorErr<DesktopActorMsg>> for DesktopActorError {
    fn from(e: ractor::RactorErr<DesktopActorMsg>) -> Self {
        DesktopActorError::Rpc(e.to_string())
    }
}

// ============================================================================
// Actor Implementation
// ============================================================================

#[async_trait]
impl Actor for DesktopActor {
    type Msg = DesktopActorMsg;
    type State = DesktopActorState;
    type Arguments = DesktopArguments;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            actor_id = %myself.get_id(),
            desktop_id = %args.desktop_id,
            apps = args.registry.len(),
            "DesktopActor starting"
        );

        let clock_interval = args.config.clock_interval;
        let tick_ref = myself.clone();
        let clock_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(clock_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tick_ref.cast(DesktopActorMsg::ClockTick).is_err() {
                    break;
                }
            }
        });

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(DesktopActorState {
            desktop_id: args.desktop_id,
            desktop: Desktop::new(args.config, args.registry),
            timer_tasks: HashMap::new(),
            clock_task: Some(clock_task),
            events,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DesktopActorMsg::Command { command, reply } => {
                let result = state.desktop.apply(command);
                if let Err(e) = &result {
                    tracing::warn!(desktop_id = %state.desktop_id, error = %e, "Command rejected");
                }
                Self::flush(&myself, state);
                let _ = reply.send(result);
            }
            DesktopActorMsg::OpenApp { app_id, reply } => {
                let window = state.desktop.open_or_focus(&app_id).and_then(|window_id| {
                    state.desktop.window_manager().window(&window_id).cloned()
                });
                Self::flush(&myself, state);
                let _ = reply.send(window);
            }
            DesktopActorMsg::Key { key, reply } => {
                let outcome = state.desktop.key(&key);
                Self::flush(&myself, state);
                let _ = reply.send(outcome == KeyOutcome::Consumed);
            }
            DesktopActorMsg::GetDesktopState { reply } => {
                let _ = reply.send(state.desktop.state());
            }
            DesktopActorMsg::FireTimer { timer } => {
                state.desktop.window_manager_mut().fire_timer(timer);
                Self::flush(&myself, state);
            }
            DesktopActorMsg::ClockTick => {
                state.desktop.tick_clock_local();
                Self::flush(&myself, state);
            }
            DesktopActorMsg::GetRuntimeCounts { reply } => {
                let _ = reply.send(RuntimeCounts {
                    resources: state.desktop.window_manager().resource_counts(),
                    timer_tasks: state.timer_tasks.len(),
                });
            }
            DesktopActorMsg::Subscribe { reply } => {
                let _ = reply.send(state.events.subscribe());
            }
            DesktopActorMsg::GetActorInfo { reply } => {
                let _ = reply.send(state.desktop_id.clone());
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(task) = state.clock_task.take() {
            task.abort();
        }
        for (_, task) in state.timer_tasks.drain() {
            task.abort();
        }
        tracing::info!(
            actor_id = %myself.get_id(),
            desktop_id = %state.desktop_id,
            "DesktopActor stopped"
        );
        Ok(())
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl DesktopActor {
    /// Mirror queued resource changes onto tokio tasks and publish events.
    fn flush(myself: &ActorRef<DesktopActorMsg>, state: &mut DesktopActorState) {
        for change in state.desktop.window_manager_mut().drain_resource_changes() {
            match change {
                ResourceChange::TimerStarted {
                    timer,
                    window_id,
                    period,
                } => {
                    let task = Self::spawn_timer(myself.clone(), timer, period);
                    if let Some(previous) = state.timer_tasks.insert(timer, task) {
                        previous.abort();
                    }
                    tracing::debug!(window_id = %window_id, timer = timer.0, "Timer task spawned");
                }
                ResourceChange::TimerCancelled { timer } => {
                    if let Some(task) = state.timer_tasks.remove(&timer) {
                        task.abort();
                    }
                }
                ResourceChange::ObjectUrlRevoked { url } => {
                    tracing::debug!(url = %url, "Object URL revoked");
                }
            }
        }

        for event in state.desktop.drain_events() {
            // No subscribers is fine
            let _ = state.events.send(event);
        }
    }

    fn spawn_timer(
        desktop: ActorRef<DesktopActorMsg>,
        timer: TimerId,
        period: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the first callback is one period out
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if desktop.cast(DesktopActorMsg::FireTimer { timer }).is_err() {
                    break;
                }
            }
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Apply a command and surface window-manager errors
pub async fn send_command(
    desktop: &ActorRef<DesktopActorMsg>,
    command: DesktopCommand,
) -> Result<(), DesktopActorError> {
    ractor::call!(desktop, |reply| DesktopActorMsg::Command { command, reply })?
        .map_err(DesktopActorError::from)
}

/// Convenience function to open (or focus) an app's window
pub async fn open_app(
    desktop: &ActorRef<DesktopActorMsg>,
    app_id: impl Into<String>,
) -> Result<Option<WindowState>, DesktopActorError> {
    let app_id = app_id.into();
    Ok(ractor::call!(desktop, |reply| DesktopActorMsg::OpenApp {
        app_id,
        reply
    })?)
}

pub async fn press_key(
    desktop: &ActorRef<DesktopActorMsg>,
    key: impl Into<String>,
) -> Result<bool, DesktopActorError> {
    let key = key.into();
    Ok(ractor::call!(desktop, |reply| DesktopActorMsg::Key {
        key,
        reply
    })?)
}

pub async fn get_desktop_state(
    desktop: &ActorRef<DesktopActorMsg>,
) -> Result<DesktopState, DesktopActorError> {
    Ok(ractor::call!(desktop, |reply| DesktopActorMsg::GetDesktopState { reply })?)
}

pub async fn get_runtime_counts(
    desktop: &ActorRef<DesktopActorMsg>,
) -> Result<RuntimeCounts, DesktopActorError> {
    Ok(ractor::call!(desktop, |reply| DesktopActorMsg::GetRuntimeCounts { reply })?)
}

pub async fn subscribe(
    desktop: &ActorRef<DesktopActorMsg>,
) -> Result<broadcast::Receiver<DesktopEvent>, DesktopActorError> {
    Ok(ractor::call!(desktop, |reply| DesktopActorMsg::Subscribe { reply })?)
}

pub async fn get_actor_info(
    desktop: &ActorRef<DesktopActorMsg>,
) -> Result<String, DesktopActorError> {
    Ok(ractor::call!(desktop, |reply| DesktopActorMsg::GetActorInfo { reply })?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AppInput, APP_CALCULATOR, APP_NOTEPAD, APP_SNAKE};

    async fn spawn_desktop(config: ShellConfig) -> ActorRef<DesktopActorMsg> {
        let (desktop, _handle) = Actor::spawn(
            None,
            DesktopActor,
            DesktopArguments::with_core_apps("desktop-1", config),
        )
        .await
        .unwrap();
        desktop
    }

    #[tokio::test]
    async fn test_open_app_returns_window() {
        let desktop = spawn_desktop(ShellConfig::default()).await;

        let window = open_app(&desktop, APP_CALCULATOR).await.unwrap().unwrap();
        assert_eq!(window.app_id, APP_CALCULATOR);
        assert_eq!((window.width, window.height), (240, 320));
        assert_eq!((window.x, window.y), (50, 50));

        let again = open_app(&desktop, APP_CALCULATOR).await.unwrap().unwrap();
        assert_eq!(again.id, window.id);

        let state = get_desktop_state(&desktop).await.unwrap();
        assert_eq!(state.windows.len(), 1);
        assert_eq!(state.active_window, Some(window.id));

        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_unknown_app_is_not_an_error() {
        let desktop = spawn_desktop(ShellConfig::default()).await;
        let window = open_app(&desktop, "solitaire").await.unwrap();
        assert!(window.is_none());
        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_command_errors_surface_through_helper() {
        let desktop = spawn_desktop(ShellConfig::default()).await;
        let result = send_command(
            &desktop,
            DesktopCommand::Minimize {
                window_id: "win_missing".to_string(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(DesktopActorError::Shell(ShellError::WindowNotFound(_)))
        ));
        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_app_input_through_actor() {
        let desktop = spawn_desktop(ShellConfig::default()).await;
        let window = open_app(&desktop, APP_CALCULATOR).await.unwrap().unwrap();
        for key in ["5", "/", "0", "="] {
            send_command(
                &desktop,
                DesktopCommand::AppInput {
                    window_id: window.id.clone(),
                    input: AppInput::Button {
                        value: key.to_string(),
                    },
                },
            )
            .await
            .unwrap();
        }
        let state = get_desktop_state(&desktop).await.unwrap();
        assert_eq!(state.window(&window.id).unwrap().props["display"], "Error");
        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_snake_timer_drives_game_and_close_cleans_up() {
        let config = ShellConfig {
            snake_tick: Duration::from_millis(20),
            ..ShellConfig::default()
        };
        let desktop = spawn_desktop(config).await;
        let window = open_app(&desktop, APP_SNAKE).await.unwrap().unwrap();

        assert!(press_key(&desktop, "ArrowRight").await.unwrap());
        let counts = get_runtime_counts(&desktop).await.unwrap();
        assert_eq!(counts.timer_tasks, 1);
        assert_eq!(counts.resources.timers, 1);
        assert_eq!(counts.resources.key_listeners, 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let state = get_desktop_state(&desktop).await.unwrap();
        let head_x = state.window(&window.id).unwrap().props["snake"][0]["x"]
            .as_i64()
            .unwrap();
        assert!(head_x > 7, "snake should have moved, head x = {head_x}");

        send_command(
            &desktop,
            DesktopCommand::Close {
                window_id: window.id.clone(),
            },
        )
        .await
        .unwrap();
        let counts = get_runtime_counts(&desktop).await.unwrap();
        assert_eq!(counts, RuntimeCounts::default());

        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_keys_ignored_without_listener() {
        let desktop = spawn_desktop(ShellConfig::default()).await;
        open_app(&desktop, APP_NOTEPAD).await.unwrap();
        assert!(!press_key(&desktop, "ArrowDown").await.unwrap());
        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let desktop = spawn_desktop(ShellConfig::default()).await;
        let mut events = subscribe(&desktop).await.unwrap();

        let window = open_app(&desktop, APP_NOTEPAD).await.unwrap().unwrap();
        loop {
            match events.recv().await.unwrap() {
                DesktopEvent::WindowOpened(opened) => {
                    assert_eq!(opened.id, window.id);
                    break;
                }
                DesktopEvent::ClockTick { .. } => continue,
                other => panic!("expected WindowOpened, got {other:?}"),
            }
        }
        desktop.stop(None);
    }

    #[tokio::test]
    async fn test_actor_info() {
        let desktop = spawn_desktop(ShellConfig::default()).await;
        assert_eq!(get_actor_info(&desktop).await.unwrap(), "desktop-1");
        desktop.stop(None);
    }
}
