//! Globe Input Manager
//!
//! Owns the current interaction mode, the handler chains, the container
//! listeners and the action bus. Raw host events enter through
//! [`GlobeInputManager::handle_raw`], are normalized against the container,
//! paired with a fresh [`SceneContext`] and offered to the handlers of the
//! current mode in priority order. The first handler that accepts the event
//! decides what it means.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use super::action::{Action, ActionBus, ActionData, ActionEvent, ActionKind, Subscription};
use super::clock::{Clock, MonotonicClock};
use super::event::{InputEvent, RawInput, normalize};
use super::handler::{HandlerRegistry, InputHandler, InputResult, RegistrationError};
use super::handlers::default_handlers;
use super::mode::{InteractionMode, ModeConfig, ModeRegistry};
use super::surface::{AttachedSurface, InputSurface};
use crate::config::InputConfig;
use crate::scene::{SceneContext, SceneContextProvider};

/// Why a dispatch ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// The manager was destroyed.
    Destroyed,
    /// Input is disabled.
    Disabled,
    /// No container is attached, or it is not listening for this event type.
    Detached,
    /// Unsupported or malformed raw event.
    Dropped,
    /// No handler accepted the event.
    Unhandled,
    /// A handler accepted the event.
    Handled,
}

/// Result of dispatching one event, for the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub status: DispatchStatus,
    /// Handler that ended the dispatch.
    pub handler: Option<&'static str>,
    /// Action emitted, if any.
    pub action: Option<ActionKind>,
    /// The host should suppress the platform default for this event.
    pub prevent_default: bool,
}

impl DispatchOutcome {
    fn status(status: DispatchStatus) -> Self {
        Self {
            status,
            handler: None,
            action: None,
            prevent_default: false,
        }
    }

    pub fn is_handled(&self) -> bool {
        self.status == DispatchStatus::Handled
    }
}

/// Builder for a [`GlobeInputManager`] with custom clock, config or handlers.
pub struct GlobeInputManagerBuilder {
    scene: Box<dyn SceneContextProvider>,
    config: InputConfig,
    clock: Box<dyn Clock>,
    default_handlers: bool,
    handlers: Vec<(Box<dyn InputHandler>, Option<Vec<InteractionMode>>)>,
}

impl GlobeInputManagerBuilder {
    pub fn with_config(mut self, config: InputConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Start with empty handler chains.
    pub fn without_default_handlers(mut self) -> Self {
        self.default_handlers = false;
        self
    }

    /// Register `handler` for every mode it supports.
    pub fn with_handler(mut self, handler: Box<dyn InputHandler>) -> Self {
        self.handlers.push((handler, None));
        self
    }

    /// Register `handler` for some of the modes it supports.
    pub fn with_handler_for(mut self, handler: Box<dyn InputHandler>, modes: &[InteractionMode]) -> Self {
        self.handlers.push((handler, Some(modes.to_vec())));
        self
    }

    pub fn build(self) -> Result<GlobeInputManager, RegistrationError> {
        let mut registry = HandlerRegistry::new();
        if self.default_handlers {
            for handler in default_handlers(&self.config) {
                registry.register(handler)?;
            }
        }
        for (handler, modes) in self.handlers {
            match modes {
                Some(modes) => registry.register_for(handler, &modes)?,
                None => registry.register(handler)?,
            }
        }

        log::debug!(
            "[Input] Manager ready in '{}' mode with {} handlers",
            self.config.initial_mode,
            registry.len()
        );

        Ok(GlobeInputManager {
            mode: self.config.initial_mode,
            enabled: true,
            destroyed: false,
            modes: ModeRegistry::new(),
            handlers: registry,
            bus: ActionBus::new(),
            scene: self.scene,
            clock: self.clock,
            surface: None,
            config: self.config,
        })
    }
}

/// Mode-aware input router for the globe view.
pub struct GlobeInputManager {
    mode: InteractionMode,
    enabled: bool,
    destroyed: bool,
    modes: ModeRegistry,
    handlers: HandlerRegistry,
    bus: ActionBus,
    scene: Box<dyn SceneContextProvider>,
    clock: Box<dyn Clock>,
    surface: Option<AttachedSurface>,
    config: InputConfig,
}

impl GlobeInputManager {
    pub fn builder(scene: impl SceneContextProvider + 'static) -> GlobeInputManagerBuilder {
        GlobeInputManagerBuilder {
            scene: Box::new(scene),
            config: InputConfig::default(),
            clock: Box::new(MonotonicClock::new()),
            default_handlers: true,
            handlers: Vec::new(),
        }
    }

    /// Manager with the built-in handlers and a monotonic clock.
    pub fn new(
        scene: impl SceneContextProvider + 'static,
        config: InputConfig,
    ) -> Result<Self, RegistrationError> {
        Self::builder(scene).with_config(config).build()
    }

    // ========================================================================
    // MODE
    // ========================================================================

    pub fn current_mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn mode_config(&self, mode: InteractionMode) -> &ModeConfig {
        self.modes.config(mode)
    }

    pub fn current_mode_config(&self) -> &ModeConfig {
        self.modes.config(self.mode)
    }

    /// Switch modes. Resets every handler of the outgoing mode and emits
    /// `mode_changed`. Returns `false` if nothing changed.
    pub fn set_mode(&mut self, mode: InteractionMode) -> bool {
        if self.destroyed {
            log::warn!("[Input] set_mode({}) after destroy ignored", mode);
            return false;
        }
        if mode == self.mode {
            return false;
        }

        let from = self.mode;
        self.handlers.reset_mode(from);
        self.mode = mode;
        log::debug!("[Input] Mode {} -> {}", from, mode);

        let timestamp_ms = self.clock.now_ms();
        self.emit(
            Action::new(ActionKind::ModeChanged, ActionData::ModeChange { from, to: mode }),
            timestamp_ms,
        );
        true
    }

    // ========================================================================
    // SUBSCRIPTIONS
    // ========================================================================

    /// Subscribe to one action kind.
    pub fn on_action<F>(&self, kind: ActionKind, callback: F) -> Subscription
    where
        F: FnMut(&ActionEvent) + 'static,
    {
        if self.destroyed {
            log::warn!("[Input] on_action({}) after destroy ignored", kind);
            return Subscription::inert();
        }
        self.bus.subscribe(Some(kind), callback)
    }

    /// Subscribe to every action.
    pub fn on_any_action<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&ActionEvent) + 'static,
    {
        if self.destroyed {
            log::warn!("[Input] on_any_action after destroy ignored");
            return Subscription::inert();
        }
        self.bus.subscribe(None, callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Attach to `surface`, or detach with `None`.
    ///
    /// Setting the surface that is already attached is a no-op; setting a
    /// different one releases the old listeners first.
    pub fn set_container(&mut self, surface: Option<Rc<dyn InputSurface>>) {
        if self.destroyed {
            if surface.is_some() {
                log::warn!("[Input] set_container after destroy ignored");
            }
            return;
        }

        if let (Some(new), Some(current)) = (&surface, &self.surface) {
            if current.is_same(new) {
                return;
            }
        }

        if self.surface.take().is_some() {
            log::debug!("[Input] Container detached");
            self.handlers.reset_mode(self.mode);
        }

        if let Some(surface) = surface {
            let attached = AttachedSurface::attach(surface);
            log::debug!("[Input] Container attached ({:?})", attached.bounds());
            self.surface = Some(attached);
        }
    }

    pub fn has_container(&self) -> bool {
        self.surface.is_some()
    }

    /// Global kill switch. Disabling also drops in-progress gestures.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.destroyed || self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.handlers.reset_mode(self.mode);
        }
        log::debug!("[Input] {}", if enabled { "Enabled" } else { "Disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.destroyed
    }

    /// Release listeners, handlers and subscribers. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.surface = None;
        self.handlers.clear();
        self.bus.clear();
        log::debug!("[Input] Destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Register an additional handler for every mode it supports.
    pub fn register_handler(&mut self, handler: Box<dyn InputHandler>) -> Result<(), RegistrationError> {
        if self.destroyed {
            log::warn!("[Input] register_handler('{}') after destroy ignored", handler.name());
            return Ok(());
        }
        self.handlers.register(handler)
    }

    /// Handler names for `mode`, in dispatch order.
    pub fn handler_names(&self, mode: InteractionMode) -> Vec<&'static str> {
        self.handlers.names_for(mode)
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Process one raw host event delivered through the container.
    pub fn handle_raw(&mut self, raw: &RawInput) -> DispatchOutcome {
        if self.destroyed {
            return DispatchOutcome::status(DispatchStatus::Destroyed);
        }
        if !self.enabled {
            return DispatchOutcome::status(DispatchStatus::Disabled);
        }
        let Some(surface) = &self.surface else {
            return DispatchOutcome::status(DispatchStatus::Detached);
        };
        if raw.event_type.event_kind().is_none() {
            log::trace!("[Input] Unsupported event {:?} dropped", raw.event_type);
            return DispatchOutcome::status(DispatchStatus::Dropped);
        }
        if !surface.listens_for(raw.event_type) {
            return DispatchOutcome::status(DispatchStatus::Detached);
        }

        let bounds = surface.bounds();
        let Some(event) = normalize(raw, bounds, self.clock.now_ms()) else {
            log::debug!("[Input] Malformed {:?} dropped", raw.event_type);
            return DispatchOutcome::status(DispatchStatus::Dropped);
        };
        self.dispatch(&event)
    }

    /// Offer an already normalized event to the current mode's handlers.
    pub fn dispatch(&mut self, event: &InputEvent) -> DispatchOutcome {
        if self.destroyed {
            return DispatchOutcome::status(DispatchStatus::Destroyed);
        }
        if !self.enabled {
            return DispatchOutcome::status(DispatchStatus::Disabled);
        }

        let context = self.scene.scene_context(event);
        let mode = self.mode;

        for position in 0..self.handlers.chain_len(mode) {
            let Some(handler) = self.handlers.handler_in_chain_mut(mode, position) else {
                break;
            };
            let Some(result) = run_handler(handler, event, mode, &context) else {
                continue;
            };
            if !result.ends_dispatch() {
                continue;
            }

            let name = handler.name();
            let mut outcome = DispatchOutcome {
                status: if result.handled {
                    DispatchStatus::Handled
                } else {
                    DispatchStatus::Unhandled
                },
                handler: Some(name),
                action: None,
                prevent_default: result.prevent_default,
            };

            if let (true, Some(action)) = (result.handled, result.action) {
                log::trace!("[Input] {:?} -> '{}' emits {}", event.kind, name, action.kind);
                outcome.action = Some(action.kind);
                self.emit(action, event.timestamp_ms);
            } else {
                log::trace!("[Input] {:?} -> '{}'", event.kind, name);
            }
            return outcome;
        }

        log::trace!("[Input] {:?} unhandled in {} mode", event.kind, mode);
        DispatchOutcome::status(DispatchStatus::Unhandled)
    }

    fn emit(&self, action: Action, timestamp_ms: f64) {
        let event = ActionEvent {
            action: action.kind,
            data: action.data,
            timestamp_ms,
            mode: self.mode,
        };
        self.bus.emit(&event);
    }
}

/// Run one handler with panic and error isolation.
///
/// Returns `None` when the handler declines, fails or panics. A handler
/// that panicked is reset so half-updated gesture state does not survive.
fn run_handler(
    handler: &mut dyn InputHandler,
    event: &InputEvent,
    mode: InteractionMode,
    context: &SceneContext,
) -> Option<InputResult> {
    let name = handler.name();

    match catch_unwind(AssertUnwindSafe(|| handler.can_handle(event, mode, context))) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(_) => {
            log::error!("[Input] Handler '{}' panicked in can_handle", name);
            reset_after_panic(handler);
            return None;
        }
    }

    match catch_unwind(AssertUnwindSafe(|| handler.handle_input(event, mode, context))) {
        Ok(Ok(result)) => Some(result),
        Ok(Err(err)) => {
            log::warn!("[Input] Handler '{}' failed on {:?}: {}", name, event.kind, err);
            None
        }
        Err(_) => {
            log::error!("[Input] Handler '{}' panicked in handle_input", name);
            reset_after_panic(handler);
            None
        }
    }
}

fn reset_after_panic(handler: &mut dyn InputHandler) {
    if catch_unwind(AssertUnwindSafe(|| handler.on_mode_exit())).is_err() {
        log::error!("[Input] Handler '{}' panicked while resetting", handler.name());
    }
}

impl Drop for GlobeInputManager {
    fn drop(&mut self) {
        self.destroy();
    }
}
