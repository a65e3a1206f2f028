//! Input Handler
//!
//! The strategy interface every mode-specific handler implements, and the
//! registry that keeps one priority-ordered handler chain per mode.

use std::cmp::Reverse;

use thiserror::Error;

use super::action::{Action, ActionData, ActionKind};
use super::event::InputEvent;
use super::mode::InteractionMode;
use crate::scene::SceneContext;

/// Failure while a handler processes an event.
///
/// The manager logs it and treats the event as not handled by that handler.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HandlerError {
    #[error("scene context is missing {0}")]
    MissingContext(&'static str),
    #[error("{0}")]
    Failed(String),
}

/// Rejected handler registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("handler '{0}' declares no supported modes")]
    NoSupportedModes(&'static str),
    #[error("handler '{handler}' does not support mode '{mode}'")]
    UnsupportedMode {
        handler: &'static str,
        mode: InteractionMode,
    },
}

/// Outcome of one `handle_input` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputResult {
    pub handled: bool,
    pub action: Option<Action>,
    /// Ask the host to suppress its default behaviour (page scroll, context menu).
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl InputResult {
    /// The handler looked at the event and declined it.
    pub fn unhandled() -> Self {
        Self::default()
    }

    /// Handled without a semantic action (e.g. the press half of a click).
    pub fn consumed() -> Self {
        Self {
            handled: true,
            stop_propagation: true,
            ..Self::default()
        }
    }

    /// Handled, emitting `kind` with `data`.
    pub fn action(kind: ActionKind, data: ActionData) -> Self {
        Self {
            handled: true,
            action: Some(Action::new(kind, data)),
            prevent_default: false,
            stop_propagation: true,
        }
    }

    pub fn with_prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    /// Whether dispatch should stop after this result.
    pub fn ends_dispatch(&self) -> bool {
        self.handled || self.prevent_default || self.stop_propagation
    }
}

/// A mode-specific input strategy.
///
/// Handlers are long-lived; gesture state (drag origin, accumulated points)
/// lives in the handler and is cleared in [`InputHandler::on_mode_exit`].
pub trait InputHandler {
    /// Name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Modes this handler participates in. Must not be empty.
    fn supported_modes(&self) -> &[InteractionMode];

    /// Higher runs first. Read once, at registration.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this handler applies to `event` in `mode` given `context`.
    fn can_handle(&self, event: &InputEvent, mode: InteractionMode, context: &SceneContext) -> bool;

    /// Process an event accepted by [`InputHandler::can_handle`].
    fn handle_input(
        &mut self,
        event: &InputEvent,
        mode: InteractionMode,
        context: &SceneContext,
    ) -> Result<InputResult, HandlerError>;

    /// Drop any gesture state. Called for every handler of the outgoing mode.
    fn on_mode_exit(&mut self) {}
}

struct Registered {
    handler: Box<dyn InputHandler>,
    priority: i32,
}

/// Handlers plus one dispatch chain per mode.
///
/// Chains are sorted by descending priority; equal priorities keep
/// registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Registered>,
    chains: [Vec<usize>; 4],
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every mode it supports.
    pub fn register(&mut self, handler: Box<dyn InputHandler>) -> Result<(), RegistrationError> {
        let modes = handler.supported_modes().to_vec();
        self.register_for(handler, &modes)
    }

    /// Register `handler` for a subset of its supported modes.
    pub fn register_for(
        &mut self,
        handler: Box<dyn InputHandler>,
        modes: &[InteractionMode],
    ) -> Result<(), RegistrationError> {
        let name = handler.name();
        if modes.is_empty() || handler.supported_modes().is_empty() {
            return Err(RegistrationError::NoSupportedModes(name));
        }
        if let Some(&mode) = modes.iter().find(|m| !handler.supported_modes().contains(m)) {
            return Err(RegistrationError::UnsupportedMode {
                handler: name,
                mode,
            });
        }

        let index = self.handlers.len();
        let priority = handler.priority();
        self.handlers.push(Registered { handler, priority });

        for mode in InteractionMode::ALL {
            if !modes.contains(&mode) {
                continue;
            }
            let chain = &mut self.chains[mode.index()];
            chain.push(index);
            let handlers = &self.handlers;
            chain.sort_by_key(|&i| Reverse(handlers[i].priority));
        }

        log::debug!("[Input] Registered handler '{}' (priority {}) for {:?}", name, priority, modes);
        Ok(())
    }

    /// Number of handlers in the chain for `mode`.
    pub fn chain_len(&self, mode: InteractionMode) -> usize {
        self.chains[mode.index()].len()
    }

    /// The handler at `position` in the chain for `mode`.
    pub fn handler_in_chain_mut(
        &mut self,
        mode: InteractionMode,
        position: usize,
    ) -> Option<&mut dyn InputHandler> {
        let index = *self.chains[mode.index()].get(position)?;
        Some(self.handlers[index].handler.as_mut())
    }

    /// Handler names for `mode`, in dispatch order.
    pub fn names_for(&self, mode: InteractionMode) -> Vec<&'static str> {
        self.chains[mode.index()]
            .iter()
            .map(|&i| self.handlers[i].handler.name())
            .collect()
    }

    /// Call `on_mode_exit` on every handler in the chain for `mode`.
    pub fn reset_mode(&mut self, mode: InteractionMode) {
        for &i in &self.chains[mode.index()] {
            self.handlers[i].handler.on_mode_exit();
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
        for chain in &mut self.chains {
            chain.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
