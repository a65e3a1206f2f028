//! Input Bindings Module
//!
//! Maps physical keys to the semantic key actions the globe handlers react
//! to, so keyboard shortcuts can be remapped without touching handler logic.

use std::collections::HashMap;

use super::KeyCode;

/// Logical key actions understood by the globe input handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobeKeyAction {
    /// Spin the globe as if dragged left (default: ArrowLeft)
    RotateLeft,
    /// Spin the globe as if dragged right (default: ArrowRight)
    RotateRight,
    /// Tilt towards the north pole (default: ArrowUp)
    RotateUp,
    /// Tilt towards the south pole (default: ArrowDown)
    RotateDown,
    /// Zoom in one step (default: Equal)
    ZoomIn,
    /// Zoom out one step (default: Minus)
    ZoomOut,
    /// Finish the current gesture, e.g. a measurement (default: Enter)
    Confirm,
    /// Abort the current gesture (default: Escape)
    Cancel,
    /// Drop the most recent measurement point (default: Backspace)
    Undo,
}

/// Maps physical keys to globe key actions.
///
/// A key maps to at most one action. Several keys may share an action via
/// [`KeyBindings::bind_alias`], which is how the numpad variants are wired.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Map from physical key to logical action
    key_to_action: HashMap<KeyCode, GlobeKeyAction>,
    /// Primary key for each action (for reverse lookup and help text)
    action_to_key: HashMap<GlobeKeyAction, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create a KeyBindings instance with default key mappings.
    ///
    /// Default bindings:
    /// - Arrows = Rotate
    /// - Equal / NumpadAdd = ZoomIn
    /// - Minus / NumpadSubtract = ZoomOut
    /// - Enter / NumpadEnter = Confirm
    /// - Escape = Cancel
    /// - Backspace = Undo
    pub fn new() -> Self {
        let mut bindings = Self::empty();

        bindings.bind(KeyCode::ArrowLeft, GlobeKeyAction::RotateLeft);
        bindings.bind(KeyCode::ArrowRight, GlobeKeyAction::RotateRight);
        bindings.bind(KeyCode::ArrowUp, GlobeKeyAction::RotateUp);
        bindings.bind(KeyCode::ArrowDown, GlobeKeyAction::RotateDown);
        bindings.bind(KeyCode::Equal, GlobeKeyAction::ZoomIn);
        bindings.bind_alias(KeyCode::NumpadAdd, GlobeKeyAction::ZoomIn);
        bindings.bind(KeyCode::Minus, GlobeKeyAction::ZoomOut);
        bindings.bind_alias(KeyCode::NumpadSubtract, GlobeKeyAction::ZoomOut);
        bindings.bind(KeyCode::Enter, GlobeKeyAction::Confirm);
        bindings.bind_alias(KeyCode::NumpadEnter, GlobeKeyAction::Confirm);
        bindings.bind(KeyCode::Escape, GlobeKeyAction::Cancel);
        bindings.bind(KeyCode::Backspace, GlobeKeyAction::Undo);

        bindings
    }

    /// Create a KeyBindings instance with nothing bound.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
            action_to_key: HashMap::new(),
        }
    }

    /// Bind a physical key as the primary key of a logical action.
    ///
    /// Any previous binding of this key is removed, as is every key
    /// previously bound to this action (aliases included).
    pub fn bind(&mut self, key: KeyCode, action: GlobeKeyAction) {
        self.unbind_key(key);
        self.unbind_action(action);

        self.key_to_action.insert(key, action);
        self.action_to_key.insert(action, key);
    }

    /// Bind an additional key to an action without replacing its primary key.
    pub fn bind_alias(&mut self, key: KeyCode, action: GlobeKeyAction) {
        self.unbind_key(key);
        self.key_to_action.insert(key, action);
        self.action_to_key.entry(action).or_insert(key);
    }

    /// Remove the binding for a specific key.
    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.key_to_action.remove(&key) {
            if self.action_to_key.get(&action) == Some(&key) {
                self.action_to_key.remove(&action);
                // Promote a remaining alias so reverse lookup keeps working
                if let Some((&alias, _)) = self.key_to_action.iter().find(|(_, a)| **a == action) {
                    self.action_to_key.insert(action, alias);
                }
            }
        }
    }

    /// Remove every key bound to a specific action.
    pub fn unbind_action(&mut self, action: GlobeKeyAction) {
        self.action_to_key.remove(&action);
        self.key_to_action.retain(|_, a| *a != action);
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<GlobeKeyAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Get the primary key bound to a logical action, if any.
    pub fn get_key(&self, action: GlobeKeyAction) -> Option<KeyCode> {
        self.action_to_key.get(&action).copied()
    }

    /// Get all current bindings as key-action pairs.
    pub fn all_bindings(&self) -> impl Iterator<Item = (KeyCode, GlobeKeyAction)> + '_ {
        self.key_to_action.iter().map(|(&k, &a)| (k, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::ArrowLeft), Some(GlobeKeyAction::RotateLeft));
        assert_eq!(bindings.get_action(KeyCode::Equal), Some(GlobeKeyAction::ZoomIn));
        assert_eq!(bindings.get_action(KeyCode::NumpadAdd), Some(GlobeKeyAction::ZoomIn));
        assert_eq!(bindings.get_action(KeyCode::Enter), Some(GlobeKeyAction::Confirm));
        assert_eq!(bindings.get_action(KeyCode::Escape), Some(GlobeKeyAction::Cancel));
        assert_eq!(bindings.get_action(KeyCode::Backspace), Some(GlobeKeyAction::Undo));
        assert_eq!(bindings.get_action(KeyCode::Space), None);
    }

    #[test]
    fn test_reverse_lookup_prefers_primary() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_key(GlobeKeyAction::ZoomIn), Some(KeyCode::Equal));
        assert_eq!(bindings.get_key(GlobeKeyAction::Confirm), Some(KeyCode::Enter));
    }

    #[test]
    fn test_rebind_key() {
        let mut bindings = KeyBindings::new();

        bindings.bind(KeyCode::Delete, GlobeKeyAction::Undo);

        assert_eq!(bindings.get_action(KeyCode::Backspace), None);
        assert_eq!(bindings.get_action(KeyCode::Delete), Some(GlobeKeyAction::Undo));
        assert_eq!(bindings.get_key(GlobeKeyAction::Undo), Some(KeyCode::Delete));
    }

    #[test]
    fn test_rebind_drops_aliases() {
        let mut bindings = KeyBindings::new();

        bindings.bind(KeyCode::Space, GlobeKeyAction::ZoomIn);

        assert_eq!(bindings.get_action(KeyCode::Equal), None);
        assert_eq!(bindings.get_action(KeyCode::NumpadAdd), None);
        assert_eq!(bindings.get_action(KeyCode::Space), Some(GlobeKeyAction::ZoomIn));
    }

    #[test]
    fn test_unbind_primary_promotes_alias() {
        let mut bindings = KeyBindings::new();

        bindings.unbind_key(KeyCode::Enter);

        assert_eq!(bindings.get_action(KeyCode::Enter), None);
        assert_eq!(bindings.get_key(GlobeKeyAction::Confirm), Some(KeyCode::NumpadEnter));
    }

    #[test]
    fn test_unbind_action() {
        let mut bindings = KeyBindings::new();

        bindings.unbind_action(GlobeKeyAction::Cancel);

        assert_eq!(bindings.get_action(KeyCode::Escape), None);
        assert_eq!(bindings.get_key(GlobeKeyAction::Cancel), None);
    }
}
