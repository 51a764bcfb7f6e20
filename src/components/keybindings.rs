//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change with the current wizard
//! step. The same registry drives the nav bar and the help overlay.

use crate::wizard::WizardStep;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    EditText,
    MoveCursor,
    ClearInput,
    Validate,
    Continue,
    Rerun,
    Back,
    ScrollUp,
    ScrollDown,
    Finish,
    NewSession,
    Help,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Step-specific keybindings
    step_bindings: HashMap<WizardStep, Vec<Keybinding>>,
    /// Global keybindings (available on every step)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            step_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::F(1), KeyAction::Help, "F1/?", "Help"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        self.step_bindings.insert(
            WizardStep::Input,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Validate, "Enter", "Validate"),
                Keybinding::new(KeyCode::Esc, KeyAction::ClearInput, "Esc", "Clear input"),
                Keybinding::new(KeyCode::Left, KeyAction::MoveCursor, "Left/Right", "Move cursor"),
                Keybinding::new(KeyCode::Home, KeyAction::MoveCursor, "Home/End", "Line start/end"),
                Keybinding::new(KeyCode::Backspace, KeyAction::EditText, "Bksp/Del", "Delete character"),
                Keybinding::with_modifiers(
                    KeyCode::Char('u'),
                    KeyModifiers::CONTROL,
                    KeyAction::ClearInput,
                    "Ctrl+U",
                    "Clear input",
                ),
            ],
        );

        self.step_bindings.insert(
            WizardStep::Validate,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Continue, "Enter", "Continue"),
                Keybinding::new(KeyCode::Char('r'), KeyAction::Rerun, "R", "Re-run checks"),
                Keybinding::new(KeyCode::Char('b'), KeyAction::Back, "B", "Back"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.step_bindings.insert(
            WizardStep::Recommend,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::ScrollUp, "Up", "Scroll up"),
                Keybinding::new(KeyCode::Down, KeyAction::ScrollDown, "Down", "Scroll down"),
                Keybinding::new(KeyCode::Enter, KeyAction::Finish, "Enter", "Finish"),
                Keybinding::new(KeyCode::Char('b'), KeyAction::Back, "B", "Back"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.step_bindings.insert(
            WizardStep::Done,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::NewSession, "Enter/N", "New file"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );
    }

    /// Get keybindings for a step (includes global bindings)
    pub fn get_bindings(&self, step: WizardStep) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();
        if let Some(step_bindings) = self.step_bindings.get(&step) {
            bindings.extend(step_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());
        bindings
    }

    /// Find the action bound to a key on a step
    pub fn action_for(&self, step: WizardStep, key: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
        self.get_bindings(step)
            .into_iter()
            .find(|b| b.key == key && b.modifiers == modifiers)
            .map(|b| b.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, step: WizardStep) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(step);

        let priority_actions = match step {
            WizardStep::Input => vec![KeyAction::Validate, KeyAction::ClearInput, KeyAction::Help, KeyAction::Quit],
            WizardStep::Validate => vec![
                KeyAction::Continue,
                KeyAction::Rerun,
                KeyAction::Back,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            WizardStep::Recommend => vec![
                KeyAction::ScrollUp,
                KeyAction::Finish,
                KeyAction::Back,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            WizardStep::Done => vec![KeyAction::NewSession, KeyAction::Help, KeyAction::Quit],
        };

        let mut items: Vec<NavBarItem> = Vec::new();
        for action in priority_actions {
            // Combine Up/Down into single item for cleaner display
            if action == KeyAction::ScrollUp {
                items.push(NavBarItem {
                    key_display: "Up/Dn".to_string(),
                    action_label: "Scroll".to_string(),
                });
                continue;
            }
            if let Some(binding) = bindings.iter().find(|b| b.action == action) {
                items.push(NavBarItem {
                    key_display: binding.display.clone(),
                    action_label: binding.description.clone(),
                });
            }
        }
        items
    }

    /// Get full help content for a step (for help overlay)
    pub fn get_help_content(&self, step: WizardStep) -> Vec<HelpSection> {
        let groups: [(&str, fn(KeyAction) -> bool); 3] = [
            ("Editing", |a| {
                matches!(a, KeyAction::EditText | KeyAction::MoveCursor | KeyAction::ClearInput)
            }),
            ("Actions", |a| {
                matches!(
                    a,
                    KeyAction::Validate
                        | KeyAction::Continue
                        | KeyAction::Rerun
                        | KeyAction::Finish
                        | KeyAction::NewSession
                        | KeyAction::ScrollUp
                        | KeyAction::ScrollDown
                )
            }),
            ("General", |a| matches!(a, KeyAction::Back | KeyAction::Help | KeyAction::Quit)),
        ];

        let bindings = self.get_bindings(step);
        groups
            .iter()
            .filter_map(|(title, filter)| {
                let items: Vec<(String, String)> = bindings
                    .iter()
                    .filter(|b| filter(b.action))
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect();
                (!items.is_empty()).then(|| HelpSection {
                    title: title.to_string(),
                    items,
                })
            })
            .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}
