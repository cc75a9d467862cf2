use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    LineDown,
    LineUp,
    PageDown,
    PageUp,
    BackToTop,
    JumpToEnd,
    NextSection,
    PrevSection,
    OpenInquiry,
    ToggleHelp,
    ExitMode,
    Confirm,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    // Handle input mode (inquiry popup)
    if app.is_input_mode() {
        return handle_input_mode(key);
    }

    if app.mode == Mode::Help {
        // Any key exits help
        return Action::ExitMode;
    }

    keymap
        .get(&KeyBinding::new(key.code, key.modifiers))
        .cloned()
        .unwrap_or(Action::None)
}

/// Handle key events in input mode
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::ExitMode,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}
