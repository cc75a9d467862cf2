use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use inertia_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Terminals report Shift+Tab as BackTab; fold it into `<S-Tab>`.
    /// Shifted symbols ("?", "{") arrive with SHIFT set while their
    /// bindings are stored plain, so SHIFT is dropped for non-letters.
    pub fn normalized(self) -> Self {
        match self.code {
            KeyCode::BackTab => Self::shift(KeyCode::Tab),
            KeyCode::Char(c)
                if !c.is_ascii_alphabetic() && self.modifiers.contains(KeyModifiers::SHIFT) =>
            {
                Self::new(self.code, self.modifiers - KeyModifiers::SHIFT)
            }
            _ => self,
        }
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        // Helper to add binding with conflict detection
        let mut add_binding = |key_str: &str, action: Action| {
            if let Some(binding) = parse_key_binding(key_str) {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            } else {
                warn!("Invalid key binding: '{}', ignoring", key_str);
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.line_down, Action::LineDown);
        add_binding(&config.line_up, Action::LineUp);
        add_binding(&config.page_down, Action::PageDown);
        add_binding(&config.page_up, Action::PageUp);
        add_binding(&config.back_to_top, Action::BackToTop);
        add_binding(&config.jump_to_end, Action::JumpToEnd);
        add_binding(&config.next_section, Action::NextSection);
        add_binding(&config.prev_section, Action::PrevSection);
        add_binding(&config.inquiry, Action::OpenInquiry);
        add_binding(&config.help, Action::ToggleHelp);

        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        // Browser-style keys, always available as alternatives
        bindings.entry(KeyBinding::simple(KeyCode::Down)).or_insert(Action::LineDown);
        bindings.entry(KeyBinding::simple(KeyCode::Up)).or_insert(Action::LineUp);
        bindings.entry(KeyBinding::simple(KeyCode::PageDown)).or_insert(Action::PageDown);
        bindings.entry(KeyBinding::simple(KeyCode::PageUp)).or_insert(Action::PageUp);
        bindings.entry(KeyBinding::simple(KeyCode::Char(' '))).or_insert(Action::PageDown);
        bindings.entry(KeyBinding::simple(KeyCode::Home)).or_insert(Action::BackToTop);
        bindings.entry(KeyBinding::simple(KeyCode::End)).or_insert(Action::JumpToEnd);
        bindings.insert(KeyBinding::simple(KeyCode::Esc), Action::ExitMode);

        Self { bindings }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(&binding.normalized())
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "j", "k", "g", "q", etc.
/// - Uppercase (Shift): "G", etc.
/// - Special chars: "/", "?", etc.
/// - Ctrl: "<C-f>", "<C-b>", etc.
/// - Shift: "<S-Tab>", "<S-g>", etc.
/// - Special keys: "<CR>", "<Enter>", "<Esc>", "<Tab>", "<Space>", "<Up>", "<Down>", "<PageDown>"
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    // Handle special notation <...>
    if s.len() > 2 && s.starts_with('<') && s.ends_with('>') {
        let inner = &s[1..s.len() - 1];
        return parse_special_key(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    // Uppercase letters are Shift+letter
    if c.is_ascii_uppercase() {
        return Some(KeyBinding::shift(KeyCode::Char(c)));
    }
    Some(KeyBinding::simple(KeyCode::Char(c)))
}

/// Parse special key notation (content inside <...>)
fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    if let Some(rest) = inner.strip_prefix("C-") {
        let key = parse_key_name(rest)?;
        return Some(KeyBinding::ctrl(key));
    }

    if let Some(rest) = inner.strip_prefix("S-") {
        let key = parse_key_name(rest)?;
        // <S-g> is reported as an uppercase char with Shift
        let key = match key {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_uppercase()),
            other => other,
        };
        return Some(KeyBinding::shift(key));
    }

    parse_key_name(inner).map(KeyBinding::simple)
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => {
            // Single character after modifier (e.g., "f" in "<C-f>")
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Some(KeyCode::Char(c.to_ascii_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        assert_eq!(
            parse_key_binding("j"),
            Some(KeyBinding::simple(KeyCode::Char('j')))
        );
        assert_eq!(
            parse_key_binding("?"),
            Some(KeyBinding::simple(KeyCode::Char('?')))
        );
        assert_eq!(parse_key_binding("jj"), None);
    }

    #[test]
    fn test_parse_uppercase_keys() {
        assert_eq!(
            parse_key_binding("G"),
            Some(KeyBinding::shift(KeyCode::Char('G')))
        );
        assert_eq!(
            parse_key_binding("<S-g>"),
            Some(KeyBinding::shift(KeyCode::Char('G')))
        );
    }

    #[test]
    fn test_parse_ctrl_and_special_keys() {
        assert_eq!(
            parse_key_binding("<C-f>"),
            Some(KeyBinding::ctrl(KeyCode::Char('f')))
        );
        assert_eq!(
            parse_key_binding("<CR>"),
            Some(KeyBinding::simple(KeyCode::Enter))
        );
        assert_eq!(
            parse_key_binding("<PageDown>"),
            Some(KeyBinding::simple(KeyCode::PageDown))
        );
        assert_eq!(
            parse_key_binding("<S-Tab>"),
            Some(KeyBinding::shift(KeyCode::Tab))
        );
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_keymap_from_config() {
        let keymap = Keymap::from_config(&KeymapConfig::default());

        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('g'))),
            Some(&Action::BackToTop)
        );
        assert_eq!(
            keymap.get(&KeyBinding::shift(KeyCode::Char('G'))),
            Some(&Action::JumpToEnd)
        );
        assert_eq!(
            keymap.get(&KeyBinding::ctrl(KeyCode::Char('f'))),
            Some(&Action::PageDown)
        );
        assert_eq!(
            keymap.get(&KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(&Action::PrevSection)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Home)),
            Some(&Action::BackToTop)
        );
    }

    #[test]
    fn test_shifted_symbol_matches_plain_binding() {
        let keymap = Keymap::from_config(&KeymapConfig::default());

        // "?" is typed with Shift on most layouts
        assert_eq!(
            keymap.get(&KeyBinding::shift(KeyCode::Char('?'))),
            Some(&Action::ToggleHelp)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('?'))),
            Some(&Action::ToggleHelp)
        );
        // Letters keep Shift: "G" is not "g"
        assert_eq!(
            keymap.get(&KeyBinding::shift(KeyCode::Char('G'))),
            Some(&Action::JumpToEnd)
        );
        assert_eq!(
            KeyBinding::new(KeyCode::Char('{'), KeyModifiers::SHIFT | KeyModifiers::CONTROL)
                .normalized(),
            KeyBinding::ctrl(KeyCode::Char('{'))
        );
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            help: "q".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
    }
}
