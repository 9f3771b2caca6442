//! Global hotkey binding backend
//!
//! Implements the `ShortcutBinder` contract on top of the `global-hotkey`
//! crate. Shortcut specs are strings like "ctrl+alt+KeyM"; the last
//! token names the key, everything before it a modifier. Single
//! characters are accepted for letter and digit keys ("ctrl+m").

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::GlobalHotKeyManager;
use std::collections::HashMap;

use crate::shortcuts::{BindError, ShortcutBinder};

/// Parse a shortcut spec into modifiers and a key code.
pub fn parse_shortcut(spec: &str) -> Option<(Modifiers, Code)> {
    let mut tokens = spec.split('+').map(str::trim);
    let key = tokens.next_back()?;
    let code = code_from_name(key)?;

    let mut modifiers = Modifiers::empty();
    for token in tokens {
        match token.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            "super" | "meta" | "cmd" => modifiers |= Modifiers::META,
            _ => return None,
        }
    }
    Some((modifiers, code))
}

fn code_from_name(name: &str) -> Option<Code> {
    // Single characters cover the common "ctrl+m" style.
    if name.len() == 1 {
        let c = name.chars().next().unwrap().to_ascii_lowercase();
        return code_from_char(c);
    }
    let code = match name {
        "Space" => Code::Space,
        "Enter" => Code::Enter,
        "Tab" => Code::Tab,
        "Escape" => Code::Escape,
        "Backspace" => Code::Backspace,
        "Delete" => Code::Delete,
        "Home" => Code::Home,
        "End" => Code::End,
        "PageUp" => Code::PageUp,
        "PageDown" => Code::PageDown,
        "ArrowUp" => Code::ArrowUp,
        "ArrowDown" => Code::ArrowDown,
        "ArrowLeft" => Code::ArrowLeft,
        "ArrowRight" => Code::ArrowRight,
        "Minus" => Code::Minus,
        "Equal" => Code::Equal,
        "Comma" => Code::Comma,
        "Period" => Code::Period,
        "Slash" => Code::Slash,
        "Backslash" => Code::Backslash,
        "Semicolon" => Code::Semicolon,
        "Quote" => Code::Quote,
        "Backquote" => Code::Backquote,
        "BracketLeft" => Code::BracketLeft,
        "BracketRight" => Code::BracketRight,
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,
        _ => {
            // "KeyM" / "Digit4" spellings
            if let Some(letter) = name.strip_prefix("Key") {
                if letter.len() == 1 {
                    return code_from_char(letter.chars().next().unwrap().to_ascii_lowercase());
                }
            }
            if let Some(digit) = name.strip_prefix("Digit") {
                if digit.len() == 1 {
                    return code_from_char(digit.chars().next().unwrap());
                }
            }
            return None;
        }
    };
    Some(code)
}

fn code_from_char(c: char) -> Option<Code> {
    let code = match c {
        'a' => Code::KeyA,
        'b' => Code::KeyB,
        'c' => Code::KeyC,
        'd' => Code::KeyD,
        'e' => Code::KeyE,
        'f' => Code::KeyF,
        'g' => Code::KeyG,
        'h' => Code::KeyH,
        'i' => Code::KeyI,
        'j' => Code::KeyJ,
        'k' => Code::KeyK,
        'l' => Code::KeyL,
        'm' => Code::KeyM,
        'n' => Code::KeyN,
        'o' => Code::KeyO,
        'p' => Code::KeyP,
        'q' => Code::KeyQ,
        'r' => Code::KeyR,
        's' => Code::KeyS,
        't' => Code::KeyT,
        'u' => Code::KeyU,
        'v' => Code::KeyV,
        'w' => Code::KeyW,
        'x' => Code::KeyX,
        'y' => Code::KeyY,
        'z' => Code::KeyZ,
        '0' => Code::Digit0,
        '1' => Code::Digit1,
        '2' => Code::Digit2,
        '3' => Code::Digit3,
        '4' => Code::Digit4,
        '5' => Code::Digit5,
        '6' => Code::Digit6,
        '7' => Code::Digit7,
        '8' => Code::Digit8,
        '9' => Code::Digit9,
        _ => return None,
    };
    Some(code)
}

/// Binder backed by the OS-level hotkey manager.
pub struct GlobalBinder {
    manager: GlobalHotKeyManager,
    bound: HashMap<String, HotKey>,
    ids: HashMap<u32, String>,
}

impl GlobalBinder {
    pub fn new() -> Result<Self, BindError> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| BindError(format!("hotkey manager unavailable: {}", e)))?;
        Ok(Self {
            manager,
            bound: HashMap::new(),
            ids: HashMap::new(),
        })
    }

    /// Map a received hotkey event id back to the shortcut spec.
    pub fn shortcut_for_id(&self, id: u32) -> Option<&str> {
        self.ids.get(&id).map(String::as_str)
    }
}

impl ShortcutBinder for GlobalBinder {
    fn bind(&mut self, shortcut: &str) -> Result<(), BindError> {
        let (modifiers, code) = parse_shortcut(shortcut)
            .ok_or_else(|| BindError(format!("cannot parse shortcut {:?}", shortcut)))?;
        let hotkey = HotKey::new(Some(modifiers), code);
        self.manager
            .register(hotkey)
            .map_err(|e| BindError(e.to_string()))?;
        self.ids.insert(hotkey.id(), shortcut.to_string());
        self.bound.insert(shortcut.to_string(), hotkey);
        Ok(())
    }

    fn unbind(&mut self, shortcut: &str) -> Result<(), BindError> {
        let Some(hotkey) = self.bound.remove(shortcut) else {
            // Unbinding something we never bound is a no-op.
            return Ok(());
        };
        self.ids.remove(&hotkey.id());
        self.manager
            .unregister(hotkey)
            .map_err(|e| BindError(e.to_string()))
    }

    fn bound(&self) -> std::collections::HashSet<String> {
        self.bound.keys().cloned().collect()
    }
}
