#![forbid(unsafe_code)]

//! Pressed-key tracking.
//!
//! Keys are identified by *key chars*: the printable character for printable
//! keys, or an upper-case legacy name (`"TAB"`, `"PAGEUP"`, `"CTRL"`) for the
//! rest. Every legacy key code has an unshifted and a shifted identity, e.g.
//! `a`/`A` or `TAB`/`TABSHIFT`; the currently-pressed list swaps between them
//! as SHIFT goes down and up so that observers see a consistent chord.

use crate::input::{HostKey, Modifiers};

/// Unshifted/shifted identity pair for a legacy key code.
pub type KeyPair = (&'static str, &'static str);

/// Look up the identity pair for a legacy numeric key code.
#[must_use]
pub fn key_pair(key_code: u32) -> Option<KeyPair> {
    let pair = match key_code {
        8 => ("BACKSPACE", "BACKSPACESHIFT"),
        9 => ("TAB", "TABSHIFT"),
        13 => ("RETURN", "RETURNSHIFT"),
        16 => ("SHIFT", "SHIFT"),
        17 => ("CTRL", "CTRLSHIFT"),
        18 => ("ALT", "ALTSHIFT"),
        20 => ("CAPSLOCK", "CAPSLOCKSHIFT"),
        27 => ("ESC", "ESCSHIFT"),
        32 => ("SPACE", "SPACESHIFT"),
        33 => ("PAGEUP", "PAGEUPSHIFT"),
        34 => ("PAGEDOWN", "PAGEDOWNSHIFT"),
        35 => ("PAGERIGHT", "PAGERIGHTSHIFT"),
        36 => ("PAGELEFT", "PAGELEFTSHIFT"),
        37 => ("LEFT", "LEFTSHIFT"),
        38 => ("UP", "UPSHIFT"),
        39 => ("RIGHT", "RIGHTSHIFT"),
        40 => ("DOWN", "DOWNSHIFT"),
        46 => ("DELETE", "DELETESHIFT"),
        48 => ("0", ")"),
        49 => ("1", "!"),
        50 => ("2", "@"),
        51 => ("3", "#"),
        52 => ("4", "$"),
        53 => ("5", "%"),
        54 => ("6", "^"),
        55 => ("7", "&"),
        56 => ("8", "*"),
        57 => ("9", "("),
        65 => ("a", "A"),
        66 => ("b", "B"),
        67 => ("c", "C"),
        68 => ("d", "D"),
        69 => ("e", "E"),
        70 => ("f", "F"),
        71 => ("g", "G"),
        72 => ("h", "H"),
        73 => ("i", "I"),
        74 => ("j", "J"),
        75 => ("k", "K"),
        76 => ("l", "L"),
        77 => ("m", "M"),
        78 => ("n", "N"),
        79 => ("o", "O"),
        80 => ("p", "P"),
        81 => ("q", "Q"),
        82 => ("r", "R"),
        83 => ("s", "S"),
        84 => ("t", "T"),
        85 => ("u", "U"),
        86 => ("v", "V"),
        87 => ("w", "W"),
        88 => ("x", "X"),
        89 => ("y", "Y"),
        90 => ("z", "Z"),
        91 => ("COMMANDLEFT", "COMMANDLEFTSHIFT"),
        93 => ("COMMANDRIGHT", "COMMANDRIGHTSHIFT"),
        112 => ("F1", "F1SHIFT"),
        113 => ("F2", "F2SHIFT"),
        114 => ("F3", "F3SHIFT"),
        115 => ("F4", "F4SHIFT"),
        116 => ("F5", "F5SHIFT"),
        117 => ("F6", "F6SHIFT"),
        118 => ("F7", "F7SHIFT"),
        119 => ("F8", "F8SHIFT"),
        120 => ("F9", "F9SHIFT"),
        121 => ("F10", "F10SHIFT"),
        122 => ("F11", "F11SHIFT"),
        123 => ("F12", "F12SHIFT"),
        186 => (";", ":"),
        187 => ("=", "+"),
        188 => (",", "<"),
        189 => ("-", "_"),
        190 => (".", ">"),
        191 => ("/", "?"),
        192 => ("`", "~"),
        219 => ("[", "{"),
        220 => ("\\", "|"),
        221 => ("]", "}"),
        222 => ("'", "\""),
        _ => return None,
    };
    Some(pair)
}

fn find_pair(key: &str, shifted: bool) -> Option<KeyPair> {
    KEY_CODES.iter().filter_map(|&code| key_pair(code)).find(|pair| {
        let side = if shifted { pair.1 } else { pair.0 };
        side == key
    })
}

const KEY_CODES: &[u32] = &[
    8, 9, 13, 16, 17, 18, 20, 27, 32, 33, 34, 35, 36, 37, 38, 39, 40, 46, 48, 49, 50, 51, 52, 53,
    54, 55, 56, 57, 65, 66, 67, 68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84,
    85, 86, 87, 88, 89, 90, 91, 93, 112, 113, 114, 115, 116, 117, 118, 119, 120, 121, 122, 123, 186,
    187, 188, 189, 190, 191, 192, 219, 220, 221, 222,
];

/// Resolve the key char for a host key event.
///
/// A single-character `key` is used as-is. Otherwise the legacy name for the
/// key code is used (shifted when SHIFT is held), falling back to `key`.
#[must_use]
pub fn key_char(event: &HostKey) -> String {
    if event.key.chars().count() == 1 {
        return event.key.clone();
    }
    let shifted = event.modifiers.contains(Modifiers::SHIFT);
    match key_pair(event.key_code) {
        Some((plain, shift)) => if shifted { shift } else { plain }.to_owned(),
        None => event.key.clone(),
    }
}

/// Whether a key char would move host focus off the surface.
#[must_use]
pub fn is_focus_traversal(key_char: &str) -> bool {
    matches!(key_char, "TAB" | "TABSHIFT" | "Tab")
}

/// The list of currently pressed key chars, in press order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentKeys {
    keys: Vec<String>,
}

impl CurrentKeys {
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Record a key transition.
    ///
    /// A SHIFT transition also remaps every held key to its shifted (on
    /// down) or unshifted (on up) identity.
    pub fn apply(&mut self, key_char: &str, down: bool) {
        let index = self.keys.iter().position(|k| k == key_char);

        if let (false, Some(i)) = (down, index) {
            self.keys.remove(i);
        }

        if key_char == "SHIFT" {
            for key in &mut self.keys {
                if let Some(pair) = find_pair(key, !down) {
                    *key = if down { pair.1 } else { pair.0 }.to_owned();
                }
            }
        }

        if down && index.is_none() {
            self.keys.push(key_char.to_owned());
        }
    }

    /// Reconcile modifier membership with the live flags of an event.
    ///
    /// When the event carries no modifier state, SHIFT membership is kept as
    /// tracked and CTRL/ALT are left untouched.
    pub fn sync_modifiers(&mut self, modifiers: Option<Modifiers>) {
        let Some(mods) = modifiers else {
            return;
        };
        let shift = mods.contains(Modifiers::SHIFT);
        self.apply("SHIFT", shift);
        let suffix = if shift { "SHIFT" } else { "" };
        self.apply(&format!("CTRL{suffix}"), mods.contains(Modifiers::CTRL));
        self.apply(&format!("ALT{suffix}"), mods.contains(Modifiers::ALT));
    }

    /// Sync with `modifiers` and return a copy of the pressed list.
    #[must_use]
    pub fn snapshot(&mut self, modifiers: Option<Modifiers>) -> Vec<String> {
        self.sync_modifiers(modifiers);
        self.keys.clone()
    }

    /// Add a key without any shift remapping, if not already present.
    pub fn insert(&mut self, key_char: &str) {
        if !self.contains(key_char) {
            self.keys.push(key_char.to_owned());
        }
    }

    #[must_use]
    pub fn contains(&self, key_char: &str) -> bool {
        self.keys.iter().any(|k| k == key_char)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Auto-repeat bookkeeping for key-down events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRepeat {
    key: Option<String>,
    count: u32,
    start_ms: u64,
}

impl KeyRepeat {
    /// Record a key-down. `repeat` is the host auto-repeat flag; `now_ms`
    /// stamps the first repeat of a new key.
    pub fn on_key_down(&mut self, key_char: &str, repeat: bool, now_ms: u64) {
        if !repeat {
            self.reset();
            return;
        }
        if self.key.as_deref() == Some(key_char) {
            self.count += 1;
        } else {
            self.key = Some(key_char.to_owned());
            self.start_ms = now_ms;
        }
    }

    pub fn reset(&mut self) {
        self.key = None;
        self.count = 0;
        self.start_ms = 0;
    }

    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    #[must_use]
    pub const fn start_ms(&self) -> u64 {
        self.start_ms
    }
}
