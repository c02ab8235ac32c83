//! On-screen keyboard palette
//!
//! The palette is a single ring of keys walked with Prev/Next: printable
//! characters first, then the four editing keys.

/// Characters offered by the keyboard, in cursor order
const CHARACTERS: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789",
    ".,:;!?-+*/=()<>#@&%$_'\"",
);

const SPECIAL_KEYS: [Key; 4] = [Key::Space, Key::Delete, Key::Cancel, Key::Send];

/// Total number of keys, characters plus editing keys
pub const PALETTE_LEN: usize = CHARACTERS.len() + SPECIAL_KEYS.len();

/// One keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Char(char),
    Space,
    Delete,
    Cancel,
    Send,
}

impl Key {
    /// Key under a cursor position (wrapped into the palette)
    pub fn at(index: usize) -> Key {
        let index = index % PALETTE_LEN;
        match CHARACTERS.as_bytes().get(index) {
            Some(&byte) => Key::Char(byte as char),
            None => SPECIAL_KEYS[index - CHARACTERS.len()],
        }
    }

    /// Short label for rendering
    pub fn label(self) -> &'static str {
        match self {
            Key::Char(ch) => CHARACTERS
                .find(ch)
                .map(|i| &CHARACTERS[i..i + 1])
                .unwrap_or("?"),
            Key::Space => "SPC",
            Key::Delete => "DEL",
            Key::Cancel => "ESC",
            Key::Send => "SEND",
        }
    }
}

/// Move a cursor around a ring of `len` entries by a signed step
pub fn wrap_cursor(cursor: usize, delta: i32, len: usize) -> usize {
    let len = len as i64;
    (cursor as i64 + delta as i64).rem_euclid(len) as usize
}
