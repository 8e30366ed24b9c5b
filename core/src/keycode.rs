//! Virtual key codes understood by the typing engine.
//!
//! The engine speaks macOS virtual key codes (0-127) regardless of the host
//! platform, so every host translates its native codes into this table before
//! handing a key to the gateway.

pub const A: u16 = 0;
pub const S: u16 = 1;
pub const D: u16 = 2;
pub const F: u16 = 3;
pub const H: u16 = 4;
pub const G: u16 = 5;
pub const Z: u16 = 6;
pub const X: u16 = 7;
pub const C: u16 = 8;
pub const V: u16 = 9;
pub const B: u16 = 11;
pub const Q: u16 = 12;
pub const W: u16 = 13;
pub const E: u16 = 14;
pub const R: u16 = 15;
pub const Y: u16 = 16;
pub const T: u16 = 17;
pub const N1: u16 = 18;
pub const N2: u16 = 19;
pub const N3: u16 = 20;
pub const N4: u16 = 21;
pub const N6: u16 = 22;
pub const N5: u16 = 23;
pub const EQUAL: u16 = 24;
pub const N9: u16 = 25;
pub const N7: u16 = 26;
pub const MINUS: u16 = 27;
pub const N8: u16 = 28;
pub const N0: u16 = 29;
pub const RIGHT_BRACKET: u16 = 30;
pub const O: u16 = 31;
pub const U: u16 = 32;
pub const LEFT_BRACKET: u16 = 33;
pub const I: u16 = 34;
pub const P: u16 = 35;
pub const RETURN: u16 = 36;
pub const L: u16 = 37;
pub const J: u16 = 38;
pub const QUOTE: u16 = 39;
pub const K: u16 = 40;
pub const SEMICOLON: u16 = 41;
pub const BACKSLASH: u16 = 42;
pub const COMMA: u16 = 43;
pub const SLASH: u16 = 44;
pub const N: u16 = 45;
pub const M: u16 = 46;
pub const DOT: u16 = 47;
pub const TAB: u16 = 48;
pub const SPACE: u16 = 49;
pub const BACKQUOTE: u16 = 50;
pub const DELETE: u16 = 51;
pub const ESC: u16 = 53;
pub const ENTER: u16 = 76;
pub const LEFT: u16 = 123;
pub const RIGHT: u16 = 124;
pub const DOWN: u16 = 125;
pub const UP: u16 = 126;

const LETTERS: [(char, u16); 26] = [
    ('a', A), ('b', B), ('c', C), ('d', D), ('e', E), ('f', F), ('g', G),
    ('h', H), ('i', I), ('j', J), ('k', K), ('l', L), ('m', M), ('n', N),
    ('o', O), ('p', P), ('q', Q), ('r', R), ('s', S), ('t', T), ('u', U),
    ('v', V), ('w', W), ('x', X), ('y', Y), ('z', Z),
];

const DIGITS: [u16; 10] = [N0, N1, N2, N3, N4, N5, N6, N7, N8, N9];

/// Key code for a lowercase ASCII letter.
pub fn letter(ch: char) -> Option<u16> {
    let lower = ch.to_ascii_lowercase();
    LETTERS
        .iter()
        .find(|(c, _)| *c == lower)
        .map(|(_, code)| *code)
}

/// Key code for an ASCII digit.
pub fn digit(ch: char) -> Option<u16> {
    ch.to_digit(10).map(|d| DIGITS[d as usize])
}

/// Resolve a human-readable key name ("a", "7", "space", "esc", "[") into a
/// key code. Names are case-insensitive.
pub fn from_name(name: &str) -> Option<u16> {
    let lower = name.to_ascii_lowercase();
    let mut chars = lower.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return letter(ch).or_else(|| digit(ch)).or_else(|| punctuation(ch));
    }

    match lower.as_str() {
        "space" => Some(SPACE),
        "esc" | "escape" => Some(ESC),
        "return" => Some(RETURN),
        "enter" => Some(ENTER),
        "tab" => Some(TAB),
        "backspace" | "delete" => Some(DELETE),
        "left" => Some(LEFT),
        "right" => Some(RIGHT),
        "up" => Some(UP),
        "down" => Some(DOWN),
        _ => None,
    }
}

fn punctuation(ch: char) -> Option<u16> {
    match ch {
        '=' => Some(EQUAL),
        '-' => Some(MINUS),
        ']' => Some(RIGHT_BRACKET),
        '[' => Some(LEFT_BRACKET),
        '\'' => Some(QUOTE),
        ';' => Some(SEMICOLON),
        '\\' => Some(BACKSLASH),
        ',' => Some(COMMA),
        '/' => Some(SLASH),
        '.' => Some(DOT),
        '`' => Some(BACKQUOTE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_follow_engine_layout() {
        assert_eq!(letter('a'), Some(0));
        assert_eq!(letter('S'), Some(1));
        assert_eq!(letter('w'), Some(13));
        assert_eq!(letter('z'), Some(6));
        assert_eq!(letter('1'), None);
    }

    #[test]
    fn test_digits_are_not_sequential() {
        assert_eq!(digit('5'), Some(23));
        assert_eq!(digit('6'), Some(22));
        assert_eq!(digit('0'), Some(29));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(from_name("space"), Some(SPACE));
        assert_eq!(from_name("ESC"), Some(ESC));
        assert_eq!(from_name("A"), Some(A));
        assert_eq!(from_name("]"), Some(RIGHT_BRACKET));
        assert_eq!(from_name("f13"), None);
    }
}
