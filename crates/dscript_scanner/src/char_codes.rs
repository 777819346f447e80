//! Character classes of the dscript lexical grammar.

/// Only `\n` ends a line; `\r` is stripped before scanning and otherwise
/// counts as blank space.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == '\n'
}

/// Blank characters inside a line: space, tab and a stray `\r`.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r')
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Digits of a `\NNN` string escape.
#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

/// Digits of a `0x` literal or a `\xNN` escape.
#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// `[A-Za-z_$]`, or any non-ASCII XID start character.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    match ch {
        'a'..='z' | 'A'..='Z' | '_' | '$' => true,
        _ => !ch.is_ascii() && unicode_xid::UnicodeXID::is_xid_start(ch),
    }
}

/// `[A-Za-z0-9_$]`, or any non-ASCII XID continue character.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    match ch {
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '$' => true,
        _ => !ch.is_ascii() && unicode_xid::UnicodeXID::is_xid_continue(ch),
    }
}
