//! Reserved-character escaping ("slashing")
//!
//! The host store expects keys and values handed to its write API to be
//! backslash-escaped, and strips that escaping before persisting. Values
//! obtained from a direct read are not escaped, so anything copied from
//! one item to another is slashed exactly once on the way back in.

use crate::value::MetaValue;

/// Backslash-escape `'`, `"`, `\` and NUL.
///
/// NUL is written as the two characters `\0`.
pub fn add_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out
}

/// Undo [`add_slashes`].
///
/// `\x` becomes `x`, `\0` becomes NUL and a lone trailing backslash is
/// dropped.
pub fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some(next) => out.push(next),
            None => {}
        }
    }
    out
}

/// Slash every string inside `value`, at any depth.
///
/// Returns a new value; the input is not modified. Non-string leaves
/// pass through unchanged.
pub fn slash_deep(value: &MetaValue) -> MetaValue {
    value.map_strings(&add_slashes)
}

/// Inverse of [`slash_deep`].
pub fn unslash_deep(value: &MetaValue) -> MetaValue {
    value.map_strings(&strip_slashes)
}
