//! HTML character reference decoding.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[#\w]+;").unwrap());

/// Decode a single character reference such as `&amp;` or `&#x41;`.
///
/// Unknown names, non-numeric digits and invalid code points come back
/// unchanged.
pub fn decode_entity(entity: &str) -> String {
    let decoded = if let Some(hex) = strip_reference(entity, "&#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = strip_reference(entity, "&#") {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        named_entity(entity)
    };

    match decoded {
        Some(c) => c.to_string(),
        None => entity.to_string(),
    }
}

/// Decode every character reference in `text`
pub fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| decode_entity(&caps[0]))
        .into_owned()
}

fn strip_reference<'a>(entity: &'a str, prefix: &str) -> Option<&'a str> {
    entity.strip_prefix(prefix)?.strip_suffix(';')
}

fn named_entity(entity: &str) -> Option<char> {
    match entity {
        "&nbsp;" => Some(' '),
        "&lt;" => Some('<'),
        "&gt;" => Some('>'),
        "&amp;" => Some('&'),
        "&quot;" => Some('"'),
        "&apos;" => Some('\''),
        _ => None,
    }
}
