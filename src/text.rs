// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Helpful utilities for working with text.

use htmlentity::entity::{self, ICodedDataTrait};

/// Converts HTML entities into their single-character equivalents.
///
/// Reddit returns "&" as "&amp;", ">" as "&gt;", and "<" as "&lt;" in
/// titles and self text; this function converts those entities back into
/// the characters the author actually typed.
///
/// # Examples
///
/// ```
/// use redpen::text::convert_html_entities;
/// let raw = "&lt;This &amp; That&gt;";
/// assert_eq!(convert_html_entities(raw), "<This & That>");
/// ```
///
/// ```
/// use redpen::text::convert_html_entities;
/// let raw = "A Plaintext Post";
/// assert_eq!(convert_html_entities(raw), raw);
/// ```
pub fn convert_html_entities(text: &str) -> String {
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or_else(|_| text.to_string())
}

/// Returns at most the first `max_chars` characters of `text`.
///
/// The text is cut on a character boundary, never in the middle of a
/// multi-byte character.
///
/// # Examples
///
/// ```
/// use redpen::text::preview;
/// assert_eq!(preview("hello, world", 5), "hello");
/// assert_eq!(preview("hi", 5), "hi");
/// assert_eq!(preview("naïve", 3), "naï");
/// ```
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
