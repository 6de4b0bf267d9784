//! Extracting messages from the raw channel feed markup.
//!
//! The feed page renders each post inside a message wrapper block. Text and
//! publish time are pulled from the same block so they stay paired; a block
//! without a text div is skipped. Output preserves document order (newest
//! first) — callers reverse before folding.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref MESSAGE_TEXT_RE: Regex = Regex::new(
        r#"(?s)<div class="tgme_widget_message_text js-message_text" dir="auto">(.*?)</div>"#
    )
    .expect("Failed to compile MESSAGE_TEXT_RE regex");
    static ref PUBLISH_TIME_RE: Regex = Regex::new(r#"<time datetime="([^"]+)" class="time">"#)
        .expect("Failed to compile PUBLISH_TIME_RE regex");
    static ref TAG_RE: Regex =
        Regex::new(r"<[^>]+>").expect("Failed to compile TAG_RE regex");
    static ref NUMERIC_ENTITY_RE: Regex = Regex::new(r"&#([xX]?[0-9a-fA-F]+);")
        .expect("Failed to compile NUMERIC_ENTITY_RE regex");
}

/// Start of each message wrapper block in the feed markup.
const WRAPPER_MARKER: &str = "class=\"tgme_widget_message_wrap";

/// One extracted channel message. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Display text with line breaks restored, tags stripped and entities
    /// decoded.
    pub text: String,
    /// Raw publish-time attribute value, if the wrapper carried one. Parsed
    /// only where a comparison needs it.
    pub published: Option<String>,
}

/// Split the raw markup into messages, pairing each text with the publish
/// time of the same wrapper block.
pub fn extract_messages(raw: &str) -> Vec<Message> {
    let mut messages = Vec::new();

    // The segment before the first wrapper is page chrome, not a message.
    for block in raw.split(WRAPPER_MARKER).skip(1) {
        let text = match MESSAGE_TEXT_RE.captures(block) {
            Some(caps) => normalize_text(caps.get(1).map_or("", |m| m.as_str())),
            None => continue,
        };
        let published = PUBLISH_TIME_RE
            .captures(block)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        messages.push(Message { text, published });
    }

    messages
}

/// Line-break markup to newlines, remaining tags stripped, entities decoded.
fn normalize_text(fragment: &str) -> String {
    let with_breaks = fragment.replace("<br/>", "\n").replace("<br>", "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

/// Decode the named entities the feed actually emits plus numeric
/// references. `&amp;` is decoded last so escaped entities stay escaped.
fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");

    let text = NUMERIC_ENTITY_RE.replace_all(&text, |caps: &Captures| {
        let body = &caps[1];
        let code = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => body.parse::<u32>().ok(),
        };
        match code.and_then(char::from_u32) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });

    text.replace("&amp;", "&")
}
