//! Turns a raw Gemini reply into what the client gets back.

use crate::cards::CardDeck;
use crate::gemini::GenerateContentResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde_json::Value;

pub const PARSE_FAILURE: &str = "Failed to parse AI response";

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*").expect("valid fence pattern"));
static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*").expect("valid fence pattern"));

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The model's JSON, forwarded unchanged with 200.
    Cards(Value),
    /// Model text that isn't usable JSON. Still a 200, with an error envelope.
    Unparseable(String),
    /// Upstream answered without generated text; forwarded verbatim.
    Passthrough { status: StatusCode, body: String },
}

pub fn unwrap_reply(status: StatusCode, body: String, validate_cards: bool) -> Reply {
    let Some(text) = generated_text(&body) else {
        return Reply::Passthrough { status, body };
    };

    let cleaned = strip_fences(&text);
    let value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(v) if !is_empty_value(&v) => v,
        Ok(_) => {
            tracing::warn!("model returned an empty JSON value");
            return Reply::Unparseable(cleaned);
        }
        Err(e) => {
            tracing::warn!(error = %e, "model reply is not valid JSON");
            return Reply::Unparseable(cleaned);
        }
    };

    if validate_cards {
        if let Err(e) = CardDeck::from_value(&value) {
            tracing::warn!(error = %e, "model reply failed card validation");
            return Reply::Unparseable(cleaned);
        }
    }
    Reply::Cards(value)
}

/// First candidate's generated text, or `None` when the body isn't a
/// `generateContent` reply carrying one.
pub fn generated_text(body: &str) -> Option<String> {
    serde_json::from_str::<GenerateContentResponse>(body)
        .ok()?
        .into_first_text()
}

/// Removes markdown code-fence markers and surrounding whitespace.
pub fn strip_fences(text: &str) -> String {
    let text = JSON_FENCE.replace_all(text, "");
    let text = BARE_FENCE.replace_all(&text, "");
    text.trim().to_string()
}

// null, false, 0, "", "0", [] and {} carry nothing a client could render.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
