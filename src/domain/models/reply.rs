#[cfg(test)]
#[path = "reply_test.rs"]
mod tests;

use serde_json::Map;
use serde_json::Value;

use super::MessageKind;
use super::ResponseShapeError;

const REPLY_KEYS: [&str; 3] = ["type", "content", "config"];

/// Truthiness as the webhook's producers usually mean it: null, false, zero
/// and empty strings count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => return false,
        Value::Bool(b) => return *b,
        Value::Number(n) => return n.as_f64().map(|f| return f != 0.0).unwrap_or(true),
        Value::String(s) => return !s.is_empty(),
        Value::Array(_) | Value::Object(_) => return true,
    }
}

fn exposes_reply_keys(obj: &Map<String, Value>) -> bool {
    return REPLY_KEYS.iter().any(|key| {
        return obj.get(*key).map(is_truthy).unwrap_or(false);
    });
}

/// The raw `type`/`content`/`config` triple as found in a response object.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplyFields {
    pub kind: Option<String>,
    pub content: Option<String>,
    pub config: Option<Value>,
}

impl ReplyFields {
    fn from_object(obj: &Map<String, Value>) -> ReplyFields {
        let kind = obj
            .get("type")
            .and_then(|e| return e.as_str())
            .filter(|e| return !e.is_empty())
            .map(|e| return e.to_string());

        let content = obj.get("content").and_then(|e| {
            if !is_truthy(e) {
                return None;
            }
            match e {
                Value::String(s) => return Some(s.to_string()),
                Value::Number(n) => return Some(n.to_string()),
                Value::Bool(b) => return Some(b.to_string()),
                _ => return None,
            }
        });

        let config = obj
            .get("config")
            .filter(|e| return is_truthy(e))
            .cloned();

        return ReplyFields {
            kind,
            content,
            config,
        };
    }
}

/// Every payload layout the endpoint is known to answer with, in the order
/// they are tried.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseShape {
    /// `{ type?, content?, config? }`
    Direct(ReplyFields),
    /// `{ output: { type?, content?, config? } }`
    NestedOutput(ReplyFields),
    /// `{ output: "text" }`
    OutputText(String),
    /// `"text"`
    PlainText(String),
}

impl ResponseShape {
    pub fn decode(body: &Value) -> Option<ResponseShape> {
        match body {
            Value::Object(obj) if exposes_reply_keys(obj) => {
                return Some(ResponseShape::Direct(ReplyFields::from_object(obj)));
            }
            Value::Object(obj) => match obj.get("output") {
                Some(Value::Object(output)) if exposes_reply_keys(output) => {
                    return Some(ResponseShape::NestedOutput(ReplyFields::from_object(
                        output,
                    )));
                }
                Some(Value::String(output)) if !output.is_empty() => {
                    return Some(ResponseShape::OutputText(output.to_string()));
                }
                _ => return None,
            },
            Value::String(text) => return Some(ResponseShape::PlainText(text.to_string())),
            _ => return None,
        }
    }
}

/// Canonical reply shape used everywhere downstream of the endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub kind: MessageKind,
    pub content: Option<String>,
    pub config: Option<Value>,
}

impl Reply {
    pub fn text(text: &str) -> Reply {
        return Reply {
            kind: MessageKind::Text,
            content: Some(text.to_string()),
            config: None,
        };
    }

    /// Decodes any response body into a reply, failing when the body matches
    /// no known shape or carries neither content nor config.
    pub fn normalize(body: &Value) -> Result<Reply, ResponseShapeError> {
        let shape = ResponseShape::decode(body).ok_or(ResponseShapeError::Unrecognized)?;
        return Reply::try_from(shape);
    }

    fn from_fields(fields: ReplyFields) -> Result<Reply, ResponseShapeError> {
        let ReplyFields {
            kind,
            content,
            config,
        } = fields;

        if content.is_none() && config.is_none() {
            return Err(ResponseShapeError::Empty);
        }

        let wants_chart = match kind.as_deref() {
            Some("chart") => true,
            Some("text") | None => content.is_none(),
            Some(other) => {
                tracing::debug!(kind = other, "Unknown reply type, treating as text");
                content.is_none()
            }
        };

        if wants_chart && config.is_some() {
            return Ok(Reply {
                kind: MessageKind::Chart,
                content,
                config,
            });
        }

        if content.is_none() {
            return Err(ResponseShapeError::Empty);
        }

        return Ok(Reply {
            kind: MessageKind::Text,
            content,
            config: None,
        });
    }
}

impl TryFrom<ResponseShape> for Reply {
    type Error = ResponseShapeError;

    fn try_from(shape: ResponseShape) -> Result<Reply, ResponseShapeError> {
        match shape {
            ResponseShape::Direct(fields) | ResponseShape::NestedOutput(fields) => {
                return Reply::from_fields(fields);
            }
            ResponseShape::OutputText(text) | ResponseShape::PlainText(text) => {
                if text.is_empty() {
                    return Err(ResponseShapeError::Empty);
                }
                return Ok(Reply::text(&text));
            }
        }
    }
}
