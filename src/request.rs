//! Request and response bodies of the local HTTP surface

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /generate`
///
/// Both fields accept any JSON value. Falsy values (null, false, 0, "",
/// [], {}) count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest
{   /// Model identifier; absent or falsy means auto-routing
    #[serde(default, deserialize_with = "model_field")]
    pub model: Option<String>
  , /// User prompt; trimmed before use
    #[serde(default, deserialize_with = "prompt_field")]
    pub prompt: Option<String>
}

fn is_truthy(value: &Value) -> bool
{   match value
    {   Value::Null => false
      , Value::Bool(b) => *b
      , Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0)
      , Value::String(s) => !s.is_empty()
      , Value::Array(a) => !a.is_empty()
      , Value::Object(o) => !o.is_empty()
    }
}

// A truthy non-string model is forwarded as its JSON text.
fn model_field<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>
{   let value = Value::deserialize(d)?;
    Ok(match value
    {   Value::String(s) if !s.is_empty() => Some(s)
      , v if is_truthy(&v) => Some(v.to_string())
      , _ => None
    })
}

// Only a string can be a prompt; anything else reads as missing.
fn prompt_field<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>
{   match Value::deserialize(d)?
    {   Value::String(s) => Ok(Some(s))
      , _ => Ok(None)
    }
}

impl CompletionRequest
{   pub fn new(
      model: Option<&str>
    , prompt: &str
    ) -> Self
    {   CompletionRequest
        {   model: model.map(str::to_string)
          , prompt: Some(prompt.to_string())
        }
    }

    /// Model to forward upstream
    pub fn model_or_default(&self) -> &str
    {   self.model
          .as_deref()
          .filter(|m| !m.is_empty())
          .unwrap_or(crate::DEFAULT_MODEL)
    }

    /// Trimmed prompt, or None when blank
    pub fn trimmed_prompt(&self) -> Option<&str>
    {   self.prompt
          .as_deref()
          .map(str::trim)
          .filter(|p| !p.is_empty())
    }
}

/// Successful `POST /generate` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse
{   pub response: String
}

/// Failed reply, sent with the matching status code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse
{   pub error: String
}

impl From<&crate::error::Error> for ErrorResponse
{   fn from(e: &crate::error::Error) -> Self
    {   ErrorResponse { error: e.to_string() }
    }
}
