use std::time::Duration;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

// ===== Message Types =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   System
  , User
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: Role
  , pub content: String
}

/// Chat-completions request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamPayload
{   pub model: String
  , pub messages: Vec<ChatMessage>
}

impl UpstreamPayload
{   /// System message first, then the user prompt
    pub fn new(model: &str, prompt: &str) -> Self
    {   UpstreamPayload
        {   model: model.to_string()
          , messages: vec![
              ChatMessage
              {   role: Role::System
                , content: crate::SYSTEM_PROMPT.to_string()
              }
            , ChatMessage
              {   role: Role::User
                , content: prompt.to_string()
              }
            ]
        }
    }
}

// Every level is optional: a missing choice, message or content
// all collapse into the empty-response placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

impl UpstreamResponse
{   /// First choice's content, trimmed, or the placeholder
    pub fn into_text(self) -> String
    {   let text = self.choices
          .into_iter()
          .next()
          .and_then(|c| c.message)
          .and_then(|m| m.content)
          .unwrap_or_default();
        let text = text.trim();
        if text.is_empty()
        {   crate::EMPTY_RESPONSE.to_string()
        } else
        {   text.to_string()
        }
    }
}

// ===== OpenRouter Client =====

/// HTTPS transport to the OpenRouter chat-completions endpoint
#[derive(Clone)]
pub struct OpenRouterClient
{   http_client: reqwest::Client
  , api_key: String
  , api_url: String
  , referer: String
  , title: String
  , timeout: Duration
}

impl OpenRouterClient
{   pub fn new(
      config: &crate::config::ProviderConfig
    ) -> Result<Self, crate::error::Error>
    {   debug!("Creating OpenRouterClient for {}", config.api_url);
        let http_client = reqwest::Client::builder()
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::StartupConfiguration(e.to_string())
          })?;

        Ok(OpenRouterClient
        {   http_client
          , api_key: config.api_key.clone()
          , api_url: config.api_url.clone()
          , referer: config.referer.clone()
          , title: config.title.clone()
          , timeout: Duration::from_secs(config.timeout_secs)
        })
    }

    /// Replace the underlying reqwest client; the timeout still applies
    pub fn with_client(mut self, client: reqwest::Client) -> Self
    {   self.http_client = client;
        self
    }

    fn transport_error(&self, e: reqwest::Error) -> crate::error::Error
    {   error!("Transport error: {}", e);
        if e.is_timeout()
        {   crate::error::Error::TransportError(format!(
              "Request to OpenRouter timed out after {}s: {}",
              self.timeout.as_secs(), e
            ))
        } else
        {   crate::error::Error::TransportError(e.to_string())
        }
    }

    /// One POST, no retry
    pub async fn send_chat(
      &self
    , payload: &UpstreamPayload
    ) -> Result<String, crate::error::Error>
    {   trace!("OpenRouter request: {:?}", payload);

        let response = self.http_client
          .post(&self.api_url)
          .header("Authorization", format!("Bearer {}", self.api_key))
          .header("Content-Type", "application/json")
          .header("HTTP-Referer", &self.referer)
          .header("X-Title", &self.title)
          .timeout(self.timeout)
          .json(payload)
          .send()
          .await
          .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        trace!("OpenRouter response status: {}", status);

        let body = response.text().await
          .map_err(|e| self.transport_error(e))?;

        if !status.is_success()
        {   error!("OpenRouter API error {}: {}", status.as_u16(), body);
            return Err(crate::error::Error::UpstreamError
            {   status: status.as_u16()
              , body
            });
        }

        let parsed: UpstreamResponse = serde_json::from_str(&body)
          .map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::TransportError(e.to_string())
          })?;

        Ok(parsed.into_text())
    }
}

/// Models offered to the frontend, in display order
pub fn available_models() -> Vec<crate::ModelDescriptor>
{   [ ("openrouter/auto", "OpenRouter Auto")
    , ("openai/gpt-4o-mini", "GPT-4o Mini")
    , ("openai/gpt-4o", "GPT-4o")
    , ("mistralai/mistral-7b-instruct", "Mistral 7B Instruct")
    ]
      .iter()
      .map(|(id, name)| crate::ModelDescriptor::new(id, name))
      .collect()
}
