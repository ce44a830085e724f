use log::{debug, info};
use crate::providers::openrouter::{self, OpenRouterClient, UpstreamPayload};

/// Public API for MuseAI: validates, forwards, normalizes
///
/// Holds only immutable state, so one instance is shared by every
/// request handler; calls never wait on each other.
#[derive(Clone)]
pub struct CompletionProxy
{   provider: OpenRouterClient
}

impl CompletionProxy
{   pub fn new(
      config: &crate::config::ProviderConfig
    ) -> Result<Self, crate::error::Error>
    {   debug!("Creating CompletionProxy");
        Ok(CompletionProxy
        {   provider: OpenRouterClient::new(config)?
        })
    }

    /// Build around an existing provider
    pub fn with_provider(provider: OpenRouterClient) -> Self
    {   CompletionProxy { provider }
    }

    /// The static model list
    pub fn list_models(&self) -> Vec<crate::ModelDescriptor>
    {   openrouter::available_models()
    }

    /// Upstream payload for a request, or InvalidArgument on a blank prompt
    pub fn build_payload(
      request: &crate::CompletionRequest
    ) -> Result<UpstreamPayload, crate::error::Error>
    {   let prompt = request.trimmed_prompt()
          .ok_or_else(crate::error::Error::prompt_required)?;
        Ok(UpstreamPayload::new(request.model_or_default(), prompt))
    }

    /// Forward one prompt and relay the answer
    pub async fn generate(
      &self
    , request: crate::CompletionRequest
    ) -> Result<crate::CompletionResponse, crate::error::Error>
    {   let payload = Self::build_payload(&request)?;
        debug!("generate for model: {}", payload.model);

        let text = self.provider.send_chat(&payload).await?;
        info!(
          "generate ok: model={} chars={}",
          payload.model, text.len()
        );
        Ok(crate::CompletionResponse { response: text })
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::providers::openrouter::Role;

    #[test]
    fn blank_prompts_are_rejected()
    {   for prompt in ["", " ", "\n\t  "]
        {   let req = crate::CompletionRequest::new(None, prompt);
            let err = CompletionProxy::build_payload(&req).unwrap_err();
            assert_eq!(err, crate::error::Error::prompt_required());
        }
        let missing = crate::CompletionRequest::default();
        assert!(CompletionProxy::build_payload(&missing).is_err());
    }

    #[test]
    fn default_model_is_auto()
    {   let req = crate::CompletionRequest::new(None, "hi");
        let payload = CompletionProxy::build_payload(&req).unwrap();
        assert_eq!(payload.model, "openrouter/auto");
    }

    #[test]
    fn payload_carries_exactly_two_messages()
    {   let req = crate::CompletionRequest::new(
          Some("openai/gpt-4o-mini"), "  tell me a joke  "
        );
        let payload = CompletionProxy::build_payload(&req).unwrap();
        assert_eq!(payload.model, "openai/gpt-4o-mini");
        assert_eq!(payload.messages.len(), 2);
        assert_eq!(payload.messages[0].role, Role::System);
        assert_eq!(payload.messages[0].content, crate::SYSTEM_PROMPT);
        assert_eq!(payload.messages[1].role, Role::User);
        assert_eq!(payload.messages[1].content, "tell me a joke");
    }

    #[test]
    fn list_models_is_stable()
    {   let proxy = CompletionProxy::new(
          &crate::config::ProviderConfig::new("sk-test")
        ).unwrap();
        let first = proxy.list_models();
        assert_eq!(first.len(), 4);
        for _ in 0..10
        {   assert_eq!(proxy.list_models(), first);
        }
    }

    #[test]
    fn blank_prompt_never_reaches_upstream()
    {   // The endpoint is unroutable; a request would fail as TransportError.
        let mut config = crate::config::ProviderConfig::new("sk-test");
        config.api_url = "http://127.0.0.1:1/unused".to_string();
        let proxy = CompletionProxy::new(&config).unwrap();
        let result = tokio_test::block_on(
          proxy.generate(crate::CompletionRequest::new(None, "   "))
        );
        tokio_test::assert_err!(&result);
        assert_eq!(result.unwrap_err().status_code(), 400);
    }
}
