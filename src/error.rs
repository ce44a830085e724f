use std::fmt;

/// Custom error type for MuseAI operations
/// Implements Clone so handlers can log and return the same value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Caller sent an unusable request (empty prompt, bad body)
    InvalidArgument(String)
  , /// Upstream answered with a non-success status
    UpstreamError
    {   status: u16
      , body: String
    }
  , /// Timeout, connection or decode failure talking to upstream
    TransportError(String)
  , /// Missing or invalid setting at process start
    StartupConfiguration(String)
}

impl Error
{   /// Message returned to callers when the prompt is blank
    pub const PROMPT_REQUIRED: &'static str = "Prompt is required.";

    pub fn prompt_required() -> Self
    {   Error::InvalidArgument(Self::PROMPT_REQUIRED.to_string())
    }

    /// HTTP status this error maps to at the server boundary
    pub fn status_code(&self) -> u16
    {   match self
        {   Error::InvalidArgument(_) => 400
          , Error::UpstreamError { status, .. } => *status
          , Error::TransportError(_) => 500
          , Error::StartupConfiguration(_) => 500
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InvalidArgument(msg) => {
              write!(f, "{}", msg)
            }
          , Error::UpstreamError { status, body } => {
              write!(f, "OpenRouter error {}: {}", status, body)
            }
          , Error::TransportError(msg) => {
              write!(f, "{}", msg)
            }
          , Error::StartupConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
