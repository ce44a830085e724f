pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod client;
pub mod server;
use serde::{Deserialize, Serialize};

/*

museai is a small async backend that sits between the MuseAI web page
and OpenRouter. it forwards one prompt per call and relays the answer
(or the failure) back as json.

museai/
├── Cargo.toml
├── frontend/           # index.html, script.js, style.css
├── src/
│   ├── lib.rs          # Re-exports and shared constants
│   ├── main.rs         # Binary entry point
│   ├── error.rs        # Error taxonomy and status codes
│   ├── config.rs       # Provider and server configuration
│   ├── client.rs       # CompletionProxy (list_models, generate)
│   ├── server.rs       # axum routes, static files, CORS
│   ├── providers/      # Upstream implementations
│   │   ├── mod.rs
│   │   └── openrouter.rs
│   └── request.rs      # Local request/response bodies
└── tests/              # Integration tests against a mock upstream

*/

pub use client::CompletionProxy;
pub use config::MuseConfig;
pub use error::Error;
pub use request::{CompletionRequest, CompletionResponse, ErrorResponse};

/// Auto-routing model used when the caller names none
pub const DEFAULT_MODEL: &str = "openrouter/auto";

/// Fixed system message prepended to every upstream call
pub const SYSTEM_PROMPT: &str
  = "You are MuseAI, a concise and helpful assistant.";

/// Returned when upstream answers with no usable text
pub const EMPTY_RESPONSE: &str = "(empty response)";

/// A selectable model as shown in the frontend dropdown
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelDescriptor
{   /// Identifier forwarded upstream (e.g. "openai/gpt-4o")
    pub id: String
  , /// Human-readable label
    pub name: String
}

impl ModelDescriptor
{   pub fn new(id: &str, name: &str) -> Self
    {   ModelDescriptor
        {   id: id.to_string()
          , name: name.to_string()
        }
    }
}
