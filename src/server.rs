//! Local HTTP surface: static frontend, model list, generate

use std::future::Future;
use std::sync::Arc;
use axum::{
  body::Bytes,
  extract::State,
  http::{HeaderValue, StatusCode},
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeFile;
use log::{debug, error, info, warn};

pub type SharedProxy = Arc<crate::CompletionProxy>;

/// Build the application router
pub fn router(
  proxy: crate::CompletionProxy
, config: &crate::config::ServerConfig
) -> Result<Router, crate::error::Error>
{   let dir = &config.frontend_dir;
    debug!("Serving frontend from {}", dir.display());

    let app = Router::new()
      .route_service("/", ServeFile::new(dir.join("index.html")))
      .route_service("/script.js", ServeFile::new(dir.join("script.js")))
      .route_service("/style.css", ServeFile::new(dir.join("style.css")))
      .route("/models", get(list_models))
      .route("/generate", post(generate))
      .with_state(Arc::new(proxy))
      .layer(cors_layer(config)?);

    Ok(app)
}

/// Permissive unless an explicit origin list is configured
pub fn cors_layer(
  config: &crate::config::ServerConfig
) -> Result<CorsLayer, crate::error::Error>
{   let origin = if config.cors_is_permissive()
    {   warn!("CORS allows any origin");
        AllowOrigin::any()
    } else
    {   let origins = config.cors_origins
          .iter()
          .map(|o| {
            HeaderValue::from_str(o).map_err(|_| {
              crate::error::Error::StartupConfiguration(format!(
                "invalid CORS origin: {:?}", o
              ))
            })
          })
          .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
      .allow_origin(origin)
      .allow_methods(Any)
      .allow_headers(Any))
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(
  listener: tokio::net::TcpListener
, app: Router
, shutdown: F
) -> std::io::Result<()>
where
  F: Future<Output = ()> + Send + 'static
{   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown)
      .await
}

pub async fn shutdown_signal()
{   if let Err(e) = tokio::signal::ctrl_c().await
    {   error!("Failed to listen for ctrl-c: {}", e);
        return;
    }
    info!("Shutdown signal received, shutting down");
}

// ===== Handlers =====

async fn list_models(
  State(proxy): State<SharedProxy>
) -> Json<Vec<crate::ModelDescriptor>>
{   Json(proxy.list_models())
}

// The body is parsed as JSON whatever its Content-Type says.
async fn generate(
  State(proxy): State<SharedProxy>
, body: Bytes
) -> Result<Json<crate::CompletionResponse>, crate::error::Error>
{   let request: crate::CompletionRequest = serde_json::from_slice(&body)
      .map_err(|e| {
        debug!("Rejected /generate body: {}", e);
        crate::error::Error::InvalidArgument(format!(
          "Invalid JSON body: {}", e
        ))
      })?;

    let reply = proxy.generate(request).await?;
    Ok(Json(reply))
}

impl IntoResponse for crate::error::Error
{   fn into_response(self) -> Response
    {   let status = StatusCode::from_u16(self.status_code())
          .unwrap_or(StatusCode::BAD_GATEWAY);
        // Failures are logged where they happen.
        debug!("Responding {}: {}", status, self);
        (status, Json(crate::ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::config::ServerConfig;

    /// Counts error-level records emitted on the current thread
    mod error_log
    {   use std::cell::Cell;
        use std::sync::Once;

        thread_local!
        {   static ERRORS: Cell<usize> = Cell::new(0);
        }

        struct Counter;

        impl log::Log for Counter
        {   fn enabled(&self, meta: &log::Metadata) -> bool
            {   meta.level() == log::Level::Error
            }

            fn log(&self, record: &log::Record)
            {   if record.level() == log::Level::Error
                {   ERRORS.with(|c| c.set(c.get() + 1));
                }
            }

            fn flush(&self) {}
        }

        static COUNTER: Counter = Counter;
        static INSTALL: Once = Once::new();

        pub fn reset()
        {   INSTALL.call_once(|| {
              let _ = log::set_logger(&COUNTER);
              log::set_max_level(log::LevelFilter::Error);
            });
            ERRORS.with(|c| c.set(0));
        }

        pub fn count() -> usize
        {   ERRORS.with(|c| c.get())
        }
    }

    #[test]
    fn failed_request_is_logged_once()
    {   // Nothing listens on port 1, so the call fails as TransportError.
        let mut config = crate::config::ProviderConfig::new("sk-test");
        config.api_url = "http://127.0.0.1:1/chat".to_string();
        let proxy = crate::CompletionProxy::new(&config).unwrap();

        error_log::reset();
        let err = tokio_test::block_on(
          proxy.generate(crate::CompletionRequest::new(None, "hi"))
        ).unwrap_err();
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_log::count(), 1);
    }

    #[test]
    fn error_response_does_not_log_at_error()
    {   error_log::reset();
        let resp = crate::error::Error::UpstreamError
        {   status: 502
          , body: "bad gateway".into()
        }.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error_log::count(), 0);
    }

    #[test]
    fn invalid_origin_is_a_startup_error()
    {   let config = ServerConfig
        {   cors_origins: vec!["http://ok.test".into(), "bad\norigin".into()]
          , ..ServerConfig::default()
        };
        assert!(matches!(
          cors_layer(&config),
          Err(crate::error::Error::StartupConfiguration(_))
        ));
    }

    #[test]
    fn explicit_origins_build()
    {   let config = ServerConfig
        {   cors_origins: vec!["http://localhost:8000".into()]
          , ..ServerConfig::default()
        };
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn error_response_uses_error_status()
    {   let resp = crate::error::Error::UpstreamError
        {   status: 503
          , body: "down".into()
        }.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = crate::error::Error::prompt_required().into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
