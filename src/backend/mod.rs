/// Inference backends
///
/// The session controller only knows the `InferenceBackend` trait. The app
/// wires in `HttpBackend` when an endpoint is configured and
/// `UnconfiguredBackend` otherwise.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::BackendError;
use crate::state::assessment::ClassificationResponse;
use crate::state::data::ImagePayload;

pub use http::HttpBackend;

/// Capability that classifies one image
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Classify a single image. Exactly one request per call.
    async fn classify(&self, image: &ImagePayload) -> Result<ClassificationResponse, BackendError>;
}

/// Backend used when no endpoint is configured
///
/// Fails every request so the session lands in `Failed` with a clear message
/// instead of fabricating a result.
#[derive(Debug, Default)]
pub struct UnconfiguredBackend;

#[async_trait]
impl InferenceBackend for UnconfiguredBackend {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn classify(&self, _image: &ImagePayload) -> Result<ClassificationResponse, BackendError> {
        Err(BackendError::NotConfigured)
    }
}

/// Build the backend described by the settings
pub fn from_settings(settings: &Settings) -> Arc<dyn InferenceBackend> {
    match settings.backend_endpoint.as_deref() {
        Some(endpoint) => match HttpBackend::new(endpoint, settings.request_timeout()) {
            Ok(backend) => {
                tracing::info!("Using inference backend at {}", backend.endpoint());
                Arc::new(backend)
            }
            Err(e) => {
                tracing::error!("Failed to create HTTP backend for {}: {}", endpoint, e);
                Arc::new(UnconfiguredBackend)
            }
        },
        None => {
            tracing::warn!("No backend_endpoint configured, analysis will fail until one is set");
            Arc::new(UnconfiguredBackend)
        }
    }
}
