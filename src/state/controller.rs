/// Analysis session controller
///
/// Owns the `Session` and is the only code allowed to mutate it. All
/// operations are synchronous; the two asynchronous steps (preview
/// generation and the backend call) are handed back to the caller as jobs,
/// whose completions are fed back through `on_preview_ready` and
/// `on_backend_result`.
///
/// ```text
///   Idle ──select──▶ ImageSelected ──analyze──▶ Analyzing ──ok──▶ Completed
///    ▲                 ▲     │                      │                │
///    │                 └─────┘ select               └──err──▶ Failed │
///    └──────────────────────────── reset ◀───────────────────────────┘
/// ```

use std::sync::Arc;
use std::time::Duration;

use crate::backend::InferenceBackend;
use crate::error::{AcquireError, BackendError, SessionError};
use crate::state::assessment::{ClassificationResponse, ClassificationResult};
use crate::state::data::{ImagePayload, Preview};
use crate::state::session::{AnalysisTicket, Selection, SelectionId, Session, Stage};

/// Message shown when the backend answered with data outside the schema
const CONTRACT_FAILURE: &str = "Analysis failed: the backend returned an invalid result.";

/// Preview generation to run for a freshly selected image
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub selection: SelectionId,
    pub image: ImagePayload,
}

/// The single backend request issued by `request_analysis`
#[derive(Clone)]
pub struct AnalysisJob {
    ticket: AnalysisTicket,
    image: ImagePayload,
    backend: Arc<dyn InferenceBackend>,
    timeout: Option<Duration>,
}

/// Completion of an `AnalysisJob`
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub ticket: AnalysisTicket,
    pub result: Result<ClassificationResponse, BackendError>,
}

impl AnalysisJob {
    #[cfg(test)]
    pub fn ticket(&self) -> AnalysisTicket {
        self.ticket
    }

    /// Call the backend once, bounded by the configured timeout
    pub async fn run(self) -> AnalysisOutcome {
        let classify = self.backend.classify(&self.image);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, classify).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout(limit)),
            },
            None => classify.await,
        };
        AnalysisOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

impl std::fmt::Debug for AnalysisJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisJob")
            .field("ticket", &self.ticket)
            .field("image", &self.image)
            .field("backend", &self.backend.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct AnalysisController {
    session: Session,
    backend: Arc<dyn InferenceBackend>,
    max_image_bytes: u64,
    analysis_timeout: Option<Duration>,
}

impl AnalysisController {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        max_image_bytes: u64,
        analysis_timeout: Option<Duration>,
    ) -> Self {
        Self {
            session: Session::new(),
            backend,
            max_image_bytes,
            analysis_timeout,
        }
    }

    /// Read-only view for rendering
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Accept a new image, replacing any previous one and its result
    ///
    /// Rejected while an analysis is in flight. Invalid images leave the
    /// session untouched.
    pub fn select_image(&mut self, image: ImagePayload) -> Result<PreviewJob, SessionError> {
        if self.session.is_analyzing() {
            return Err(self.invalid_state("select an image"));
        }

        let kind = image.validate(self.max_image_bytes)?;

        let id = SelectionId::new();
        self.session.selection = Some(Selection {
            id,
            image: image.clone(),
            preview: None,
        });
        self.session.stage = Stage::ImageSelected;

        tracing::info!(
            "Selected {} ({} bytes, {})",
            image.file_name(),
            image.len(),
            kind.mime_type()
        );

        Ok(PreviewJob {
            selection: id,
            image,
        })
    }

    /// Completion of preview generation for `selection`
    ///
    /// Previews for a selection that is no longer current are dropped. A
    /// preview that cannot be produced means the image is unusable, so the
    /// selection is discarded.
    pub fn on_preview_ready(
        &mut self,
        selection: SelectionId,
        preview: Result<Preview, AcquireError>,
    ) -> Result<(), SessionError> {
        let Some(current) = self.session.selection.as_mut().filter(|s| s.id == selection) else {
            tracing::debug!("Dropping preview for a replaced selection");
            return Ok(());
        };

        match preview {
            Ok(preview) => {
                current.preview = Some(preview);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Preview generation failed for {}: {}", current.image.file_name(), e);
                if matches!(self.session.stage, Stage::ImageSelected) {
                    self.session = Session::new();
                }
                Err(e.into())
            }
        }
    }

    /// Start analysing the selected image
    ///
    /// Returns the one backend job to run. While already analysing this is a
    /// no-op returning `Ok(None)`, so repeated clicks never issue a second
    /// request.
    pub fn request_analysis(&mut self) -> Result<Option<AnalysisJob>, SessionError> {
        match self.session.stage {
            Stage::Analyzing(ticket) => {
                tracing::debug!("Analysis {} already in flight, ignoring request", ticket);
                Ok(None)
            }
            Stage::ImageSelected => {
                let Some(image) = self.session.image().cloned() else {
                    return Err(self.invalid_state("request analysis"));
                };

                let ticket = AnalysisTicket::new();
                self.session.stage = Stage::Analyzing(ticket);

                tracing::info!(
                    "Analysis {} started for {} via {} backend",
                    ticket,
                    image.file_name(),
                    self.backend.name()
                );

                Ok(Some(AnalysisJob {
                    ticket,
                    image,
                    backend: Arc::clone(&self.backend),
                    timeout: self.analysis_timeout,
                }))
            }
            _ => Err(self.invalid_state("request analysis")),
        }
    }

    /// Completion of an analysis job
    ///
    /// Outcomes for any ticket other than the in-flight one are ignored.
    /// Results outside the schema are rejected with `ContractViolation` and
    /// never stored; the session moves to `Failed` instead.
    pub fn on_backend_result(&mut self, outcome: AnalysisOutcome) -> Result<(), SessionError> {
        if self.session.ticket() != Some(outcome.ticket) {
            tracing::debug!("Ignoring outcome of stale analysis {}", outcome.ticket);
            return Ok(());
        }

        match outcome.result {
            Ok(response) => match ClassificationResult::try_from(response) {
                Ok(result) => {
                    tracing::info!(
                        "Analysis {} completed: {} ({})",
                        outcome.ticket,
                        result.label(),
                        result.confidence_text()
                    );
                    self.session.stage = Stage::Completed(result);
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!("Analysis {} rejected: {}", outcome.ticket, e);
                    self.session.stage = Stage::Failed(CONTRACT_FAILURE.to_string());
                    Err(e)
                }
            },
            Err(e) => {
                tracing::warn!("Analysis {} failed: {}", outcome.ticket, e);
                self.session.stage = Stage::Failed(format!("Analysis failed: {}", e));
                Ok(())
            }
        }
    }

    /// Return from `Failed` to `ImageSelected` with the same image
    pub fn retry(&mut self) -> Result<(), SessionError> {
        match self.session.stage {
            Stage::Failed(_) if self.session.selection.is_some() => {
                self.session.stage = Stage::ImageSelected;
                Ok(())
            }
            _ => Err(self.invalid_state("retry")),
        }
    }

    /// Discard image, preview and result. Valid from any phase.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.session.ticket() {
            tracing::info!("Reset while analysis {} in flight, its outcome will be ignored", ticket);
        }
        self.session = Session::new();
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        let err = SessionError::InvalidState {
            operation,
            phase: self.session.phase(),
        };
        tracing::warn!("{}", err);
        err
    }
}
