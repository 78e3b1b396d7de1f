/// State management module
///
/// This module handles all analysis state, including:
/// - Shared data structures: image payloads and previews (data.rs)
/// - Health categories and validated results (assessment.rs)
/// - The session value and its phases (session.rs)
/// - The controller that owns and mutates the session (controller.rs)

pub mod assessment;
pub mod controller;
pub mod data;
pub mod session;

pub use assessment::{ClassificationResult, HealthStatus};
pub use controller::{AnalysisController, AnalysisOutcome, PreviewJob};
pub use data::{ImagePayload, Preview};
pub use session::{Phase, SelectionId, Session};
