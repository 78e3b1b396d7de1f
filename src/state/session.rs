/// The analysis session: one image-analysis attempt at a time
///
/// The session is a plain value. Only the controller mutates it; the view
/// layer borrows it read-only to render.

use std::fmt;

use uuid::Uuid;

use super::assessment::ClassificationResult;
use super::data::{ImagePayload, Preview};

/// Identifies one accepted image selection
///
/// Preview generation reports back with this id so that a preview for an
/// image the user has since replaced is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionId(Uuid);

impl SelectionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Identifies one issued backend request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalysisTicket(Uuid);

impl AnalysisTicket {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AnalysisTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete lifecycle stage of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ImageSelected,
    Analyzing,
    Completed,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::ImageSelected => "an image is selected",
            Phase::Analyzing => "analyzing",
            Phase::Completed => "showing a result",
            Phase::Failed => "showing a failure",
        };
        f.write_str(name)
    }
}

/// Phase together with the data that only exists in that phase
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stage {
    Idle,
    ImageSelected,
    Analyzing(AnalysisTicket),
    Completed(ClassificationResult),
    Failed(String),
}

/// The currently selected image and its preview
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Selection {
    pub id: SelectionId,
    pub image: ImagePayload,
    pub preview: Option<Preview>,
}

/// In-memory state of one image-analysis attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub(crate) selection: Option<Selection>,
    pub(crate) stage: Stage,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            selection: None,
            stage: Stage::Idle,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Idle => Phase::Idle,
            Stage::ImageSelected => Phase::ImageSelected,
            Stage::Analyzing(_) => Phase::Analyzing,
            Stage::Completed(_) => Phase::Completed,
            Stage::Failed(_) => Phase::Failed,
        }
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.selection.as_ref().map(|s| &s.image)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.selection.as_ref().and_then(|s| s.preview.as_ref())
    }

    /// Present only in the `Completed` phase
    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.stage {
            Stage::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// User-facing reason, present only in the `Failed` phase
    pub fn failure(&self) -> Option<&str> {
        match &self.stage {
            Stage::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Ticket of the in-flight request, present only while analyzing
    pub fn ticket(&self) -> Option<AnalysisTicket> {
        match self.stage {
            Stage::Analyzing(ticket) => Some(ticket),
            _ => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.stage, Stage::Analyzing(_))
    }

    /// Whether the analyze control should accept a press
    ///
    /// The preview must be on screen before analysis can be requested.
    pub fn can_analyze(&self) -> bool {
        matches!(self.stage, Stage::ImageSelected) && self.preview().is_some()
    }

    /// Whether a new image may be picked right now
    pub fn can_select(&self) -> bool {
        !self.is_analyzing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::assessment::HealthStatus;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.image().is_none());
        assert!(session.preview().is_none());
        assert!(session.result().is_none());
        assert!(!session.can_analyze());
        assert!(session.can_select());
    }

    #[test]
    fn test_result_only_exposed_when_completed() {
        let result = ClassificationResult::new(HealthStatus::Bleached, 87.3).unwrap();
        let mut session = Session::new();
        session.stage = Stage::Completed(result);
        assert_eq!(session.result(), Some(&result));

        session.stage = Stage::Failed("boom".to_string());
        assert!(session.result().is_none());
        assert_eq!(session.failure(), Some("boom"));
    }

    #[test]
    fn test_analyze_requires_preview() {
        let mut session = Session::new();
        session.selection = Some(Selection {
            id: SelectionId::new(),
            image: ImagePayload::new("reef.png", b"\x89PNG\r\n\x1a\n".to_vec()),
            preview: None,
        });
        session.stage = Stage::ImageSelected;
        assert!(!session.can_analyze());
    }
}
