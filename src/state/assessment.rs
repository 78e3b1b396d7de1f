/// Health assessment values produced by an analysis
///
/// `ClassificationResponse` is what a backend sends over the wire.
/// `ClassificationResult` is what the renderer is allowed to see: the label
/// comes from the closed set and the confidence is a finite value in [0, 100].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Lowest and highest confidence a result may carry, in percent
pub const CONFIDENCE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=100.0;

/// The closed set of health categories a reef image can be assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Bleached,
    Diseased,
    #[serde(rename = "Algae-Covered")]
    AlgaeCovered,
}

impl HealthStatus {
    /// All categories in display order
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Healthy,
        HealthStatus::Bleached,
        HealthStatus::Diseased,
        HealthStatus::AlgaeCovered,
    ];

    /// Wire and display name
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Bleached => "Bleached",
            HealthStatus::Diseased => "Diseased",
            HealthStatus::AlgaeCovered => "Algae-Covered",
        }
    }

    /// Explanation shown with an assessment
    pub fn description(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => {
                "The coral reef appears healthy with vibrant colors and good structure."
            }
            HealthStatus::Bleached => {
                "Signs of coral bleaching detected. The reef shows loss of color due to stress."
            }
            HealthStatus::Diseased => {
                "Disease indicators detected. The reef shows signs of infection or illness."
            }
            HealthStatus::AlgaeCovered => {
                "Excessive algae growth detected covering coral structures."
            }
        }
    }

    /// One-line summary used in the category overview
    pub fn summary(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Vibrant, thriving coral",
            HealthStatus::Bleached => "Loss of color due to stress",
            HealthStatus::Diseased => "Signs of infection",
            HealthStatus::AlgaeCovered => "Excessive algae growth",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HealthStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| SessionError::ContractViolation(format!("unknown label {:?}", s)))
    }
}

/// Raw response body of an inference backend
///
/// Deliberately loose: the label is an arbitrary string and the confidence
/// any float, so that schema violations can be detected and reported instead
/// of failing deserialization deep inside the HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl ClassificationResponse {
    #[cfg(test)]
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            description: None,
        }
    }
}

/// A validated classification outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    label: HealthStatus,
    confidence: f32,
}

impl ClassificationResult {
    /// Build a result, rejecting confidences outside [0, 100]
    pub fn new(label: HealthStatus, confidence: f32) -> Result<Self, SessionError> {
        if !confidence.is_finite() || !CONFIDENCE_RANGE.contains(&confidence) {
            return Err(SessionError::ContractViolation(format!(
                "confidence {} is outside [0, 100]",
                confidence
            )));
        }
        Ok(Self { label, confidence })
    }

    pub fn label(&self) -> HealthStatus {
        self.label
    }

    /// Confidence in percent, always within [0, 100]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// The description is a function of the label only
    pub fn description(&self) -> &'static str {
        self.label.description()
    }

    /// Confidence formatted for display, e.g. `92.5%`
    pub fn confidence_text(&self) -> String {
        format!("{:.1}%", self.confidence)
    }
}

impl TryFrom<ClassificationResponse> for ClassificationResult {
    type Error = SessionError;

    fn try_from(response: ClassificationResponse) -> Result<Self, Self::Error> {
        let label: HealthStatus = response.label.parse()?;
        let confidence = response.confidence;
        if !confidence.is_finite() {
            return Err(SessionError::ContractViolation(format!(
                "confidence {} is not a finite number",
                confidence
            )));
        }
        // Range check happens before narrowing to f32
        if !(0.0..=100.0).contains(&confidence) {
            return Err(SessionError::ContractViolation(format!(
                "confidence {} is outside [0, 100]",
                confidence
            )));
        }
        ClassificationResult::new(label, confidence as f32)
    }
}
