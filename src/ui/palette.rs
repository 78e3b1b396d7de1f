/// Colours shared by the views
use iced::Color;

use crate::state::HealthStatus;

/// Cyan accent used for headings and highlights
pub const ACCENT: Color = Color::from_rgb(0.133, 0.827, 0.933);

/// Secondary text
pub const MUTED: Color = Color::from_rgb(0.612, 0.639, 0.686);

/// Error text
pub const ERROR: Color = Color::from_rgb(0.973, 0.443, 0.443);

/// Colour a health category is displayed in
pub fn status_color(status: HealthStatus) -> Color {
    match status {
        HealthStatus::Healthy => Color::from_rgb(0.290, 0.871, 0.502),
        HealthStatus::Bleached => Color::from_rgb(0.980, 0.800, 0.082),
        HealthStatus::Diseased => ERROR,
        HealthStatus::AlgaeCovered => Color::from_rgb(0.984, 0.573, 0.235),
    }
}
