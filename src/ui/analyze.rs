/// Analyze screen: upload, preview, analyze, result
///
/// Which controls exist and whether they accept presses is decided by
/// `Controls`, derived from the session alone, so the renderer can never
/// offer an action the controller would reject.
use iced::widget::{button, column, container, image, progress_bar, row, text, Column};
use iced::{Alignment, ContentFit, Element, Length};

use super::palette;
use crate::state::assessment::CONFIDENCE_RANGE;
use crate::state::{ClassificationResult, Phase, Session};
use crate::Message;

/// State of the analyze button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// Controls shown for a given session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub upload_enabled: bool,
    /// Hidden once a result or failure is on screen
    pub analyze: Option<AnalyzeButton>,
    pub reset: bool,
    pub retry: bool,
}

impl Controls {
    pub fn for_session(session: &Session) -> Self {
        let analyze = match session.phase() {
            Phase::ImageSelected => Some(AnalyzeButton {
                label: "Analyze Image",
                enabled: session.can_analyze(),
            }),
            Phase::Analyzing => Some(AnalyzeButton {
                label: "Analyzing...",
                enabled: false,
            }),
            _ => None,
        };

        Self {
            upload_enabled: session.can_select(),
            analyze,
            reset: matches!(session.phase(), Phase::Completed | Phase::Failed),
            retry: session.phase() == Phase::Failed,
        }
    }
}

pub fn view<'a>(
    session: &'a Session,
    preview: Option<&'a image::Handle>,
    status: Option<&'a str>,
    max_image_bytes: u64,
) -> Element<'a, Message> {
    let controls = Controls::for_session(session);

    let mut content: Column<'a, Message> = column![
        text("Analyze Coral Reef Image").size(32),
        upload_area(controls.upload_enabled, max_image_bytes),
    ]
    .spacing(24)
    .max_width(900)
    .align_x(Alignment::Center);

    if let Some(status) = status {
        content = content.push(text(status).color(palette::ERROR));
    }

    if let Some(handle) = preview {
        let name = session.image().map(|i| i.file_name()).unwrap_or_default();
        content = content.push(
            column![
                text(format!("Selected Image: {}", name)),
                image(handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fixed(384.0)),
            ]
            .spacing(12),
        );
    }

    if let Some(analyze) = controls.analyze {
        content = content.push(
            button(text(analyze.label))
                .on_press_maybe(analyze.enabled.then_some(Message::Analyze))
                .padding(12)
                .width(Length::Fill),
        );
    }

    if let Some(result) = session.result() {
        content = content.push(result_card(result));
    }

    if let Some(reason) = session.failure() {
        content = content.push(
            container(
                column![
                    text("Analysis Failed").size(24).color(palette::ERROR),
                    text(reason),
                ]
                .spacing(8),
            )
            .padding(24)
            .width(Length::Fill)
            .style(container::bordered_box),
        );
    }

    let mut actions = row![].spacing(12);
    if controls.retry {
        actions = actions.push(
            button(text("Try Again"))
                .on_press(Message::Retry)
                .padding(12)
                .width(Length::Fill),
        );
    }
    if controls.reset {
        let label = if controls.retry {
            "Choose Another Image"
        } else {
            "Analyze Another Image"
        };
        actions = actions.push(
            button(text(label))
                .on_press(Message::Reset)
                .padding(12)
                .width(Length::Fill)
                .style(button::secondary),
        );
    }

    content.push(actions).into()
}

fn upload_area<'a>(enabled: bool, max_image_bytes: u64) -> Element<'a, Message> {
    let limit_mb = max_image_bytes / (1024 * 1024);
    container(
        column![
            button(text("Click to upload coral reef image"))
                .on_press_maybe(enabled.then_some(Message::PickImage))
                .padding([12, 24]),
            text(format!("PNG, JPG up to {}MB", limit_mb))
                .size(14)
                .color(palette::MUTED),
        ]
        .spacing(8)
        .align_x(Alignment::Center),
    )
    .padding(32)
    .width(Length::Fill)
    .center_x(Length::Fill)
    .style(container::bordered_box)
    .into()
}

fn result_card<'a>(result: &ClassificationResult) -> Element<'a, Message> {
    let label = result.label();
    container(
        column![
            text("Assessment Result").size(24),
            text("Health Status:").size(14).color(palette::MUTED),
            text(label.as_str())
                .size(32)
                .color(palette::status_color(label)),
            text("Confidence Level:").size(14).color(palette::MUTED),
            row![
                progress_bar(CONFIDENCE_RANGE, result.confidence())
                    .height(Length::Fixed(12.0)),
                text(result.confidence_text()),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            text("Description:").size(14).color(palette::MUTED),
            text(result.description()),
        ]
        .spacing(8),
    )
    .padding(24)
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::preview::generate_preview_blocking;
    use crate::acquire::preview::tests::sample_image;
    use crate::backend::UnconfiguredBackend;
    use crate::state::{AnalysisController, ImagePayload};
    use ::image::ImageFormat;
    use std::sync::Arc;

    fn controller() -> AnalysisController {
        AnalysisController::new(Arc::new(UnconfiguredBackend), 10 * 1024 * 1024, None)
    }

    fn reef() -> ImagePayload {
        ImagePayload::new("reef.png", sample_image(32, 32, ImageFormat::Png))
    }

    #[test]
    fn test_idle_offers_upload_only() {
        let controller = controller();
        let controls = Controls::for_session(controller.session());
        assert!(controls.upload_enabled);
        assert_eq!(controls.analyze, None);
        assert!(!controls.reset);
        assert!(!controls.retry);
    }

    #[test]
    fn test_analyze_enabled_once_preview_is_ready() {
        let mut controller = controller();
        let job = controller.select_image(reef()).unwrap();
        let controls = Controls::for_session(controller.session());
        assert_eq!(
            controls.analyze,
            Some(AnalyzeButton { label: "Analyze Image", enabled: false })
        );

        let preview = generate_preview_blocking(&job.image, 64);
        controller.on_preview_ready(job.selection, preview).unwrap();
        let controls = Controls::for_session(controller.session());
        assert_eq!(
            controls.analyze,
            Some(AnalyzeButton { label: "Analyze Image", enabled: true })
        );
    }

    #[tokio::test]
    async fn test_controls_through_analysis_and_failure() {
        let mut controller = controller();
        let job = controller.select_image(reef()).unwrap();
        let preview = generate_preview_blocking(&job.image, 64);
        controller.on_preview_ready(job.selection, preview).unwrap();

        let job = controller.request_analysis().unwrap().unwrap();
        let controls = Controls::for_session(controller.session());
        assert!(!controls.upload_enabled);
        assert_eq!(
            controls.analyze,
            Some(AnalyzeButton { label: "Analyzing...", enabled: false })
        );

        controller.on_backend_result(job.run().await).unwrap();
        let controls = Controls::for_session(controller.session());
        assert!(controls.upload_enabled);
        assert_eq!(controls.analyze, None);
        assert!(controls.reset);
        assert!(controls.retry);
    }
}
