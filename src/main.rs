use iced::widget::{column, container, image, scrollable};
use iced::{Element, Length, Task, Theme};
use std::path::PathBuf;
use tracing::Level;

mod acquire;
mod backend;
mod config;
mod error;
mod state;
mod ui;

use config::Settings;
use error::{AcquireError, SessionError};
use state::{AnalysisController, AnalysisOutcome, ImagePayload, Preview, PreviewJob, SelectionId};
use ui::Tab;

/// Main application state
struct CoralSight {
    /// Owner of the analysis session
    controller: AnalysisController,
    settings: Settings,
    tab: Tab,
    /// User-visible message for rejected input
    status: Option<String>,
    /// Decoded once per preview rather than on every frame
    preview_handle: Option<image::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),
    /// User clicked the upload area
    PickImage,
    /// File dialog closed
    ImagePicked(Option<PathBuf>),
    /// Background file read finished
    ImageLoaded(Result<ImagePayload, AcquireError>),
    /// Background preview generation finished
    PreviewReady(SelectionId, Result<Preview, AcquireError>),
    Analyze,
    /// Inference backend answered (or failed)
    AnalysisFinished(AnalysisOutcome),
    Retry,
    /// "Analyze Another Image"
    Reset,
}

impl CoralSight {
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let backend = backend::from_settings(&settings);
        let controller = AnalysisController::new(
            backend,
            settings.max_image_bytes,
            settings.analysis_timeout(),
        );

        tracing::info!("🪸 CoralSight initialized");

        (
            CoralSight {
                controller,
                settings,
                tab: Tab::default(),
                status: None,
                preview_handle: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Task::none()
            }
            Message::PickImage => {
                if !self.controller.session().can_select() {
                    return Task::none();
                }
                Task::perform(acquire::pick_image(), Message::ImagePicked)
            }
            Message::ImagePicked(Some(path)) => Task::perform(
                acquire::load_image(path, self.settings.max_image_bytes),
                Message::ImageLoaded,
            ),
            Message::ImagePicked(None) => Task::none(),
            Message::ImageLoaded(Ok(image)) => match self.controller.select_image(image) {
                Ok(PreviewJob { selection, image }) => {
                    self.status = None;
                    self.preview_handle = None;
                    Task::perform(
                        acquire::generate_preview(image, self.settings.preview_size),
                        move |preview| Message::PreviewReady(selection, preview),
                    )
                }
                Err(e) => {
                    self.report(e);
                    Task::none()
                }
            },
            Message::ImageLoaded(Err(e)) => {
                self.report(e.into());
                Task::none()
            }
            Message::PreviewReady(selection, preview) => {
                if let Err(e) = self.controller.on_preview_ready(selection, preview) {
                    self.report(e);
                }
                self.refresh_preview();
                Task::none()
            }
            Message::Analyze => match self.controller.request_analysis() {
                Ok(Some(job)) => Task::perform(job.run(), Message::AnalysisFinished),
                Ok(None) => Task::none(),
                Err(e) => {
                    self.report(e);
                    Task::none()
                }
            },
            Message::AnalysisFinished(outcome) => {
                // The controller has already moved to Failed and logged the cause
                if let Err(e) = self.controller.on_backend_result(outcome) {
                    tracing::debug!("Backend result rejected: {}", e);
                }
                Task::none()
            }
            Message::Retry => match self.controller.retry() {
                Ok(()) => self.update(Message::Analyze),
                Err(e) => {
                    self.report(e);
                    Task::none()
                }
            },
            Message::Reset => {
                self.controller.reset();
                self.status = None;
                self.preview_handle = None;
                Task::none()
            }
        }
    }

    /// Surface input errors to the user; phase errors only go to the log
    fn report(&mut self, err: SessionError) {
        match err {
            SessionError::InvalidState { .. } => {}
            other => {
                tracing::warn!("{}", other);
                self.status = Some(other.to_string());
            }
        }
    }

    fn refresh_preview(&mut self) {
        self.preview_handle = self
            .controller
            .session()
            .preview()
            .map(|preview| image::Handle::from_bytes(preview.jpeg.to_vec()));
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let page = match self.tab {
            Tab::Home => ui::home::view(),
            Tab::Analyze => ui::analyze::view(
                self.controller.session(),
                self.preview_handle.as_ref(),
                self.status.as_deref(),
                self.settings.max_image_bytes,
            ),
            Tab::About => ui::about::view(),
        };

        column![
            ui::nav_bar(self.tab),
            scrollable(
                container(page)
                    .padding(40)
                    .width(Length::Fill)
                    .center_x(Length::Fill)
            )
            .height(Length::Fill),
            ui::footer(),
        ]
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

fn main() -> iced::Result {
    init_logging();

    iced::application("CoralSight", CoralSight::update, CoralSight::view)
        .theme(CoralSight::theme)
        .centered()
        .run_with(CoralSight::new)
}
