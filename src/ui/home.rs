use iced::widget::{button, column, text};
use iced::{Alignment, Element};

use super::{palette, Tab};
use crate::Message;

/// Landing screen
pub fn view<'a>() -> Element<'a, Message> {
    column![
        text("CoralSight").size(48),
        text("AI-Powered Coral Reef Health Assessment")
            .size(20)
            .color(palette::ACCENT),
        text("Upload coral reef images and get instant health assessments using our AI model")
            .color(palette::MUTED),
        button(text("Start Analysis").size(18))
            .on_press(Message::TabSelected(Tab::Analyze))
            .padding([14, 32]),
    ]
    .spacing(16)
    .padding(40)
    .align_x(Alignment::Center)
    .into()
}
