/// About screen: what the tool does and the categories it reports
use iced::widget::{column, container, text};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::palette;
use crate::state::HealthStatus;
use crate::Message;

const FEATURES: [&str; 4] = [
    "Works with any inference service you configure",
    "Pre-trained CNN model for accurate assessment",
    "Images are only sent to the endpoint in your settings",
    "Accessible to researchers, conservationists, and students",
];

pub fn view<'a>() -> Element<'a, Message> {
    let categories: Vec<Element<'a, Message>> = HealthStatus::ALL
        .into_iter()
        .map(|status| {
            container(
                column![
                    text(status.as_str()).color(palette::status_color(status)),
                    text(status.summary()).size(14).color(palette::MUTED),
                ]
                .spacing(4),
            )
            .padding(16)
            .width(Length::Fixed(260.0))
            .style(container::bordered_box)
            .into()
        })
        .collect();

    let features = FEATURES
        .into_iter()
        .fold(column![].spacing(8), |list, feature| {
            list.push(text(format!("• {}", feature)).color(palette::MUTED))
        });

    column![
        text("About CoralSight").size(32),
        section("What is CoralSight?"),
        text(
            "CoralSight automates coral reef health assessment. A convolutional \
             neural network analyses reef images and reports their health status."
        )
        .color(palette::MUTED),
        section("Classification Categories"),
        Wrap::with_elements(categories).spacing(16.0).line_spacing(16.0),
        section("Key Features"),
        features,
    ]
    .spacing(16)
    .max_width(900)
    .into()
}

fn section<'a>(title: &'a str) -> Element<'a, Message> {
    text(title).size(20).color(palette::ACCENT).into()
}
