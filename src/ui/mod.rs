/// View layer
///
/// Pure presentation: every function here borrows state and returns an
/// `Element`. Mutation only happens through `Message`s handled in `main.rs`.

pub mod about;
pub mod analyze;
pub mod home;
pub mod palette;

use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Theme};

use crate::Message;

/// Top-level navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Analyze,
    About,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Analyze, Tab::About];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Analyze => "Analyze",
            Tab::About => "About",
        }
    }
}

/// Navigation bar with the app name and one button per tab
pub fn nav_bar<'a>(active: Tab) -> Element<'a, Message> {
    let tabs = Tab::ALL.into_iter().fold(row![].spacing(12), |tabs, tab| {
        let style: fn(&Theme, button::Status) -> button::Style = if tab == active {
            button::primary
        } else {
            button::text
        };
        tabs.push(
            button(text(tab.title()))
                .on_press(Message::TabSelected(tab))
                .padding([8, 16])
                .style(style),
        )
    });

    container(
        row![
            text("CoralSight").size(24).color(palette::ACCENT),
            horizontal_space(),
            tabs,
        ]
        .align_y(Alignment::Center),
    )
    .padding([16, 24])
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

pub fn footer<'a>() -> Element<'a, Message> {
    container(text("© 2025 CoralSight - Final Year Project").size(14).color(palette::MUTED))
        .padding(16)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}
