//! Placeholder shown while an issue is being fetched and decoded

use iced::widget::{column, container, row, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Theme};

const PAGE_WIDTH: f32 = 600.0;
const BLOCK: Color = Color::from_rgb(0.898, 0.906, 0.922);
const BANNER: Color = Color::from_rgb(0.820, 0.835, 0.859);

fn block<'a, Message: 'a>(width: f32, height: f32, color: Color) -> Element<'a, Message> {
    container(Space::new(Length::Fixed(width), Length::Fixed(height)))
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius: 4.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
}

/// Prev / page label / next, greyed out until the issue is ready
fn page_nav<'a, Message: 'a>() -> Element<'a, Message> {
    row![
        block(80.0, 32.0, BLOCK),
        block(96.0, 16.0, BLOCK),
        block(80.0, 32.0, BLOCK),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
    .into()
}

/// A page silhouette (masthead, a few paragraphs of text lines, footer)
/// above the page navigation bar
pub fn view<'a, Message: 'a>() -> Element<'a, Message> {
    let paragraphs = (0..5).fold(column![].spacing(24), |page, _| {
        page.push(
            column![
                block(PAGE_WIDTH * 0.75, 14.0, BLOCK),
                block(PAGE_WIDTH * 0.5, 14.0, BLOCK),
                block(PAGE_WIDTH * 0.83, 14.0, BLOCK),
            ]
            .spacing(10),
        )
    });

    let page = container(
        column![
            block(PAGE_WIDTH, 48.0, BANNER),
            container(paragraphs).padding(32),
            block(PAGE_WIDTH, 32.0, BANNER),
        ]
        .spacing(8),
    )
    .style(|_theme: &Theme| container::Style {
        background: Some(Background::Color(Color::WHITE)),
        ..container::Style::default()
    });

    container(
        column![text("Loading newspaper...").size(16), page, page_nav()]
            .spacing(16)
            .align_x(Alignment::Center),
    )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .padding(32)
        .into()
}
