mod home;
mod quiz;
mod result;
mod tabs;

use ratatui::{
    prelude::*,
    widgets::{Block, Gauge},
};

use crate::app::App;
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    if app.state == AppState::Home {
        home::render(frame, area, app);
        return;
    }

    let tabs_height = if app.tabs_visible() { 1 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Length(tabs_height),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .margin(1)
    .split(area);

    if app.tabs_visible() {
        tabs::render(frame, chunks[0], app);
    }
    render_progress_bar(frame, chunks[1], app);

    match app.state {
        AppState::Quiz => quiz::render(frame, chunks[2], app),
        AppState::Result => result::render(frame, chunks[2], app),
        AppState::Home => {}
    }
}

fn render_progress_bar(frame: &mut Frame, area: Rect, app: &App) {
    let fill = app.fill();
    let widget = Gauge::default()
        .ratio(fill.ratio())
        .label(format!("{}%", fill.percent()))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray));
    frame.render_widget(widget, area);
}
