use ratatui::{prelude::*, widgets::Tabs};

use crate::app::{App, Focus};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let categories = app.bank().categories();
    let current = app.current_category();
    let focused = app.focus() == Focus::Tabs;

    let titles: Vec<Line> = categories
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let mut style = Style::default().fg(Color::Gray);
            if focused && index == app.tab_cursor() {
                style = style.underlined();
            }
            Line::from(Span::styled(group.name.as_str(), style))
        })
        .collect();

    let selected = current.and_then(|name| categories.iter().position(|g| g.name == name));

    let widget = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).bold())
        .divider(Span::styled("|", Style::default().fg(Color::DarkGray)));
    frame.render_widget(widget, area);
}
