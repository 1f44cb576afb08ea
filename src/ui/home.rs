use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::quiz::Filter;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0]);
    render_cards(frame, chunks[1], app);
    render_controls(frame, chunks[2]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "英語クイズ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("分野を選んでください".fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), area);
}

fn render_cards(frame: &mut Frame, area: Rect, app: &App) {
    let cursor = app.home_cursor();
    let mut lines: Vec<Line> = Vec::new();
    let mut in_subcategories = false;

    for (index, entry) in app.home_entries().iter().enumerate() {
        if matches!(entry.filter, Filter::Subcategory(_)) && !in_subcategories {
            in_subcategories = true;
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "サブカテゴリ",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let is_selected = index == cursor;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let indent = if in_subcategories { "  " } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {}", marker, indent), style),
            Span::styled(entry.filter.label().to_string(), style),
            Span::styled(
                format!("  {}問", entry.count),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "問題がありません。",
            Style::default().fg(Color::Yellow),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k 移動  ·  enter 開始  ·  q 終了")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
