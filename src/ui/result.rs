use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::{App, Focus};
use crate::quiz::{AnswerStatus, ResultRow, Score};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.score();
    let grade_color = get_grade_color(score.percentage());

    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_score_summary(frame, chunks[0], score, grade_color);
    render_table(frame, chunks[1], &app.rows(), app.result_cursor());
    render_notice(frame, chunks[2], app.notice());
    render_controls(frame, chunks[3], app);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: Score, grade_color: Color) {
    let content = vec![
        Line::from(Span::styled("結果", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(vec![
            Span::styled("あなたのスコア: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}  ({:.0}%)", score, score.percentage()),
                Style::default().fg(grade_color).bold(),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn status_color(status: AnswerStatus) -> Color {
    match status {
        AnswerStatus::Correct => Color::Green,
        AnswerStatus::Incorrect => Color::Red,
        AnswerStatus::Unanswered => Color::DarkGray,
    }
}

fn render_table(frame: &mut Frame, area: Rect, rows: &[ResultRow], cursor: usize) {
    let header = Row::new(vec!["問題", "正誤", "確認する"])
        .style(Style::default().fg(Color::Cyan).bold());

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(format!("{:2}", row.ordinal())),
                Cell::from(row.status.label()).style(Style::default().fg(status_color(row.status))),
                Cell::from("[確認する]").style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(
        body,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray).bold())
    .highlight_symbol("> ")
    .block(Block::default().borders(Borders::ALL).border_style(Color::DarkGray));

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(cursor.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    if let Some(notice) = notice {
        let widget = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .fg(Color::Magenta);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let text = if app.focus() == Focus::Tabs {
        "←/→ 分野  ·  enter 切り替え  ·  esc 戻る"
    } else if app.tabs_visible() {
        "j/k 選択  ·  enter 確認する  ·  w 間違いを復習  ·  r やり直す  ·  tab 分野  ·  h トップ  ·  q 終了"
    } else {
        "j/k 選択  ·  enter 確認する  ·  w 間違いを復習  ·  r 最初からやり直す  ·  h トップ  ·  q 終了"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
