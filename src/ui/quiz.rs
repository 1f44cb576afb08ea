use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::quiz::{
    CardView, ChoiceMark, EMPTY_MESSAGE, Explanation, QuestionCard, Verdict, next_label,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    match app.card() {
        CardView::Empty => render_empty(frame, area),
        CardView::Question(card) => render_card(frame, area, app, &card),
    }
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Fill(1), Constraint::Length(1)])
        .split(area);

    let widget = Paragraph::new(EMPTY_MESSAGE)
        .alignment(Alignment::Center)
        .fg(Color::Yellow)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, chunks[0]);
    render_controls(frame, chunks[2], "h トップに戻る  ·  q 終了");
}

fn render_card(frame: &mut Frame, area: Rect, app: &App, card: &QuestionCard) {
    let option_height = card.choices.len() as u16 + 2;
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(option_height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_heading(frame, chunks[0], card);
    render_prompt(frame, chunks[1], &card.prompt);
    render_options(frame, chunks[2], card, app.focus() == Focus::Options);
    render_feedback(frame, chunks[3], app);

    let controls = if app.focus() == Focus::Tabs {
        "←/→ 分野  ·  enter 切り替え  ·  esc 戻る"
    } else if card.locked {
        "enter 次へ  ·  h トップに戻る  ·  q 終了"
    } else if app.tabs_visible() {
        "j/k 選択  ·  space 決定  ·  c 答え合わせ  ·  tab 分野  ·  h トップ  ·  q 終了"
    } else {
        "j/k 選択  ·  space 決定  ·  c 答え合わせ  ·  h トップ  ·  q 終了"
    };
    render_controls(frame, chunks[4], controls);
}

fn render_heading(frame: &mut Frame, area: Rect, card: &QuestionCard) {
    let line = Line::from(vec![
        Span::styled(card.heading.as_str(), Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("   {}", card.progress.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_prompt(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, card: &QuestionCard, group_focused: bool) {
    let lines: Vec<Line> = card
        .choices
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let style = match choice.mark {
                ChoiceMark::Correct => Style::default().fg(Color::Green).bold(),
                ChoiceMark::Incorrect => Style::default().fg(Color::Red).bold(),
                ChoiceMark::Unmarked if choice.selected => Style::default().fg(Color::Yellow).bold(),
                ChoiceMark::Unmarked => Style::default().fg(Color::Gray),
            };
            let marker = if choice.focused && group_focused && !card.locked {
                ">"
            } else {
                " "
            };
            let radio = if choice.selected { "(●)" } else { "( )" };
            let suffix = match choice.mark {
                ChoiceMark::Correct => " ✓",
                ChoiceMark::Incorrect => " ✗",
                ChoiceMark::Unmarked => "",
            };

            Line::from(vec![
                Span::styled(format!("{} {} ", marker, radio), style),
                Span::styled(format!("{}. ", index + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(choice.text.as_str(), style),
                Span::styled(suffix, style),
            ])
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .padding(Padding::horizontal(1));
    if card.locked {
        block = block.title(Line::from(" 回答済み ").fg(Color::DarkGray));
    }

    let widget = Paragraph::new(lines).block(block);
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(notice) = app.notice() {
        lines.push(Line::from(Span::styled(
            notice,
            Style::default().fg(Color::Magenta).bold(),
        )));
    }

    if let (Some(submission), Some(explanation)) = (app.submission(), app.explanation()) {
        lines.extend(explanation_lines(explanation));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[enter] {}", next_label(submission)),
            Style::default().fg(Color::Cyan).bold(),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn explanation_lines(explanation: &Explanation) -> Vec<Line<'_>> {
    let verdict_style = match explanation.verdict {
        Verdict::Correct => Style::default().fg(Color::Green).bold(),
        Verdict::Incorrect { .. } => Style::default().fg(Color::Red).bold(),
    };

    let mut lines = vec![
        Line::from(Span::styled(explanation.verdict.message(), verdict_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled("日本語訳： ", Style::default().fg(Color::DarkGray).bold()),
            Span::styled(explanation.translation.as_str(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            "各選択肢の意味：",
            Style::default().fg(Color::DarkGray).bold(),
        )),
    ];

    for gloss in &explanation.glosses {
        let mut spans = vec![
            Span::styled("  • ", Style::default().fg(Color::DarkGray)),
            Span::styled(gloss.choice.as_str(), Style::default().fg(Color::White).bold()),
            Span::styled(
                format!(" — {}", gloss.gloss),
                Style::default().fg(Color::Gray),
            ),
        ];
        if let Some(badge) = gloss.badge() {
            let color = if gloss.is_correct { Color::Green } else { Color::Red };
            spans.push(Span::styled(
                format!(" {}", badge),
                Style::default().fg(color).bold(),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
