use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::scoring::Outcome;
use crate::view::{ResultItem, ResultsView};

use super::{render_controls, Palette};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(view) = app.results_view() else {
        return;
    };
    let grade_color = get_grade_color(view.percentage, palette);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], &view, grade_color, palette);
    render_question_breakdown(frame, chunks[2], &view.items, app.result_scroll(), palette);
    render_controls(
        frame,
        chunks[3],
        "j/k scroll  ·  b browse answers  ·  r restart  ·  q quit",
        palette,
    );
}

fn get_grade_color(percentage: u32, palette: &Palette) -> Color {
    match percentage {
        80..=100 => palette.correct,
        60..=79 => palette.accent,
        40..=59 => palette.cursor,
        _ => palette.incorrect,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    view: &ResultsView,
    grade_color: Color,
    palette: &Palette,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({}%)",
                view.score.correct, view.score.total, view.percentage
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(view.message, Style::default().fg(palette.text))),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(palette.muted),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    items: &[ResultItem],
    scroll: usize,
    palette: &Palette,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(items.len() * 3);

    for item in items {
        let (symbol, color) = match item.outcome {
            Outcome::Correct => ("+", palette.correct),
            Outcome::Incorrect(_) => ("-", palette.incorrect),
            Outcome::Unanswered => ("?", palette.incorrect),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", item.number),
                Style::default().fg(palette.muted),
            ),
            Span::styled(truncate_question(item.text), Style::default().fg(palette.text)),
        ]));

        let your_answer = item.your_answer.unwrap_or("Not answered");
        let mut detail = vec![
            Span::styled("       Your answer: ", Style::default().fg(palette.muted)),
            Span::styled(your_answer, Style::default().fg(color)),
        ];
        if !item.outcome.is_correct() {
            detail.push(Span::styled("  ·  Correct: ", Style::default().fg(palette.muted)));
            detail.push(Span::styled(
                item.correct_answer,
                Style::default().fg(palette.correct),
            ));
        }
        lines.push(Line::from(detail));
    }

    // Each item takes two lines; scroll by whole items.
    let offset = (scroll * 2).min(usize::from(u16::MAX)) as u16;

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((offset, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
