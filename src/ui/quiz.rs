use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::view::{Feedback, NextAction, OptionMark, OptionView, QuestionView};

use super::{render_controls, Palette};

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = app.question_view();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], &view, app, palette);
    render_question_text(frame, chunks[1], view.text, palette);

    let cursor = (!view.locked).then(|| app.selected_option());
    render_options(frame, chunks[2], &view.options, cursor, palette);

    if let Some(feedback) = &view.feedback {
        render_feedback(frame, chunks[3], feedback, palette);
    }
    render_controls(frame, chunks[4], &controls_hint(&view), palette);
}

fn render_progress(frame: &mut Frame, area: Rect, view: &QuestionView, app: &App, palette: &Palette) {
    let answered = app.session().answered_count();
    let progress = if view.locked {
        format!("Question {} of {}  ·  submitted", view.number, view.total)
    } else {
        format!(
            "Question {} of {}  ·  {} answered",
            view.number, view.total, answered
        )
    };

    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(palette.muted);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str, palette: &Palette) {
    let widget = Paragraph::new(text.to_string())
        .wrap(Wrap { trim: true })
        .fg(palette.text)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[OptionView],
    cursor: Option<usize>,
    palette: &Palette,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_cursor = cursor == Some(index);
        let style = match option.mark {
            OptionMark::Correct => Style::default().fg(palette.correct).bold(),
            OptionMark::Incorrect => Style::default().fg(palette.incorrect).bold(),
            OptionMark::None if is_cursor => Style::default().fg(palette.cursor).bold(),
            OptionMark::None if option.selected => Style::default().fg(palette.accent).bold(),
            OptionMark::None => Style::default().fg(palette.text),
        };
        let marker = if is_cursor { ">" } else { " " };
        let check = if option.selected { "(*)" } else { "( )" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {} ", marker, check), style),
            Span::styled(format!("{}. ", option.label), style),
            Span::styled(option.text, style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.muted)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback, palette: &Palette) {
    let (text, color) = match feedback {
        Feedback::Correct => ("✓ Correct!".to_string(), palette.correct),
        Feedback::Incorrect { correct_option } => (
            format!("✗ Incorrect! Correct answer: {}", correct_option),
            palette.incorrect,
        ),
        Feedback::NotAnswered => ("Not answered".to_string(), palette.incorrect),
    };

    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .fg(color)
        .bold();
    frame.render_widget(widget, area);
}

fn controls_hint(view: &QuestionView) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if view.locked {
        parts.push("h/l browse");
        parts.push("r results");
    } else {
        parts.push("j/k move  ·  enter or a-d answer");
        if view.can_go_previous {
            parts.push("h prev");
        }
        match view.next {
            NextAction::Next => parts.push("l next"),
            NextAction::ReviewAll => parts.push("l review all"),
            NextAction::Disabled => {}
        }
    }
    parts.push("q quit");

    parts.join("  ·  ")
}
