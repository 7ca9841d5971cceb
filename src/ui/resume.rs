use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

use super::Palette;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(snapshot) = app.pending_resume() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Fill(1),
    ])
    .split(area);

    let answered = snapshot.user_answers.iter().filter(|a| a.is_some()).count();
    let details = format!(
        "{} of {} answered · on question {}",
        answered,
        snapshot.questions_total,
        snapshot.current_question_index + 1
    );

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ IN PROGRESS",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from("You have a saved quiz in progress.".fg(palette.text)),
        Line::from(details.fg(palette.muted)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Y", Style::default().fg(palette.correct).bold()),
            Span::styled(" resume  ·  ", Style::default().fg(palette.muted)),
            Span::styled("N", Style::default().fg(palette.incorrect).bold()),
            Span::styled(" start over", Style::default().fg(palette.muted)),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.muted),
    );

    frame.render_widget(widget, chunks[1]);
}
