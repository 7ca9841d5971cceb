use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::view::ReviewView;

use super::{render_controls, scroll_to_show, Palette};

const LINES_PER_ITEM: usize = 3;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = app.review_view();

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let heading = vec![
        Line::from(Span::styled(
            "Review All Your Answers",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(
            "Check all your answers below. Select any question to edit your answer."
                .fg(palette.muted),
        ),
    ];
    frame.render_widget(Paragraph::new(heading), chunks[0]);

    render_items(frame, chunks[1], &view, app.review_cursor(), palette);
    render_submit(frame, chunks[2], &view, palette);
    render_controls(
        frame,
        chunks[3],
        "j/k move  ·  enter edit  ·  s submit  ·  q quit",
        palette,
    );
}

fn render_items(frame: &mut Frame, area: Rect, view: &ReviewView, cursor: usize, palette: &Palette) {
    let mut lines: Vec<Line> = Vec::with_capacity(view.items.len() * LINES_PER_ITEM);

    for (index, item) in view.items.iter().enumerate() {
        let is_cursor = index == cursor;
        let title_style = if is_cursor {
            Style::default().fg(palette.cursor).bold()
        } else {
            Style::default().fg(palette.text).bold()
        };
        let (badge, badge_color) = if item.is_answered() {
            ("✓ Answered", palette.correct)
        } else {
            ("⚠ Not Answered", palette.incorrect)
        };

        lines.push(Line::from(vec![
            Span::styled(if is_cursor { "> " } else { "  " }, title_style),
            Span::styled(format!("{:2}. {}  ", item.number, item.text), title_style),
            Span::styled(badge, Style::default().fg(badge_color)),
        ]));
        lines.push(match item.answer {
            Some(answer) => Line::from(vec![
                Span::styled("      Your answer: ", Style::default().fg(palette.muted)),
                Span::styled(answer, Style::default().fg(palette.accent)),
            ]),
            None => Line::from(""),
        });
        lines.push(Line::from(""));
    }

    let cursor_bottom = cursor * LINES_PER_ITEM + 1;
    let height = area.height.saturating_sub(2);

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.muted)
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll_to_show(cursor_bottom, height), 0));
    frame.render_widget(widget, area);
}

fn render_submit(frame: &mut Frame, area: Rect, view: &ReviewView, palette: &Palette) {
    let mut lines = Vec::with_capacity(2);

    if let Some(warning) = view.warning() {
        lines.push(Line::from(Span::styled(
            warning,
            Style::default().fg(palette.warning).bold(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("[S] {}", view.submit_label()),
        Style::default().fg(palette.correct).bold(),
    )));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
