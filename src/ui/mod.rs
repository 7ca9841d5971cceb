mod quiz;
mod resume;
mod result;
mod review;

use chrono::Utc;
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, AppState};
use crate::models::Theme;

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub cursor: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub warning: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                cursor: Color::Yellow,
                correct: Color::Green,
                incorrect: Color::Red,
                warning: Color::LightRed,
            },
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                cursor: Color::Magenta,
                correct: Color::Green,
                incorrect: Color::Red,
                warning: Color::Red,
            },
        }
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.preferences().theme);
    let area = frame.area();
    frame.render_widget(Block::default().bg(palette.background), area);

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)])
        .horizontal_margin(1)
        .split(area);

    render_header(frame, chunks[0], app, &palette);

    match app.state() {
        AppState::ResumePrompt => resume::render(frame, chunks[1], app, &palette),
        AppState::Quiz => quiz::render(frame, chunks[1], app, &palette),
        AppState::Review => review::render(frame, chunks[1], app, &palette),
        AppState::Results => result::render(frame, chunks[1], app, &palette),
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let title = Line::from(vec![
        Span::styled("WEB DEV QUIZ", Style::default().fg(palette.accent).bold()),
        Span::styled(format!("  ·  {}", app.username()), Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);

    if app.preferences().show_timer && app.state() != AppState::ResumePrompt {
        let seconds = app.elapsed(Utc::now()).num_seconds();
        let timer = format!("{:02}:{:02}", seconds / 60, seconds % 60);
        let widget = Paragraph::new(timer)
            .alignment(Alignment::Right)
            .fg(palette.muted);
        frame.render_widget(widget, area);
    }
}

/// Centered one-line hint at the bottom of a screen.
fn render_controls(frame: &mut Frame, area: Rect, text: &str, palette: &Palette) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .fg(palette.muted);
    frame.render_widget(widget, area);
}

/// Scroll offset that keeps `line` visible in a viewport of `height` rows.
fn scroll_to_show(line: usize, height: u16) -> u16 {
    let height = usize::from(height.max(1));
    line.saturating_sub(height - 1).min(usize::from(u16::MAX)) as u16
}
