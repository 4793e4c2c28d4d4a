//! Rendering for the watcher

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Outcome table
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_table(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.snapshot.as_ref().map(|s| s.outcomes.len()).unwrap_or(0);
    let header = Paragraph::new(format!(" Outcomes: {}", count))
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title(" Who is Satoshi? "));
    frame.render_widget(header, area);
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Odds ");

    let Some(snapshot) = &app.snapshot else {
        let waiting = Paragraph::new(" Waiting for first fetch...").block(block);
        frame.render_widget(waiting, area);
        return;
    };

    let rows: Vec<Row> = snapshot
        .outcomes
        .iter()
        .map(|o| Row::new(vec![o.name.clone(), o.display_probability()]))
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
        .header(
            Row::new(vec!["Name", "Probability"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(block);

    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match (&app.last_error, &app.snapshot) {
        (Some(err), _) => (format!(" {} | q=quit", err), Color::Yellow),
        (None, Some(snapshot)) => {
            let local = snapshot.fetched_at.with_timezone(&chrono::Local);
            (format!(" updated {} | q=quit", local.format("%H:%M:%S")), Color::White)
        }
        (None, None) => (" q=quit".to_string(), Color::White),
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(footer, area);
}
