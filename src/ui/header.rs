use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::config::MAX_KEYS;

use super::truncate_to_width;

pub const HEADER_HEIGHT: u16 = 3;

/// Draw the header:
///
///   CPU Intel(R) Core(TM) i7-8700 (12 threads)            14:02:11
///   key-3 [||||||||||              42.1%]  frame delay 136ms
///   Keys: 3/15   sample 1000ms   delay 20-220ms
pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_identity_line(f, app, rows[0]);
    draw_load_bar(f, app, rows[1]);
    draw_info_line(f, app, rows[2]);
}

fn draw_identity_line(f: &mut Frame, app: &App, area: Rect) {
    let clock = chrono::Local::now().format("%H:%M:%S").to_string();
    let threads = format!(" ({} threads)", app.logical_cores);
    let room = (area.width as usize).saturating_sub(4 + threads.len() + clock.len() + 2);
    let brand = truncate_to_width(&app.cpu_brand, room);

    let used = 4 + unicode_width::UnicodeWidthStr::width(brand.as_str()) + threads.len();
    let pad = (area.width as usize).saturating_sub(used + clock.len());

    let line = Line::from(vec![
        Span::styled("CPU ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(brand, Style::default().fg(Color::White)),
        Span::styled(threads, Style::default().fg(Color::DarkGray)),
        Span::raw(" ".repeat(pad)),
        Span::styled(clock, Style::default().fg(Color::Cyan)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Load bar for the selected key, htop CPU-meter style
fn draw_load_bar(f: &mut Frame, app: &App, area: Rect) {
    let Some(tile) = app.selected() else {
        let hint = Line::from(Span::styled(
            "No keys on the deck - press 'a' to add one",
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(Paragraph::new(hint), area);
        return;
    };

    let usage = app.animator.utilization(&tile.id).unwrap_or(0.0);
    let delay = app.animator.settings().frame_delay.delay_for(usage);
    let label = tile.id.to_string();
    let pct_label = format!("{:>5.1}%", usage);
    let delay_label = format!("  frame delay {}ms", delay.as_millis());

    let prefix_len = label.len() + 1;
    let suffix_len = pct_label.len() + delay_label.len();
    let bracket_len = 2;
    let available = (area.width as usize).saturating_sub(prefix_len + suffix_len + bracket_len);

    let filled = (((usage / 100.0) * available as f64) as usize).min(available);
    let green_portion = (filled as f64 * 0.7) as usize;
    let red_portion = filled.saturating_sub(green_portion);
    let empty = available.saturating_sub(filled);

    let line = Line::from(vec![
        Span::styled(
            format!("{} ", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("[", Style::default().fg(Color::Cyan)),
        Span::styled("|".repeat(green_portion), Style::default().fg(Color::Green)),
        Span::styled("|".repeat(red_portion), Style::default().fg(Color::Red)),
        Span::raw(" ".repeat(empty)),
        Span::styled("]", Style::default().fg(Color::Cyan)),
        Span::styled(pct_label, Style::default().fg(Color::White)),
        Span::styled(delay_label, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let settings = app.animator.settings();
    let mut spans = vec![
        Span::styled("Keys: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}/{}", app.animator.active_count(), MAX_KEYS),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "   sample {}ms   delay {}-{}ms",
                settings.sample_interval.as_millis(),
                settings.frame_delay.min.as_millis(),
                settings.frame_delay.max.as_millis(),
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("   {}", status),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
