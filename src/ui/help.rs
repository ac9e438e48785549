use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " cpu-partyparrot - CPU usage keys, previewed in your terminal ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Each key samples CPU ticks once per interval and shows the load"),
        Line::from("  as its title. The parrot dances faster the busier the CPU is."),
        Line::from(""),
        section(" Deck "),
        Line::from("  a/+/Ins     Add a key (appear)"),
        Line::from("  d/-/Del     Remove selected key (disappear)"),
        Line::from("  r           Restart selected key"),
        Line::from(""),
        section(" Navigation "),
        Line::from("  ←/→/h/l     Previous/next key"),
        Line::from("  ↑/↓/k/j     Row up/down"),
        Line::from("  Home/End    First/last key"),
        Line::from(""),
        section(" Other "),
        Line::from("  F1/?        Show this help"),
        Line::from("  F10/q       Quit"),
        Line::from("  Ctrl+C      Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Create a centered rectangle with percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
