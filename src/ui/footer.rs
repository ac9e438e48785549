use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Key bar: (key_label, description)
const FKEYS: &[(&str, &str)] = &[
    ("F1", "Help   "),
    ("a", "Add    "),
    ("d", "Remove "),
    ("r", "Restart"),
    ("←→", "Select "),
    ("F10", "Quit "),
];

/// Draw the bottom key bar (black-on-cyan keys, gray descriptions)
pub fn draw_footer(f: &mut Frame, area: Rect) {
    // Full-width dark background first
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(Color::Indexed(234))),
        area,
    );

    let mut spans: Vec<Span> = Vec::new();
    for (key, desc) in FKEYS {
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            desc.to_string(),
            Style::default()
                .fg(Color::Indexed(252))  // light gray
                .bg(Color::Indexed(234)), // very dark gray
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
