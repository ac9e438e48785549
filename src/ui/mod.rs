pub mod deck;
pub mod footer;
pub mod header;
pub mod help;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use unicode_width::UnicodeWidthChar;

use crate::app::App;

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEADER_HEIGHT), // CPU identity + load bar
            Constraint::Min(deck::TILE_HEIGHT),        // key grid
            Constraint::Length(1),                     // footer (key bar)
        ])
        .split(size);

    header::draw_header(f, app, chunks[0]);
    deck::draw_deck(f, app, chunks[1]);
    footer::draw_footer(f, chunks[2]);

    if app.show_help {
        help::draw_help(f);
    }
}

/// Cut `s` to at most `max` terminal columns, marking the cut with '…'
pub fn truncate_to_width(s: &str, max: usize) -> String {
    let full: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if full <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_untouched() {
        assert_eq!(truncate_to_width("42.0%", 14), "42.0%");
        assert_eq!(truncate_to_width("", 0), "");
    }

    #[test]
    fn long_strings_end_with_ellipsis() {
        assert_eq!(truncate_to_width("AMD Ryzen 9 7950X", 8), "AMD Ryz…");
    }

    #[test]
    fn wide_characters_count_double() {
        // each CJK char is two columns
        assert_eq!(truncate_to_width("鸚鵡鸚鵡", 5), "鸚鵡…");
    }
}
