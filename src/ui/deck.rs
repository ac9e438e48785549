use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::animation::FRAME_COUNT;
use crate::app::{App, Tile, KEYS_PER_ROW};

use super::truncate_to_width;

pub const TILE_WIDTH: u16 = 16;
pub const TILE_HEIGHT: u16 = 8;

/// Party parrot tint for each frame of the loop
const PARROT_COLORS: [Color; FRAME_COUNT] = [
    Color::Rgb(255, 141, 139),
    Color::Rgb(254, 214, 137),
    Color::Rgb(136, 255, 137),
    Color::Rgb(135, 255, 255),
    Color::Rgb(139, 181, 254),
    Color::Rgb(215, 140, 255),
    Color::Rgb(255, 140, 255),
    Color::Rgb(255, 104, 247),
    Color::Rgb(254, 108, 183),
    Color::Rgb(255, 105, 104),
];

/// Horizontal head bob per frame
const PARROT_SWAY: [usize; FRAME_COUNT] = [0, 1, 2, 3, 2, 1, 0, 1, 2, 1];

const PARROT: [&str; 5] = [
    "  ▄███▄ ",
    " ██ ●██▄",
    " ███████",
    "  █████ ",
    "   ▀ ▀  ",
];

/// Draw every tile of the deck, `KEYS_PER_ROW` to a row
pub fn draw_deck(f: &mut Frame, app: &App, area: Rect) {
    if app.tiles.is_empty() {
        let msg = Paragraph::new("Empty deck. Press 'a' to add a CPU key.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, area);
        return;
    }

    for (i, tile) in app.tiles.iter().enumerate() {
        let Some(rect) = tile_rect(area, i) else {
            continue; // does not fit in this terminal
        };
        draw_tile(f, app, tile, rect, i == app.selected_index);
    }
}

/// Position of tile `index` inside `area`, or None if it would be clipped
pub fn tile_rect(area: Rect, index: usize) -> Option<Rect> {
    let col = (index % KEYS_PER_ROW) as u16;
    let row = (index / KEYS_PER_ROW) as u16;
    let x = col * TILE_WIDTH;
    let y = row * TILE_HEIGHT;
    if x + TILE_WIDTH > area.width || y + TILE_HEIGHT > area.height {
        return None;
    }
    Some(Rect {
        x: area.x + x,
        y: area.y + y,
        width: TILE_WIDTH,
        height: TILE_HEIGHT,
    })
}

fn draw_tile(f: &mut Frame, app: &App, tile: &Tile, area: Rect, selected: bool) {
    let face = tile.surface.face();
    let frame = tile.surface.frame_index(app.animator.frames());

    let (tint, sway) = match frame {
        Some(i) => (PARROT_COLORS[i % FRAME_COUNT], PARROT_SWAY[i % FRAME_COUNT]),
        None => (Color::DarkGray, 0),
    };

    let mut lines: Vec<Line> = PARROT
        .iter()
        .map(|row| {
            Line::from(Span::styled(
                format!("{}{}", " ".repeat(sway), row),
                Style::default().fg(tint),
            ))
        })
        .collect();

    let inner_width = TILE_WIDTH.saturating_sub(2) as usize;
    let title = if face.title.is_empty() { "--.-%" } else { face.title.as_str() };
    lines.push(Line::from(Span::styled(
        truncate_to_width(title, inner_width),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));

    let border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Indexed(240))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!(" {} ", tile.id), border));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));
    f.render_widget(paragraph, area);
}
