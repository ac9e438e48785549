use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    app.status = None;

    if app.show_help {
        // Any key closes help, quit keys still quit
        app.show_help = false;
        if !is_quit(&key) {
            return;
        }
    }

    if is_quit(&key) {
        app.should_quit = true;
        return;
    }

    match key.code {
        // ── Deck lifecycle ──
        KeyCode::Char('a') | KeyCode::Char('+') | KeyCode::Insert => {
            app.add_key();
        }
        KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
            app.remove_selected();
        }
        KeyCode::Char('r') => app.restart_selected(),

        // ── Navigation ──
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Home => app.selected_index = 0,
        KeyCode::End => {
            app.selected_index = app.tiles.len().saturating_sub(1);
        }

        KeyCode::F(1) | KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
