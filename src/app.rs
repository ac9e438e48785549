use std::sync::Arc;

use sysinfo::System;

use crate::animator::{InstanceId, LoadAnimator};
use crate::config::MAX_KEYS;
use crate::surface::TileSurface;

/// Keys per row on the preview grid (Stream Deck MK.2 layout)
pub const KEYS_PER_ROW: usize = 5;

/// One visible key on the preview deck
pub struct Tile {
    pub id: InstanceId,
    pub surface: Arc<TileSurface>,
}

/// Terminal preview state: the deck, its selection, and the animator
/// driving every key.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,

    pub animator: LoadAnimator,
    pub tiles: Vec<Tile>,
    pub selected_index: usize,
    next_key: u64,

    // Host CPU identity for the header
    pub cpu_brand: String,
    pub logical_cores: usize,

    /// One-line message shown in the header until the next key press
    pub status: Option<String>,
}

impl App {
    pub fn new(animator: LoadAnimator) -> Self {
        let (cpu_brand, logical_cores) = cpu_identity();
        Self {
            should_quit: false,
            show_help: false,
            animator,
            tiles: Vec::new(),
            selected_index: 0,
            next_key: 1,
            cpu_brand,
            logical_cores,
            status: None,
        }
    }

    /// Put a new key on the deck and start animating it.
    pub fn add_key(&mut self) -> Option<InstanceId> {
        if self.tiles.len() >= MAX_KEYS {
            self.status = Some(format!("Deck is full ({} keys)", MAX_KEYS));
            return None;
        }

        let id = InstanceId::new(format!("key-{}", self.next_key));
        self.next_key += 1;

        let surface = Arc::new(TileSurface::new());
        self.animator.on_appear(id.clone(), surface.clone());
        self.tiles.push(Tile {
            id: id.clone(),
            surface,
        });
        self.selected_index = self.tiles.len() - 1;
        Some(id)
    }

    /// Take the selected key off the deck
    pub fn remove_selected(&mut self) -> Option<InstanceId> {
        if self.selected_index >= self.tiles.len() {
            return None;
        }
        let tile = self.tiles.remove(self.selected_index);
        self.animator.on_disappear(&tile.id);
        self.clamp_selection();
        Some(tile.id)
    }

    /// Appear the selected key again on the same id (fresh sample, frame 0)
    pub fn restart_selected(&mut self) {
        if let Some(tile) = self.tiles.get(self.selected_index) {
            self.animator.on_appear(tile.id.clone(), tile.surface.clone());
            self.status = Some(format!("Restarted {}", tile.id));
        }
    }

    pub fn selected(&self) -> Option<&Tile> {
        self.tiles.get(self.selected_index)
    }

    pub fn selected_utilization(&self) -> Option<f64> {
        self.selected().and_then(|t| self.animator.utilization(&t.id))
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.tiles.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected_index + KEYS_PER_ROW < self.tiles.len() {
            self.selected_index += KEYS_PER_ROW;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected_index >= KEYS_PER_ROW {
            self.selected_index -= KEYS_PER_ROW;
        }
    }

    pub fn clamp_selection(&mut self) {
        if self.tiles.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.tiles.len() {
            self.selected_index = self.tiles.len() - 1;
        }
    }

    /// Stop every key (before leaving the preview)
    pub fn shutdown(&mut self) {
        self.tiles.clear();
        self.animator.shutdown();
    }
}

/// CPU brand string and logical core count, via sysinfo
fn cpu_identity() -> (String, usize) {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    let cpus = sys.cpus();
    let brand = cpus
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "Unknown CPU".to_string());
    (brand, cpus.len())
}
