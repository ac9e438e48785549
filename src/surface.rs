//! What a key instance can do to its display: set a title and set an image.

use parking_lot::Mutex;

use crate::animation::FrameSequence;

/// Per-instance display capability handed to the animator on appear.
pub trait ActionSurface: Send + Sync {
    fn set_title(&self, title: &str);
    fn set_image(&self, image: &str);
}

/// Last values pushed to a tile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileFace {
    pub title: String,
    pub image: String,
    pub frames_shown: u64,
}

/// Surface backing one tile of the terminal preview.
#[derive(Debug, Default)]
pub struct TileSurface {
    face: Mutex<TileFace>,
}

impl TileSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face(&self) -> TileFace {
        self.face.lock().clone()
    }

    /// Frame index of the current image, if it belongs to `frames`
    pub fn frame_index(&self, frames: &FrameSequence) -> Option<usize> {
        frames.position(&self.face.lock().image)
    }
}

impl ActionSurface for TileSurface {
    fn set_title(&self, title: &str) {
        self.face.lock().title = title.to_string();
    }

    fn set_image(&self, image: &str) {
        let mut face = self.face.lock();
        face.image = image.to_string();
        face.frames_shown += 1;
    }
}

/// Headless surface: titles go to the log, images only at trace level.
#[derive(Debug)]
pub struct LogSurface {
    instance: String,
}

impl LogSurface {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }
}

impl ActionSurface for LogSurface {
    fn set_title(&self, title: &str) {
        tracing::info!(instance = %self.instance, %title, "title");
    }

    fn set_image(&self, image: &str) {
        tracing::trace!(instance = %self.instance, %image, "image");
    }
}
