//! State shared between the windowing layer and the renderer.
//!
//! The windowing side picks what to show, hands over the overlay label pixels
//! and listens for the finish request. The renderer reads the selection, takes
//! the label once and raises the finish request from the back button. All of
//! it lives in one [`PlatformState`] shared through an `Arc`, so there is no
//! process-wide global.
//!
//! # Key types
//!
//! - [`Selection`] is the active example or level scene
//! - [`LabelBitmap`] is an RGBA8 pixel buffer waiting to become the overlay texture
//! - [`ButtonRect`] is the back button's screen-space hit area

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

/// Example index of the base scene.
pub const BASE_EXAMPLE: i32 = 0;
/// Scene index meaning "no level scene".
pub const NO_SCENE: i32 = -1;
/// Scene index of the tile level.
pub const LEVEL_SCENE: i32 = 0;

/// Which scene is active. Setting one index resets the other, so at most one
/// of the two is ever in use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    example_index: i32,
    scene_index: i32,
}

impl Default for Selection {
    fn default() -> Self {
        Self::example(BASE_EXAMPLE)
    }
}

impl Selection {
    pub fn example(index: i32) -> Self {
        Self {
            example_index: index,
            scene_index: NO_SCENE,
        }
    }

    pub fn scene(index: i32) -> Self {
        Self {
            example_index: BASE_EXAMPLE,
            scene_index: index,
        }
    }

    pub fn example_index(&self) -> i32 {
        self.example_index
    }

    pub fn scene_index(&self) -> i32 {
        self.scene_index
    }

    /// Whether a numbered example or a level scene is on screen, i.e. whether
    /// the back button is shown.
    pub fn has_back_button(&self) -> bool {
        self.example_index >= 1 || self.scene_index >= 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("label size {width}x{height} is empty")]
    EmptySize { width: u32, height: u32 },
    #[error("label of {width}x{height} needs {expected} bytes, got {actual}")]
    ShortBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Tightly packed RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl LabelBitmap {
    /// Validates the size and keeps exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, mut pixels: Vec<u8>) -> Result<Self, LabelError> {
        if width == 0 || height == 0 {
            return Err(LabelError::EmptySize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() < expected {
            return Err(LabelError::ShortBuffer {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        pixels.truncate(expected);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// A rectangle in window pixels, origin top-left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ButtonRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ButtonRect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Edges count as inside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// The back button, anchored to the top-left corner.
pub const BACK_BUTTON: ButtonRect = ButtonRect {
    left: 20.0,
    top: 20.0,
    width: 200.0,
    height: 56.0,
};

/// Selection, pending label and finish flag of one running app.
#[derive(Debug, Default)]
pub struct PlatformState {
    selection: Mutex<Selection>,
    pending_label: Mutex<Option<LabelBitmap>>,
    finish_requested: AtomicBool,
}

impl PlatformState {
    pub fn new(selection: Selection) -> Arc<Self> {
        Arc::new(Self {
            selection: Mutex::new(selection),
            ..Default::default()
        })
    }

    pub fn selection(&self) -> Selection {
        *lock(&self.selection)
    }

    /// Selects an example and leaves level scenes.
    pub fn set_example_index(&self, index: i32) {
        *lock(&self.selection) = Selection::example(index);
    }

    /// Selects a level scene and resets the example to the base scene.
    pub fn set_scene_index(&self, index: i32) {
        *lock(&self.selection) = Selection::scene(index);
    }

    /// Stores a label for the overlay, dropping any label not yet taken.
    pub fn set_pending(&self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), LabelError> {
        let bitmap = LabelBitmap::new(width, height, pixels)?;
        *lock(&self.pending_label) = Some(bitmap);
        Ok(())
    }

    /// Takes the pending label, leaving the slot empty.
    pub fn try_take_pending(&self) -> Option<LabelBitmap> {
        lock(&self.pending_label).take()
    }

    pub fn clear_pending(&self) {
        lock(&self.pending_label).take();
    }

    pub fn request_finish(&self) {
        log::info!("Finish requested");
        self.finish_requested.store(true, Ordering::SeqCst);
    }

    pub fn finish_requested(&self) -> bool {
        self.finish_requested.load(Ordering::SeqCst)
    }

    /// Reads and resets the finish flag.
    pub fn take_finish_request(&self) -> bool {
        self.finish_requested.swap(false, Ordering::SeqCst)
    }

    /// Handles a pointer-down at window pixel `(x, y)`. Returns `true` when it
    /// hit the back button and raised the finish request.
    pub fn pointer_down(&self, x: f32, y: f32) -> bool {
        if !self.selection().has_back_button() || !BACK_BUTTON.contains(x, y) {
            return false;
        }
        self.request_finish();
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // a poisoned lock still guards a whole value
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
