//! Presentation-grid view model: maps the session pool onto a fixed N×N
//! array of slots and holds the operator's local transport controls.
//!
//! Rendering itself belongs to the UI layer; this module only decides what
//! occupies each slot. Releasing a departed session's media resources is the
//! external realtime library's lifecycle — a session that leaves the pool
//! simply stops being rendered.

use serde::{Deserialize, Serialize};

use crate::models::SessionConnection;

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 7;

/// Grid side length, clamped to the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize(usize);

impl GridSize {
    pub fn new(size: usize) -> Self {
        Self(size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    pub fn slot_count(&self) -> usize {
        self.0 * self.0
    }

    pub fn enlarged(&self) -> Self {
        Self::new(self.0 + 1)
    }

    pub fn shrunk(&self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(MIN_GRID_SIZE)
    }
}

/// One tile of the grid: a live session or a stable placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum GridSlot {
    Live {
        index: usize,
        session: SessionConnection,
    },
    Empty {
        index: usize,
    },
}

impl GridSlot {
    pub fn is_live(&self) -> bool {
        matches!(self, GridSlot::Live { .. })
    }

    pub fn index(&self) -> usize {
        match self {
            GridSlot::Live { index, .. } | GridSlot::Empty { index } => *index,
        }
    }
}

/// Slot layout and focus state for the tiled call grid.
///
/// Slot assignment is positional: the Nth session in pool order occupies the
/// Nth slot. Sessions beyond slot capacity stay connected and unrendered —
/// they appear when the grid is enlarged or another session leaves.
#[derive(Debug, Clone, Default)]
pub struct VideoGrid {
    size: GridSize,
    focused: Option<String>,
}

impl VideoGrid {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            focused: None,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn set_size(&mut self, size: GridSize) {
        self.size = size;
    }

    pub fn enlarge(&mut self) {
        self.size = self.size.enlarged();
    }

    pub fn shrink(&mut self) {
        self.size = self.size.shrunk();
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Toggle focus on a room; focusing an already-focused room clears it.
    pub fn toggle_focus(&mut self, room_name: impl Into<String>) {
        let room_name = room_name.into();
        if self.focused.as_deref() == Some(room_name.as_str()) {
            self.focused = None;
        } else {
            self.focused = Some(room_name);
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Assign sessions to slots. Always returns exactly `slot_count()`
    /// entries; trailing slots are placeholders so the visual layout stays
    /// stable while sessions join and leave.
    pub fn slots(&self, connections: &[SessionConnection]) -> Vec<GridSlot> {
        (0..self.size.slot_count())
            .map(|index| match connections.get(index) {
                Some(session) => GridSlot::Live {
                    index,
                    session: session.clone(),
                },
                None => GridSlot::Empty { index },
            })
            .collect()
    }
}

/// The operator's own microphone/camera state, applied to the primary
/// session only — not a broadcast over the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorMediaControls {
    pub mic_enabled: bool,
    pub camera_enabled: bool,
}

impl OperatorMediaControls {
    pub fn new() -> Self {
        Self {
            mic_enabled: true,
            camera_enabled: true,
        }
    }

    pub fn toggle_mic(&mut self) {
        self.mic_enabled = !self.mic_enabled;
    }

    pub fn toggle_camera(&mut self) {
        self.camera_enabled = !self.camera_enabled;
    }

    /// The session the controls act on: conventionally the first pool entry.
    pub fn primary_session<'a>(
        &self,
        connections: &'a [SessionConnection],
    ) -> Option<&'a SessionConnection> {
        connections.first()
    }
}

impl Default for OperatorMediaControls {
    fn default() -> Self {
        Self::new()
    }
}
