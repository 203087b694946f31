use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;

use super::particles::ParticleCloudParameters;

/// Latest published control values. `is_active` is derived from `progress`
/// but stored on its own so the scheduler never has to interpret a magic zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub params: ParticleCloudParameters,
    pub is_active: bool,
}

/// Single-slot, last-write-wins mailbox between the UI and the frame loop.
///
/// Clones share the same slot. Writers overwrite the slot, the frame loop takes
/// a snapshot at the start of each frame; intermediate values are never queued.
#[derive(Debug, Clone, Default)]
pub struct ControlSurface {
    slot: Arc<Mutex<ControlState>>,
}

impl ControlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a new focal point given in absolute surface coordinates.
    ///
    /// `None` keeps the previously published center, as do degenerate bounds.
    pub fn set_focus(&self, point: Option<Vec2>, bounds: Vec2) {
        let Some(point) = point else {
            return;
        };
        if bounds.x <= 0.0 || bounds.y <= 0.0 {
            log::debug!("Ignoring focus {point} for degenerate bounds {bounds}");
            return;
        }
        self.slot.lock().params.center = point / bounds;
    }

    /// Publishes the latest progress value along with the derived activity flag.
    pub fn set_progress(&self, value: f32) {
        let mut state = self.slot.lock();
        state.params.progress = value;
        state.is_active = value != 0.0;
    }

    pub fn snapshot(&self) -> ControlState {
        *self.slot.lock()
    }

    pub fn parameters(&self) -> ParticleCloudParameters {
        self.slot.lock().params
    }

    pub fn is_active(&self) -> bool {
        self.slot.lock().is_active
    }
}
