use glam::Vec2;

/// Press-drag-release tracking for the button surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragGesture {
    location: Option<Vec2>,
}

impl DragGesture {
    /// Starts a drag at `location`. The first touch is taken as-is.
    pub fn press(&mut self, location: Vec2) -> Vec2 {
        self.location = Some(location);
        location
    }

    /// Moves an active drag, clamping `location` to `[0, bounds]`.
    /// Returns `None` when no drag is in progress.
    pub fn drag(&mut self, location: Vec2, bounds: Vec2) -> Option<Vec2> {
        let current = self.location.as_mut()?;
        *current = location.clamp(Vec2::ZERO, bounds.max(Vec2::ZERO));
        Some(*current)
    }

    pub fn release(&mut self) {
        self.location = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.location.is_some()
    }

    pub fn location(&self) -> Option<Vec2> {
        self.location
    }
}
