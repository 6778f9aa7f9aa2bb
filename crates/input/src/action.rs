/// A camera gesture, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitAction {
    /// Orbit by a pointer delta in physical pixels.
    Rotate { dx: f32, dy: f32 },
    /// Slide the target in the screen plane by a pointer delta in pixels.
    Pan { dx: f32, dy: f32 },
    /// Wheel steps; positive moves toward the target.
    Zoom(f32),
}

/// Pointer buttons that start a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    /// Left button: orbit.
    Primary,
    /// Right button: pan.
    Secondary,
}

/// Turns press / move / release sequences into drag actions.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    dragging: Option<DragButton>,
    last: Option<(f64, f64)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: DragButton) {
        if self.dragging.is_none() {
            self.dragging = Some(button);
        }
    }

    pub fn release(&mut self, button: DragButton) {
        if self.dragging == Some(button) {
            self.dragging = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Record a cursor position. Returns an action while a drag is active.
    pub fn moved(&mut self, x: f64, y: f64) -> Option<OrbitAction> {
        let previous = self.last.replace((x, y));
        let button = self.dragging?;
        let (px, py) = previous?;
        let (dx, dy) = ((x - px) as f32, (y - py) as f32);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(match button {
            DragButton::Primary => OrbitAction::Rotate { dx, dy },
            DragButton::Secondary => OrbitAction::Pan { dx, dy },
        })
    }

    /// Forget the cursor, e.g. when it leaves the window.
    pub fn reset(&mut self) {
        self.dragging = None;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_action_without_drag() {
        let mut t = PointerTracker::new();
        assert_eq!(t.moved(10.0, 10.0), None);
        assert_eq!(t.moved(20.0, 10.0), None);
    }

    #[test]
    fn primary_drag_rotates() {
        let mut t = PointerTracker::new();
        t.moved(10.0, 10.0);
        t.press(DragButton::Primary);
        assert_eq!(
            t.moved(15.0, 8.0),
            Some(OrbitAction::Rotate { dx: 5.0, dy: -2.0 })
        );
        t.release(DragButton::Primary);
        assert!(!t.is_dragging());
        assert_eq!(t.moved(30.0, 8.0), None);
    }

    #[test]
    fn secondary_drag_pans() {
        let mut t = PointerTracker::new();
        t.moved(0.0, 0.0);
        t.press(DragButton::Secondary);
        assert_eq!(t.moved(3.0, 4.0), Some(OrbitAction::Pan { dx: 3.0, dy: 4.0 }));
    }

    #[test]
    fn first_drag_button_wins() {
        let mut t = PointerTracker::new();
        t.moved(0.0, 0.0);
        t.press(DragButton::Primary);
        t.press(DragButton::Secondary);
        t.release(DragButton::Secondary);
        assert!(t.is_dragging());
        assert!(matches!(t.moved(1.0, 0.0), Some(OrbitAction::Rotate { .. })));
    }

    #[test]
    fn drag_needs_a_previous_position() {
        let mut t = PointerTracker::new();
        t.press(DragButton::Primary);
        assert_eq!(t.moved(5.0, 5.0), None);
        t.reset();
        assert!(!t.is_dragging());
    }
}
