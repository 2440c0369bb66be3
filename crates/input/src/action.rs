use glam::Vec2;

/// A high-level request the viewer understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Rotation drag started at a pointer position (physical pixels).
    RotateStart(Vec2),
    /// Pointer moved while rotating.
    RotateMove(Vec2),
    /// Rotation drag ended.
    RotateEnd,
    /// Put the camera back at its configured defaults.
    ResetCamera,
    /// Stop the render loop.
    Stop,
    /// Input that has no binding.
    Noop,
}

/// Turns separate button and cursor events into rotate actions.
///
/// Window systems report cursor motion and button state separately; the
/// tracker remembers the last cursor position so a press can start a drag
/// where the cursor is.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    cursor: Vec2,
    pressed: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> Action {
        self.cursor = position;
        if self.pressed {
            Action::RotateMove(position)
        } else {
            Action::Noop
        }
    }

    pub fn button(&mut self, pressed: bool) -> Action {
        match (self.pressed, pressed) {
            (false, true) => {
                self.pressed = true;
                Action::RotateStart(self.cursor)
            }
            (true, false) => {
                self.pressed = false;
                Action::RotateEnd
            }
            _ => Action::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_without_press_is_noop() {
        let mut t = PointerTracker::new();
        assert_eq!(t.cursor_moved(Vec2::new(5.0, 5.0)), Action::Noop);
        assert_eq!(t.cursor(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn press_move_release_is_a_drag() {
        let mut t = PointerTracker::new();
        t.cursor_moved(Vec2::new(10.0, 20.0));
        assert_eq!(t.button(true), Action::RotateStart(Vec2::new(10.0, 20.0)));
        assert_eq!(
            t.cursor_moved(Vec2::new(15.0, 20.0)),
            Action::RotateMove(Vec2::new(15.0, 20.0))
        );
        assert_eq!(t.button(false), Action::RotateEnd);
        assert!(!t.is_pressed());
    }

    #[test]
    fn repeated_press_is_ignored() {
        let mut t = PointerTracker::new();
        t.button(true);
        assert_eq!(t.button(true), Action::Noop);
        t.button(false);
        assert_eq!(t.button(false), Action::Noop);
    }
}
