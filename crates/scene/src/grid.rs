use glam::Vec3;
use modelview_common::Color;
use serde::{Deserialize, Serialize};

/// Ground-plane grid on y = 0, centered on the node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHelper {
    /// Edge length of the whole grid.
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

/// One line segment of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
}

impl Default for GridHelper {
    fn default() -> Self {
        Self {
            size: 1200.0,
            divisions: 60,
            center_color: Color::from_hex(0xFF4444),
            line_color: Color::from_hex(0x404040),
        }
    }
}

impl GridHelper {
    /// `divisions + 1` lines along each axis. With an even division count
    /// the middle pair uses the center color; an odd count has no line
    /// through the center, so none does.
    pub fn lines(&self) -> Vec<GridLine> {
        let divisions = self.divisions.max(1);
        let center = (divisions % 2 == 0).then_some(divisions / 2);
        let step = self.size / divisions as f32;
        let half = self.size / 2.0;

        let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));
        for i in 0..=divisions {
            let k = -half + i as f32 * step;
            let color = if center == Some(i) {
                self.center_color
            } else {
                self.line_color
            };
            lines.push(GridLine {
                start: Vec3::new(-half, 0.0, k),
                end: Vec3::new(half, 0.0, k),
                color,
            });
            lines.push(GridLine {
                start: Vec3::new(k, 0.0, -half),
                end: Vec3::new(k, 0.0, half),
                color,
            });
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_line_count() {
        let lines = GridHelper::default().lines();
        assert_eq!(lines.len(), 2 * 61);
    }

    #[test]
    fn middle_lines_use_center_color() {
        let grid = GridHelper::default();
        let centered: Vec<_> = grid
            .lines()
            .into_iter()
            .filter(|l| l.color == grid.center_color)
            .collect();
        assert_eq!(centered.len(), 2);
        for line in centered {
            assert!(line.start.x.abs() < 1e-3 || line.start.z.abs() < 1e-3);
        }
    }

    #[test]
    fn odd_divisions_have_no_center_line() {
        let grid = GridHelper {
            size: 30.0,
            divisions: 3,
            ..GridHelper::default()
        };
        let lines = grid.lines();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|l| l.color == grid.line_color));
    }

    #[test]
    fn lines_span_the_full_size() {
        let grid = GridHelper {
            size: 10.0,
            divisions: 2,
            ..GridHelper::default()
        };
        let lines = grid.lines();
        assert_eq!(lines.first().unwrap().start, Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(lines.last().unwrap().end, Vec3::new(5.0, 0.0, 5.0));
    }
}
