//! Cell-to-pixel mapping and wall materialization: folds the maze's wall
//! matrices into the rectangles the physics scene instantiates as fixed
//! bodies. Pure geometry, no engine types.

use crate::modules::maze::Maze;

/// Pixel size of one grid cell inside the play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub unit_width: f32,
    pub unit_height: f32,
}

impl CellMetrics {
    pub fn new(total_width: f32, total_height: f32, rows: usize, columns: usize) -> CellMetrics {
        CellMetrics {
            unit_width: total_width / columns as f32,
            unit_height: total_height / rows as f32,
        }
    }

    /// Center pixel of cell (row, col); row 0 is the top row.
    pub fn cell_center(&self, row: usize, col: usize) -> (f32, f32) {
        (
            col as f32 * self.unit_width + self.unit_width / 2.0,
            row as f32 * self.unit_height + self.unit_height / 2.0,
        )
    }
}

/// An axis-aligned wall slab, center position plus full extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One rectangle per wall still standing. Open flags produce nothing; every
/// false entry in either matrix produces exactly one slab on the shared
/// boundary of the two cells.
pub fn wall_rects(maze: &Maze, metrics: &CellMetrics, thickness: f32) -> Vec<WallRect> {
    let (uw, uh) = (metrics.unit_width, metrics.unit_height);
    let mut rects = Vec::new();

    for (row, cells) in maze.horizontal_open().iter().enumerate() {
        for (col, &open) in cells.iter().enumerate() {
            if open {
                continue;
            }
            rects.push(WallRect {
                x: col as f32 * uw + uw / 2.0,
                y: row as f32 * uh + uh,
                width: uw,
                height: thickness,
            });
        }
    }

    for (row, cells) in maze.vertical_open().iter().enumerate() {
        for (col, &open) in cells.iter().enumerate() {
            if open {
                continue;
            }
            rects.push(WallRect {
                x: col as f32 * uw + uw,
                y: row as f32 * uh + uh / 2.0,
                width: thickness,
                height: uh,
            });
        }
    }

    rects
}
