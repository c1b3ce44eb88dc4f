//! Renderer: the deterministic rasterizer.
//!
//! Turns each frame's `ResolvedScene` into terminal output. The first frame
//! (and the first after `reset`) is a full frame; later frames are cell diffs
//! against the previous one, so an idle scene costs nothing to redraw.
//!
//! The renderer knows nothing about triggers, time or input.

use crate::types::{Cell, CellChange, Frame, ResolvedScene, TerminalContract};

pub struct Renderer {
    contract: TerminalContract,
    prev: Option<Vec<Vec<Cell>>>,
}

impl Renderer {
    pub fn new(contract: TerminalContract) -> Self {
        Self { contract, prev: None }
    }

    /// Rasterize `scene` and return what changed since the last call.
    pub fn render(&mut self, scene: &ResolvedScene) -> Frame {
        let grid = Self::rasterize(scene, &self.contract);
        let frame = match &self.prev {
            None => Frame::Full { cells: grid.clone() },
            Some(prev) => Frame::Diff {
                changes: Self::diff(prev, &grid),
            },
        };
        self.prev = Some(grid);
        frame
    }

    /// Forget the previous frame; the next render is a full frame.
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are stably sorted by z-order so that higher z values
    /// paint over lower ones and later ops win within a z value.
    pub fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Vec<Vec<Cell>> {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style.clone(),
                };
            }
        }

        grid
    }

    fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawOp, Style};

    fn op(x: u16, y: u16, ch: char, z_order: i32) -> DrawOp {
        DrawOp {
            x,
            y,
            ch,
            style: Style::default(),
            z_order,
        }
    }

    fn scene(ops: Vec<DrawOp>) -> ResolvedScene {
        ResolvedScene { width: 4, height: 2, ops }
    }

    #[test]
    fn higher_layers_paint_over_lower() {
        let contract = TerminalContract { width: 4, height: 2 };
        let grid = Renderer::rasterize(&scene(vec![op(1, 0, 'T', 2), op(1, 0, 'B', 0), op(9, 9, 'X', 5)]), &contract);
        assert_eq!(grid[0][1].ch, 'T');
        assert_eq!(grid[1][3].ch, ' ');
    }

    #[test]
    fn first_frame_full_then_diffs() {
        let mut renderer = Renderer::new(TerminalContract { width: 4, height: 2 });
        assert!(matches!(renderer.render(&scene(vec![op(0, 0, 'a', 0)])), Frame::Full { .. }));

        match renderer.render(&scene(vec![op(0, 0, 'a', 0), op(2, 1, 'b', 0)])) {
            Frame::Diff { changes } => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].x, changes[0].y, changes[0].cell.ch), (2, 1, 'b'));
            }
            Frame::Full { .. } => panic!("expected a diff"),
        }

        renderer.reset();
        assert!(matches!(renderer.render(&scene(vec![])), Frame::Full { .. }));
    }
}
