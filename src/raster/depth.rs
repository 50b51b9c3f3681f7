//! Depth buffer for full-render mode.

/// Per-pixel nearest-triangle store.
///
/// Each cell holds the smallest depth written so far and the index of the
/// triplet that produced it (into the scene's per-frame triplet list).
/// Contents are frame-scoped: `reset` runs before every full-render pass.
pub struct DepthBuffer {
    depth: Vec<f32>,
    triplet: Vec<Option<usize>>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            depth: vec![f32::INFINITY; size],
            triplet: vec![None; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.depth = vec![f32::INFINITY; size];
        self.triplet = vec![None; size];
        self.width = width;
        self.height = height;
    }

    /// Clears every cell to infinite depth with no triangle.
    pub fn reset(&mut self) {
        self.depth.fill(f32::INFINITY);
        self.triplet.fill(None);
    }

    /// Writes a depth sample if and only if it is nearer than the cell's
    /// current depth. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, depth: f32, triplet: usize) {
        if let Some(idx) = self.index(x, y) {
            if depth < self.depth[idx] {
                self.depth[idx] = depth;
                self.triplet[idx] = Some(triplet);
            }
        }
    }

    /// Depth at a pixel; infinity for empty or out-of-bounds cells.
    pub fn depth(&self, x: i32, y: i32) -> f32 {
        self.index(x, y)
            .map(|idx| self.depth[idx])
            .unwrap_or(f32::INFINITY)
    }

    /// Index of the nearest triplet at a pixel, or `None` for blank pixels.
    pub fn triplet(&self, x: i32, y: i32) -> Option<usize> {
        self.index(x, y).and_then(|idx| self.triplet[idx])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells_report_sentinel() {
        let buffer = DepthBuffer::new(4, 4);
        assert_eq!(buffer.triplet(1, 1), None);
        assert!(buffer.depth(1, 1).is_infinite());
    }

    #[test]
    fn nearest_wins_regardless_of_write_order() {
        let mut near_first = DepthBuffer::new(4, 4);
        near_first.set(2, 2, 1.0, 7);
        near_first.set(2, 2, 5.0, 9);

        let mut far_first = DepthBuffer::new(4, 4);
        far_first.set(2, 2, 5.0, 9);
        far_first.set(2, 2, 1.0, 7);

        for buffer in [&near_first, &far_first] {
            assert_eq!(buffer.triplet(2, 2), Some(7));
            assert_eq!(buffer.depth(2, 2), 1.0);
        }
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buffer = DepthBuffer::new(4, 4);
        buffer.set(-1, 2, 1.0, 0);
        buffer.set(4, 0, 1.0, 0);
        buffer.set(0, 100, 1.0, 0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buffer.triplet(x, y), None);
            }
        }
    }

    #[test]
    fn reset_clears_contents() {
        let mut buffer = DepthBuffer::new(2, 2);
        buffer.set(0, 0, 0.5, 3);
        buffer.reset();
        assert_eq!(buffer.triplet(0, 0), None);
        assert!(buffer.depth(0, 0).is_infinite());
    }
}
