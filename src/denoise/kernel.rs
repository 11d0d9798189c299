//! Spatial weight tables for the à-trous filter

/// 1D B3-spline taps; their outer product is the classic à-trous kernel
pub const B3_SPLINE: [f32; 5] = [1.0 / 16.0, 1.0 / 4.0, 3.0 / 8.0, 1.0 / 4.0, 1.0 / 16.0];

/// A square weight table with its tap offsets, centered on the pixel being filtered.
///
/// Generated once per filter configuration and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    radius: i32,
    weights: Vec<f32>,
}

impl Kernel {
    /// The 5x5 B3-spline kernel.
    pub fn b3_spline() -> Self {
        Self::separable(&B3_SPLINE)
    }

    /// Builds a 2D kernel as the outer product of an odd-length 1D kernel with itself.
    ///
    /// # Panics
    ///
    /// Panics if `taps` has an even length.
    pub fn separable(taps: &[f32]) -> Self {
        assert!(taps.len() % 2 == 1, "kernel needs a center tap");
        let weights = taps
            .iter()
            .flat_map(|wy| taps.iter().map(move |wx| wx * wy))
            .collect();
        Self {
            radius: (taps.len() / 2) as i32,
            weights,
        }
    }

    /// Taps from the center to an edge, excluding the center
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Number of taps along one side
    pub fn size(&self) -> i32 {
        2 * self.radius + 1
    }

    /// Weight at offset (`dx`, `dy`) from the center
    pub fn weight(&self, dx: i32, dy: i32) -> f32 {
        let idx = (dy + self.radius) * self.size() + (dx + self.radius);
        self.weights[idx as usize]
    }

    /// Every tap as `(dx, dy, weight)`, row by row
    pub fn taps(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        let size = self.size();
        self.weights.iter().enumerate().map(move |(idx, w)| {
            let idx = idx as i32;
            (idx % size - self.radius, idx / size - self.radius, *w)
        })
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::b3_spline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b3_sums_to_one() {
        let sum: f32 = Kernel::b3_spline().taps().map(|(_, _, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-6, "kernel weights summed to {sum}");
    }

    #[test]
    fn b3_is_symmetric_and_peaks_at_center() {
        let k = Kernel::b3_spline();
        assert_eq!(k.size(), 5);
        assert_eq!(k.weight(0, 0), 9.0 / 64.0);
        for (dx, dy, w) in k.taps() {
            assert_eq!(w, k.weight(-dx, dy));
            assert_eq!(w, k.weight(dy, dx));
            assert!(w <= k.weight(0, 0));
        }
    }

    #[test]
    fn taps_visit_every_offset_once() {
        let k = Kernel::b3_spline();
        let offsets: Vec<_> = k.taps().map(|(dx, dy, _)| (dx, dy)).collect();
        assert_eq!(offsets.len(), 25);
        assert_eq!(offsets[0], (-2, -2));
        assert_eq!(offsets[24], (2, 2));
    }
}
