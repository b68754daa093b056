//! Precomputed sine/cosine lookup.
//!
//! Every rotation in the sandbox goes through one [`TrigTable`]. The table
//! covers `[0, 2π]` at a fixed angular step (0.001 rad by default, 6284
//! entries) and is built once when the simulation state is created.
//!
//! ```
//! use confetti::trig::TrigTable;
//! use std::f32::consts::TAU;
//!
//! let table = TrigTable::default();
//! // Negative angles wrap around.
//! assert_eq!(table.angle_to_index(-0.001), table.angle_to_index(TAU - 0.001));
//! ```

use glam::{Mat2, Vec2};
use std::f32::consts::TAU;

/// Default angular resolution in radians.
pub const DEFAULT_ANGLE_STEP: f32 = 0.001;

/// Smallest table the lookup can index meaningfully.
pub const MIN_TABLE_SIZE: usize = 4;

/// Sine/cosine lookup table indexed by angle.
#[derive(Debug, Clone, PartialEq)]
pub struct TrigTable {
    /// `(sin, cos)` pairs at `index * step`.
    entries: Vec<(f32, f32)>,
    step: f32,
}

impl TrigTable {
    /// Build a table with the given angular step.
    ///
    /// The step is clamped so the table never has fewer than
    /// [`MIN_TABLE_SIZE`] entries.
    pub fn with_step(step: f32) -> Self {
        let max_step = TAU / MIN_TABLE_SIZE as f32;
        let step = if step.is_finite() && step > 0.0 {
            step.min(max_step)
        } else {
            DEFAULT_ANGLE_STEP
        };
        let count = (TAU / step) as usize + 1;
        let entries = (0..count)
            .map(|i| {
                let angle = i as f32 * step;
                (angle.sin(), angle.cos())
            })
            .collect();
        Self { entries, step }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Angular resolution in radians.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Map any angle (negative, or beyond one turn) to a table index.
    ///
    /// Non-finite angles map to index 0.
    pub fn angle_to_index(&self, angle: f32) -> usize {
        if !angle.is_finite() {
            return 0;
        }
        let wrapped = angle.rem_euclid(TAU);
        let index = (wrapped / self.step).round() as usize;
        index.min(self.entries.len() - 1)
    }

    /// `(sin, cos)` of `angle`.
    #[inline]
    pub fn sin_cos(&self, angle: f32) -> (f32, f32) {
        self.entries[self.angle_to_index(angle)]
    }

    #[inline]
    pub fn sin(&self, angle: f32) -> f32 {
        self.sin_cos(angle).0
    }

    #[inline]
    pub fn cos(&self, angle: f32) -> f32 {
        self.sin_cos(angle).1
    }

    /// Planar transform for rotating `(x, y, 0)` by pitch, then yaw, then roll.
    ///
    /// Pitch turns about X (touches y/z), yaw about Y (x/z), roll about Z
    /// (x/y). Because every input point has `z = 0`, the composition
    /// projected back onto the plane is a single 2x2 matrix.
    pub fn rotation_matrix(&self, pitch: f32, yaw: f32, roll: f32) -> Mat2 {
        let (sp, cp) = self.sin_cos(pitch);
        let (sy, cy) = self.sin_cos(yaw);
        let (sr, cr) = self.sin_cos(roll);

        Mat2::from_cols(
            Vec2::new(cy * cr, cy * sr),
            Vec2::new(sp * sy * cr - cp * sr, sp * sy * sr + cp * cr),
        )
    }
}

impl Default for TrigTable {
    fn default() -> Self {
        Self::with_step(DEFAULT_ANGLE_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let table = TrigTable::default();
        assert_eq!(table.len(), 6284);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_wraparound_indices_match() {
        let table = TrigTable::default();
        let a = table.angle_to_index(-0.001);
        let b = table.angle_to_index(TAU - 0.001);
        assert!(a.abs_diff(b) <= 1, "{} vs {}", a, b);
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let table = TrigTable::default();
        for angle in [0.0, TAU, -TAU, 100.0, -100.0, TAU - 1e-7, f32::NAN, f32::INFINITY] {
            assert!(table.angle_to_index(angle) < table.len());
        }
    }

    #[test]
    fn test_lookup_accuracy() {
        let table = TrigTable::default();
        for i in -40..40 {
            let angle = i as f32 * 0.37;
            let (s, c) = table.sin_cos(angle);
            assert!((s - angle.sin()).abs() < 2e-3, "sin({})", angle);
            assert!((c - angle.cos()).abs() < 2e-3, "cos({})", angle);
        }
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let table = TrigTable::default();
        assert_eq!(table.rotation_matrix(0.0, 0.0, 0.0), Mat2::IDENTITY);
    }

    #[test]
    fn test_roll_only_is_planar_rotation() {
        let table = TrigTable::default();
        let m = table.rotation_matrix(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let p = m * Vec2::X;
        assert!((p - Vec2::Y).length() < 2e-3);
    }

    #[test]
    fn test_determinant_is_cos_pitch_cos_yaw() {
        let table = TrigTable::default();
        let (pitch, yaw, roll) = (0.4, 1.1, 2.3);
        let m = table.rotation_matrix(pitch, yaw, roll);
        let expected = table.cos(pitch) * table.cos(yaw);
        assert!((m.determinant() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_coarse_step_is_clamped() {
        let table = TrigTable::with_step(100.0);
        assert!(table.len() >= MIN_TABLE_SIZE);
        let fallback = TrigTable::with_step(-1.0);
        assert_eq!(fallback.len(), TrigTable::default().len());
    }
}
