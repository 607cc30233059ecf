//! Split/merge thresholds for terrain patches.

/// Invalid [`LodParams`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodParamsError {
    /// A distance factor was zero, negative, or not finite.
    #[error("distance factor {name} must be positive and finite, got {value}")]
    InvalidDistance { name: &'static str, value: f64 },

    /// The merge distance lies inside the split distance.
    #[error("merge distance {dist_max} must not be below split distance {dist_min}")]
    InvertedBand { dist_min: f64, dist_max: f64 },

    /// The minimum patch size was zero, negative, or not finite.
    #[error("minimum patch size must be positive and finite, got {0}")]
    InvalidMinSize(f64),
}

/// Distance thresholds in units of patch width, plus depth and size floors.
///
/// A leaf splits when the camera is closer than `width * dist_min`; a
/// subdivided patch merges when the camera is farther than `width * dist_max`.
/// The gap between the two keeps patches from flickering at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodParams {
    pub dist_min: f64,
    pub dist_max: f64,
    /// Patches this narrow or narrower never split.
    pub min_size: f64,
    /// Deepest subdivision level.
    pub max_lod: u32,
}

impl Default for LodParams {
    fn default() -> Self {
        Self {
            dist_min: 3.0,
            dist_max: 3.1,
            min_size: 0.4096,
            max_lod: 25,
        }
    }
}

impl LodParams {
    /// Validated constructor.
    pub fn new(
        dist_min: f64,
        dist_max: f64,
        min_size: f64,
        max_lod: u32,
    ) -> Result<Self, LodParamsError> {
        let params = Self {
            dist_min,
            dist_max,
            min_size,
            max_lod,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), LodParamsError> {
        for (name, value) in [("dist_min", self.dist_min), ("dist_max", self.dist_max)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LodParamsError::InvalidDistance { name, value });
            }
        }
        if self.dist_max < self.dist_min {
            return Err(LodParamsError::InvertedBand {
                dist_min: self.dist_min,
                dist_max: self.dist_max,
            });
        }
        if !(self.min_size.is_finite() && self.min_size > 0.0) {
            return Err(LodParamsError::InvalidMinSize(self.min_size));
        }
        Ok(())
    }
}
