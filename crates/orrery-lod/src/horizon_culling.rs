//! Horizon culling for spherical planets.
//!
//! Decides whether a surface point is hidden behind the planet's curvature as
//! seen from the camera, so patches there are not refined.

use std::ops::{Add, Div};

use glam::{DVec3, Vec3};

/// Angular margin in radians past the horizon before a point counts as hidden.
const HORIZON_MARGIN: f64 = 0.1;

/// A 3D vector type the horizon test can run in.
///
/// Implemented for [`Vec3`] (near-camera work) and [`DVec3`] (planet scale).
pub trait HorizonVector: Copy {
    type Scalar: Copy + PartialOrd + Add<Output = Self::Scalar> + Div<Output = Self::Scalar>;

    const ONE: Self::Scalar;
    const MARGIN: Self::Scalar;

    fn length(self) -> Self::Scalar;
    fn normalize_or_zero(self) -> Self;
    fn dot(self, other: Self) -> Self::Scalar;
    /// Arc cosine with the argument clamped to `[-1, 1]`.
    fn acos_clamped(x: Self::Scalar) -> Self::Scalar;
}

macro_rules! impl_horizon_vector {
    ($vec:ty, $scalar:ty) => {
        impl HorizonVector for $vec {
            type Scalar = $scalar;

            const ONE: $scalar = 1.0;
            #[allow(clippy::cast_possible_truncation)]
            const MARGIN: $scalar = HORIZON_MARGIN as $scalar;

            #[inline]
            fn length(self) -> $scalar {
                <$vec>::length(self)
            }

            #[inline]
            fn normalize_or_zero(self) -> Self {
                <$vec>::normalize_or_zero(self)
            }

            #[inline]
            fn dot(self, other: Self) -> $scalar {
                <$vec>::dot(self, other)
            }

            #[inline]
            fn acos_clamped(x: $scalar) -> $scalar {
                x.clamp(-1.0, 1.0).acos()
            }
        }
    };
}

impl_horizon_vector!(Vec3, f32);
impl_horizon_vector!(DVec3, f64);

/// Returns true if `point` lies past the horizon seen from `rel_cam_pos`.
///
/// Both positions are relative to the planet centre. The camera height is
/// clamped to at least `planet_radius + 1` so the horizon angle stays defined
/// at or below the surface. A point is hidden when its angle from the
/// camera's zenith reaches the horizon angle plus a 0.1 rad margin.
pub fn is_over_horizon<V: HorizonVector>(rel_cam_pos: V, point: V, planet_radius: V::Scalar) -> bool {
    let mut cam_height = rel_cam_pos.length();
    let zenith = rel_cam_pos.normalize_or_zero();

    let min_height = planet_radius + V::ONE;
    if cam_height < min_height {
        cam_height = min_height;
    }

    let horizon_angle = V::acos_clamped(planet_radius / cam_height);
    let point_angle = V::acos_clamped(zenith.dot(point.normalize_or_zero()));
    point_angle >= horizon_angle + V::MARGIN
}
