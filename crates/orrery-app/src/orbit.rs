//! Camera that circles the planet at a fixed altitude.

use glam::{DQuat, DVec3};

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Circles the planet centre around the Y axis, on an orbit tilted so it
/// passes over four of the six cube faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Distance from the planet centre.
    pub orbit_radius: f64,
    /// Radians per second.
    pub angular_speed: f64,
    /// Tilt of the orbit plane in radians.
    pub inclination: f64,
}

impl OrbitCamera {
    pub fn new(planet_radius: f64, altitude: f64, angular_speed: f64) -> Self {
        Self {
            orbit_radius: planet_radius + altitude,
            angular_speed,
            inclination: 0.3,
        }
    }

    /// Camera position relative to the planet centre at `time` seconds.
    #[must_use]
    pub fn position(&self, time: f64) -> DVec3 {
        let spin = DQuat::from_rotation_y(self.angular_speed * time);
        let tilt = DQuat::from_rotation_x(self.inclination);
        tilt * (spin * DVec3::new(0.0, 0.0, self.orbit_radius))
    }
}
