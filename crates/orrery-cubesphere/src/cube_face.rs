//! The six faces of a cubesphere and their grid-to-world coordinate mapping.

use glam::DVec3;

/// The six faces of the cube that forms the cubesphere.
///
/// Each variant corresponds to a face whose outward normal points
/// along the named axis direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +X face
    PosX = 0,
    /// −X face
    NegX = 1,
    /// +Y face
    PosY = 2,
    /// −Y face
    NegY = 3,
    /// +Z face
    PosZ = 4,
    /// −Z face
    NegZ = 5,
}

/// How 2D face-grid coordinates land on the world axes for one face.
///
/// A grid point `(gx, gy)` at planet radius `r` maps to the world vector `w` with
/// `w[axes[0]] = gx * grid_mults[0]`, `w[axes[1]] = r * up`, and
/// `w[axes[2]] = gy * grid_mults[1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordMapping {
    /// World axis index receiving grid x, the face's up axis, and grid y.
    pub axes: [usize; 3],
    /// Sign multipliers applied to grid x and grid y.
    pub grid_mults: [i8; 2],
    /// Sign of the face's up axis.
    pub up: i8,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => DVec3::NEG_X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => DVec3::NEG_Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => DVec3::NEG_Z,
        }
    }

    /// Grid-to-world mapping for this face. Pure function of the face.
    #[must_use]
    pub const fn coord_mapping(self) -> CoordMapping {
        match self {
            CubeFace::PosY => CoordMapping {
                axes: [0, 1, 2],
                grid_mults: [1, 1],
                up: 1,
            },
            CubeFace::NegX => CoordMapping {
                axes: [2, 0, 1],
                grid_mults: [1, -1],
                up: -1,
            },
            CubeFace::PosX => CoordMapping {
                axes: [2, 0, 1],
                grid_mults: [-1, -1],
                up: 1,
            },
            CubeFace::PosZ => CoordMapping {
                axes: [0, 2, 1],
                grid_mults: [1, -1],
                up: 1,
            },
            CubeFace::NegZ => CoordMapping {
                axes: [0, 2, 1],
                grid_mults: [-1, -1],
                up: -1,
            },
            CubeFace::NegY => CoordMapping {
                axes: [0, 1, 2],
                grid_mults: [1, -1],
                up: -1,
            },
        }
    }
}
