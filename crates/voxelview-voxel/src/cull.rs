//! Face visibility culling.
//!
//! A face of a solid voxel is exposed iff the neighbouring cell in that
//! direction is not solid. Cells outside a grid's bounds always count as air,
//! so grid borders emit their outward faces.

use bitflags::bitflags;
use glam::{IVec3, Vec3};
use voxelview_core::WorldPos;

use crate::grid::ChunkGrid;
use crate::sparse::SparseWorld;

/// Solidity lookup shared by every grid form.
pub trait SolidQuery {
    /// Returns true if the cell at the given coordinates holds a solid voxel.
    ///
    /// Coordinates outside the addressable range must return `false`.
    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool;
}

/// Local coordinates `(x, y_local, z)`.
impl SolidQuery for ChunkGrid {
    #[inline]
    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_solid()
    }
}

/// World coordinates.
impl SolidQuery for SparseWorld {
    #[inline]
    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.contains(WorldPos::new(x, y, z))
    }
}

/// One of the six axis-aligned face directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl Direction {
    /// All directions in emission order.
    pub const ALL: [Self; 6] = [
        Self::NegX,
        Self::PosX,
        Self::NegY,
        Self::PosY,
        Self::NegZ,
        Self::PosZ,
    ];

    /// Integer step to the neighbouring cell.
    #[inline]
    pub const fn offset(self) -> IVec3 {
        match self {
            Self::NegX => IVec3::NEG_X,
            Self::PosX => IVec3::X,
            Self::NegY => IVec3::NEG_Y,
            Self::PosY => IVec3::Y,
            Self::NegZ => IVec3::NEG_Z,
            Self::PosZ => IVec3::Z,
        }
    }

    /// Outward unit normal.
    #[inline]
    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::NegX => Self::PosX,
            Self::PosX => Self::NegX,
            Self::NegY => Self::PosY,
            Self::PosY => Self::NegY,
            Self::NegZ => Self::PosZ,
            Self::PosZ => Self::NegZ,
        }
    }

    /// Position in [`Direction::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn mask(self) -> FaceMask {
        match self {
            Self::NegX => FaceMask::NEG_X,
            Self::PosX => FaceMask::POS_X,
            Self::NegY => FaceMask::NEG_Y,
            Self::PosY => FaceMask::POS_Y,
            Self::NegZ => FaceMask::NEG_Z,
            Self::PosZ => FaceMask::POS_Z,
        }
    }
}

bitflags! {
    /// Set of exposed faces of one voxel.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FaceMask: u8 {
        const NEG_X = 1 << 0;
        const POS_X = 1 << 1;
        const NEG_Y = 1 << 2;
        const POS_Y = 1 << 3;
        const NEG_Z = 1 << 4;
        const POS_Z = 1 << 5;
    }
}

impl FaceMask {
    /// Whether the face in `direction` is part of the set.
    #[inline]
    pub const fn has(self, direction: Direction) -> bool {
        self.contains(direction.mask())
    }

    /// Exposed directions in emission order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has(*d))
    }

    /// Number of exposed faces.
    #[inline]
    pub const fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

/// Per-direction exposure test over any [`SolidQuery`].
pub struct FaceCuller<'a, Q: SolidQuery + ?Sized> {
    query: &'a Q,
}

impl<'a, Q: SolidQuery + ?Sized> FaceCuller<'a, Q> {
    pub const fn new(query: &'a Q) -> Self {
        Self { query }
    }

    /// Whether one face of the cell is exposed.
    ///
    /// Air cells have no faces, so this is `false` for them.
    #[inline]
    pub fn is_exposed(&self, x: i32, y: i32, z: i32, direction: Direction) -> bool {
        if !self.query.is_solid(x, y, z) {
            return false;
        }
        !self.neighbour_solid(IVec3::new(x, y, z), direction)
    }

    /// All exposed faces of the cell; empty for air.
    pub fn exposed_faces(&self, x: i32, y: i32, z: i32) -> FaceMask {
        if !self.query.is_solid(x, y, z) {
            return FaceMask::empty();
        }
        let cell = IVec3::new(x, y, z);
        Direction::ALL
            .into_iter()
            .filter(|&direction| !self.neighbour_solid(cell, direction))
            .fold(FaceMask::empty(), |mask, direction| mask | direction.mask())
    }

    /// A neighbour past the `i32` range is not addressable and counts as air.
    #[inline]
    fn neighbour_solid(&self, cell: IVec3, direction: Direction) -> bool {
        WorldPos::from(cell)
            .checked_offset(direction.offset())
            .is_some_and(|n| self.query.is_solid(n.x, n.y, n.z))
    }
}

/// Total number of exposed faces in a chunk grid.
pub fn count_exposed_faces(grid: &ChunkGrid) -> usize {
    let culler = FaceCuller::new(grid);
    grid.iter_solid()
        .map(|(x, y, z, _)| culler.exposed_faces(x, y, z).count() as usize)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelview_core::BlockId;

    fn filled(size: u32, height: i32) -> ChunkGrid {
        let len = (size * size) as usize * height as usize;
        ChunkGrid::from_data(vec![BlockId::STONE; len], size, 0, height).unwrap()
    }

    #[test]
    fn single_voxel_exposes_all_faces() {
        let mut grid = ChunkGrid::new(3, 0, 3).unwrap();
        grid.set(1, 1, 1, BlockId::STONE);
        assert_eq!(FaceCuller::new(&grid).exposed_faces(1, 1, 1), FaceMask::all());
    }

    #[test]
    fn air_has_no_faces() {
        let grid = ChunkGrid::new(2, 0, 2).unwrap();
        let culler = FaceCuller::new(&grid);
        assert!(culler.exposed_faces(0, 0, 0).is_empty());
        assert!(!culler.is_exposed(0, 0, 0, Direction::PosY));
    }

    #[test]
    fn grid_corner_exposes_outward_faces() {
        let mut grid = ChunkGrid::new(2, 0, 2).unwrap();
        grid.set(0, 0, 0, BlockId::STONE);
        grid.set(1, 0, 0, BlockId::STONE);
        let mask = FaceCuller::new(&grid).exposed_faces(0, 0, 0);
        assert!(mask.has(Direction::NegX));
        assert!(mask.has(Direction::NegY));
        assert!(mask.has(Direction::NegZ));
        assert!(!mask.has(Direction::PosX));
        assert_eq!(mask.count(), 5);
    }

    #[test]
    fn boundary_column_emits_side_faces() {
        // 1-wide column on the grid's +X edge
        let mut grid = ChunkGrid::new(4, 0, 3).unwrap();
        for y in 0..3 {
            grid.set(3, y, 0, BlockId::WOOD);
        }
        let culler = FaceCuller::new(&grid);
        for y in 0..3 {
            let mask = culler.exposed_faces(3, y, 0);
            for direction in [Direction::NegX, Direction::PosX, Direction::NegZ, Direction::PosZ] {
                assert!(mask.has(direction));
            }
        }
        assert_eq!(count_exposed_faces(&grid), 3 * 4 + 2);
    }

    #[test]
    fn solid_cube_only_exposes_shell() {
        for n in 1..=4 {
            let grid = filled(n, n as i32);
            assert_eq!(count_exposed_faces(&grid), 6 * (n * n) as usize);
        }
    }

    #[test]
    fn interior_voxel_is_hidden() {
        let grid = filled(3, 3);
        assert!(FaceCuller::new(&grid).exposed_faces(1, 1, 1).is_empty());
    }

    #[test]
    fn sparse_world_uses_world_coordinates() {
        let mut world = SparseWorld::new();
        world.set(WorldPos::new(-10, 5, 3), BlockId::GLASS);
        world.set(WorldPos::new(-10, 6, 3), BlockId::GLASS);
        let culler = FaceCuller::new(&world);
        let mask = culler.exposed_faces(-10, 5, 3);
        assert!(!mask.has(Direction::PosY));
        assert_eq!(mask.count(), 5);
    }

    #[test]
    fn cells_at_coordinate_limits_expose_outward_faces() {
        let mut world = SparseWorld::new();
        let max = WorldPos::new(i32::MAX, i32::MAX, i32::MAX);
        let min = WorldPos::new(i32::MIN, i32::MIN, i32::MIN);
        world.set(max, BlockId::STONE);
        world.set(min, BlockId::STONE);
        let culler = FaceCuller::new(&world);

        // Wrapping would make these neighbours of each other
        assert_eq!(culler.exposed_faces(max.x, max.y, max.z), FaceMask::all());
        assert_eq!(culler.exposed_faces(min.x, min.y, min.z), FaceMask::all());
        assert!(culler.is_exposed(max.x, max.y, max.z, Direction::PosX));
        assert!(culler.is_exposed(min.x, min.y, min.z, Direction::NegZ));
    }

    #[test]
    fn opposite_directions_cancel() {
        for direction in Direction::ALL {
            assert_eq!(direction.offset() + direction.opposite().offset(), IVec3::ZERO);
            assert_eq!(Direction::ALL[direction.index()], direction);
            assert_eq!(direction.normal().length(), 1.0);
        }
    }
}
