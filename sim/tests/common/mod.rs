#![allow(dead_code)]

use sandbox_sim::{StaticGeometry, SurfaceSet, Vec3, WorldStaticDef};

/// Geometry with a 400 m square ground slab whose top face is at `y`.
pub fn flat_ground(y: f32) -> StaticGeometry {
    let mut geometry = StaticGeometry::new();
    geometry
        .extend(SurfaceSet::Ground, vec![ground_slab(1, y)])
        .unwrap();
    geometry
}

pub fn ground_slab(id: u64, top_y: f32) -> WorldStaticDef {
    WorldStaticDef::cuboid(id, Vec3::new(0.0, top_y - 0.5, 0.0), Vec3::new(200.0, 0.5, 200.0))
}

/// A 4 m tall box standing on y = 0.
pub fn wall(id: u64, center_x: f32, center_z: f32, half_x: f32, half_z: f32) -> WorldStaticDef {
    WorldStaticDef::cuboid(id, Vec3::new(center_x, 2.0, center_z), Vec3::new(half_x, 2.0, half_z))
}

pub fn with_walls(mut geometry: StaticGeometry, walls: Vec<WorldStaticDef>) -> StaticGeometry {
    geometry.extend(SurfaceSet::Walls, walls).unwrap();
    geometry
}
