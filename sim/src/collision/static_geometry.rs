//! Rapier-backed ground and wall geometry.
//!
//! Each set keeps the accumulated collider definitions and a query world rebuilt
//! whenever a load appends to it. Sets only grow; nothing is ever removed.

use super::{
    probe::SurfaceProbe,
    settings::MIN_DIR_SQ,
    types::{RayHit, SurfaceSet},
};
use crate::{
    error::SimError,
    rapier_world::{RapierQueryWorld, WorldStaticDef},
    utils::Vec3,
};
use rapier3d::prelude::{QueryFilter, Ray};

/// One geometry class: its definitions plus the query world built from them.
#[derive(Default)]
struct GeometryLayer {
    defs: Vec<WorldStaticDef>,
    world: Option<RapierQueryWorld>,
}

impl GeometryLayer {
    fn extend(&mut self, defs: Vec<WorldStaticDef>) -> Result<usize, SimError> {
        let mut all = self.defs.clone();
        all.extend(defs);
        // Build first so a bad mesh leaves the previous world untouched.
        let world = RapierQueryWorld::build(all.clone())?;
        let count = world.len();
        self.defs = all;
        self.world = (!world.is_empty()).then_some(world);
        Ok(count)
    }

    fn cast(&self, origin: &Vec3, dir: &Vec3, max_dist: f32) -> Option<RayHit> {
        let world = self.world.as_ref()?;
        let dir = dir.try_normalize(MIN_DIR_SQ.sqrt())?;

        let ray = Ray::new((*origin).into(), dir);
        let pipeline = world.query_pipeline(QueryFilter::default());
        let (_handle, hit) = pipeline.cast_ray_and_get_normal(&ray, max_dist.max(0.0), true)?;

        let point: Vec3 = ray.point_at(hit.time_of_impact).coords;
        // A ray starting inside a solid reports a zero normal; treat it as facing the ray.
        let normal = hit.normal.try_normalize(1.0e-6).unwrap_or(-dir);

        Some(RayHit {
            point,
            normal,
            distance: hit.time_of_impact,
        })
    }
}

/// Static collision geometry: disjoint ground and wall/building sets.
#[derive(Default)]
pub struct StaticGeometry {
    ground: GeometryLayer,
    walls: GeometryLayer,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append collider definitions to one set and rebuild its query world.
    ///
    /// Returns the collider count of the rebuilt set.
    pub fn extend(
        &mut self,
        set: SurfaceSet,
        defs: Vec<WorldStaticDef>,
    ) -> Result<usize, SimError> {
        let count = self.layer_mut(set).extend(defs)?;
        log::info!("rebuilt {set:?} geometry: {count} colliders");
        Ok(count)
    }

    fn layer(&self, set: SurfaceSet) -> &GeometryLayer {
        match set {
            SurfaceSet::Ground => &self.ground,
            SurfaceSet::Walls => &self.walls,
        }
    }

    fn layer_mut(&mut self, set: SurfaceSet) -> &mut GeometryLayer {
        match set {
            SurfaceSet::Ground => &mut self.ground,
            SurfaceSet::Walls => &mut self.walls,
        }
    }
}

impl SurfaceProbe for StaticGeometry {
    fn cast(&self, set: SurfaceSet, origin: &Vec3, dir: &Vec3, max_dist: f32) -> Option<RayHit> {
        self.layer(set).cast(origin, dir, max_dist)
    }

    fn has_set(&self, set: SurfaceSet) -> bool {
        self.layer(set).world.is_some()
    }
}
