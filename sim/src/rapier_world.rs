//! Rapier-based query world builder for immutable/static world geometry.
//!
//! Used to build one in-memory Rapier scene per static geometry class (ground, walls)
//! from a set of collider definitions delivered by the asset loader.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: only scene queries (ray casts) are run against it. Nothing is stepped.
//! - Immutable world: statics do not move after construction. When a load adds geometry
//!   the world for that class is rebuilt from the accumulated definitions.

use crate::error::SimError;
use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Canonical, loader-agnostic definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, we use a pose-derived normal: `normal = rotation * +Y`,
///   and compute `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u64,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
}

impl WorldStaticDef {
    /// Axis-aligned box with the given half extents, centered at `translation`.
    pub fn cuboid(id: u64, translation: Vector<f32>, half_extents: Vector<f32>) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Cuboid { half_extents },
        }
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// The plane normal is derived from the pose as `rotation * +Y`.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Arbitrary triangle mesh in the collider's local space (exported level geometry).
    TriMesh {
        vertices: Vec<Point<f32>>,
        indices: Vec<[u32; 3]>,
    },
}

/// In-memory Rapier structures needed for scene queries against a static world.
///
/// For immutable statics, these are built once per geometry load and reused every tick.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    ///
    /// Fails only when a triangle mesh cannot be built.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Result<Self, SimError> {
        // Ensure deterministic insertion order.
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Insert each static as a fixed rigid-body + attached collider.
        for def in defs.into_iter() {
            let collider = collider_from_def(&def)?;
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Run collision detection once (no dynamics) so the broad-phase BVH is populated.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        Ok(Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        })
    }

    /// Number of colliders in this world.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Create a borrowed `QueryPipeline` view suitable for scene queries.
    ///
    /// The returned pipeline borrows `self`, so it should be used within the scope
    /// of the borrow.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// This uses the pose stored on the rigid-body as the collider parent transform.
/// So the collider is created with identity local transform.
fn collider_from_def(def: &WorldStaticDef) -> Result<Collider, SimError> {
    let collider = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // The parent body already carries the pose, so the half-space only needs
            // its local +Y normal shifted by the extra offset.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius).build(),

        ColliderShapeDef::TriMesh { vertices, indices } => {
            if vertices.is_empty() || indices.is_empty() {
                return Err(SimError::InvalidMesh {
                    id: def.id,
                    reason: "mesh has no triangles".into(),
                });
            }
            let vertex_count = vertices.len() as u32;
            if indices.iter().flatten().any(|&i| i >= vertex_count) {
                return Err(SimError::InvalidMesh {
                    id: def.id,
                    reason: "triangle index out of range".into(),
                });
            }
            ColliderBuilder::trimesh(vertices.clone(), indices.clone())
                .map_err(|e| SimError::InvalidMesh {
                    id: def.id,
                    reason: format!("{e:?}"),
                })?
                .build()
        }
    };

    Ok(collider)
}
