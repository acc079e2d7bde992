//! Scenario files: configuration overrides, timed asset loads and a scripted input track.
//!
//! ```json
//! {
//!   "config": { "vehicle": { "mass_kg": 1100.0 } },
//!   "loads": [
//!     { "at_s": 0.0, "kind": "ground", "colliders": [
//!         { "id": 1, "position": [0, -0.5, 0], "shape": "cuboid", "half_extents": [100, 0.5, 100] } ] },
//!     { "at_s": 0.3, "kind": "vehicle_visual", "slot": 0, "position": [-2, 0, -1], "yaw": 0.0 },
//!     { "at_s": 0.0, "kind": "vehicle_collider", "slot": 0, "half_extents": [0.9, 0.6, 2.2] }
//!   ],
//!   "inputs": [ { "at_s": 1.0, "forward": true } ]
//! }
//! ```

use anyhow::{Context, Result};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use sandbox_sim::{
    Bounds, ColliderShapeDef, InputState, LoadEvent, SimConfig, Vec3, WorldStaticDef,
};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: SimConfig,
    pub loads: Vec<TimedLoad>,
    pub inputs: Vec<InputKey>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// An asset load completing `at_s` seconds into the run.
#[derive(Clone, Debug, Deserialize)]
pub struct TimedLoad {
    #[serde(default)]
    pub at_s: f32,
    #[serde(flatten)]
    pub load: LoadSpec,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadSpec {
    Ground {
        colliders: Vec<ColliderSpec>,
    },
    Walls {
        colliders: Vec<ColliderSpec>,
    },
    VehicleVisual {
        slot: u32,
        position: [f32; 3],
        #[serde(default)]
        yaw: f32,
    },
    VehicleCollider {
        slot: u32,
        half_extents: [f32; 3],
        /// Where the collider is left if its vehicle never loads.
        #[serde(default)]
        fallback_position: [f32; 3],
    },
    Prop {
        position: [f32; 3],
        half_extents: [f32; 3],
    },
    Npc {
        position: [f32; 3],
    },
}

impl LoadSpec {
    pub fn into_event(self) -> LoadEvent {
        match self {
            LoadSpec::Ground { colliders } => LoadEvent::GroundMeshLoaded {
                defs: colliders.into_iter().map(ColliderSpec::into_def).collect(),
            },
            LoadSpec::Walls { colliders } => LoadEvent::WallMeshLoaded {
                defs: colliders.into_iter().map(ColliderSpec::into_def).collect(),
            },
            LoadSpec::VehicleVisual {
                slot,
                position,
                yaw,
            } => LoadEvent::VehicleVisualLoaded {
                slot,
                position: Vec3::from(position),
                yaw,
            },
            LoadSpec::VehicleCollider {
                slot,
                half_extents,
                fallback_position,
            } => LoadEvent::VehicleColliderLoaded {
                slot,
                bounds: Bounds::from_half_extents(Vec3::from(half_extents)),
                fallback_position: Vec3::from(fallback_position),
            },
            LoadSpec::Prop {
                position,
                half_extents,
            } => LoadEvent::PropLoaded {
                position: Vec3::from(position),
                bounds: Bounds::from_half_extents(Vec3::from(half_extents)),
            },
            LoadSpec::Npc { position } => LoadEvent::NpcSpawned {
                position: Vec3::from(position),
            },
        }
    }
}

/// One static collider as written in a scenario file.
#[derive(Clone, Debug, Deserialize)]
pub struct ColliderSpec {
    pub id: u64,
    pub position: [f32; 3],
    /// Rotation about +Y, degrees.
    #[serde(default)]
    pub yaw_deg: f32,
    /// Rotation about +X after the yaw, degrees. Tilts planes and boxes into ramps.
    #[serde(default)]
    pub pitch_deg: f32,
    #[serde(flatten)]
    pub shape: ShapeSpec,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeSpec {
    Cuboid {
        half_extents: [f32; 3],
    },
    Plane {
        #[serde(default)]
        offset: f32,
    },
    Sphere {
        radius: f32,
    },
    /// Upright capsule, e.g. a lamp post.
    CapsuleY {
        radius: f32,
        half_height: f32,
    },
    /// Upright cylinder, e.g. a bollard or tree trunk.
    CylinderY {
        radius: f32,
        half_height: f32,
    },
    TriMesh {
        vertices: Vec<[f32; 3]>,
        indices: Vec<[u32; 3]>,
    },
}

impl ColliderSpec {
    pub fn into_def(self) -> WorldStaticDef {
        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch);
        let shape = match self.shape {
            ShapeSpec::Cuboid { half_extents } => ColliderShapeDef::Cuboid {
                half_extents: Vector3::from(half_extents),
            },
            ShapeSpec::Plane { offset } => ColliderShapeDef::Plane {
                offset_along_normal: offset,
            },
            ShapeSpec::Sphere { radius } => ColliderShapeDef::Sphere { radius },
            ShapeSpec::CapsuleY {
                radius,
                half_height,
            } => ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            },
            ShapeSpec::CylinderY {
                radius,
                half_height,
            } => ColliderShapeDef::CylinderY {
                radius,
                half_height,
            },
            ShapeSpec::TriMesh { vertices, indices } => ColliderShapeDef::TriMesh {
                vertices: vertices.into_iter().map(Point3::from).collect(),
                indices,
            },
        };
        WorldStaticDef {
            id: self.id,
            translation: Vector3::from(self.position),
            rotation,
            shape,
        }
    }
}

/// Input held from `at_s` until the next key.
#[derive(Clone, Debug, Deserialize)]
pub struct InputKey {
    pub at_s: f32,
    #[serde(flatten)]
    pub state: InputState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_example() {
        let text = r#"{
          "config": { "vehicle": { "mass_kg": 1100.0 } },
          "loads": [
            { "at_s": 0.0, "kind": "ground", "colliders": [
                { "id": 1, "position": [0, -0.5, 0], "shape": "cuboid", "half_extents": [100, 0.5, 100] } ] },
            { "at_s": 0.3, "kind": "vehicle_visual", "slot": 0, "position": [-2, 0, -1], "yaw": 0.0 },
            { "kind": "vehicle_collider", "slot": 0, "half_extents": [0.9, 0.6, 2.2] }
          ],
          "inputs": [ { "at_s": 1.0, "forward": true } ]
        }"#;
        let scenario = Scenario::from_json(text).unwrap();
        assert_eq!(scenario.config.vehicle.mass_kg, 1100.0);
        assert_eq!(scenario.loads.len(), 3);
        assert!(scenario.inputs[0].state.forward);
        assert!(matches!(
            scenario.loads[0].load.clone().into_event(),
            LoadEvent::GroundMeshLoaded { ref defs } if defs.len() == 1
        ));
    }

    #[test]
    fn round_street_furniture_maps_to_collider_shapes() {
        let text = r#"{ "loads": [ { "kind": "walls", "colliders": [
            { "id": 7, "position": [3, 0.5, 0],
              "shape": "cylinder_y", "radius": 0.2, "half_height": 0.5 },
            { "id": 8, "position": [0, 2, 4],
              "shape": "capsule_y", "radius": 0.1, "half_height": 1.8 },
            { "id": 9, "position": [-4, 1, 0], "shape": "sphere", "radius": 1.0 } ] } ] }"#;
        let scenario = Scenario::from_json(text).unwrap();
        let LoadEvent::WallMeshLoaded { defs } = scenario.loads[0].load.clone().into_event() else {
            panic!("walls load should become a wall mesh event");
        };
        assert_eq!(
            defs[0].shape,
            ColliderShapeDef::CylinderY {
                radius: 0.2,
                half_height: 0.5,
            }
        );
        assert_eq!(
            defs[1].shape,
            ColliderShapeDef::CapsuleY {
                radius: 0.1,
                half_height: 1.8,
            }
        );
        assert_eq!(defs[2].shape, ColliderShapeDef::Sphere { radius: 1.0 });
        assert_eq!(defs[2].translation, Vector3::new(-4.0, 1.0, 0.0));
    }

    #[test]
    fn unknown_load_kind_is_an_error() {
        let text = r#"{ "loads": [ { "kind": "helicopter" } ] }"#;
        assert!(Scenario::from_json(text).is_err());
    }
}
