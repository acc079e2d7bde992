pub mod body;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod impact;
pub mod input;
pub mod loading;
pub mod npc;
pub mod player;
pub mod rapier_world;
pub mod registry;
pub mod resolver;
pub mod telemetry;
pub mod time;
pub mod utils;
pub mod vehicle;
pub mod world;

pub use body::RigidBody;
pub use collision::{Bounds, RayHit, StaticGeometry, SurfaceProbe, SurfaceSet};
pub use config::SimConfig;
pub use constants::{
    FLAT_GROUND_HEIGHT, GRAVITY_MPS2, IMPACT_MIN_VEHICLE_SPEED_MPS, MPS_TO_KMH, REFERENCE_HZ,
    SLIP_SPEED_FLOOR_MPS, TERMINAL_FALL_SPEED_MPS, YAW_EPS,
};
pub use error::SimError;
pub use events::{EventSink, ImpactTarget, SimEvent};
pub use input::{InputSource, InputState};
pub use loading::{LoadEvent, LoadSender};
pub use npc::{Npc, NpcMode, NpcState};
pub use player::Player;
pub use rapier_world::{ColliderShapeDef, WorldStaticDef};
pub use registry::{NpcId, PropId, VehicleId};
pub use resolver::{resolve_ground, resolve_walls};
pub use telemetry::{NpcSnapshot, PropSnapshot, Transform, VehicleTelemetry};
pub use time::FrameLimiter;
pub use utils::{Quat, Vec3};
pub use vehicle::{DriverInput, GearDisplay, Vehicle};
pub use world::{Car, Simulation};
