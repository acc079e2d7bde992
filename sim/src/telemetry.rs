//! Read-only snapshots for the HUD and audio layer.

use crate::{
    MPS_TO_KMH,
    config::VehicleParams,
    npc::{Npc, NpcMode},
    registry::{NpcId, PropId, VehicleId},
    utils::{Quat, Vec3},
    vehicle::{GearDisplay, Vehicle, WheelPose},
};

/// Position and orientation of an actor after the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleTelemetry {
    pub id: VehicleId,
    pub transform: Transform,
    pub speed_mps: f32,
    pub speed_kmh: f32,
    pub engine_rpm: f32,
    pub gear: GearDisplay,
    pub throttle: f32,
    pub brake: f32,
    pub slip_front: f32,
    pub slip_rear: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub wheels: [WheelPose; 4],
    pub occupied: bool,
}

impl VehicleTelemetry {
    pub fn capture(
        id: VehicleId,
        vehicle: &Vehicle,
        params: &VehicleParams,
        occupied: bool,
    ) -> Self {
        let speed = vehicle.speed();
        let tires = vehicle.tire_forces();
        Self {
            id,
            transform: Transform {
                position: vehicle.position,
                rotation: vehicle.rotation(),
            },
            speed_mps: speed,
            speed_kmh: speed * MPS_TO_KMH,
            engine_rpm: vehicle.engine_rpm,
            gear: vehicle.gear_display(),
            throttle: vehicle.throttle,
            brake: vehicle.brake,
            slip_front: tires.slip_front,
            slip_rear: tires.slip_rear,
            yaw: vehicle.yaw,
            pitch: vehicle.pitch,
            roll: vehicle.roll,
            wheels: vehicle.wheel_poses(params),
            occupied,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NpcSnapshot {
    pub id: NpcId,
    pub mode: NpcMode,
    pub transform: Transform,
}

impl NpcSnapshot {
    pub fn capture(id: NpcId, npc: &Npc) -> Self {
        Self {
            id,
            mode: npc.mode(),
            transform: Transform {
                position: npc.body.position,
                rotation: npc.body.rotation,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropSnapshot {
    pub id: PropId,
    pub transform: Transform,
    pub grounded: bool,
}
