//! Semantic events for the audio/effects/HUD layer.
//!
//! The simulation appends to a buffer during a tick; the host drains it whenever it
//! likes. Nothing in the simulation depends on whether anyone listens.

use crate::{
    npc::NpcMode,
    registry::{NpcId, PropId, VehicleId},
    utils::Vec3,
    vehicle::GearDisplay,
};

/// What got hit in an [`SimEvent::Impact`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactTarget {
    Prop(PropId),
    Npc(NpcId),
    Wall,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    GearChanged {
        vehicle: VehicleId,
        gear: GearDisplay,
    },
    Impact {
        vehicle: VehicleId,
        target: ImpactTarget,
        point: Vec3,
        normal: Vec3,
        speed: f32,
    },
    Footstep {
        position: Vec3,
    },
    Jumped {
        position: Vec3,
    },
    Landed {
        position: Vec3,
    },
    VehicleReady {
        vehicle: VehicleId,
        position: Vec3,
    },
    VehicleEntered {
        vehicle: VehicleId,
    },
    VehicleExited {
        vehicle: VehicleId,
        position: Vec3,
    },
    NpcStateChanged {
        npc: NpcId,
        from: NpcMode,
        to: NpcMode,
    },
    /// A vehicle collider never found its vehicle and was left as a static prop.
    ColliderOrphaned {
        slot: u32,
        position: Vec3,
    },
}

/// Destination for events. `Vec<SimEvent>` is the usual buffer.
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        self.push(event);
    }
}
