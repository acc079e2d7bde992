/*!
Asynchronous asset completions.

Loads never touch live simulation state. Each completed load is sent as a [`LoadEvent`]
over a channel; [`crate::Simulation::tick`] drains the channel at the start of the tick,
so the actor lists only grow between steps.

A vehicle needs two loads: its visual (which fixes the spawn pose) and its collider
(which fixes the bounds). [`VehicleAssembly`] pairs them by slot:
- visual first: the collider attaches as soon as it arrives,
- collider first: it polls for the visual every `collider_retry_interval_s`, and after
  `collider_retry_attempts` polls it gives up and is left behind as an orphan.
*/

use crate::{
    collision::Bounds,
    config::WorldParams,
    rapier_world::WorldStaticDef,
    utils::Vec3,
};
use std::{
    collections::BTreeMap,
    sync::mpsc::{self, Receiver, SendError, Sender, TryRecvError},
};

/// A completed asset load.
#[derive(Clone, Debug)]
pub enum LoadEvent {
    /// Colliders to add to the ground set.
    GroundMeshLoaded { defs: Vec<WorldStaticDef> },
    /// Colliders to add to the wall/building set.
    WallMeshLoaded { defs: Vec<WorldStaticDef> },
    VehicleVisualLoaded { slot: u32, position: Vec3, yaw: f32 },
    VehicleColliderLoaded {
        slot: u32,
        bounds: Bounds,
        /// Where the collider is left if its vehicle never shows up.
        fallback_position: Vec3,
    },
    PropLoaded { position: Vec3, bounds: Bounds },
    NpcSpawned { position: Vec3 },
}

/// Cloneable handle for loaders. Safe to move to other threads.
#[derive(Clone, Debug)]
pub struct LoadSender {
    tx: Sender<LoadEvent>,
}

impl LoadSender {
    /// Queue a completed load. Fails only after the simulation is dropped.
    pub fn send(&self, event: LoadEvent) -> Result<(), SendError<LoadEvent>> {
        self.tx.send(event)
    }
}

/// Receiving end, owned by the simulation.
#[derive(Debug)]
pub(crate) struct LoadQueue {
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
}

impl LoadQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> LoadSender {
        LoadSender { tx: self.tx.clone() }
    }

    /// Everything queued so far, in arrival order.
    pub(crate) fn drain(&self) -> Vec<LoadEvent> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => out.push(event),
                // The queue holds its own sender, so it never disconnects.
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

/// A vehicle whose visual and collider have both arrived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadyVehicle {
    pub slot: u32,
    pub position: Vec3,
    pub yaw: f32,
    pub bounds: Bounds,
}

/// A collider that gave up waiting for its vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrphanCollider {
    pub slot: u32,
    pub position: Vec3,
    pub bounds: Bounds,
}

#[derive(Clone, Copy, Debug)]
struct WaitingCollider {
    bounds: Bounds,
    fallback_position: Vec3,
    attempts: u32,
    until_poll: f32,
}

/// Pairs vehicle visuals with their colliders.
#[derive(Debug, Default)]
pub struct VehicleAssembly {
    visuals: BTreeMap<u32, (Vec3, f32)>,
    colliders: BTreeMap<u32, WaitingCollider>,
}

impl VehicleAssembly {
    pub fn visual_loaded(&mut self, slot: u32, position: Vec3, yaw: f32) {
        log::debug!("vehicle slot {slot}: visual loaded");
        self.visuals.insert(slot, (position, yaw));
    }

    /// Attach immediately when the visual is already there; otherwise start polling.
    pub fn collider_loaded(
        &mut self,
        slot: u32,
        bounds: Bounds,
        fallback_position: Vec3,
        params: &WorldParams,
    ) -> Option<ReadyVehicle> {
        if let Some((position, yaw)) = self.visuals.remove(&slot) {
            return Some(ReadyVehicle {
                slot,
                position,
                yaw,
                bounds,
            });
        }
        log::debug!("vehicle slot {slot}: collider waiting for visual");
        self.colliders.insert(
            slot,
            WaitingCollider {
                bounds,
                fallback_position,
                attempts: 0,
                until_poll: params.collider_retry_interval_s,
            },
        );
        None
    }

    /// Advance the retry timers.
    pub fn poll(
        &mut self,
        dt: f32,
        params: &WorldParams,
    ) -> (Vec<ReadyVehicle>, Vec<OrphanCollider>) {
        let mut ready = Vec::new();
        let mut orphans = Vec::new();

        let visuals = &mut self.visuals;
        self.colliders.retain(|&slot, waiting| {
            waiting.until_poll -= dt;
            if waiting.until_poll > 0.0 {
                return true;
            }
            waiting.until_poll += params.collider_retry_interval_s;
            waiting.attempts += 1;

            if let Some((position, yaw)) = visuals.remove(&slot) {
                log::debug!(
                    "vehicle slot {slot}: collider attached after {} polls",
                    waiting.attempts
                );
                ready.push(ReadyVehicle {
                    slot,
                    position,
                    yaw,
                    bounds: waiting.bounds,
                });
                return false;
            }
            if waiting.attempts >= params.collider_retry_attempts {
                log::warn!(
                    "vehicle slot {slot}: no visual after {} polls, leaving collider as a static prop",
                    waiting.attempts
                );
                orphans.push(OrphanCollider {
                    slot,
                    position: waiting.fallback_position,
                    bounds: waiting.bounds,
                });
                return false;
            }
            true
        });

        (ready, orphans)
    }

    /// Slots still missing one of their two loads.
    pub fn pending(&self) -> usize {
        self.visuals.len() + self.colliders.len()
    }
}
