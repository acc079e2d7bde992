//! Logs simulation events and periodic telemetry, standing in for the HUD and audio layer.

use sandbox_sim::{ImpactTarget, SimEvent, Simulation};

/// Log one event at a level matching how often it fires.
pub fn log_event(time_s: f32, event: &SimEvent) {
    match event {
        SimEvent::GearChanged { vehicle, gear } => {
            log::debug!("[{time_s:7.2}] {vehicle} gear {gear}");
        }
        SimEvent::Impact {
            vehicle,
            target,
            point,
            speed,
            ..
        } => {
            let what = match target {
                ImpactTarget::Prop(id) => id.to_string(),
                ImpactTarget::Npc(id) => id.to_string(),
                ImpactTarget::Wall => "wall".to_string(),
            };
            log::info!(
                "[{time_s:7.2}] {vehicle} hit {what} at ({:.1}, {:.1}, {:.1}), {speed:.1} m/s",
                point.x,
                point.y,
                point.z
            );
        }
        SimEvent::Footstep { .. } => log::trace!("[{time_s:7.2}] footstep"),
        SimEvent::Jumped { .. } => log::debug!("[{time_s:7.2}] jump"),
        SimEvent::Landed { position } => {
            log::debug!("[{time_s:7.2}] landed at y={:.2}", position.y)
        }
        SimEvent::VehicleReady { vehicle, position } => {
            log::info!(
                "[{time_s:7.2}] {vehicle} ready at ({:.1}, {:.1}, {:.1})",
                position.x,
                position.y,
                position.z
            );
        }
        SimEvent::VehicleEntered { vehicle } => log::info!("[{time_s:7.2}] entered {vehicle}"),
        SimEvent::VehicleExited { vehicle, position } => {
            log::info!(
                "[{time_s:7.2}] exited {vehicle} at ({:.1}, {:.1}, {:.1})",
                position.x,
                position.y,
                position.z
            );
        }
        SimEvent::NpcStateChanged { npc, from, to } => {
            log::info!("[{time_s:7.2}] {npc} {from:?} -> {to:?}");
        }
        SimEvent::ColliderOrphaned { slot, position } => {
            log::warn!(
                "[{time_s:7.2}] collider for slot {slot} left at ({:.1}, {:.1}, {:.1})",
                position.x,
                position.y,
                position.z
            );
        }
    }
}

/// One-line dashboard per vehicle plus actor counts.
pub fn log_telemetry(time_s: f32, sim: &Simulation) {
    for t in sim.vehicle_telemetry() {
        log::info!(
            "[{time_s:7.2}] {}{} {:5.1} km/h {:5.0} rpm gear {} slip {:+.3}/{:+.3} pitch {:+.3} roll {:+.3}",
            t.id,
            if t.occupied { "*" } else { "" },
            t.speed_kmh,
            t.engine_rpm,
            t.gear,
            t.slip_front,
            t.slip_rear,
            t.pitch,
            t.roll
        );
    }
    let player = sim.player();
    log::debug!(
        "[{time_s:7.2}] player ({:.1}, {:.2}, {:.1}) props {} npcs {}",
        player.position.x,
        player.position.y,
        player.position.z,
        sim.prop_transforms().len(),
        sim.npc_transforms().len()
    );
}
