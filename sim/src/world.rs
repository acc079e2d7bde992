/*!
The simulation boundary.

[`Simulation`] owns every actor list and the static geometry. It is single-threaded:
asset loaders hand completed loads to a [`LoadSender`] from wherever they run, and the
tick drains them before touching any actor.

Tick order
1) drain completed loads, advance collider attach retries,
2) enter/exit on the rising edge of the interact key,
3) every vehicle (the occupied one driven, the rest coasting),
4) the on-foot player,
5) vehicle impacts on props and NPCs (queued as impulses),
6) props: integrate, then walls, then ground,
7) NPC state machines.
*/

use crate::{
    body::RigidBody,
    collision::{Bounds, StaticGeometry, SurfaceProbe, SurfaceSet},
    config::SimConfig,
    error::SimError,
    events::{ImpactTarget, SimEvent},
    impact::{knock_prop, strike_npc},
    input::InputState,
    loading::{LoadEvent, LoadQueue, LoadSender, OrphanCollider, ReadyVehicle, VehicleAssembly},
    npc::{Npc, NpcMode},
    player::{Player, PlayerEvent},
    rapier_world::WorldStaticDef,
    registry::{NpcId, PropId, Registry, VehicleId},
    resolver::{resolve_ground, resolve_walls},
    telemetry::{NpcSnapshot, PropSnapshot, Transform, VehicleTelemetry},
    utils::{Vec3, planar_distance},
    vehicle::Vehicle,
};
use rand::{SeedableRng, rngs::StdRng};

/// A driveable car: the dynamics model plus the collider it was assembled with.
#[derive(Clone, Debug)]
pub struct Car {
    pub slot: u32,
    pub model: Vehicle,
    pub bounds: Bounds,
}

pub struct Simulation {
    config: SimConfig,
    geometry: StaticGeometry,
    loads: LoadQueue,
    assembly: VehicleAssembly,

    cars: Registry<VehicleId, Car>,
    props: Registry<PropId, RigidBody>,
    npcs: Registry<NpcId, Npc>,
    orphans: Vec<OrphanCollider>,

    player: Player,
    active: Option<VehicleId>,
    interact_held: bool,

    rng: StdRng,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Validate `config` and build an empty world. `seed` drives every random choice.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let player = Player::new(Vec3::from(config.world.player_spawn_m), 0.0);
        Ok(Self {
            config,
            geometry: StaticGeometry::new(),
            loads: LoadQueue::new(),
            assembly: VehicleAssembly::default(),
            cars: Registry::default(),
            props: Registry::default(),
            npcs: Registry::default(),
            orphans: Vec::new(),
            player,
            active: None,
            interact_held: false,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    /// Handle for asset loaders.
    pub fn load_sender(&self) -> LoadSender {
        self.loads.sender()
    }

    /// Advance everything by `dt` seconds (clamped to `tick.max_dt_s`).
    pub fn tick(&mut self, dt: f32, input: &InputState) {
        let dt = dt.clamp(0.0, self.config.tick.max_dt_s);

        // 1) Loads.
        self.drain_loads(dt);

        // 2) Occupancy.
        let pressed = input.interact && !self.interact_held;
        self.interact_held = input.interact;
        if pressed {
            self.toggle_occupancy();
        }

        // 3) Vehicles.
        self.step_vehicles(input, dt);

        // 4) Player.
        if self.active.is_none() {
            let flat = self.config.world.flat_ground_height_m;
            let events = self
                .player
                .step(input, &self.geometry, &self.config.player, flat, dt);
            self.events.extend(events.into_iter().map(|e| match e {
                PlayerEvent::Jumped { position } => SimEvent::Jumped { position },
                PlayerEvent::Landed { position } => SimEvent::Landed { position },
                PlayerEvent::Footstep { position } => SimEvent::Footstep { position },
            }));
        }

        // 5) Impacts.
        self.apply_impacts();

        // 6) Props.
        let flat = self.config.world.flat_ground_height_m;
        let prop = &self.config.prop;
        for (_, body) in self.props.iter_mut() {
            body.integrate(dt);
            resolve_walls(body, &self.geometry, &prop.body, dt);
            resolve_ground(body, &self.geometry, &prop.body, flat, prop.initial_probe_lift_m, dt);
        }

        // 7) NPCs.
        for (id, npc) in self.npcs.iter_mut() {
            if let Some(t) = npc.step(&self.geometry, &self.config.npc, flat, &mut self.rng, dt) {
                log::debug!("{id}: {:?} -> {:?}", t.from, t.to);
                self.events.push(SimEvent::NpcStateChanged {
                    npc: id,
                    from: t.from,
                    to: t.to,
                });
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn vehicle_telemetry(&self) -> Vec<VehicleTelemetry> {
        self.cars
            .iter()
            .map(|(id, car)| {
                let occupied = self.active == Some(id);
                VehicleTelemetry::capture(id, &car.model, &self.config.vehicle, occupied)
            })
            .collect()
    }

    pub fn npc_transforms(&self) -> Vec<NpcSnapshot> {
        self.npcs
            .iter()
            .map(|(id, npc)| NpcSnapshot::capture(id, npc))
            .collect()
    }

    pub fn prop_transforms(&self) -> Vec<PropSnapshot> {
        self.props
            .iter()
            .map(|(id, body)| PropSnapshot {
                id,
                transform: Transform {
                    position: body.position,
                    rotation: body.rotation,
                },
                grounded: body.is_grounded,
            })
            .collect()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The occupied vehicle, if the player is driving.
    pub fn active_vehicle(&self) -> Option<VehicleId> {
        self.active
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Car> {
        self.cars.get(id)
    }

    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id)
    }

    pub fn prop(&self, id: PropId) -> Option<&RigidBody> {
        self.props.get(id)
    }

    pub fn geometry(&self) -> &StaticGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Colliders that gave up waiting for their vehicle.
    pub fn orphaned_colliders(&self) -> &[OrphanCollider] {
        &self.orphans
    }

    /// Vehicle slots still waiting on one of their loads.
    pub fn pending_vehicles(&self) -> usize {
        self.assembly.pending()
    }

    fn drain_loads(&mut self, dt: f32) {
        let loads = self.loads.drain();
        if !loads.is_empty() {
            log::debug!("draining {} completed loads", loads.len());
        }

        for load in loads {
            match load {
                LoadEvent::GroundMeshLoaded { defs } => self.add_geometry(SurfaceSet::Ground, defs),
                LoadEvent::WallMeshLoaded { defs } => self.add_geometry(SurfaceSet::Walls, defs),
                LoadEvent::VehicleVisualLoaded { slot, position, yaw } => {
                    self.assembly.visual_loaded(slot, position, yaw);
                }
                LoadEvent::VehicleColliderLoaded {
                    slot,
                    bounds,
                    fallback_position,
                } => {
                    let world = &self.config.world;
                    if let Some(ready) =
                        self.assembly.collider_loaded(slot, bounds, fallback_position, world)
                    {
                        self.register_vehicle(ready);
                    }
                }
                LoadEvent::PropLoaded { position, bounds } => {
                    let prop = &self.config.prop;
                    let body =
                        RigidBody::spawning(position, bounds, &prop.body, prop.spawn_grace_s);
                    let id = self.props.insert(body);
                    log::debug!(
                        "{id} spawned at ({:.2}, {:.2}, {:.2})",
                        position.x,
                        position.y,
                        position.z
                    );
                }
                LoadEvent::NpcSpawned { position } => {
                    let npc = Npc::new(position, &self.config.npc, &mut self.rng);
                    let id = self.npcs.insert(npc);
                    log::debug!(
                        "{id} spawned at ({:.2}, {:.2}, {:.2})",
                        position.x,
                        position.y,
                        position.z
                    );
                }
            }
        }

        let (ready, orphans) = self.assembly.poll(dt, &self.config.world);
        for vehicle in ready {
            self.register_vehicle(vehicle);
        }
        for orphan in orphans {
            self.events.push(SimEvent::ColliderOrphaned {
                slot: orphan.slot,
                position: orphan.position,
            });
            self.orphans.push(orphan);
        }
    }

    fn add_geometry(&mut self, set: SurfaceSet, defs: Vec<WorldStaticDef>) {
        if let Err(err) = self.geometry.extend(set, defs) {
            log::error!("skipping {set:?} geometry load: {err}");
        }
    }

    /// Drop a newly assembled car onto the ground below its spawn point.
    fn register_vehicle(&mut self, ready: ReadyVehicle) {
        let world = &self.config.world;
        let mut position = ready.position;
        position.y = self
            .geometry
            .ground_below_from(
                position.x,
                position.z,
                world.vehicle_spawn_probe_y_m,
                world.vehicle_spawn_probe_range_m,
            )
            .map(|hit| hit.point.y + world.vehicle_spawn_clearance_m)
            .unwrap_or(world.flat_ground_height_m);

        let model = Vehicle::new(position, ready.yaw, &self.config.vehicle);
        let id = self.cars.insert(Car {
            slot: ready.slot,
            model,
            bounds: ready.bounds,
        });
        log::info!(
            "{id} (slot {}) driveable at ({:.2}, {:.2}, {:.2})",
            ready.slot,
            position.x,
            position.y,
            position.z
        );
        self.events.push(SimEvent::VehicleReady { vehicle: id, position });
    }

    fn toggle_occupancy(&mut self) {
        match self.active {
            Some(id) => self.exit_vehicle(id),
            None => self.enter_nearest_vehicle(),
        }
    }

    fn enter_nearest_vehicle(&mut self) {
        let reach = self.config.player.enter_vehicle_distance_m;
        let eye = self.player.position;
        let nearest = self
            .cars
            .iter()
            .map(|(id, car)| (id, planar_distance(&eye, &car.model.position)))
            .filter(|(_, d)| *d <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((id, distance)) = nearest {
            log::info!("entered {id} from {distance:.2} m");
            self.active = Some(id);
            self.events.push(SimEvent::VehicleEntered { vehicle: id });
        }
    }

    /// Step out to the car's right, standing on whatever ground is there.
    fn exit_vehicle(&mut self, id: VehicleId) {
        let Some(car) = self.cars.get(id) else {
            self.active = None;
            return;
        };
        let params = &self.config.player;
        let car = &car.model;
        let mut eye = car.position + car.right() * params.exit_side_offset_m;
        let ground_y = if self.geometry.has_set(SurfaceSet::Ground) {
            let from_y = car.position.y + params.exit_probe_lift_m;
            self.geometry
                .ground_below_from(eye.x, eye.z, from_y, params.exit_probe_range_m)
                .map(|hit| hit.point.y)
        } else {
            None
        };
        eye.y = ground_y.unwrap_or(self.config.world.flat_ground_height_m) + params.eye_height_m;

        let yaw = car.yaw;
        self.player.place(eye);
        self.player.yaw = yaw;
        self.active = None;
        log::info!("exited {id}");
        self.events.push(SimEvent::VehicleExited {
            vehicle: id,
            position: eye,
        });
    }

    fn step_vehicles(&mut self, input: &InputState, dt: f32) {
        let driver = input.driver_input();
        let flat = self.config.world.flat_ground_height_m;
        for (id, car) in self.cars.iter_mut() {
            let occupied = self.active == Some(id);
            let report = car.model.step(
                occupied.then_some(&driver),
                &self.config.vehicle,
                &self.config.probe,
                &self.geometry,
                flat,
                dt,
            );

            if report.gear_change.is_some() {
                let gear = car.model.gear_display();
                log::debug!("{id} shifted to {gear}");
                self.events.push(SimEvent::GearChanged { vehicle: id, gear });
            }
            for bump in report.wall_bumps {
                self.events.push(SimEvent::Impact {
                    vehicle: id,
                    target: ImpactTarget::Wall,
                    point: bump.hit.point,
                    normal: bump.hit.normal,
                    speed: bump.speed,
                });
            }
        }
    }

    fn apply_impacts(&mut self) {
        let vehicle_mass = self.config.vehicle.mass_kg;
        let (prop_params, npc_params) = (&self.config.prop, &self.config.npc);
        for (vehicle, car) in self.cars.iter() {
            let car = &car.model;
            let (position, velocity, speed) = (car.position, car.velocity(), car.speed());
            let forward = car.forward();

            for (prop_id, body) in self.props.iter_mut() {
                let rng = &mut self.rng;
                if let Some(hit) = knock_prop(body, &position, &forward, speed, prop_params, rng) {
                    self.events.push(SimEvent::Impact {
                        vehicle,
                        target: ImpactTarget::Prop(prop_id),
                        point: hit.point,
                        normal: hit.normal,
                        speed: hit.speed,
                    });
                }
            }

            for (npc_id, npc) in self.npcs.iter_mut() {
                if npc.mode() == NpcMode::Recovering {
                    continue;
                }
                let Some((hit, delta_v, spin)) = strike_npc(
                    &mut npc.body,
                    &position,
                    &velocity,
                    vehicle_mass,
                    npc_params,
                    &mut self.rng,
                ) else {
                    continue;
                };
                self.events.push(SimEvent::Impact {
                    vehicle,
                    target: ImpactTarget::Npc(npc_id),
                    point: hit.point,
                    normal: hit.normal,
                    speed: hit.speed,
                });
                if let Some(t) = npc.hit(delta_v, spin) {
                    log::debug!("{npc_id} hit by {vehicle}: {:?} -> {:?}", t.from, t.to);
                    self.events.push(SimEvent::NpcStateChanged {
                        npc: npc_id,
                        from: t.from,
                        to: t.to,
                    });
                }
            }
        }
    }
}
