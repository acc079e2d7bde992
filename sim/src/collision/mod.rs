/*!
Collision root module.

Everything the simulation knows about static geometry goes through here:

- types:           shared data types (RayHit, SurfaceSet, Bounds)
- settings:        probe tolerances and classification thresholds
- probe:           the `SurfaceProbe` query interface used by every actor kind
- static_geometry: Rapier-backed ground and wall sets implementing `SurfaceProbe`
- ground:          multi-sample ground helpers (lowest height under a footprint)

The physics core never sees scene-graph nodes, only the opaque ground/wall sets
behind `SurfaceProbe`.
*/

pub mod ground;
pub mod probe;
pub mod settings;
pub mod static_geometry;
pub mod types;

// Re-export commonly used types and functions.
pub use probe::SurfaceProbe;
pub use static_geometry::StaticGeometry;
pub use types::{Bounds, RayHit, SurfaceSet};
