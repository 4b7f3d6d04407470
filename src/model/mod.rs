// MODEL: Game state and data
pub mod camera;
pub mod world;

pub use camera::{Camera, CameraConfig, Projection};
pub use world::{Entity, EntityId, EntityKind, Transform, World};
