use glam::Vec3;

/// Position and orientation of an entity.
///
/// Rotations are in degrees: `x_rot` pitches about the X axis, `y_rot` yaws
/// about the Y axis. Degrees feed straight into the camera transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub x_rot: f32,
    pub y_rot: f32,
}

impl Transform {
    pub fn new(position: Vec3) -> Self {
        Self { position, x_rot: 0.0, y_rot: 0.0 }
    }
}

/// Copyable handle to an entity. A handle that no longer resolves means the
/// entity was removed; callers must treat that as fatal for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Prop,
}

#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub transform: Transform,
}

/// Flat entity store. The play loop only ever resolves handles and mutates
/// transforms through it; it never removes entities.
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: EntityKind, transform: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity { id, kind, transform });
        id
    }

    /// First entity of the given kind, in spawn order.
    pub fn first_of_kind(&self, kind: EntityKind) -> Option<EntityId> {
        self.entities.iter().find(|e| e.kind == kind).map(|e| e.id)
    }

    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.entities.iter().find(|e| e.id == id).map(|e| &e.transform)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.entities.iter_mut().find(|e| e.id == id).map(|e| &mut e.transform)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}
