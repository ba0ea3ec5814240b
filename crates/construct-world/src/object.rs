use std::sync::Arc;

use construct_lighting::{Rgb, SoupSource, DEFAULT_REFLECTANCE};
use construct_model::{Geometry, ObjectId, ObjectKind};
use construct_texture::Texture;
use construct_transform::Transform;
use glam::Affine3A;
use serde_json::Value;

use crate::Behavior;

/// A scene node: geometry plus the state its behavior works on.
///
/// Static geometry is authored in world space; the transform only places UI
/// kinds, whose triangles are re-derived every tick.
#[derive(Debug)]
pub struct Object {
    id: ObjectId,
    kind: ObjectKind,
    geometry: Option<Geometry>,
    /// Bumped whenever the geometry or kind is replaced.
    revision: u64,
    /// Set by edits that invalidate the extracted static soup.
    static_changed: bool,
    pub texture: Option<Arc<Texture>>,
    pub use_blend: bool,
    /// Reflectance of the object's lit triangles.
    reflectance: Rgb,
    pub transform: Transform,
    pub behavior: Behavior,
    queue: Vec<Value>,
}

impl Object {
    fn new(id: ObjectId) -> Self {
        Self {
            id,
            kind: ObjectKind::Static,
            geometry: None,
            revision: 0,
            static_changed: false,
            texture: None,
            use_blend: false,
            reflectance: DEFAULT_REFLECTANCE,
            transform: Transform::default(),
            behavior: Behavior::None,
            queue: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Moving an object into or out of the lit set restarts its lighting.
    /// Static objects need `PosColor` geometry.
    pub fn set_kind(&mut self, kind: ObjectKind) {
        if self.kind == kind {
            return;
        }

        let was_static = self.kind == ObjectKind::Static;
        self.kind = kind;
        self.revision += 1;
        self.static_changed |= was_static || kind == ObjectKind::Static;
    }

    pub fn reflectance(&self) -> Rgb {
        self.reflectance
    }

    /// Takes effect at the next step; cached lighting is kept.
    pub fn set_reflectance(&mut self, reflectance: Rgb) {
        self.reflectance = reflectance;
        self.static_changed |= self.kind == ObjectKind::Static;
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Access for the uploader (`take_data_changed`). Replacing vertices in place
    /// must keep the triangle count; use `set_geometry` for anything else.
    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        self.geometry.as_mut()
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
        self.revision += 1;
        self.static_changed |= self.kind == ObjectKind::Static;
    }

    pub fn clear_geometry(&mut self) {
        if self.geometry.take().is_some() {
            self.revision += 1;
            self.static_changed |= self.kind == ObjectKind::Static;
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn take_static_changed(&mut self) -> bool {
        std::mem::replace(&mut self.static_changed, false)
    }

    pub fn local_to_world(&self) -> Affine3A {
        self.transform.local_to_world()
    }

    pub fn add_message(&mut self, message: Value) {
        self.queue.push(message);
    }

    /// Pops the most recently delivered message.
    pub fn get_message(&mut self) -> Option<Value> {
        self.queue.pop()
    }

    pub fn num_pending_messages(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn soup_source(&self) -> Option<SoupSource<'_>> {
        let geometry = self.geometry.as_ref()?;
        let local_to_world = match self.kind {
            ObjectKind::Static => Affine3A::IDENTITY,
            _ => self.local_to_world(),
        };

        Some(SoupSource {
            id: self.id,
            revision: self.revision,
            kind: self.kind,
            geometry,
            local_to_world,
            reflectance: self.reflectance,
        })
    }
}

/// Configures a freshly created object, see [`crate::Scene::create_object`].
pub struct ObjectBuilder {
    object: Object,
}

impl ObjectBuilder {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            object: Object::new(id),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.object.id
    }

    pub fn kind(mut self, kind: ObjectKind) -> Self {
        self.object.kind = kind;
        self
    }

    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.object.geometry = Some(geometry);
        self
    }

    pub fn texture(mut self, texture: Arc<Texture>) -> Self {
        self.object.texture = Some(texture);
        self
    }

    pub fn blend(mut self, use_blend: bool) -> Self {
        self.object.use_blend = use_blend;
        self
    }

    pub fn reflectance(mut self, reflectance: Rgb) -> Self {
        self.object.reflectance = reflectance;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.object.transform = transform;
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.object.behavior = behavior;
        self
    }

    pub(crate) fn build(self) -> Object {
        self.object
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn messages_are_last_in_first_out() {
        let mut object = Object::new(ObjectId(3));
        object.add_message(json!("first"));
        object.add_message(json!({"cursor": [0.5, 0.5]}));
        object.add_message(json!("last"));

        assert_eq!(object.num_pending_messages(), 3);
        assert_eq!(object.get_message(), Some(json!("last")));
        assert_eq!(object.get_message(), Some(json!({"cursor": [0.5, 0.5]})));
        assert_eq!(object.get_message(), Some(json!("first")));
        assert_eq!(object.get_message(), None);
    }

    #[test]
    fn replacing_geometry_bumps_revision() {
        let mut object = ObjectBuilder::new(ObjectId(0))
            .geometry(Geometry::new_pos_color(vec![0.0; 18]))
            .build();
        assert_eq!(object.revision(), 0);

        object.set_geometry(Geometry::new_pos_color(vec![0.0; 36]));
        assert_eq!(object.revision(), 1);
        assert!(object.take_static_changed());
        assert!(!object.take_static_changed());

        object.clear_geometry();
        object.clear_geometry();
        assert_eq!(object.revision(), 2);
        assert!(object.soup_source().is_none());
    }

    #[test]
    fn kind_changes_touching_static_invalidate_the_soup() {
        let mut object = ObjectBuilder::new(ObjectId(1))
            .kind(ObjectKind::Ui)
            .geometry(Geometry::new_pos_uv(vec![0.0; 15]))
            .build();

        object.set_kind(ObjectKind::UiCursor);
        assert_eq!(object.revision(), 1);
        assert!(!object.take_static_changed());

        object.set_kind(ObjectKind::Static);
        assert_eq!(object.revision(), 2);
        assert!(object.take_static_changed());

        object.set_kind(ObjectKind::Static);
        assert_eq!(object.revision(), 2);
        assert!(!object.take_static_changed());

        object.set_kind(ObjectKind::Sky);
        assert!(object.take_static_changed());
    }

    #[test]
    fn reflectance_edits_keep_the_revision() {
        let mut object = ObjectBuilder::new(ObjectId(2))
            .geometry(Geometry::new_pos_color(vec![0.0; 18]))
            .build();

        object.set_reflectance(Rgb::splat(0.25));
        assert_eq!(object.reflectance(), Rgb::splat(0.25));
        assert_eq!(object.revision(), 0);
        assert!(object.take_static_changed());
    }
}
