use std::{collections::BTreeMap, sync::Arc};

use construct_lighting::{
    bake_equirectangular, intersect_any, radiance_along, Environment, ExtractStats,
    IrradianceCache, Intersection, LightingConfig, Ray, Rgb, Sky, SkyConfig, SoupSource,
    TickStats, TriangleSoup,
};
use construct_model::{ObjectId, ObjectKind};
use construct_texture::Texture;
use serde_json::Value;

use crate::{
    publish::{publish, PublishStats},
    Behavior, HeadPose, Object, ObjectBuilder,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub behaviors: usize,
    pub deleted: usize,
    /// Set when the static soup was rebuilt this step.
    pub extracted: Option<ExtractStats>,
    pub ui_triangles: usize,
    pub lighting: TickStats,
    pub published: PublishStats,
}

/// Owns every object and keeps their lighting up to date, one bounded step at a time.
pub struct Scene {
    objects: BTreeMap<ObjectId, Object>,
    next_id: u64,
    deletion: Vec<ObjectId>,

    static_soup: TriangleSoup,
    ui_soup: TriangleSoup,
    cache: IrradianceCache,
    environment: Box<dyn Environment>,
    background: Option<(u32, Arc<Texture>)>,

    geometry_dirty: bool,
    behavior_counter: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_environment(LightingConfig::default(), Box::new(Sky::new()))
    }

    pub fn with_sky(lighting: LightingConfig, sky: &SkyConfig) -> Self {
        Self::with_environment(lighting, Box::new(Sky::from_config(sky)))
    }

    pub fn with_environment(lighting: LightingConfig, environment: Box<dyn Environment>) -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 0,
            deletion: Vec::new(),
            static_soup: TriangleSoup::new(),
            ui_soup: TriangleSoup::new(),
            cache: IrradianceCache::new(lighting),
            environment,
            background: None,
            geometry_dirty: false,
            behavior_counter: 0,
        }
    }

    pub fn create_object<F>(&mut self, builder_pattern: F) -> ObjectId
    where
        F: FnOnce(ObjectBuilder) -> ObjectBuilder,
    {
        construct_profiling::profile_function!();

        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let object = builder_pattern(ObjectBuilder::new(id)).build();
        if object.kind() == ObjectKind::Static {
            self.geometry_dirty = true;
        }
        self.objects.insert(id, object);

        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    /// Objects in id order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Queues `id` for removal at the next step.
    pub fn delete(&mut self, id: ObjectId) {
        self.deletion.push(id);
    }

    pub fn send_message(&mut self, id: ObjectId, message: Value) {
        match self.objects.get_mut(&id) {
            Some(object) => object.add_message(message),
            None => log::debug!("Dropped message for missing object {}: {}", id, message),
        }
    }

    pub fn get_message(&mut self, id: ObjectId) -> Option<Value> {
        self.objects.get_mut(&id)?.get_message()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn static_soup(&self) -> &TriangleSoup {
        &self.static_soup
    }

    pub fn ui_soup(&self) -> &TriangleSoup {
        &self.ui_soup
    }

    pub fn lighting(&self) -> &IrradianceCache {
        &self.cache
    }

    fn sources(&self) -> Vec<SoupSource<'_>> {
        self.objects.values().filter_map(Object::soup_source).collect()
    }

    /// Rebuilds the static soup, keeping the lighting of unchanged triangles.
    pub fn update_geometry(&mut self) -> ExtractStats {
        construct_profiling::profile_function!();

        let weld_tolerance = self.cache.config().weld_tolerance;
        let (soup, stats) =
            TriangleSoup::extract_static(&self.sources(), &self.static_soup, weld_tolerance);
        self.static_soup = soup;
        self.geometry_dirty = false;

        stats
    }

    fn update_ui_geometry(&mut self) {
        self.ui_soup = TriangleSoup::extract_ui(&self.sources());
    }

    /// Advances the world by one tick.
    pub fn step(&mut self, head: &dyn HeadPose) -> StepStats {
        construct_profiling::profile_function!();

        let mut stats = StepStats {
            behaviors: self.step_behaviors(head),
            deleted: self.apply_deletions(),
            ..Default::default()
        };

        for object in self.objects.values_mut() {
            if object.take_static_changed() {
                self.geometry_dirty = true;
            }
        }
        if self.geometry_dirty {
            stats.extracted = Some(self.update_geometry());
        }

        self.update_ui_geometry();
        stats.ui_triangles = self.ui_soup.len();

        stats.lighting = self
            .cache
            .step(&mut self.static_soup, self.environment.as_ref());
        stats.published = publish(&mut self.objects, &self.static_soup);

        stats
    }

    fn step_behaviors(&mut self, head: &dyn HeadPose) -> usize {
        construct_profiling::profile_scope!("behaviors");

        let parity = self.behavior_counter % 2;
        self.behavior_counter += 1;

        let due: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(id, object)| {
                id.0 % 2 == parity && !matches!(object.behavior, Behavior::None)
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &due {
            let Some(object) = self.objects.get_mut(id) else {
                continue;
            };

            // Detached while running so the behavior may borrow the whole scene.
            let mut behavior = std::mem::take(&mut object.behavior);
            behavior.step(*id, self, head);
            if let Some(object) = self.objects.get_mut(id) {
                object.behavior = behavior;
            }
        }

        due.len()
    }

    fn apply_deletions(&mut self) -> usize {
        let mut deleted = 0;
        for id in std::mem::take(&mut self.deletion) {
            match self.objects.remove(&id) {
                Some(object) => {
                    log::debug!("Deleted object {}", id);
                    if object.kind() == ObjectKind::Static {
                        self.geometry_dirty = true;
                    }
                    deleted += 1;
                }
                None => log::debug!("Object {} was already deleted", id),
            }
        }
        deleted
    }

    /// Nearest lit or UI surface along `ray`.
    pub fn intersect_any(&self, ray: &Ray) -> Option<Intersection> {
        intersect_any(&self.static_soup, &self.ui_soup, ray)
    }

    /// Radiance seen along `ray`, from the cache or the environment.
    pub fn radiance(&self, ray: &Ray) -> Rgb {
        radiance_along(ray, &self.static_soup, self.environment.as_ref())
    }

    /// Equirectangular image of the environment, baked on first use per height.
    pub fn background_image(&mut self, height: u32) -> Arc<Texture> {
        if let Some((baked_height, texture)) = &self.background {
            if *baked_height == height {
                return texture.clone();
            }
        }

        let texture = Arc::new(bake_equirectangular(self.environment.as_ref(), height));
        self.background = Some((height, texture.clone()));
        texture
    }
}

#[cfg(test)]
mod tests {
    use construct_lighting::UniformEnvironment;
    use construct_model::shapes;
    use glam::Vec3;
    use serde_json::json;

    use super::*;
    use crate::FixedHead;

    fn head() -> FixedHead {
        FixedHead::new(Vec3::new(0.0, 0.0, 1.4), Vec3::Y)
    }

    fn uniform_scene() -> Scene {
        Scene::with_environment(
            LightingConfig::default(),
            Box::new(UniformEnvironment(Rgb::splat(1.0))),
        )
    }

    fn add_cube(scene: &mut Scene, center: Vec3) -> ObjectId {
        scene.create_object(|builder| {
            builder.geometry(shapes::cuboid(Vec3::ONE, center, Vec3::ONE))
        })
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut scene = uniform_scene();
        let a = add_cube(&mut scene, Vec3::ZERO);
        let b = add_cube(&mut scene, Vec3::X * 3.0);
        assert_eq!((a, b), (ObjectId(0), ObjectId(1)));

        scene.delete(b);
        assert!(scene.get(b).is_some());
        let stats = scene.step(&head());
        assert_eq!(stats.deleted, 1);
        assert!(scene.get(b).is_none());

        assert_eq!(add_cube(&mut scene, Vec3::ZERO), ObjectId(2));
    }

    #[test]
    fn extraction_follows_static_changes() {
        let mut scene = uniform_scene();
        let a = add_cube(&mut scene, Vec3::ZERO);

        let stats = scene.step(&head());
        assert_eq!(stats.extracted.map(|e| e.triangles), Some(12));
        assert!(scene.step(&head()).extracted.is_none());

        scene
            .get_mut(a)
            .unwrap()
            .set_geometry(shapes::cuboid(Vec3::ONE, Vec3::ZERO, Vec3::ONE));
        let stats = scene.step(&head());
        assert_eq!(stats.extracted.map(|e| e.carried_over), Some(0));

        scene.delete(a);
        let stats = scene.step(&head());
        assert_eq!(stats.extracted.map(|e| e.triangles), Some(0));
        assert_eq!(stats.published, PublishStats::default());
    }

    #[test]
    fn messages_to_missing_objects_are_dropped() {
        let mut scene = uniform_scene();
        let a = add_cube(&mut scene, Vec3::ZERO);

        scene.send_message(ObjectId(42), json!("lost"));
        scene.send_message(a, json!(1));
        scene.send_message(a, json!(2));

        assert_eq!(scene.get_message(a), Some(json!(2)));
        assert_eq!(scene.get_message(a), Some(json!(1)));
        assert_eq!(scene.get_message(a), None);
        assert_eq!(scene.get_message(ObjectId(42)), None);
    }

    #[test]
    fn publish_writes_cached_radiance_into_colors() {
        let mut scene = uniform_scene();
        let a = add_cube(&mut scene, Vec3::ZERO);

        let stats = scene.step(&head());
        assert_eq!(stats.published.triangles, 12);
        assert_eq!(stats.published.objects, 1);

        let object = scene.get_mut(a).unwrap();
        let geometry = object.geometry_mut().unwrap();
        assert!(geometry.take_data_changed());

        let soup_triangle = scene.static_soup().triangles()[0].clone();
        let geometry = scene.get(a).unwrap().geometry().unwrap();
        let first = soup_triangle.key.index as usize * 3;
        for corner in 0..3 {
            assert_eq!(
                geometry.pos_color_vertices()[first + corner].color,
                soup_triangle.ir[corner].0
            );
        }
    }

    #[test]
    fn textured_statics_keep_their_colors() {
        let mut scene = uniform_scene();
        let texture = Arc::new(Texture::from_rgb32f("white", 1, 1, &[Vec3::ONE]));
        let a = scene.create_object(|builder| {
            builder
                .geometry(shapes::cuboid(Vec3::ONE, Vec3::ZERO, Vec3::splat(0.25)))
                .texture(texture)
        });

        let stats = scene.step(&head());
        assert_eq!(stats.published.triangles, 12);
        assert_eq!(stats.published.objects, 0);
        let geometry = scene.get(a).unwrap().geometry().unwrap();
        assert!(geometry
            .pos_color_vertices()
            .iter()
            .all(|v| v.color == Vec3::splat(0.25)));
    }

    #[test]
    fn behaviors_alternate_between_even_and_odd_ids() {
        let mut scene = uniform_scene();
        for _ in 0..3 {
            scene.create_object(|builder| {
                builder
                    .kind(ObjectKind::Ui)
                    .behavior(Behavior::TextLabel(crate::TextLabel::new("")))
            });
        }

        assert_eq!(scene.step(&head()).behaviors, 2);
        assert_eq!(scene.step(&head()).behaviors, 1);
        assert_eq!(scene.step(&head()).behaviors, 2);
    }

    #[test]
    fn background_is_baked_once_per_height() {
        let mut scene = uniform_scene();
        let a = scene.background_image(8);
        let b = scene.background_image(8);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!((a.width(), a.height()), (16, 8));

        let c = scene.background_image(4);
        assert_eq!(c.height(), 4);
    }
}
