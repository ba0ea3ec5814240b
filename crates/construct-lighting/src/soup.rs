use std::collections::HashMap;

use construct_model::{Geometry, ObjectId, ObjectKind, VertexLayout};
use glam::{Affine3A, Vec2, Vec3};

use crate::{Intersection, Ray, Rgb, Triangle, TriangleKey, DEFAULT_REFLECTANCE};

/// Welded corners must have normals this close (cosine) to share lighting.
const WELD_NORMAL_COS: f32 = 0.9999;

/// Read-only view of one scene object, as seen by the extractor.
#[derive(Debug, Clone, Copy)]
pub struct SoupSource<'a> {
    pub id: ObjectId,
    /// Geometry revision of the object, bumped whenever its buffer is replaced.
    pub revision: u64,
    pub kind: ObjectKind,
    pub geometry: &'a Geometry,
    pub local_to_world: Affine3A,
    pub reflectance: Rgb,
}

impl<'a> SoupSource<'a> {
    pub fn new(id: ObjectId, kind: ObjectKind, geometry: &'a Geometry) -> Self {
        Self {
            id,
            revision: 0,
            kind,
            geometry,
            local_to_world: Affine3A::IDENTITY,
            reflectance: DEFAULT_REFLECTANCE,
        }
    }
}

/// One triangle corner, `(triangle index in soup, corner 0..3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexSlot {
    pub triangle: u32,
    pub corner: u8,
}

/// Groups of coincident corners that must carry identical lighting.
#[derive(Debug, Clone, Default)]
pub struct WeldTable {
    groups: Vec<Vec<VertexSlot>>,
    /// Per triangle, the group of each corner (`u32::MAX` when unwelded).
    slot_groups: Vec<[u32; 3]>,
}

impl WeldTable {
    const UNWELDED: u32 = u32::MAX;

    /// Welds corners of `triangles[range]`, all of which belong to one mesh.
    ///
    /// Quadratic in the mesh's corner count, which is fine for the hand-built
    /// meshes of a scene but not for scanned geometry.
    fn weld_mesh(
        &mut self,
        triangles: &[Triangle],
        range: std::ops::Range<usize>,
        tolerance: f32,
    ) {
        let slots: Vec<VertexSlot> = range
            .flat_map(|triangle| {
                (0..3u8).map(move |corner| VertexSlot {
                    triangle: triangle as u32,
                    corner,
                })
            })
            .collect();

        let position =
            |slot: &VertexSlot| triangles[slot.triangle as usize].vertex(slot.corner as usize);
        let normal = |slot: &VertexSlot| triangles[slot.triangle as usize].normal;

        let tolerance_sqr = tolerance * tolerance;
        let mut assigned = vec![false; slots.len()];
        for i in 0..slots.len() {
            if assigned[i] {
                continue;
            }

            let anchor = slots[i];
            let mut group = vec![anchor];
            for j in (i + 1)..slots.len() {
                if assigned[j] {
                    continue;
                }

                let other = slots[j];
                if position(&anchor).distance_squared(position(&other)) <= tolerance_sqr
                    && normal(&anchor).dot(normal(&other)) >= WELD_NORMAL_COS
                {
                    assigned[j] = true;
                    group.push(other);
                }
            }

            if group.len() > 1 {
                let group_index = self.groups.len() as u32;
                for slot in &group {
                    self.slot_groups[slot.triangle as usize][slot.corner as usize] = group_index;
                }
                self.groups.push(group);
            }
        }
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, index: usize) -> &[VertexSlot] {
        &self.groups[index]
    }

    /// Group ids touching any corner of `triangle`.
    pub fn groups_of(&self, triangle: usize) -> impl Iterator<Item = u32> + '_ {
        self.slot_groups
            .get(triangle)
            .into_iter()
            .flat_map(|groups| groups.iter().copied())
            .filter(|group| *group != Self::UNWELDED)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub triangles: usize,
    pub carried_over: usize,
    pub skipped_degenerate: usize,
}

/// Flat bag of world-space triangles, queried by linear scan.
#[derive(Debug, Clone, Default)]
pub struct TriangleSoup {
    triangles: Vec<Triangle>,
    welds: WeldTable,
}

impl TriangleSoup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the soup of lit geometry from every `Static` source, in source order.
    ///
    /// Cached lighting of triangles whose key also exists in `previous` is kept,
    /// new triangles start black.
    pub fn extract_static(
        sources: &[SoupSource<'_>],
        previous: &TriangleSoup,
        weld_tolerance: f32,
    ) -> (Self, ExtractStats) {
        construct_profiling::profile_function!();

        let cached: HashMap<TriangleKey, [Rgb; 3]> = previous
            .triangles
            .iter()
            .map(|triangle| (triangle.key, triangle.ir))
            .collect();

        let mut soup = Self::new();
        let mut stats = ExtractStats::default();
        let mut mesh_ranges = Vec::new();

        for source in sources.iter().filter(|s| s.kind == ObjectKind::Static) {
            assert_eq!(
                source.geometry.layout(),
                VertexLayout::PosColor,
                "static object {} must use the PosColor layout",
                source.id
            );

            let start = soup.triangles.len();
            stats.skipped_degenerate += soup.push_source(source);

            for triangle in &mut soup.triangles[start..] {
                triangle.reflectance = source.reflectance;
                if let Some(ir) = cached.get(&triangle.key) {
                    triangle.ir = *ir;
                    stats.carried_over += 1;
                }
            }
            mesh_ranges.push(start..soup.triangles.len());
        }

        soup.welds.slot_groups = vec![[WeldTable::UNWELDED; 3]; soup.triangles.len()];
        for range in mesh_ranges {
            soup.welds.weld_mesh(&soup.triangles, range, weld_tolerance);
        }

        stats.triangles = soup.triangles.len();
        if stats.skipped_degenerate > 0 {
            log::warn!(
                "Skipped {} degenerate triangles during extraction",
                stats.skipped_degenerate
            );
        }
        log::debug!(
            "Extracted {} static triangles ({} carried over, {} weld groups)",
            stats.triangles,
            stats.carried_over,
            soup.welds.num_groups()
        );

        (soup, stats)
    }

    /// Builds the pickable soup from every `Ui` source, transformed to world space.
    pub fn extract_ui(sources: &[SoupSource<'_>]) -> Self {
        construct_profiling::profile_function!();

        let mut soup = Self::new();
        for source in sources.iter().filter(|s| s.kind == ObjectKind::Ui) {
            assert_eq!(
                source.geometry.layout(),
                VertexLayout::PosUv,
                "ui object {} must use the PosUv layout",
                source.id
            );

            soup.push_source(source);
        }
        soup.welds.slot_groups = vec![[WeldTable::UNWELDED; 3]; soup.triangles.len()];

        soup
    }

    /// Appends the triangles of one source, returning the number of skipped degenerates.
    fn push_source(&mut self, source: &SoupSource<'_>) -> usize {
        let geometry = source.geometry;
        let to_world = |vertex: usize| -> Vec3 {
            source
                .local_to_world
                .transform_point3(geometry.position(vertex))
        };
        let uv = |vertex: usize| -> Vec2 {
            match geometry.layout() {
                VertexLayout::PosUv => geometry.pos_uv_vertices()[vertex].uv,
                VertexLayout::PosColor => Vec2::ZERO,
            }
        };

        let mut skipped = 0;
        for index in 0..geometry.num_triangles() {
            let v = index * 3;
            let key = TriangleKey {
                object: source.id,
                revision: source.revision,
                index: index as u32,
            };

            let triangle = Triangle::new(
                to_world(v),
                to_world(v + 1),
                to_world(v + 2),
                key,
            )
            .with_uv(uv(v), uv(v + 1), uv(v + 2));

            if triangle.is_degenerate() {
                log::debug!(
                    "Skipping degenerate triangle {} of object {}",
                    index,
                    source.id
                );
                skipped += 1;
                continue;
            }

            self.triangles.push(triangle);
        }

        skipped
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangles_mut(&mut self) -> &mut [Triangle] {
        &mut self.triangles
    }

    pub fn welds(&self) -> &WeldTable {
        &self.welds
    }

    /// Nearest front-facing hit along `ray`.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let mut nearest: Option<Intersection> = None;
        for (i, triangle) in self.triangles.iter().enumerate() {
            if let Some(mut hit) = triangle.intersect(ray) {
                if nearest.map_or(true, |n| hit.t < n.t) {
                    hit.triangle = i;
                    nearest = Some(hit);
                }
            }
        }
        nearest
    }

    /// Averages each weld group touching `triangles`, assigning the exact mean to every member.
    pub fn reconcile_welds(&mut self, triangles: impl IntoIterator<Item = usize>) -> usize {
        let mut touched: Vec<u32> = triangles
            .into_iter()
            .flat_map(|triangle| self.welds.groups_of(triangle).collect::<Vec<_>>())
            .collect();
        touched.sort_unstable();
        touched.dedup();

        for group in &touched {
            let slots = &self.welds.groups[*group as usize];

            let mut sum = Rgb::ZERO;
            for slot in slots {
                sum += self.triangles[slot.triangle as usize].ir[slot.corner as usize];
            }
            let mean = sum / slots.len() as f32;

            for slot in slots {
                self.triangles[slot.triangle as usize].ir[slot.corner as usize] = mean;
            }
        }

        touched.len()
    }
}
