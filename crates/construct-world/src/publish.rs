use std::collections::BTreeMap;

use construct_lighting::TriangleSoup;
use construct_model::{ObjectId, ObjectKind};

use crate::Object;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    /// Soup triangles matched back to their owning object.
    pub triangles: usize,
    /// Objects whose vertex colors were rewritten and flagged for upload.
    pub objects: usize,
}

/// Writes cached per-vertex radiance into the color columns of lit objects.
///
/// Walks the soup in extraction order. Every triangle must still resolve to a
/// static object of the revision it was extracted from.
pub(crate) fn publish(
    objects: &mut BTreeMap<ObjectId, Object>,
    soup: &TriangleSoup,
) -> PublishStats {
    construct_profiling::profile_function!();

    let mut stats = PublishStats::default();
    let mut current: Option<ObjectId> = None;

    for triangle in soup.triangles() {
        let key = triangle.key;
        let Some(object) = objects.get_mut(&key.object) else {
            continue;
        };
        if object.kind() != ObjectKind::Static || object.revision() != key.revision {
            continue;
        }

        let textured = object.texture.is_some();
        let Some(geometry) = object.geometry_mut() else {
            continue;
        };
        stats.triangles += 1;

        if textured {
            continue;
        }

        let first_vertex = key.index as usize * 3;
        for (corner, radiance) in triangle.ir.iter().enumerate() {
            geometry.set_color(first_vertex + corner, radiance.0);
        }

        if current != Some(key.object) {
            current = Some(key.object);
            geometry.notify_data_change();
            stats.objects += 1;
        }
    }

    assert_eq!(
        stats.triangles,
        soup.len(),
        "publish matched {} of {} extracted triangles",
        stats.triangles,
        soup.len()
    );

    stats
}
