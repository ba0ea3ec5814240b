use core::f32::consts::PI;

use glam::{Mat3, Vec2, Vec3};

use crate::{Geometry, PosColorVertex, PosUvVertex};

/// Unit direction on the Z-up sphere.
fn project_sphere(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    )
}

/// Axis-aligned box with outward-facing triangles, 36 `PosColor` vertices.
///
/// Each face is split along the same diagonal, so the two triangles of a face
/// share the vertices `d + e0 - e1` and `d - e0 + e1`.
pub fn cuboid(size: Vec3, center: Vec3, color: Vec3) -> Geometry {
    construct_profiling::profile_function!();

    let mut vertices = Vec::with_capacity(36);
    for axis in 0..3 {
        let mut d = Vec3::ZERO;
        let mut e0 = Vec3::ZERO;
        let mut e1 = Vec3::ZERO;
        d[axis] = 0.5;
        e0[(axis + 1) % 3] = 0.5;
        e1[(axis + 2) % 3] = 0.5;

        for _side in 0..2 {
            let corners = [
                d - e0 - e1,
                d + e0 - e1,
                d - e0 + e1,
                d + e0 + e1,
                d - e0 + e1,
                d + e0 - e1,
            ];
            vertices.extend(corners.iter().map(|corner| PosColorVertex {
                position: *corner * size + center,
                color,
            }));

            // Mirroring two of the three axes keeps the winding outward.
            d = -d;
            e0 = -e0;
        }
    }

    Geometry::from_pos_color_vertices(&vertices)
}

/// Textured rectangle in the local XZ plane, facing -Y, 6 `PosUv` vertices.
pub fn tex_quad(width: f32, height: f32, position: Vec3, rotation: Mat3) -> Geometry {
    const CORNERS: [(Vec3, Vec2); 6] = [
        (Vec3::new(-1.0, 0.0, -1.0), Vec2::new(0.0, 1.0)),
        (Vec3::new(1.0, 0.0, 1.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(-1.0, 0.0, 1.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(1.0, 0.0, 1.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(-1.0, 0.0, -1.0), Vec2::new(0.0, 1.0)),
        (Vec3::new(1.0, 0.0, -1.0), Vec2::new(1.0, 1.0)),
    ];

    let half_extent = Vec3::new(width * 0.5, 1.0, height * 0.5);
    let vertices = CORNERS.map(|(corner, uv)| PosUvVertex {
        position: rotation * (corner * half_extent) + position,
        uv,
    });

    Geometry::from_pos_uv_vertices(&vertices)
}

/// UV sphere seen from the inside, mapped so that `u = phi / 2pi` and `v = theta / pi`
/// match an equirectangular sky image.
pub fn sky_dome(radius: f32, rings: u32) -> Geometry {
    construct_profiling::profile_function!();

    let segments = rings * 2;
    let step = PI / rings as f32;

    let mut vertices = Vec::with_capacity((rings * segments * 6) as usize);
    for y in 0..rings {
        let theta0 = y as f32 * step;
        let theta1 = (y + 1) as f32 * step;

        for x in 0..segments {
            let phi0 = x as f32 * step;
            let phi1 = (x + 1) as f32 * step;

            let vertex = |theta: f32, phi: f32| PosUvVertex {
                position: project_sphere(theta, phi) * radius,
                uv: Vec2::new(phi / (2.0 * PI), theta / PI),
            };

            vertices.extend([
                vertex(theta0, phi0),
                vertex(theta0, phi1),
                vertex(theta1, phi0),
                vertex(theta1, phi1),
                vertex(theta1, phi0),
                vertex(theta0, phi1),
            ]);
        }
    }

    Geometry::from_pos_uv_vertices(&vertices)
}
