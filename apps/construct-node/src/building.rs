use std::sync::Arc;

use construct::{
    construct_lighting::{math::Rng, Rgb},
    construct_model::{shapes, ObjectId, ObjectKind},
    construct_texture::{Texture, TextureCreateDesc, TextureFormat},
    construct_transform::Transform,
    construct_world::{Behavior, Cursor, Scene, TextLabel},
};
use glam::{Mat3, Vec3};

const SKY_RADIUS: f32 = 500.0;
const SKY_RINGS: u32 = 25;

/// Ids of the interactive objects the driver reports on.
#[derive(Debug, Clone, Copy)]
pub struct Interactive {
    pub cursor: ObjectId,
    pub input_label: ObjectId,
}

fn add_cuboid(scene: &mut Scene, size: Vec3, center: Vec3, reflectance: Vec3) -> ObjectId {
    scene.create_object(|builder| {
        builder
            .geometry(shapes::cuboid(size, center, reflectance))
            .reflectance(Rgb(reflectance))
    })
}

/// Two tiled floors, four pillars, scattered stools, a staircase and an elevator shaft.
pub fn add_building(scene: &mut Scene, rng: &mut Rng) -> usize {
    construct::construct_profiling::profile_function!();

    let first = scene.len();

    // tiles
    for floor in 0..2 {
        let z = floor as f32 * 4.0;
        for i in -8..=8 {
            for j in -8..=8 {
                let even = (i + j + 10000) % 2 == 0;
                let mean = if even { 0.9 } else { 0.8 };
                let reflectance = rng.normal_f32(mean, 0.01).clamp(0.0, 1.0);

                add_cuboid(
                    scene,
                    Vec3::new(0.45, 0.45, 0.04),
                    Vec3::new(i as f32 * 0.5, j as f32 * 0.5, -0.02 + z),
                    Vec3::splat(reflectance),
                );
            }
        }

        add_cuboid(
            scene,
            Vec3::new(8.0, 8.0, 0.04),
            Vec3::new(0.0, 0.0, -0.06 + z),
            Vec3::splat(0.8),
        );
    }

    // pillars
    let spacing = 5.0;
    let height = 4.0;
    for dx in -1..1 {
        for dy in -1..1 {
            add_cuboid(
                scene,
                Vec3::new(0.5, 0.5, height),
                Vec3::new(
                    (dx as f32 + 0.5) * spacing,
                    (dy as f32 + 0.5) * spacing,
                    height / 2.0,
                ),
                Vec3::splat(0.7),
            );
        }
    }

    // stools
    for _ in 0..8 {
        let height = rng.normal_f32(0.45, 0.1).max(0.1);
        let x = rng.normal_f32(0.0, 4.0);
        let y = rng.normal_f32(0.0, 4.0);

        add_cuboid(
            scene,
            Vec3::new(0.08, 0.08, height),
            Vec3::new(x, y, height * 0.5),
            Vec3::splat(0.8),
        );
        add_cuboid(
            scene,
            Vec3::new(0.25, 0.25, 0.07),
            Vec3::new(x, y, height),
            Vec3::splat(0.8),
        );
    }

    // stairs
    for step in 0..40 {
        let step = step as f32;
        add_cuboid(
            scene,
            Vec3::new(1.0, 0.2, 0.2),
            Vec3::new(1.5, 1.5 + 0.2 * step, 0.1 + 0.2 * step),
            Vec3::splat(0.8),
        );
    }

    // elevator
    add_cuboid(
        scene,
        Vec3::new(1.8, 1.8, 8.0),
        Vec3::new(0.0, -4.0, 0.0),
        Vec3::splat(0.5),
    );

    scene.len() - first
}

/// Inward-facing dome textured with the baked environment.
pub fn add_sky(scene: &mut Scene, background_height: u32) -> ObjectId {
    let background = scene.background_image(background_height);
    scene.create_object(|builder| {
        builder
            .kind(ObjectKind::Sky)
            .geometry(shapes::sky_dome(SKY_RADIUS, SKY_RINGS))
            .texture(background)
    })
}

/// Stand-in for a texture the UI toolkit draws into.
fn blank_texture(name: &str, width: u32, height: u32) -> Arc<Texture> {
    Arc::new(Texture::new(TextureCreateDesc {
        name: Some(name.to_owned()),
        width,
        height,
        format: TextureFormat::Rgba8Unorm,
        data: vec![255; (width * height * 4) as usize].into_boxed_slice(),
    }))
}

fn add_panel(
    scene: &mut Scene,
    name: &str,
    size: (f32, f32),
    position: Vec3,
    behavior: Behavior,
) -> ObjectId {
    let texture = blank_texture(name, 250, 500);
    scene.create_object(|builder| {
        builder
            .kind(ObjectKind::Ui)
            .geometry(shapes::tex_quad(size.0, size.1, Vec3::ZERO, Mat3::IDENTITY))
            .texture(texture)
            .transform(Transform::from_translation(position))
            .behavior(behavior)
    })
}

/// User menu, two text labels and the gaze cursor.
pub fn add_interface(scene: &mut Scene) -> Interactive {
    add_panel(
        scene,
        "user menu",
        (0.4, 0.8),
        Vec3::new(-0.8, 1.0, 1.5),
        Behavior::None,
    );
    let input_label = add_panel(
        scene,
        "input",
        (0.6, 0.1),
        Vec3::new(0.0, 1.0, 1.8),
        Behavior::TextLabel(TextLabel::new("Input")),
    );
    add_panel(
        scene,
        "separator",
        (0.72, 0.12),
        Vec3::new(0.0, 1.0, 1.0),
        Behavior::TextLabel(TextLabel::new("------------------------")),
    );

    let cursor_texture = blank_texture("cursor", 50, 50);
    let cursor = scene.create_object(|builder| {
        builder
            .kind(ObjectKind::UiCursor)
            .geometry(shapes::tex_quad(0.1, 0.1, Vec3::ZERO, Mat3::IDENTITY))
            .texture(cursor_texture)
            .blend(true)
            .behavior(Behavior::Cursor(Cursor::new()))
    });

    Interactive {
        cursor,
        input_label,
    }
}
