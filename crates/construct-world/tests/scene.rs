use construct_lighting::{LightingConfig, Ray, Rgb, UniformEnvironment};
use construct_model::{shapes, Geometry, ObjectId, ObjectKind};
use construct_transform::Transform;
use construct_world::{Behavior, Cursor, FixedHead, Scene, TextLabel};
use glam::{Mat3, Vec3};
use serde_json::json;

fn uniform_scene(radiance: f32) -> Scene {
    Scene::with_environment(
        LightingConfig {
            seed: 11,
            ..Default::default()
        },
        Box::new(UniformEnvironment(Rgb::splat(radiance))),
    )
}

fn head() -> FixedHead {
    FixedHead::new(Vec3::new(0.0, 0.0, 1.4), Vec3::Y)
}

#[test]
fn publish_covers_every_extracted_triangle() {
    for num_objects in 0..6 {
        let mut scene = uniform_scene(1.0);
        for i in 0..num_objects {
            scene.create_object(|builder| {
                builder.geometry(shapes::cuboid(
                    Vec3::splat(0.5),
                    Vec3::new(i as f32, 0.0, 0.0),
                    Vec3::ONE,
                ))
            });
        }
        // UI and sky objects never take part in lighting.
        scene.create_object(|builder| {
            builder
                .kind(ObjectKind::Ui)
                .geometry(shapes::tex_quad(1.0, 1.0, Vec3::ZERO, Mat3::IDENTITY))
        });
        scene.create_object(|builder| {
            builder
                .kind(ObjectKind::Sky)
                .geometry(shapes::sky_dome(500.0, 4))
        });

        let stats = scene.step(&head());
        let extracted = stats.extracted.map_or(0, |e| e.triangles);
        assert_eq!(extracted, num_objects * 12);
        assert_eq!(stats.published.triangles, extracted);
        assert_eq!(stats.published.objects, num_objects);
        assert_eq!(stats.ui_triangles, 2);
    }
}

#[test]
fn lighting_survives_unrelated_edits() {
    let mut scene = Scene::with_environment(
        LightingConfig {
            triangles_per_tick: 12,
            ..Default::default()
        },
        Box::new(UniformEnvironment(Rgb::splat(1.0))),
    );
    let first = scene.create_object(|builder| {
        builder.geometry(shapes::cuboid(Vec3::ONE, Vec3::ZERO, Vec3::ONE))
    });
    let second = scene.create_object(|builder| {
        builder.geometry(shapes::cuboid(Vec3::ONE, Vec3::new(5.0, 0.0, 0.0), Vec3::ONE))
    });

    // Five half-passes over 24 triangles leave the cursor at 12.
    for _ in 0..5 {
        scene.step(&head());
    }
    assert_eq!(scene.lighting().cursor(), 12);
    let lit_second: Vec<_> = scene
        .static_soup()
        .triangles()
        .iter()
        .filter(|t| t.key.object == second)
        .map(|t| t.ir)
        .collect();
    assert!(lit_second.iter().flatten().any(|ir| ir.max_element() > 0.0));

    scene.delete(first);
    scene.create_object(|builder| {
        builder.geometry(shapes::cuboid(Vec3::ONE, Vec3::new(-5.0, 0.0, 0.0), Vec3::ONE))
    });

    // The second cube moves to the front of the soup, so this tick only refines the new one.
    let stats = scene.step(&head());
    let extracted = stats.extracted.unwrap();
    assert_eq!(extracted.triangles, 24);
    assert_eq!(extracted.carried_over, 12);

    let carried: Vec<_> = scene
        .static_soup()
        .triangles()
        .iter()
        .filter(|t| t.key.object == second)
        .map(|t| t.ir)
        .collect();
    assert_eq!(carried, lit_second);
}

#[test]
fn kind_changes_keep_publish_in_sync() {
    let mut scene = uniform_scene(1.0);
    let cube = scene.create_object(|builder| {
        builder.geometry(shapes::cuboid(Vec3::ONE, Vec3::new(0.3, 3.0, 0.0), Vec3::ONE))
    });
    scene.step(&head());
    assert_eq!(scene.static_soup().len(), 12);

    scene.get_mut(cube).unwrap().set_kind(ObjectKind::Sky);
    let stats = scene.step(&head());
    assert_eq!(stats.extracted.map(|e| e.triangles), Some(0));
    assert_eq!(stats.published.triangles, 0);
    assert!(scene.static_soup().is_empty());

    scene.get_mut(cube).unwrap().set_kind(ObjectKind::Static);
    let stats = scene.step(&head());
    let extracted = stats.extracted.unwrap();
    assert_eq!(extracted.triangles, 12);
    assert_eq!(extracted.carried_over, 0);
    assert_eq!(stats.published.triangles, 12);
}

#[test]
fn reflectance_edits_reach_lit_triangles() {
    let mut scene = uniform_scene(1.0);
    let cube = scene.create_object(|builder| {
        builder.geometry(shapes::cuboid(Vec3::ONE, Vec3::new(0.3, 3.0, 0.0), Vec3::ONE))
    });
    scene.step(&head());

    scene.get_mut(cube).unwrap().set_reflectance(Rgb::splat(0.1));
    let stats = scene.step(&head());
    assert_eq!(stats.extracted.unwrap().carried_over, 12);
    assert!(scene
        .static_soup()
        .triangles()
        .iter()
        .all(|t| t.reflectance == Rgb::splat(0.1)));

    // Settled edits do not trigger further extraction.
    assert!(scene.step(&head()).extracted.is_none());
}

#[test]
fn published_colors_converge_to_reflected_environment() {
    let mut scene = uniform_scene(2.0);
    let floor = scene.create_object(|builder| {
        builder
            .geometry(Geometry::new_pos_color(vec![
                -1.0, -1.0, 0.0, 0.0, 0.0, 0.0, //
                1.0, -1.0, 0.0, 0.0, 0.0, 0.0, //
                -1.0, 1.0, 0.0, 0.0, 0.0, 0.0, //
            ]))
            .reflectance(Rgb::splat(0.5))
    });

    for _ in 0..100 {
        scene.step(&head());
    }

    let ticks = 2000;
    let mut mean = Vec3::ZERO;
    for _ in 0..ticks {
        scene.step(&head());
        let geometry = scene.get(floor).unwrap().geometry().unwrap();
        for vertex in geometry.pos_color_vertices() {
            mean += vertex.color;
        }
    }
    mean /= (ticks * 3) as f32;

    assert!((mean - Vec3::ONE).abs().max_element() < 0.03, "{}", mean);
}

#[test]
fn cursor_hovers_ui_panels() {
    let mut scene = uniform_scene(1.0);
    let panel = scene.create_object(|builder| {
        builder
            .kind(ObjectKind::Ui)
            .geometry(shapes::tex_quad(1.0, 1.0, Vec3::ZERO, Mat3::IDENTITY))
            .transform(Transform::from_translation(Vec3::new(0.1, 2.0, 1.3)))
            .behavior(Behavior::TextLabel(TextLabel::new("Input")))
    });
    let cursor = scene.create_object(|builder| {
        builder
            .kind(ObjectKind::UiCursor)
            .geometry(shapes::tex_quad(0.1, 0.1, Vec3::ZERO, Mat3::IDENTITY))
            .blend(true)
            .behavior(Behavior::Cursor(Cursor::new()))
    });

    for _ in 0..40 {
        scene.step(&head());
    }

    let cursor_object = scene.get(cursor).unwrap();
    let Behavior::Cursor(state) = &cursor_object.behavior else {
        panic!("cursor lost its behavior");
    };
    assert_eq!(state.hovered(), Some(panel));
    let position = cursor_object.transform.translation();
    assert!((position - Vec3::new(0.0, 1.99, 1.4)).length() < 1e-4, "{}", position);

    let Behavior::TextLabel(label) = &scene.get(panel).unwrap().behavior else {
        panic!("label lost its behavior");
    };
    assert!(label.is_editing());
    assert_eq!(label.text(), "Input");

    // The cursor itself is never pickable.
    let hit = scene
        .intersect_any(&Ray::new(head().eye_position, Vec3::Y))
        .unwrap();
    assert_eq!(hit.attribute, panel);
}

#[test]
fn labels_show_the_newest_text() {
    let mut scene = uniform_scene(1.0);
    let label = scene.create_object(|builder| {
        builder
            .kind(ObjectKind::Ui)
            .behavior(Behavior::TextLabel(TextLabel::new("")))
    });
    assert_eq!(label, ObjectId(0));

    scene.send_message(label, json!("older"));
    scene.send_message(label, json!({"unrelated": true}));
    scene.send_message(label, json!("newer"));
    scene.step(&head());

    let Behavior::TextLabel(state) = &scene.get(label).unwrap().behavior else {
        panic!("label lost its behavior");
    };
    assert_eq!(state.text(), "newer");
    assert!(!state.is_editing());
    assert_eq!(scene.get(label).unwrap().num_pending_messages(), 0);
}

#[test]
fn radiance_prefers_cached_surfaces() {
    let mut scene = uniform_scene(4.0);
    scene.create_object(|builder| {
        builder.geometry(shapes::cuboid(
            Vec3::new(4.0, 0.5, 4.0),
            Vec3::new(0.3, 3.0, 1.2),
            Vec3::ONE,
        ))
    });
    scene.update_geometry();

    let eye = head().eye_position;
    assert_eq!(scene.radiance(&Ray::new(eye, Vec3::NEG_Y)), Rgb::splat(4.0));
    assert_eq!(scene.radiance(&Ray::new(eye, Vec3::Y)), Rgb::ZERO);
}
