use construct_lighting::Ray;
use construct_model::{ObjectId, ObjectKind};
use serde_json::{json, Value};

use crate::{HeadPose, Scene};

/// Behaviors run at half the tick rate, alternating between even and odd ids.
pub const BEHAVIOR_RATE: f32 = 30.0;

/// Consecutive hovered behavior steps (half a second) before a label starts editing.
const EDIT_HOVER_STEPS: u32 = 15;

/// Per-object logic, stepped by the scene.
#[derive(Debug, Clone, Default)]
pub enum Behavior {
    #[default]
    None,
    TextLabel(TextLabel),
    Cursor(Cursor),
}

impl Behavior {
    pub(crate) fn step(&mut self, id: ObjectId, scene: &mut Scene, head: &dyn HeadPose) {
        match self {
            Self::None => {}
            Self::TextLabel(label) => label.step(id, scene),
            Self::Cursor(cursor) => cursor.step(id, scene, head),
        }
    }
}

/// Displays the most recent string it was sent and notices being looked at.
#[derive(Debug, Clone, Default)]
pub struct TextLabel {
    text: String,
    hover_steps: u32,
    editing: bool,
}

impl TextLabel {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set once the label was hovered long enough; an input widget takes over from here.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn step(&mut self, id: ObjectId, scene: &mut Scene) {
        let mut latest_text = None;
        let mut hovered = false;

        while let Some(message) = scene.get_message(id) {
            match message {
                Value::String(text) => {
                    // Newest first, older strings are superseded.
                    if latest_text.is_none() {
                        latest_text = Some(text);
                    }
                }
                Value::Object(ref fields) if fields.contains_key("cursor") => hovered = true,
                other => log::debug!("Text label {} ignored message {}", id, other),
            }
        }

        if let Some(text) = latest_text {
            self.text = text;
        }

        if hovered {
            self.hover_steps += 1;
        } else {
            self.hover_steps = 0;
        }

        if self.hover_steps >= EDIT_HOVER_STEPS && !self.editing {
            self.editing = true;
            log::info!("Text label {} entered editing", id);
        }
    }
}

/// Follows the view ray, sticking to whatever it hits and telling UI panels where.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Distance from the eye when nothing is hit.
    pub rest_distance: f32,
    /// Lift above the hit surface, against z-fighting.
    pub surface_offset: f32,
    hovered: Option<ObjectId>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            rest_distance: 2.0,
            surface_offset: 0.01,
            hovered: None,
        }
    }

    /// UI object under the cursor after the latest step.
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    fn step(&mut self, id: ObjectId, scene: &mut Scene, head: &dyn HeadPose) {
        let eye = head.eye_position();
        let direction = head.view_direction();

        let (position, facing) = match scene.intersect_any(&Ray::new(eye, direction)) {
            Some(hit) => {
                let is_ui = scene
                    .get(hit.attribute)
                    .is_some_and(|target| target.kind() == ObjectKind::Ui);

                if is_ui {
                    scene.send_message(hit.attribute, json!({ "cursor": [hit.uv.x, hit.uv.y] }));
                    self.hovered = Some(hit.attribute);
                } else {
                    self.hovered = None;
                }

                (hit.position + hit.normal * self.surface_offset, -hit.normal)
            }
            None => {
                self.hovered = None;
                (eye + direction * self.rest_distance, direction)
            }
        };

        if let Some(object) = scene.get_mut(id) {
            object.transform.set_translation(position);
            object.transform.face_towards(facing);
        }
    }
}

