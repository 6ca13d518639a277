//! Prompt text built on the core side of the generation seam.

use anidirector_core::Scene;

/// Compose the prompt for a storyboard panel.
///
/// Concept images use the scene's visual description as-is; panels carry
/// the shot breakdown so the model draws a rough board rather than a finished
/// frame.
pub fn storyboard_panel_prompt(scene: &Scene, setting: &str) -> String {
    format!(
        "SCENE ID: {id} (Act: {act})\n\
         ACTION: {action}\n\
         CAMERA: {camera}\n\
         ATMOSPHERE: {setting}\n\
         CHARACTERS: {characters}\n\
         \n\
         This is a storyboard panel for a 3D animated film.",
        id = scene.id(),
        act = scene.act().number(),
        action = scene.visual_description(),
        camera = scene.camera_angle(),
        characters = scene.involved_character_names().join(", "),
    )
}
