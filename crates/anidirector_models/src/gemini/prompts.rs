//! Prompt templates for the Gemini client.

use anidirector_core::{ImageMode, StoryConfig};
use anidirector_interface::ImageRequest;

pub(crate) const IDEA_SYSTEM: &str = "You are a creative story assistant for 3D animated shorts.";

pub(crate) const PLAN_SYSTEM: &str = "You are a specialized 3D animation storyboard director.";

const STYLE: &str = "3D Pixar-style animation, Unreal Engine 5 render, detailed fur texture, \
expressive characters, cinematic lighting, warm color palette, volumetric fog.";

pub(crate) fn idea_prompt() -> String {
    "Invent one heart-warming rescue story for a 3D animated short: a small animal uses a tool \
to save someone from a large incoming threat, and a character who first misunderstands the \
animal realizes the truth.\n\n\
Answer with a single JSON object with the string keys title, protagonistName, \
protagonistDescription, rescueTargetName, rescueTargetDescription, dangerThreat, dangerTool, \
dangerLocation, setting, and an array secondaryCharacters of {name, description}."
        .to_string()
}

pub(crate) fn storyboard_plan_prompt(config: &StoryConfig) -> String {
    let mut cast = format!(
        "1. Protagonist: {} ({})\n",
        config.protagonist_name, config.protagonist_description
    );
    for (i, secondary) in config.secondary_characters.iter().enumerate() {
        cast.push_str(&format!(
            "{}. Supporting: {} ({})\n",
            i + 2,
            secondary.name,
            secondary.description
        ));
    }
    if let Some(observer) = config.observer.as_deref().filter(|o| !o.is_empty()) {
        cast.push_str(&format!("*. Observer: {observer}\n"));
    }

    format!(
        "Plan a 60 second, 20 scene storyboard for a 3D animated short.\n\n\
[CAST]\n{cast}\n\
[STORY]\n\
- Rescue target: {target} ({target_description})\n\
- Incoming threat: {threat}\n\
- Tool used to stop it: {tool}\n\
- Where the danger happens: {location}\n\
- Setting: {setting}\n\n\
[STRUCTURE]\n\
Act 1 (scenes 1-6): the protagonist discovers the danger and acts; the observer misunderstands.\n\
Act 2 (scenes 7-12): a chase, then the observer sees the truth.\n\
Act 3 (scenes 13-20): gratitude, reconciliation, a warm happy ending.\n\n\
Answer with a JSON object {{\"overallStyleNote\": string, \"scenes\": [...]}} where each scene has \
id (1-20), act (\"Act 1\", \"Act 2\" or \"Act 3\"), duration (seconds), visualDescription, \
generationPrompt (English, describing every character's look), cameraAngle, and \
involvedCharacterNames (exact cast names).",
        target = config.rescue_target_name,
        target_description = config.rescue_target_description,
        threat = config.danger_threat,
        tool = config.danger_tool,
        location = config.danger_location,
        setting = config.setting,
    )
}

pub(crate) fn character_design_prompt(name: &str, description: &str) -> String {
    format!(
        "Character design sheet for a 3D animated film (Pixar style).\n\
Name: {name}\n\
Visual description: {description}\n\
Style: {STYLE}\n\
Composition: white background, single hero pose or front, side and 3/4 views.\n\
Lighting: soft studio lighting."
    )
}

pub(crate) fn scene_image_prompt(request: &ImageRequest) -> String {
    let characters = if request.character_descriptions().is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = request
            .character_descriptions()
            .iter()
            .map(|d| format!("- {d}"))
            .collect();
        format!(
            "\n\n[CHARACTERS IN SCENE]\n{}\nThese characters must match the attached reference images.",
            lines.join("\n")
        )
    };

    match request.mode() {
        ImageMode::Storyboard => format!(
            "Role: professional 3D animation storyboard artist.\n\
Task: a storyboard panel for a 3D animated short.\n\n\
{prompt}{characters}\n\n\
Style: {STYLE}\n\
Layout: four panels in a grid showing the sequence of action, with 3D arrows for movement.\n\
Aspect ratio: {ratio}",
            prompt = request.prompt(),
            ratio = request.aspect_ratio(),
        ),
        ImageMode::Concept => format!(
            "Style: {STYLE}\n\
Scene: {prompt}\n\
Aspect ratio: {ratio}{characters}\n\n\
Make it look like a frame from a high-budget animated movie.",
            prompt = request.prompt(),
            ratio = request.aspect_ratio(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anidirector_core::AspectRatio;
    use anidirector_interface::ImageQuality;

    #[test]
    fn panel_prompt_lists_characters() {
        let request = ImageRequest::new(
            "SCENE ID: 4",
            AspectRatio::Vertical,
            ImageMode::Storyboard,
            ImageQuality::Standard,
        )
        .with_references(vec![], vec!["Name: Tico, Appearance: grey mouse".into()]);

        let prompt = scene_image_prompt(&request);
        assert!(prompt.contains("four panels"));
        assert!(prompt.contains("- Name: Tico, Appearance: grey mouse"));
        assert!(prompt.contains("Aspect ratio: 9:16"));
    }

    #[test]
    fn plan_prompt_names_the_cast() {
        let config = StoryConfig {
            protagonist_name: "Tico".into(),
            observer: Some("Engineer".into()),
            ..Default::default()
        };
        let prompt = storyboard_plan_prompt(&config);
        assert!(prompt.contains("1. Protagonist: Tico"));
        assert!(prompt.contains("*. Observer: Engineer"));
    }
}
