//! Tests for the authoring session: casting, snapshots and single-scene work.

mod test_utils;

use anidirector_core::{
    Character, ImageMode, SavedProject, SecondaryCharacter, StoryIdea, WorkflowStage,
};
use anidirector_error::{
    AniDirectorErrorKind, GenerationErrorKind, NotFoundErrorKind, ValidationErrorKind,
};
use anidirector_interface::ImageQuality;
use anidirector_storage::{Collection, InMemoryStore, load_all, upsert_record};
use anidirector_storyboard::{MergeOutcome, UNTITLED_PROJECT};
use serde_json::json;
use std::sync::Arc;
use test_utils::{
    FlakyStore, MockGenerator, character, epoch, open_studio, plan, plan_with_repeated_id,
    planned_studio, story_config,
};

#[tokio::test]
async fn test_casting_replaces_character_with_same_name() {
    let store = Arc::new(InMemoryStore::new());
    let mut studio = planned_studio(store.clone(), MockGenerator::new(plan(3))).await;
    studio
        .save_library_character(character("old", "Tico", "grey mouse"))
        .await
        .unwrap();

    studio
        .confirm_casting(Character::new("new", "Tico", "updated", None))
        .await
        .unwrap();

    let members = studio.roster().members();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].description(), "updated");
    assert_eq!(members[0].id(), "new");

    let stored: Vec<Character> = load_all(store.as_ref()).await.unwrap();
    assert_eq!(stored, members.to_vec());
}

#[tokio::test]
async fn test_merging_the_same_character_twice_keeps_one_entry() {
    let mut studio = open_studio(Arc::new(InMemoryStore::new()), MockGenerator::default()).await;
    let tico = character("c1", "Tico", "grey mouse");

    let first = studio.save_library_character(tico.clone()).await.unwrap();
    let second = studio.save_library_character(tico.clone()).await.unwrap();

    assert_eq!(first, MergeOutcome::Inserted { position: 0 });
    assert_eq!(
        second,
        MergeOutcome::Replaced {
            position: 0,
            previous: tico
        }
    );
    assert_eq!(studio.roster().len(), 1);
}

#[tokio::test]
async fn test_casting_links_ids_and_snapshots_used_characters() {
    let store = Arc::new(InMemoryStore::new());
    let mut studio = planned_studio(store.clone(), MockGenerator::new(plan(3))).await;
    let mut config = story_config();
    config.secondary_characters = vec![SecondaryCharacter {
        id: None,
        name: "Crow".into(),
        description: "black crow".into(),
    }];
    studio.update_config(config);
    studio
        .save_library_character(character("w", "Wolf", "not in this story"))
        .await
        .unwrap();
    studio
        .save_library_character(character("m", "Mimi", "white kitten"))
        .await
        .unwrap();
    studio
        .confirm_casting(character("c", "Crow", "black crow"))
        .await
        .unwrap();

    let saved = studio
        .confirm_casting(character("t", "Tico", "small grey mouse"))
        .await
        .unwrap();

    let active = studio.active();
    assert_eq!(active.config.protagonist_id.as_deref(), Some("t"));
    assert_eq!(active.config.secondary_characters[0].id.as_deref(), Some("c"));
    assert_eq!(active.stage, WorkflowStage::Storyboard);

    let names: Vec<&str> = saved.characters().iter().map(|c| c.name().as_str()).collect();
    assert_eq!(names, vec!["Mimi", "Crow", "Tico"]);
    assert_eq!(*saved.stage(), WorkflowStage::Storyboard);
    assert_eq!(saved.name(), "Rail Run");
    assert_eq!(studio.projects().len(), 1);
}

#[tokio::test]
async fn test_story_plan_lays_out_scenes_and_creates_project() {
    let store = Arc::new(InMemoryStore::new());
    let mut studio = open_studio(store.clone(), MockGenerator::new(plan(4))).await;
    assert!(studio.projects().is_empty());

    let board = studio.generate_story_plan().await.unwrap();
    let starts: Vec<u32> = board.scenes().iter().map(|s| *s.start_offset()).collect();
    assert_eq!(starts, vec![0, 3, 6, 9]);
    assert!(board.scenes().iter().all(|s| *s.duration() == 3));

    assert_eq!(studio.active().stage, WorkflowStage::AssignCharacters);
    let saved: Vec<SavedProject> = load_all(store.as_ref()).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name(), UNTITLED_PROJECT);
    assert_eq!(*saved[0].updated_at(), epoch());
    assert_eq!(studio.active().id.as_deref(), Some(saved[0].id().as_str()));
}

#[tokio::test]
async fn test_story_plan_with_repeated_scene_id_is_refused() {
    let store = Arc::new(InMemoryStore::new());
    let mut studio = open_studio(store.clone(), MockGenerator::new(plan_with_repeated_id())).await;

    let err = studio.generate_story_plan().await.unwrap_err();

    match err.kind() {
        AniDirectorErrorKind::Validation(e) => {
            assert!(matches!(e.kind, ValidationErrorKind::UnsupportedShape(_)));
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert!(studio.storyboard().is_none());
    assert!(studio.active().id.is_none());
    let saved: Vec<SavedProject> = load_all(store.as_ref()).await.unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn test_project_id_is_stable_across_saves() {
    let mut studio = planned_studio(Arc::new(InMemoryStore::new()), MockGenerator::new(plan(2))).await;
    let first = studio.save_project().await.unwrap();
    let second = studio.save_project().await.unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(studio.projects().len(), 1);

    studio.new_project();
    studio.update_config(story_config());
    let other = studio.save_project().await.unwrap();
    assert_ne!(other.id(), first.id());
    assert_eq!(studio.projects().len(), 2);
}

#[tokio::test]
async fn test_story_plan_retries_a_rate_limit_once() {
    let generator = MockGenerator::new(plan(2))
        .failing_first(vec![GenerationErrorKind::RateLimited("429".into())]);
    let mut studio = open_studio(Arc::new(InMemoryStore::new()), generator).await;

    studio.generate_story_plan().await.unwrap();

    assert_eq!(studio.generator().plan_calls(), 2);
}

#[tokio::test]
async fn test_permission_failure_is_not_retried() {
    let generator = MockGenerator::new(plan(2))
        .failing_first(vec![GenerationErrorKind::PermissionDenied("403".into())]);
    let mut studio = open_studio(Arc::new(InMemoryStore::new()), generator).await;

    let err = studio.generate_story_plan().await.unwrap_err();

    assert!(matches!(err.kind(), AniDirectorErrorKind::Generation(_)));
    assert_eq!(studio.generator().plan_calls(), 1);
    assert!(studio.storyboard().is_none());
    assert!(studio.projects().is_empty());
}

#[tokio::test]
async fn test_generate_idea_fills_only_suggested_fields() {
    let idea = StoryIdea {
        title: Some("Midnight Express".into()),
        protagonist_name: Some("Pip".into()),
        ..Default::default()
    };
    let mut studio =
        open_studio(Arc::new(InMemoryStore::new()), MockGenerator::default().with_idea(idea)).await;
    studio.update_config(story_config());

    studio.generate_idea().await.unwrap();

    let config = &studio.active().config;
    assert_eq!(config.title, "Midnight Express");
    assert_eq!(config.protagonist_name, "Pip");
    assert_eq!(config.rescue_target_name, "Mimi");
}

#[tokio::test]
async fn test_design_character_does_not_touch_roster() {
    let mut studio = open_studio(Arc::new(InMemoryStore::new()), MockGenerator::default()).await;

    let designed = studio.design_character("Tico", "grey mouse").await.unwrap();

    assert_eq!(designed.name(), "Tico");
    assert!(designed.image_ref().is_some());
    assert!(!designed.id().is_empty());
    assert!(studio.roster().is_empty());
}

#[tokio::test]
async fn test_load_project_clears_stale_generating_flags() {
    let store = Arc::new(InMemoryStore::new());
    let mut board = plan(2);
    board.scenes_mut()[0].begin_generation(ImageMode::Concept);
    board.scenes_mut()[1].begin_generation(ImageMode::Storyboard);
    let project = SavedProject::new(
        "1717000000000",
        "Rail Run",
        epoch(),
        vec![],
        story_config(),
        Some(board),
        WorkflowStage::Storyboard,
    );
    upsert_record(store.as_ref(), &project).await.unwrap();

    let mut studio = open_studio(store, MockGenerator::default()).await;
    studio.load_project("1717000000000").unwrap();

    let board = studio.storyboard().unwrap();
    assert!(board.scenes().iter().all(|s| {
        !s.is_generating(ImageMode::Concept) && !s.is_generating(ImageMode::Storyboard)
    }));
    assert_eq!(studio.active().stage, WorkflowStage::Storyboard);

    let err = studio.load_project("missing").unwrap_err();
    assert!(matches!(
        err.kind(),
        AniDirectorErrorKind::NotFound(e) if e.kind == NotFoundErrorKind::Project("missing".into())
    ));
}

#[tokio::test]
async fn test_new_ids_follow_existing_projects() {
    let store = Arc::new(InMemoryStore::new());
    let future_id = (epoch().timestamp_millis() + 5_000).to_string();
    let project = SavedProject::new(
        future_id.clone(),
        "Later",
        epoch(),
        vec![],
        story_config(),
        None,
        WorkflowStage::SetupStory,
    );
    upsert_record(store.as_ref(), &project).await.unwrap();

    let mut studio = open_studio(store, MockGenerator::default()).await;
    let saved = studio.save_project().await.unwrap();

    assert!(saved.id().parse::<i64>().unwrap() > future_id.parse::<i64>().unwrap());
}

#[tokio::test]
async fn test_storyboard_panel_uses_shot_prompt() {
    let store = Arc::new(InMemoryStore::new());
    let mut studio = planned_studio(store.clone(), MockGenerator::new(plan(3))).await;

    let image = studio
        .generate_scene_image(2, ImageMode::Storyboard, ImageQuality::Standard)
        .await
        .unwrap();

    let request = &studio.generator().image_requests()[0];
    assert!(request.prompt().starts_with("SCENE ID: 2 (Act: 2)\n"));
    assert!(request.prompt().contains("ATMOSPHERE: Night rail yard"));
    assert_eq!(*request.mode(), ImageMode::Storyboard);

    let scene = studio.storyboard().unwrap().scene(2).unwrap();
    assert_eq!(scene.image(ImageMode::Storyboard), Some(&image));
    assert!(scene.image(ImageMode::Concept).is_none());

    let saved: Vec<SavedProject> = load_all(store.as_ref()).await.unwrap();
    let stored = saved[0].storyboard_data().as_ref().unwrap().scene(2).unwrap();
    assert_eq!(stored.image(ImageMode::Storyboard), Some(&image));
}

#[tokio::test]
async fn test_single_scene_failure_is_surfaced() {
    let generator = MockGenerator::new(plan(2))
        .failing_on(test_utils::scene_prompt(1), GenerationErrorKind::EmptyResponse);
    let mut studio = planned_studio(Arc::new(InMemoryStore::new()), generator).await;

    let err = studio
        .generate_scene_image(1, ImageMode::Concept, ImageQuality::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), AniDirectorErrorKind::Generation(_)));
    assert!(!studio.storyboard().unwrap().scene(1).unwrap().is_generating(ImageMode::Concept));

    let err = studio
        .generate_scene_image(42, ImageMode::Concept, ImageQuality::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), AniDirectorErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_delete_character_rewrites_roster() {
    let store = Arc::new(InMemoryStore::new());
    let mut studio = open_studio(store.clone(), MockGenerator::default()).await;
    studio
        .save_library_character(character("c1", "Tico", "grey mouse"))
        .await
        .unwrap();
    studio
        .save_library_character(character("c2", "Mimi", "white kitten"))
        .await
        .unwrap();

    let removed = studio.delete_character("c1").await.unwrap();
    assert_eq!(removed.name(), "Tico");

    let stored: Vec<Character> = load_all(store.as_ref()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name(), "Mimi");

    let err = studio.delete_character("c1").await.unwrap_err();
    assert!(matches!(err.kind(), AniDirectorErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_failed_roster_write_leaves_roster_unchanged() {
    let store = Arc::new(FlakyStore::new());
    let mut studio = open_studio(store.clone(), MockGenerator::default()).await;
    store.set_failing(true);

    let err = studio
        .save_library_character(character("c1", "Tico", "grey mouse"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), AniDirectorErrorKind::Persistence(_)));
    assert!(studio.roster().is_empty());
}

#[tokio::test]
async fn test_open_migrates_legacy_roster() {
    let store = InMemoryStore::new().with_legacy_blob(
        Collection::Characters,
        vec![
            json!({"id": "1", "name": "Tico", "description": "grey mouse", "imageUrl": null}),
            json!({"id": "2", "name": "Mimi", "description": "white kitten", "imageUrl": null}),
            json!({"id": "3", "name": "Crow", "description": "black crow", "imageUrl": null}),
        ],
    );
    let store = Arc::new(store);

    let studio = open_studio(store.clone(), MockGenerator::default()).await;

    assert_eq!(studio.roster().len(), 3);
    assert!(store.legacy_blob(Collection::Characters).is_none());
    assert_eq!(studio.roster().get("Mimi").map(|c| c.id().as_str()), Some("2"));
}
