//! Tests for working with the studio without a media provider.

use anidirector::{
    AniDirectorErrorKind, BackupDocument, Character, FileSystemStore, GenerationErrorKind,
    ImageMode, ImageQuality, MediaGenerator, OfflineGenerator, SavedProject, Studio, SystemClock,
    WorkflowStage, load_all, read_backup_file, write_backup_file,
};
use std::sync::Arc;
use tempfile::TempDir;

const BACKUP: &str = r#"{
    "version": "1.0",
    "exportDate": "2024-05-29T16:00:00Z",
    "storyConfig": {"title": "Rail Run", "protagonistName": "Tico", "rescueTargetName": "Mimi"},
    "characters": [
        {"id": "c1", "name": "Tico", "description": "small grey mouse", "imageRef": "data:image/png;base64,AAAA"}
    ],
    "storyboard": {
        "overallStyleNote": "warm dusk",
        "scenes": [
            {"id": 1, "act": 1, "duration": 3, "visualDescription": "Tico spots the train", "involvedCharacterNames": ["Tico"]},
            {"id": 2, "act": "Act 2", "duration": 3, "visualDescription": "The chase"}
        ]
    }
}"#;

async fn offline_studio(dir: &TempDir) -> Studio<OfflineGenerator> {
    let store = Arc::new(FileSystemStore::new(dir.path()).unwrap());
    Studio::open(
        store,
        OfflineGenerator,
        Arc::new(SystemClock),
        Default::default(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_offline_generator_refuses_permanently() {
    let err = OfflineGenerator.generate_idea().await.unwrap_err();

    assert!(matches!(err.kind, GenerationErrorKind::Request(_)));
    assert!(!err.is_transient());
    assert_eq!(OfflineGenerator.provider_name(), "offline");
}

#[tokio::test]
async fn test_story_plan_fails_without_provider() {
    let dir = TempDir::new().unwrap();
    let mut studio = offline_studio(&dir).await;

    let err = studio.generate_story_plan().await.unwrap_err();

    assert!(matches!(err.kind(), AniDirectorErrorKind::Generation(_)));
    assert!(studio.projects().is_empty());
}

#[tokio::test]
async fn test_import_then_export_offline() {
    let dir = TempDir::new().unwrap();
    let backup_path = dir.path().join("in.json");
    std::fs::write(&backup_path, BACKUP).unwrap();

    let document = read_backup_file(&backup_path).await.unwrap();
    let mut studio = offline_studio(&dir).await;
    let restored = studio.restore_backup(document).await.unwrap();

    assert_eq!(restored.name(), "Rail Run");
    assert_eq!(*restored.stage(), WorkflowStage::Storyboard);
    assert_eq!(studio.roster().len(), 1);

    // A fresh session sees the restored project on disk.
    let mut reopened = offline_studio(&dir).await;
    assert_eq!(reopened.projects().len(), 1);
    reopened.load_project(restored.id()).unwrap();
    let exported = reopened.export_backup().unwrap();
    let out_path = dir.path().join("out.json");
    write_backup_file(&out_path, &exported).await.unwrap();

    let round_trip: BackupDocument = read_backup_file(&out_path).await.unwrap();
    assert_eq!(round_trip.storyboard().scenes().len(), 2);
    assert_eq!(round_trip.characters()[0].name(), "Tico");
}

#[tokio::test]
async fn test_single_image_fails_without_provider_and_clears_flag() {
    let dir = TempDir::new().unwrap();
    let backup_path = dir.path().join("in.json");
    std::fs::write(&backup_path, BACKUP).unwrap();
    let mut studio = offline_studio(&dir).await;
    studio
        .restore_backup(read_backup_file(&backup_path).await.unwrap())
        .await
        .unwrap();

    let err = studio
        .generate_scene_image(1, ImageMode::Concept, ImageQuality::Standard)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), AniDirectorErrorKind::Generation(_)));
    let scene = studio.storyboard().unwrap().scene(1).unwrap();
    assert!(!scene.is_generating(ImageMode::Concept));
    assert!(scene.image(ImageMode::Concept).is_none());
}

#[tokio::test]
async fn test_roster_survives_sessions() {
    let dir = TempDir::new().unwrap();
    let mut studio = offline_studio(&dir).await;
    studio
        .save_library_character(Character::new("c1", "Tico", "small grey mouse", None))
        .await
        .unwrap();

    let reopened = offline_studio(&dir).await;
    assert_eq!(reopened.roster().get("Tico").map(|c| c.id().as_str()), Some("c1"));

    let store = FileSystemStore::new(dir.path()).unwrap();
    let projects: Vec<SavedProject> = load_all(&store).await.unwrap();
    assert!(projects.is_empty());
}
