//! Batch concept-image generation handler.

use super::Session;
use anidirector::AniDirectorResult;

/// Generate missing concept images for a saved project.
///
/// Available with the `gemini` feature.
#[cfg(feature = "gemini")]
pub async fn generate_concept_images(
    session: &Session,
    project_id: &str,
    act: Option<u8>,
    pro: bool,
    tier: Option<&str>,
) -> AniDirectorResult<()> {
    use anidirector::{
        Act, BatchEvent, BatchObserver, GeminiClient, ImageQuality, SceneFilter, ValidationError,
        ValidationErrorKind,
    };

    struct ConsoleProgress;

    impl BatchObserver for ConsoleProgress {
        fn on_event(&self, event: &BatchEvent) {
            match event {
                BatchEvent::Started { total } => println!("{} scenes to illustrate", total),
                BatchEvent::SceneStarted {
                    index,
                    total,
                    scene_id,
                } => println!("[{}/{}] scene {}", index + 1, total, scene_id),
                BatchEvent::SceneCompleted { scene_id, .. } => println!("  scene {} done", scene_id),
                BatchEvent::SceneFailed {
                    scene_id, message, ..
                } => println!("  scene {} failed: {}", scene_id, message),
                BatchEvent::Finished(_) => {}
            }
        }
    }

    let filter = match act {
        Some(number) => SceneFilter::Act(Act::from_number(number).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::Malformed(format!(
                "act {} does not exist",
                number
            )))
        })?),
        None => SceneFilter::All,
    };
    let quality = if pro {
        ImageQuality::Pro
    } else {
        ImageQuality::Standard
    };

    let client = GeminiClient::from_config(session.config(), tier)?;
    let mut studio = session.studio(client).await?;
    studio.load_project(project_id)?;

    let report = studio
        .generate_concept_images(filter, quality, &ConsoleProgress)
        .await?;

    if report.is_nothing_to_do() {
        println!("Every selected scene already has an image");
        return Ok(());
    }
    println!(
        "Finished: {} succeeded, {} failed",
        report.succeeded().len(),
        report.failed().len()
    );
    if *report.checkpoint_failures() > 0 {
        println!(
            "{} checkpoints were not saved, saving once more",
            report.checkpoint_failures()
        );
        studio.save_project().await?;
    }
    Ok(())
}

#[cfg(not(feature = "gemini"))]
pub async fn generate_concept_images(
    _session: &Session,
    _project_id: &str,
    _act: Option<u8>,
    _pro: bool,
    _tier: Option<&str>,
) -> AniDirectorResult<()> {
    eprintln!("Error: No media provider enabled. Rebuild with --features gemini");
    std::process::exit(1);
}
