//! Roster and project listing handlers.

use super::{OutputFormat, Session};
use anidirector::{AniDirectorResult, JsonError, OfflineGenerator};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> AniDirectorResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// List saved projects.
pub async fn list_projects(session: &Session, format: OutputFormat) -> AniDirectorResult<()> {
    let studio = session.studio(OfflineGenerator).await?;
    let projects = studio.projects();

    match format {
        OutputFormat::Json => print_json(projects)?,
        OutputFormat::Human => {
            println!(
                "{:<16} {:<20} {:<18} {:>7} {:>7}  NAME",
                "ID", "UPDATED", "STAGE", "SCENES", "IMAGES"
            );
            println!("{:-<80}", "");
            for project in projects {
                let (scenes, images) = project
                    .storyboard_data()
                    .as_ref()
                    .map(|board| (board.scenes().len(), board.concept_image_count()))
                    .unwrap_or_default();
                println!(
                    "{:<16} {:<20} {:<18} {:>7} {:>7}  {}",
                    project.id(),
                    project.updated_at().format("%Y-%m-%d %H:%M"),
                    project.stage(),
                    scenes,
                    images,
                    project.name()
                );
            }
            println!("Total: {} projects", projects.len());
        }
    }

    Ok(())
}

/// List the character roster.
///
/// The first listing after an upgrade migrates a legacy roster blob.
pub async fn list_characters(session: &Session, format: OutputFormat) -> AniDirectorResult<()> {
    let studio = session.studio(OfflineGenerator).await?;
    let members = studio.roster().members();

    match format {
        OutputFormat::Json => print_json(members)?,
        OutputFormat::Human => {
            for character in members {
                let portrait = if character.image_ref().is_some() {
                    "portrait"
                } else {
                    "-"
                };
                println!(
                    "{:<38} {:<20} {:<9} {}",
                    character.id(),
                    character.name(),
                    portrait,
                    character.description()
                );
            }
            println!("Total: {} characters", members.len());
        }
    }

    Ok(())
}
