//! Backup export and import handlers.

use super::Session;
use anidirector::{
    AniDirectorResult, OfflineGenerator, backup_file_name, read_backup_file, write_backup_file,
};
use std::path::{Path, PathBuf};

/// Export a saved project and its characters to a backup file.
///
/// If `out` is a directory the suggested `{title}_backup_{date}.json` name
/// is used inside it.
pub async fn export_project(session: &Session, project_id: &str, out: &Path) -> AniDirectorResult<()> {
    let mut studio = session.studio(OfflineGenerator).await?;
    studio.load_project(project_id)?;
    let document = studio.export_backup()?;

    let path: PathBuf = if out.is_dir() {
        out.join(backup_file_name(
            &studio.active().config.title,
            *document.export_date(),
        ))
    } else {
        out.to_path_buf()
    };
    write_backup_file(&path, &document).await?;

    println!(
        "Exported {} ({} characters) to {}",
        project_id,
        document.characters().len(),
        path.display()
    );
    Ok(())
}

/// Restore a backup file as a new project.
pub async fn import_backup(session: &Session, backup: &Path) -> AniDirectorResult<()> {
    let document = read_backup_file(backup).await?;
    let mut studio = session.studio(OfflineGenerator).await?;
    let restored = studio.restore_backup(document).await?;

    println!("Restored project {} \"{}\"", restored.id(), restored.name());
    println!("Roster now holds {} characters", studio.roster().len());
    Ok(())
}
