//! Anidirector CLI binary.
//!
//! This binary provides command-line access to the storyboard studio:
//! - List saved projects and the character roster
//! - Export and import project backups
//! - Generate missing concept images for a project

use anidirector::{LogFormat, init_tracing};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{
        Cli, Commands, Session, export_project, generate_concept_images, import_backup,
        list_characters, list_projects,
    };

    // Pick up GEMINI_API_KEY from a local .env
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    let level = if cli.verbose { "debug" } else { "info" };
    init_tracing(format, level)?;

    let session = Session::open(cli.data_dir)?;

    // Execute the requested command
    match cli.command {
        Commands::Projects { format } => list_projects(&session, format).await?,

        Commands::Characters { format } => list_characters(&session, format).await?,

        Commands::Export { project_id, out } => {
            export_project(&session, &project_id, &out).await?;
        }

        Commands::Import { backup } => import_backup(&session, &backup).await?,

        Commands::Generate {
            project_id,
            act,
            pro,
            tier,
        } => {
            generate_concept_images(&session, &project_id, act, pro, tier.as_deref()).await?;
        }
    }

    Ok(())
}
