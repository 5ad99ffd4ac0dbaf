//! `tb serve`: run the HTTP task API until interrupted.

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{self, AppState};
use crate::cli::commands::CommandContext;
use crate::error::Result;
use crate::storage::open_repository;

/// Execute the serve command.
///
/// # Errors
///
/// Returns an error if storage cannot be opened, the address cannot be
/// bound, or the server fails.
pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let settings = &ctx.settings;
    let repo = open_repository(settings.storage, &settings.db_path)?;
    info!(
        storage = settings.storage.as_str(),
        db = %settings.db_path.display(),
        "Opened task storage"
    );

    let listener = TcpListener::bind(settings.bind_address()).await?;
    if !ctx.quiet {
        eprintln!(
            "Serving tasks on http://{} ({} storage, Ctrl+C to stop)",
            listener.local_addr()?,
            settings.storage.as_str()
        );
    }

    api::serve(listener, AppState::with_repository(repo), api::shutdown_signal()).await?;
    Ok(())
}
