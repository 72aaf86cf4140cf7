#![forbid(unsafe_code)]

use std::io::{stdin, stdout};

use warden_core::{project_name, PermissionService};
use warden_inspect::{build_repository, init_tracing, load_snapshot, run, AppConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        project = project_name(),
        snapshot = %config.snapshot_path.display(),
        "warden-inspect starting"
    );
    let snapshot = load_snapshot(&config)?;
    let service = PermissionService::new(build_repository(snapshot));

    let answered = run(&service, stdin().lock(), stdout().lock())?;
    tracing::info!(answered, "warden-inspect finished");
    Ok(())
}
