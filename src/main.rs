use clap::Parser;

use clipguard::bootstrap::{self, AppPaths};
use clipguard::cli::Cli;
use clipguard::commands::{self, PasswordSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve(cli.config_dir.clone())?;
    paths.ensure_dirs()?;
    bootstrap::tracing::init_tracing_subscriber(&paths.logs_dir)?;

    let config = bootstrap::load_config_or_default(&paths.config_path)?;
    let app = bootstrap::wire_system_app(&paths, &config).await?;

    let passwords = PasswordSource::from_cli(cli.password_env);
    commands::execute(cli.command, app, &passwords).await
}
