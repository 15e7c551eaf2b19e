//! Command handlers

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::render::{self, TreeNodeConvert};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::LeafOrder;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build {
            file,
            output,
            compact,
            sorted,
        }) => cmd_build(cli, file, output.as_deref(), *compact, *sorted),
        Some(Commands::Tree { file, sorted }) => cmd_tree(cli, file, *sorted),
        Some(Commands::Summary { file }) => cmd_summary(cli, file),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(cli),
            ConfigCommands::Init { force } => cmd_config_init(*force),
            ConfigCommands::Path => cmd_config_path(cli),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

/// Load layered settings and wire the services.
fn container(cli: &Cli, sorted: bool) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if sorted {
        settings.leaf_order = LeafOrder::Sorted;
    }
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings)?)
}

#[instrument(skip(cli))]
fn cmd_build(
    cli: &Cli,
    file: &Path,
    out: Option<&Path>,
    compact: bool,
    sorted: bool,
) -> CliResult<()> {
    let container = container(cli, sorted)?;
    let result = container.wheel.load(file)?;
    let pretty = container.settings.pretty && !compact;

    match out {
        Some(path) => {
            container.wheel.write_json(&result.tree, path, pretty)?;
            output::success(&format!(
                "wrote {} ({} outer, {} middle, {} leaves)",
                path.display(),
                result.stats.outer,
                result.stats.middle,
                result.stats.leaves
            ));
        }
        None => output::info(&render::to_json(&result.tree, pretty)?),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, file: &Path, sorted: bool) -> CliResult<()> {
    let container = container(cli, sorted)?;
    let result = container.wheel.load(file)?;
    print!("{}", result.tree.to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_summary(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = container(cli, false)?;
    let result = container.wheel.load(file)?;
    let stats = &result.stats;

    output::header(&format!("{} ({})", file.display(), result.tree.name));
    output::detail(&format!("rows:             {}", stats.rows));
    output::detail(&format!("outer:            {}", stats.outer));
    output::detail(&format!("middle:           {}", stats.middle));
    output::detail(&format!("leaves:           {}", stats.leaves));
    output::detail(&format!("empty leaves:     {}", stats.empty_leaves));
    output::detail(&format!("duplicate leaves: {}", stats.duplicate_leaves));
    if stats.rows == 0 {
        output::warning("no data rows");
    }
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_init(force: bool) -> CliResult<()> {
    let path = global_config_path()
        .ok_or_else(|| CliError::Usage("cannot determine config directory".to_string()))?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    if fs.is_file(&path) && !force {
        return Err(CliError::InvalidArgs(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }

    let template = Settings::default().to_toml()?;
    fs.ensure_parent(&path)
        .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
    fs.write(&path, &template)
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Created", &path.display());
    Ok(())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    match global_config_path() {
        Some(path) => {
            let state = if path.exists() { "" } else { " (not found)" };
            output::detail(&format!("global:   {}{}", path.display(), state));
        }
        None => output::warning("cannot determine global config directory"),
    }
    if let Some(path) = &cli.config {
        output::detail(&format!("explicit: {}", path.display()));
    }
    Ok(())
}
