//! Graphbook CLI - Author knowledge graphs of categorized content nodes.

use std::path::Path;
use std::process;

use clap::Parser;
use graphbook::cli::{
    AssetCommands, CategoryCommands, Cli, Commands, ConfigCommands, EdgeCommands, NodeCommands,
};
use graphbook::commands::{self, NodeUpdate, Output, Session};
use graphbook::config::{self, ConfigOverrides, OutputFormat, ResolvedConfig};
use graphbook::models::Position;
use graphbook::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `GB_LOG=debug`.
const LOG_ENV: &str = "GB_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing();

    // Until the config file is read, only -H decides the error format.
    let mut human = cli.human_readable;
    if let Err(e) = run(cli, &mut human) {
        report(&e, human);
        process::exit(1);
    }
}

fn run(cli: Cli, human: &mut bool) -> Result<()> {
    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Some(Commands::Export {
        format: Some(format),
        ..
    }) = &cli.command
    {
        overrides = overrides.with_export_format(*format);
    }

    let dir = config::config_dir()?;
    let resolved = config::resolve_from_dir(&dir, &overrides)?;
    *human = resolved.output_format() == OutputFormat::Human;

    run_command(cli.command, &cli.project, &dir, &resolved, *human)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(e: &Error, human: bool) {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
}

fn run_command(
    command: Option<Commands>,
    project: &Path,
    config_dir: &Path,
    config: &ResolvedConfig,
    human: bool,
) -> Result<()> {
    match command {
        Some(Commands::New { name, force }) => {
            let result = commands::new_project(project, config, name.as_deref(), force)?;
            output(&result, human);
        }

        Some(Commands::Show) | None => {
            in_session(project, config, human, |s| Ok(commands::show(s)))?;
        }

        Some(Commands::Rename { name }) => {
            in_session(project, config, human, |s| commands::rename(s, &name))?;
        }

        Some(Commands::Category { command }) => match command {
            CategoryCommands::Add { name, color } => {
                in_session(project, config, human, |s| {
                    commands::category_add(s, &name, color.as_deref())
                })?;
            }
            CategoryCommands::Update { id, name, color } => {
                in_session(project, config, human, |s| {
                    commands::category_update(s, &id, &name, color.as_deref())
                })?;
            }
            CategoryCommands::Delete { id } => {
                in_session(project, config, human, |s| commands::category_delete(s, &id))?;
            }
            CategoryCommands::Move { id, index } => {
                in_session(project, config, human, |s| {
                    commands::category_move(s, &id, index)
                })?;
            }
            CategoryCommands::List => {
                in_session(project, config, human, |s| Ok(commands::category_list(s)))?;
            }
        },

        Some(Commands::Node { command }) => match command {
            NodeCommands::Add { category, title } => {
                in_session(project, config, human, |s| {
                    commands::node_add(s, &category, title.as_deref())
                })?;
            }
            NodeCommands::Show { id } => {
                in_session(project, config, human, |s| commands::node_show(s, &id))?;
            }
            NodeCommands::Update {
                id,
                title,
                content_asset,
                clear_content,
                x,
                y,
                clear_position,
            } => {
                let update = NodeUpdate {
                    title,
                    content_asset,
                    clear_content,
                    position: x.zip(y).map(|(x, y)| Position { x, y }),
                    clear_position,
                };
                in_session(project, config, human, |s| {
                    commands::node_update(s, &id, update)
                })?;
            }
            NodeCommands::Delete { id } => {
                in_session(project, config, human, |s| commands::node_delete(s, &id))?;
            }
            NodeCommands::Move {
                id,
                category,
                index,
            } => {
                in_session(project, config, human, |s| {
                    commands::node_move(s, &id, &category, index)
                })?;
            }
            NodeCommands::List { category } => {
                in_session(project, config, human, |s| {
                    Ok(commands::node_list(s, category.as_deref()))
                })?;
            }
        },

        Some(Commands::Edge { command }) => match command {
            EdgeCommands::Add { source, target } => {
                in_session(project, config, human, |s| {
                    commands::edge_add(s, &source, &target)
                })?;
            }
            EdgeCommands::Delete { id } => {
                in_session(project, config, human, |s| commands::edge_delete(s, &id))?;
            }
            EdgeCommands::List { node } => {
                in_session(project, config, human, |s| {
                    Ok(commands::edge_list(s, node.as_deref()))
                })?;
            }
        },

        Some(Commands::Asset { command }) => match command {
            AssetCommands::Add {
                file,
                mime_type,
                node,
            } => {
                in_session(project, config, human, |s| {
                    commands::asset_add(s, &file, mime_type.as_deref(), node.as_deref())
                })?;
            }
            AssetCommands::Remote {
                name,
                url,
                mime_type,
                wp_id,
            } => {
                in_session(project, config, human, |s| {
                    commands::asset_remote(s, &name, &url, mime_type.as_deref(), wp_id)
                })?;
            }
            AssetCommands::Remove { id } => {
                in_session(project, config, human, |s| commands::asset_remove(s, &id))?;
            }
            AssetCommands::List => {
                in_session(project, config, human, |s| Ok(commands::asset_list(s)))?;
            }
        },

        // --format already reached the resolver as an override.
        Some(Commands::Export { dir, name, .. }) => {
            in_session(project, config, human, |s| {
                commands::export(s, &dir, config.export_format(), name.as_deref())
            })?;
        }

        Some(Commands::Import { file }) => {
            let result = commands::import(project, config, &file)?;
            output(&result, human);
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(config_dir, config);
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config_set(config_dir, &key, &value)?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

/// Open the working file, run one action, and print its result.
///
/// Feedback toasts go to stderr in human mode only, so JSON stdout stays
/// a single document.
fn in_session<T, F>(project: &Path, config: &ResolvedConfig, human: bool, action: F) -> Result<()>
where
    T: Output,
    F: FnOnce(&mut Session) -> Result<T>,
{
    let mut session = Session::open(project, config)?;
    let result = action(&mut session)?;
    output(&result, human);

    if human {
        for toast in session.toasts_mut().drain() {
            eprintln!("{}", toast);
        }
    }
    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
