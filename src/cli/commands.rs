//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use generational_arena::Index;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{self, OutputFormat, Settings};
use crate::domain::{AttributeMap, MenuOptions, MenuTree, NamePolicy};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { document }) => show(cli, document),
        Some(Commands::Options { document, path }) => options(cli, document, path),
        Some(Commands::Children { document, path }) => children(cli, document, path),
        Some(Commands::Check { document }) => check(cli, document),
        Some(Commands::Config { command }) => config_command(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "menutree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see 'menutree --help'".to_string(),
        )),
    }
}

/// Load settings next to the document and apply command line overrides.
fn container_for(cli: &Cli, document: &Path) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(document.parent())?;
    if cli.lenient {
        settings.naming.enforce = false;
    }
    if let Some(format) = cli.format {
        settings.output.format = format;
    }
    debug!("effective settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

fn print_json(value: &impl Serialize, pretty: bool) -> CliResult<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        CliError::from(ApplicationError::OperationFailed {
            context: "serialize output".to_string(),
            source: Box::new(e),
        })
    })?;
    output::info(&rendered);
    Ok(())
}

fn join_attributes(attributes: &AttributeMap<String>) -> String {
    attributes
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_options(path: &str, options: &MenuOptions) {
    output::header(path);
    let unset = "-".to_string();
    output::field("label", options.label.as_ref().unwrap_or(&unset));
    output::field("uri", options.uri.as_ref().unwrap_or(&unset));
    output::field("route", options.route.as_ref().unwrap_or(&unset));
    output::field(
        "content",
        &options
            .content
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| unset.clone()),
    );
    output::field("attributes", &join_attributes(&options.attributes));
    output::field("childAttributes", &join_attributes(&options.child_attributes));
}

/// Renderable node with its options and renderable descendants.
#[derive(Debug, Serialize)]
struct RenderedNode {
    path: String,
    options: MenuOptions,
    children: Vec<RenderedNode>,
}

fn rendered_node(tree: &MenuTree, idx: Index) -> CliResult<Option<RenderedNode>> {
    let Some(node) = tree.menu(idx) else {
        return Ok(None);
    };
    let mut children = Vec::new();
    for child in tree.menu_children(idx) {
        if let Some(rendered) = rendered_node(tree, child)? {
            children.push(rendered);
        }
    }
    Ok(Some(RenderedNode {
        path: tree.path_of(idx).unwrap_or_default(),
        options: node.options().map_err(ApplicationError::from)?,
        children,
    }))
}

#[instrument(skip(cli))]
fn show(cli: &Cli, document: &Path) -> CliResult<()> {
    let container = container_for(cli, document)?;
    let tree = container.menu.load(document)?;
    match container.settings.output.format {
        OutputFormat::Tree => output::info(&tree.to_tree_string()),
        OutputFormat::Json => {
            let rendered = match tree.root() {
                Some(root) => rendered_node(&tree, root)?,
                None => None,
            };
            print_json(&rendered, container.settings.output.pretty)?;
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn options(cli: &Cli, document: &Path, path: &str) -> CliResult<()> {
    let container = container_for(cli, document)?;
    let tree = container.menu.load(document)?;
    let options = container.menu.options_at(&tree, path)?;
    match container.settings.output.format {
        OutputFormat::Tree => print_options(path, &options),
        OutputFormat::Json => print_json(&options, container.settings.output.pretty)?,
    }
    Ok(())
}

#[instrument(skip(cli))]
fn children(cli: &Cli, document: &Path, path: &str) -> CliResult<()> {
    let container = container_for(cli, document)?;
    let tree = container.menu.load(document)?;
    let children = container.menu.children_at(&tree, path)?;
    match container.settings.output.format {
        OutputFormat::Tree => {
            if children.is_empty() {
                output::warning(&format!("no menu children under {}", path));
            }
            for child in &children {
                print_options(&child.path, &child.options);
            }
        }
        OutputFormat::Json => print_json(&children, container.settings.output.pretty)?,
    }
    Ok(())
}

#[instrument(skip(cli))]
fn check(cli: &Cli, document: &Path) -> CliResult<()> {
    let container = container_for(cli, document)?;
    // Load leniently so naming problems are reported instead of aborting the load
    let policy = NamePolicy {
        enforce: false,
        ..container.menu.policy().clone()
    };
    let tree = container.menu.load_with(document, policy)?;
    let problems = container.menu.check(&tree);
    if problems.is_empty() {
        output::success(&format!("{}: {} entries, no problems", document.display(), tree.len()));
        return Ok(());
    }
    output::header(&document.display());
    for problem in &problems {
        output::failure(&format!("{}: {}", problem.path, problem.error));
    }
    Err(CliError::ProblemsFound(problems.len()))
}

fn config_command(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(Path::new(".")))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match config::global_config_path() {
                Some(path) => output::field("global", &path.display()),
                None => output::field("global", "<unavailable>"),
            }
            output::field("local", &config::local_config_path(Path::new(".")).display());
        }
    }
    Ok(())
}
