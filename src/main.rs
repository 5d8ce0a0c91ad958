use anyhow::{Context, Result};
use clap::{Arg, ArgAction};
use std::collections::HashMap;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use request_template::{config::DEFAULT_CONFIG_FILE, context, TemplateRegistry};

fn parse_argument(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Argument '{}' must look like key=value", raw))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let matches = clap::Command::new("request-template")
        .about("Resolve a request template into a dispatch-ready request")
        .arg(
            Arg::new("templates")
                .short('t')
                .long("templates")
                .value_name("TEMPLATES")
                .help("Path to a YAML file containing request templates")
                .default_value(DEFAULT_CONFIG_FILE),
        )
        .arg(
            Arg::new("operation")
                .short('o')
                .long("operation")
                .value_name("OPERATION")
                .help("Operation to resolve; omit to list the available operations"),
        )
        .arg(
            Arg::new("arg")
                .short('a')
                .long("arg")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Placeholder value, may be repeated"),
        )
        .arg(
            Arg::new("context_id")
                .short('c')
                .long("context-id")
                .value_name("CONTEXT_ID")
                .conflicts_with("new_context")
                .help("Opaque correlation id to attach to the request"),
        )
        .arg(
            Arg::new("new_context")
                .long("new-context")
                .action(ArgAction::SetTrue)
                .help("Attach a freshly generated correlation id"),
        )
        .arg(
            Arg::new("log_level")
                .short('l')
                .long("log-level")
                .value_name("LOG_LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .default_value("warn"),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log_level")
        .cloned()
        .unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let templates_path = matches
        .get_one::<String>("templates")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_CONFIG_FILE);
    let registry = TemplateRegistry::load(Some(Path::new(templates_path)))?;

    let Some(operation) = matches.get_one::<String>("operation") else {
        for name in registry.operations() {
            println!("{}", name);
        }
        return Ok(());
    };

    let arguments = matches
        .get_many::<String>("arg")
        .into_iter()
        .flatten()
        .map(|raw| parse_argument(raw))
        .collect::<Result<HashMap<_, _>>>()?;

    let context_id = if matches.get_flag("new_context") {
        Some(context::new_context_id())
    } else {
        matches.get_one::<String>("context_id").cloned()
    };

    tracing::info!(%operation, arguments = arguments.len(), "resolving operation");
    let request = registry.resolve(operation, &arguments, context_id.as_deref())?;

    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
