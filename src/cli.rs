use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Settings;
use crate::data::effect::{load_effect_catalog, EffectCatalog};
use crate::data::validate::{validate_catalog, ValidationSeverity};
use crate::export::{write_catalog_csv, write_results_csv};
use crate::render;
use crate::roll::SeededRoller;
use crate::search::{SearchPanel, SeedCache};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Catalog,
    Search,
    Index,
    Validate,
}

const USAGE: &str = "usage: seedfinder <serve|catalog|search|index|validate>";

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("catalog") => Some(Command::Catalog),
        Some("search") => Some(Command::Search),
        Some("index") => Some(Command::Index),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let settings = Settings::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&settings),
        Some(Command::Catalog) => handle_catalog(args, &settings),
        Some(Command::Search) => handle_search(args, &settings),
        Some(Command::Index) => handle_index(args, &settings),
        Some(Command::Validate) => handle_validate(args, &settings),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Positional arguments after the command, with flags pulled out.
struct CommandArgs {
    catalog_path: PathBuf,
    values: Vec<String>,
    format: OutputFormat,
}

/// The first positional is taken as the catalog path when it looks like a file
/// (`.json`, `.yaml`, `.yml`); otherwise the configured catalog is used.
fn split_args(args: &[String], settings: &Settings) -> CommandArgs {
    let mut format = OutputFormat::Text;
    let mut positionals = Vec::new();
    for arg in args.iter().skip(2) {
        match arg.as_str() {
            "--json" => format = OutputFormat::Json,
            "--csv" => format = OutputFormat::Csv,
            other => positionals.push(other.to_string()),
        }
    }

    let looks_like_path = positionals.first().is_some_and(|first| {
        let lower = first.to_ascii_lowercase();
        lower.ends_with(".json") || lower.ends_with(".yaml") || lower.ends_with(".yml")
    });
    let catalog_path = if looks_like_path {
        PathBuf::from(positionals.remove(0))
    } else {
        settings.catalog_path.clone()
    };

    CommandArgs {
        catalog_path,
        values: positionals,
        format,
    }
}

fn load_catalog(path: &Path) -> Option<EffectCatalog> {
    match load_effect_catalog(path) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            eprintln!("failed to load catalog: {err}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_serve(settings: &Settings) -> i32 {
    match server::run_server(settings) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_catalog(args: &[String], settings: &Settings) -> i32 {
    let parsed = split_args(args, settings);
    let Some(catalog) = load_catalog(&parsed.catalog_path) else {
        return 1;
    };
    let items = crate::search::catalog_view(&catalog.effects, &catalog.sentinel);

    match parsed.format {
        OutputFormat::Json => print_json(&items, "catalog"),
        OutputFormat::Csv => match write_catalog_csv(io::stdout().lock(), &items) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{err}");
                1
            }
        },
        OutputFormat::Text => {
            for item in &items {
                println!("{}\t{}", item.value, item.label);
            }
            0
        }
    }
}

fn handle_search(args: &[String], settings: &Settings) -> i32 {
    let parsed = split_args(args, settings);
    let Some(catalog) = load_catalog(&parsed.catalog_path) else {
        return 1;
    };

    let cache = SeedCache::with_pool(SeededRoller::new(settings.roll_seed), settings.worker_pool());
    let views = cache.get_or_build(&catalog);
    let mut panel = SearchPanel::from_views(&views);

    let selected: Vec<&str> = parsed.values.iter().map(String::as_str).collect();
    panel.select(&selected);
    for value in &selected {
        if !views.items.iter().any(|item| item.value == *value) {
            warn!(effect = *value, "not a selectable effect, ignoring");
        }
    }

    let view = panel.view();
    match parsed.format {
        OutputFormat::Text => {
            print!("{}", render::text(&view));
            0
        }
        OutputFormat::Json => print_json(&view, "search view"),
        OutputFormat::Csv => {
            let lines = view.results.unwrap_or_default();
            match write_results_csv(io::stdout().lock(), &lines) {
                Ok(()) => 0,
                Err(err) => {
                    eprintln!("{err}");
                    1
                }
            }
        }
    }
}

fn handle_index(args: &[String], settings: &Settings) -> i32 {
    let parsed = split_args(args, settings);
    let Some(catalog) = load_catalog(&parsed.catalog_path) else {
        return 1;
    };
    let cache = SeedCache::with_pool(SeededRoller::new(settings.roll_seed), settings.worker_pool());
    let views = cache.get_or_build(&catalog);
    print_json(&views.index.summary(), "index summary")
}

fn handle_validate(args: &[String], settings: &Settings) -> i32 {
    let parsed = split_args(args, settings);
    let Some(catalog) = load_catalog(&parsed.catalog_path) else {
        return 1;
    };
    let path = parsed.catalog_path.display();

    let report = validate_catalog(&catalog);
    for diagnostic in &report.diagnostics {
        if diagnostic.severity != ValidationSeverity::Info {
            eprintln!("- {diagnostic}");
        }
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.error_count());
        1
    } else {
        println!("validation passed: {path} ({} effects)", catalog.effects.len());
        0
    }
}
