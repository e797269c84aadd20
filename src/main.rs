use std::io;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{info, warn};

use proposal_catalog::core::render::{render_cards, render_detail, render_table_csv};
use proposal_catalog::utils::logging::init_tracing;
use proposal_catalog::{
    AppConfig, Catalog, CatalogLoader, CatalogState, LoadOutcome, SortMode,
    StatusCategory, ViewMode, NAME, VERSION,
};

const SORT_MODES: [&str; 4] = ["default", "title-asc", "title-desc", "status"];
const STATUS_KEYS: [&str; 3] = ["funded", "not-funded", "under-review"];

fn listing_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("sort")
                .long("sort")
                .value_parser(SORT_MODES)
                .help("Listing order (defaults to the configured order)"),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .short('q')
                .value_parser(value_parser!(String))
                .help("Case-insensitive text search"),
        )
        .arg(
            Arg::new("hide")
                .long("hide")
                .value_parser(STATUS_KEYS)
                .action(ArgAction::Append)
                .help("Hide proposals with this status (repeatable)"),
        )
}

fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .about("Browse community proposals from a published spreadsheet")
        .arg(
            Arg::new("source")
                .long("source")
                .global(true)
                .value_parser(value_parser!(String))
                .help("CSV source: http(s) URL, file:// URL or local path"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Override the configured log level"),
        )
        .subcommand_required(true)
        .subcommand(
            listing_args(Command::new("list").about("List proposals"))
                .arg(
                    Arg::new("view")
                        .long("view")
                        .value_parser(["cards", "table"])
                        .help("Cards or a CSV table (defaults to the configured view)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the listing as JSON"),
                ),
        )
        .subcommand(
            listing_args(Command::new("show").about("Show one proposal by its slug"))
                .arg(
                    Arg::new("slug")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("Proposal slug, with or without a leading '#'"),
                )
                .arg(
                    Arg::new("next")
                        .long("next")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("prev")
                        .help(
                            "Show the proposal after this one in the listing \
                             (title order when the sort is 'default')",
                        ),
                )
                .arg(
                    Arg::new("prev")
                        .long("prev")
                        .action(ArgAction::SetTrue)
                        .help(
                            "Show the proposal before this one in the listing \
                             (title order when the sort is 'default')",
                        ),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or reset the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the active configuration"))
                .subcommand(Command::new("path").about("Print the configuration file path"))
                .subcommand(Command::new("reset").about("Restore default configuration")),
        )
}

/// Listing state from configured defaults and command-line flags
fn catalog_state(config: &AppConfig, args: &ArgMatches) -> CatalogState {
    let mut state = CatalogState::new();
    state.sort_mode = args
        .get_one::<String>("sort")
        .and_then(|value| value.parse::<SortMode>().ok())
        .unwrap_or(config.display.default_sort);

    if let Some(query) = args.get_one::<String>("search") {
        state.set_search_query(query);
    }
    if let Some(hidden) = args.get_many::<String>("hide") {
        for key in hidden {
            if let Some(status) = StatusCategory::from_key(key) {
                state.status_filters.set(status, false);
            }
        }
    }
    state
}

async fn load_catalog(config: &AppConfig, source: Option<&str>) -> Option<Catalog> {
    let loader = match CatalogLoader::from_config(config, source) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error loading data: {e}. Please make sure the spreadsheet is publicly accessible.");
            process::exit(1);
        }
    };

    match loader.load().await {
        Ok(LoadOutcome::Loaded(catalog)) => Some(catalog),
        Ok(LoadOutcome::Empty(reason)) => {
            info!("{}", reason.message());
            println!("No proposals available.");
            None
        }
        Err(e) => {
            eprintln!("Error loading data: {e}. Please make sure the spreadsheet is publicly accessible.");
            process::exit(1);
        }
    }
}

fn run_list(config: &AppConfig, catalog: &Catalog, args: &ArgMatches) -> anyhow::Result<()> {
    let state = catalog_state(config, args);
    let listing = state.apply(&catalog.proposals);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let view = args
        .get_one::<String>("view")
        .and_then(|value| value.parse::<ViewMode>().ok())
        .unwrap_or(config.display.default_view);

    match view {
        ViewMode::Cards => {
            println!("{}", proposal_count(listing.len()));
            print!("{}", render_cards(&listing));
        }
        ViewMode::Table => render_table_csv(&listing, io::stdout().lock())?,
    }
    Ok(())
}

fn proposal_count(count: usize) -> String {
    match count {
        1 => "1 proposal\n".to_string(),
        n => format!("{n} proposals\n"),
    }
}

fn run_show(config: &AppConfig, catalog: &Catalog, args: &ArgMatches) -> anyhow::Result<()> {
    let slug = args
        .get_one::<String>("slug")
        .map(String::as_str)
        .unwrap_or_default();

    let Some(selected) = catalog.initial_selection(Some(slug)) else {
        anyhow::bail!("No proposal found for '{}'", slug);
    };

    let state = catalog_state(config, args);
    let Some((listing, mut position)) = state.navigation(&catalog.proposals, &selected.slug) else {
        print!("{}", render_detail(selected, None));
        return Ok(());
    };

    if args.get_flag("next") {
        position = position.next();
    } else if args.get_flag("prev") {
        position = position.prev();
    }

    print!("{}", render_detail(listing[position.index()], Some(&position)));
    Ok(())
}

fn run_config(config: &AppConfig, args: &ArgMatches) -> anyhow::Result<()> {
    match args.subcommand() {
        Some(("show", _)) => println!("{}", config.export()?),
        Some(("path", _)) => println!("{}", AppConfig::get_config_path()?.display()),
        Some(("reset", _)) => {
            AppConfig::reset()?;
            println!("Configuration reset to defaults.");
        }
        _ => unreachable!("subcommand required"),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let loaded = AppConfig::load().and_then(|cfg| cfg.validate().map(|_| cfg));
    let level = matches
        .get_one::<String>("log-level")
        .cloned()
        .or_else(|| loaded.as_ref().ok().map(|cfg| cfg.advanced.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_tracing(&level);

    let config = match loaded {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!("Failed to load configuration: {:#}. Using defaults", err);
            AppConfig::default()
        }
    };
    let source = matches.get_one::<String>("source").map(String::as_str);

    let result = match matches.subcommand() {
        Some(("list", args)) => match load_catalog(&config, source).await {
            Some(catalog) => run_list(&config, &catalog, args),
            None => Ok(()),
        },
        Some(("show", args)) => match load_catalog(&config, source).await {
            Some(catalog) => run_show(&config, &catalog, args),
            None => Ok(()),
        },
        Some(("config", args)) => run_config(&config, args),
        _ => unreachable!("subcommand required"),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
