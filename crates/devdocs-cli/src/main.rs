use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::{debug, info};

use devdocs_core::catalog::{self, CatalogItem, CatalogView, EmptyReason, KindFilter, ViewMode};
use devdocs_core::config::{self, CONFIG_FILE_NAME, DevdocsConfig};
use devdocs_core::nav::content::sections_from_str;
use devdocs_core::nav::{ContentSection, MenuEntry};
use devdocs_core::parse;
use devdocs_core::render;
use devdocs_core::spy::{ScrollSpy, SectionBoundary, share_link};
use devdocs_core::store;
use devdocs_core::validate::{ContractValidator, ValidationOutcome};

#[derive(Parser)]
#[command(
    name = "devdocs",
    about = "Navigation, scroll-spy and contract checks for API documentation pages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the navigation tree built from an OpenAPI document
    Menu {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: DataFormat,
    },

    /// Render the navigation as HTML
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Section to mark active; its groups are expanded
        #[arg(long)]
        active: Option<String>,
    },

    /// Validate an OpenAPI contract
    Validate {
        /// Path to the contract (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Print the HTML result panel instead of a text summary
        #[arg(long)]
        html: bool,
    },

    /// Replay scroll positions against measured section boundaries
    Spy {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON array of `{ id, offsetTop, height }` boundaries
        #[arg(short, long)]
        boundaries: PathBuf,

        /// Scroll positions, evaluated in order
        #[arg(long = "scroll-y", num_args = 1..)]
        scroll_y: Vec<f64>,

        /// Menu entry clicked after the scroll positions are replayed
        #[arg(long)]
        jump: Option<String>,
    },

    /// Emit the document-store provisioning script
    Schemas {
        /// Output format
        #[arg(long, default_value = "mongosh")]
        format: SchemaFormat,

        /// Database to switch to before creating collections
        #[arg(long)]
        database: Option<String>,
    },

    /// Filter and search a project/repository catalog
    Catalog {
        /// JSON or YAML list of catalog items
        #[arg(short, long)]
        items: PathBuf,

        /// all | project | repository
        #[arg(long, default_value = "all")]
        filter: KindFilter,

        /// Search text (ignored below two characters)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Owner segment of detail URLs
        #[arg(long, default_value = "username")]
        owner: String,

        #[arg(long, default_value = "grid")]
        view: ViewArg,
    },

    /// Initialize a new devdocs configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Path to the OpenAPI document (defaults to the configured input)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CMS sections appended after the API sections
    #[arg(short, long)]
    sections: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum DataFormat {
    Yaml,
    Json,
}

#[derive(Clone, ValueEnum)]
enum SchemaFormat {
    Mongosh,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Grid,
    List,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Menu { source, format } => cmd_menu(source, format),

        Commands::Render { source, active } => cmd_render(source, active),

        Commands::Validate { input, html } => cmd_validate(input, html),

        Commands::Spy {
            source,
            boundaries,
            scroll_y,
            jump,
        } => cmd_spy(source, boundaries, scroll_y, jump),

        Commands::Schemas { format, database } => cmd_schemas(format, database),

        Commands::Catalog {
            items,
            filter,
            query,
            owner,
            view,
        } => cmd_catalog(items, filter, query, owner, view),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "devdocs", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn load_project_config() -> Result<DevdocsConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path)?;
    if cfg.is_some() {
        debug!("loaded {}", config_path.display());
    }
    Ok(cfg.unwrap_or_default())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_sections(path: Option<&Path>) -> Result<Vec<ContentSection>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    sections_from_str(&read(path)?)
        .with_context(|| format!("invalid content sections in {}", path.display()))
}

/// Parse the document and sections named on the command line or in config,
/// and build the menu.
fn build_menu(source: &SourceArgs, cfg: &DevdocsConfig) -> Result<Vec<MenuEntry>> {
    let input = source
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.input));
    let spec = parse::from_str(&read(&input)?)
        .with_context(|| format!("invalid OpenAPI document {}", input.display()))?;

    let sections_path = source
        .sections
        .clone()
        .or_else(|| cfg.sections.as_ref().map(PathBuf::from));
    let sections = load_sections(sections_path.as_deref())?;

    let menu = cfg.menu_builder().build(Some(&spec), &sections)?;
    info!(
        "built menu for {} ({} entries, {} content sections)",
        input.display(),
        menu.len(),
        sections.len()
    );
    Ok(menu)
}

fn cmd_menu(source: SourceArgs, format: DataFormat) -> Result<()> {
    let cfg = load_project_config()?;
    let menu = build_menu(&source, &cfg)?;

    match format {
        DataFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&menu)?),
        DataFormat::Json => println!("{}", serde_json::to_string_pretty(&menu)?),
    }
    Ok(())
}

fn cmd_render(source: SourceArgs, active: Option<String>) -> Result<()> {
    let cfg = load_project_config()?;
    let menu = build_menu(&source, &cfg)?;

    let mut tracker = cfg.tracker(&menu);
    if let Some(id) = active {
        tracker.activate(&id);
    }
    print!("{}", render::render_menu(&menu, tracker.state())?);
    Ok(())
}

fn cmd_validate(input: PathBuf, html: bool) -> Result<()> {
    let content = read(&input)?;

    let mut validator = ContractValidator::new();
    let Some(outcome) = validator.validate(&content) else {
        anyhow::bail!("a validation is already in progress");
    };

    if html {
        print!("{}", render::render_validation(&outcome)?);
        return Ok(());
    }

    match outcome {
        ValidationOutcome::Valid(summary) => {
            eprintln!("Valid OpenAPI {} contract: {}", summary.openapi, summary.title);
            eprintln!("  Version: {}", summary.version);
            eprintln!("  Paths: {}", summary.path_count);
            eprintln!("  Schemas: {}", summary.schema_count);
            Ok(())
        }
        ValidationOutcome::Empty => {
            eprintln!("{} is empty; nothing to validate.", input.display());
            Ok(())
        }
        ValidationOutcome::Invalid(err) => {
            for detail in &err.details {
                eprintln!("  {detail}");
            }
            Err(anyhow::Error::new(err).context(format!("{} is not a valid contract", input.display())))
        }
    }
}

fn cmd_spy(
    source: SourceArgs,
    boundaries: PathBuf,
    positions: Vec<f64>,
    jump: Option<String>,
) -> Result<()> {
    let cfg = load_project_config()?;
    let menu = build_menu(&source, &cfg)?;
    let boundaries: Vec<SectionBoundary> = serde_json::from_str(&read(&boundaries)?)
        .with_context(|| format!("invalid section boundaries in {}", boundaries.display()))?;

    let mut spy = ScrollSpy::new(cfg.tracker(&menu));
    for scroll_y in positions {
        spy.on_scroll(scroll_y);
        let found = spy.on_frame(&boundaries);
        let active = spy.tracker().active().unwrap_or("-");
        match found {
            Some(_) => println!("{scroll_y}\t{active}"),
            None => println!("{scroll_y}\t{active}\t(outside every section)"),
        }
    }

    if let Some(id) = jump {
        let target = spy
            .tracker_mut()
            .jump_to(&id, &boundaries)
            .with_context(|| format!("no section boundary for {id}"))?;
        println!("jump\t{id}\t{target}");
    }

    let state = spy.tracker().state();
    let expanded: Vec<&str> = state.expanded().collect();
    eprintln!("expanded: {}", expanded.join(", "));
    if let (Some(base), Some(active)) = (&cfg.site.base_url, state.active()) {
        eprintln!("share: {}", share_link(base, active));
    }
    Ok(())
}

fn cmd_schemas(format: SchemaFormat, database: Option<String>) -> Result<()> {
    let cfg = load_project_config()?;
    let database = database.or(cfg.store.database);
    let collections = store::collections();

    let output = match format {
        SchemaFormat::Mongosh => store::emit_mongosh(&collections, database.as_deref())?,
        SchemaFormat::Json => store::emit_json(&collections)?,
    };
    println!("{output}");
    Ok(())
}

fn cmd_catalog(
    items: PathBuf,
    filter: KindFilter,
    query: String,
    owner: String,
    view: ViewArg,
) -> Result<()> {
    let content = read(&items)?;
    let items: Vec<CatalogItem> = serde_yaml_ng::from_str(&content)
        .with_context(|| format!("invalid catalog items in {}", items.display()))?;

    let mut listing = CatalogView::new(items);
    listing.set_filter(filter);
    listing.set_query(query);
    listing.set_mode(match view {
        ViewArg::Grid => ViewMode::Grid,
        ViewArg::List => ViewMode::List,
    });

    match listing.empty_state() {
        Some(EmptyReason::Search) => eprintln!("No items match \"{}\".", listing.query()),
        Some(EmptyReason::NoItems) => eprintln!("No {} items.", listing.filter()),
        None => {}
    }

    for item in listing.visible() {
        let url = catalog::detail_path(&owner, item.kind, &item.id);
        let edit = catalog::edit_path(&owner, item.kind, &item.id);
        match listing.mode() {
            ViewMode::Grid => println!(
                "[{}] {}\n    {}\n    edit: {}",
                item.kind, item.title, url, edit
            ),
            ViewMode::List => println!("{}\t{}\t{}\t{}", item.kind, item.title, url, edit),
        }
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
