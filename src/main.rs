// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use xbrl_viewer::{
    apply_search, load_source, report, Category, FactsView, LoadedFacts,
    ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "xbrl-viewer", version, about = "Categorized, searchable views of XBRL facts")]
struct Cli {
    /// JSON config file (falls back to $XBRL_VIEWER_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a self-contained HTML report
    Render {
        /// XBRL JSON document or a rendered .html page
        input: PathBuf,

        /// Output file (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Browse facts interactively in the terminal
    View { input: PathBuf },
    /// Print fact counts per category and the computed metrics
    Summary {
        input: PathBuf,

        /// Only count facts matching this search text
        #[arg(short, long)]
        search: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ViewerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Render { input, output } => run_render(&config, &input, output),
        Command::View { input } => run_ui_mode(&config, &input),
        Command::Summary { input, search } => run_summary(&config, &input, search.as_deref()),
    }
}

/// Load facts and build the category view; `None` when the page had no data
fn prepare(config: &ViewerConfig, input: &Path) -> Result<Option<(LoadedFacts, FactsView)>> {
    let loaded = match load_source(input, &config.element_ids.data)? {
        Some(loaded) => loaded,
        None => return Ok(None),
    };
    let rules = config.category_rules()?;
    let view = FactsView::build(&loaded.facts, &rules, &config.element_ids);
    Ok(Some((loaded, view)))
}

fn run_render(config: &ViewerConfig, input: &Path, output: Option<PathBuf>) -> Result<()> {
    println!("📂 Loading facts from {}...", input.display());
    let Some((loaded, view)) = prepare(config, input)? else {
        eprintln!("❌ No facts data found in {}", input.display());
        std::process::exit(1);
    };
    println!("✓ Loaded {} facts", loaded.facts.len());

    let comparisons = loaded.comparisons();
    let html = report::generate(&report::ReportData {
        title: &config.title,
        facts: &loaded.facts,
        view: &view,
        comparisons: &comparisons,
        ids: &config.element_ids,
        generated_at: Utc::now(),
    })?;

    let output = output.unwrap_or_else(|| config.output_path.clone());
    std::fs::write(&output, html)
        .with_context(|| format!("Failed to write report: {:?}", output))?;
    println!("✅ Report written to {}", output.display());

    Ok(())
}

fn run_summary(config: &ViewerConfig, input: &Path, search: Option<&str>) -> Result<()> {
    let Some((loaded, mut view)) = prepare(config, input)? else {
        eprintln!("❌ No facts data found in {}", input.display());
        std::process::exit(1);
    };

    if let Some(query) = search {
        let outcome = apply_search(&mut view, query);
        println!(
            "🔍 \"{}\": {} rows in {} groups",
            query, outcome.visible_rows, outcome.visible_groups
        );
    }

    println!("📊 {} facts", loaded.facts.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for category in Category::ALL {
        if let Some(container) = view.container(category) {
            let rows: usize = container
                .visible_groups()
                .map(|g| g.table.visible_rows().count())
                .sum();
            println!(
                "{:<18} {:>6} facts  {:>4} contexts",
                category.title(),
                rows,
                container.visible_groups().count()
            );
        }
    }

    for comparison in loaded.comparisons() {
        println!("\n{}", comparison.title);
        for row in &comparison.rows {
            println!("  {:<20} {:>14.4}  (sector {:.4})", row.label, row.company, row.sector);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &ViewerConfig, input: &Path) -> Result<()> {
    let Some((loaded, view)) = prepare(config, input)? else {
        eprintln!("❌ No facts data found in {}", input.display());
        std::process::exit(1);
    };

    println!("✓ Loaded {} facts", loaded.facts.len());
    println!("Starting viewer... (Press 'q' to quit)\n");

    let comparisons = loaded.comparisons();
    let mut app = ui::App::new(view, comparisons);
    ui::run_ui(&mut app)?;

    println!("\n✅ Viewer closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &ViewerConfig, _input: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or write a report: xbrl-viewer render <input>");
    std::process::exit(1);
}
