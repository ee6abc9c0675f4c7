use clap::{Parser, Subcommand};
use helpwiki::config::{self, ConvertConfig};
use helpwiki::scan::{self, Manifest, Sources};
use helpwiki::{generate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "helpwiki")]
#[command(about = "Convert an HTML help-center export into wiki Markdown")]
#[command(long_about = "\
Convert an HTML help-center export into wiki Markdown

Export structure:

  export/
  ├── categories/                  # Category pages (categorized layout)
  │   ├── billing.html             # <h1> becomes the category title
  │   └── getting-started.html
  └── articles/
      ├── first-steps.html         # Breadcrumb to categories/getting-started.html
      └── invoices.html

Wiki structure (categorized):

  wiki/
  ├── Home.md                      # Welcome page with category links
  ├── _Sidebar.md                  # Navigation
  └── getting-started/
      ├── README.md                # Category index
      └── first-steps.md

Lookup order (first available wins):
  Title:    <h1> → <title> → filename (first-steps.html → \"First Steps\")
  Content:  article → div.article-body → div.content → body
  Category: first breadcrumb link into categories/, else \"Uncategorized\"

Set RUST_LOG=debug to see every skipped file.
Run 'helpwiki gen-config' to generate a documented helpwiki.toml.")]
#[command(version)]
struct Cli {
    /// Directory of exported article pages
    #[arg(long, default_value = "articles", global = true)]
    articles: PathBuf,

    /// Directory of exported category pages (categorized layout)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    /// Output directory for the wiki
    #[arg(long, default_value = "wiki", global = true)]
    output: PathBuf,

    /// Config file [default: helpwiki.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → generate
    Convert,
    /// Scan the export and show what would be written, without writing
    Check,
    /// Print the scan manifest as JSON
    Scan,
    /// Print a stock helpwiki.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Convert => {
            let config = load_config(&cli)?;
            let manifest = scan_export(&cli, &config)?;
            for outcome in &manifest.outcomes {
                output::print_outcome(outcome);
            }
            println!("==> Writing wiki → {}", cli.output.display());
            let written =
                generate::generate_with(&manifest, &cli.output, &config, output::print_outcome)?;
            output::print_summary(manifest.outcomes.iter().chain(&written));
        }
        Command::Check => {
            let config = load_config(&cli)?;
            let manifest = scan_export(&cli, &config)?;
            output::print_scan_output(&manifest);
            println!("==> Export is valid");
        }
        Command::Scan => {
            let config = load_config(&cli)?;
            let manifest = scan_export(&cli, &config)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--config` must exist; the default `helpwiki.toml` may be absent.
fn load_config(cli: &Cli) -> Result<ConvertConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config(path, true),
        None => config::load_config(Path::new(config::DEFAULT_CONFIG_FILE), false),
    }
}

fn scan_export(cli: &Cli, config: &ConvertConfig) -> Result<Manifest, scan::ScanError> {
    tracing::info!(articles = %cli.articles.display(), layout = ?config.layout, "scanning export");
    scan::scan(
        &Sources {
            articles: &cli.articles,
            categories: cli.categories.as_deref(),
        },
        config,
    )
}
