use clap::Parser;
use linkgal::config::{self, InputMode, PageMode, PipelineConfig, SkippedReport};
use linkgal::{index, output, render};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "linkgal")]
#[command(version)]
#[command(about = "Build ordered gallery pages from lists of media links")]
#[command(long_about = "\
Build ordered gallery pages from lists of media links

Every link's filename says where it belongs: GALLERY_ORDER_anything.ext.

  https://cdn.example.com/cats_1_sleepy.jpg    → gallery \"cats\", item 1
  https://cdn.example.com/cats_2_yawn.mp4      → gallery \"cats\", item 2
  https://cdn.example.com/logo.png             → skipped (no order number)

Pipeline:
  1. Index   read links (HTML <a href> or CSV column 0), write a sorted CSV:
             Gallery Name,Order Number,File Name,Link
  2. Render  one page per gallery in the output directory (cats.html).
             .mp4/.mov become <video>, everything else <img>.

Settings come from linkgal.toml (see --print-config); flags override it.")]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// HTML page or headerless CSV of links
    #[arg(long)]
    input: Option<PathBuf>,

    /// Where to write the normalized index CSV
    #[arg(long)]
    csv_output: Option<PathBuf>,

    /// Directory for the gallery pages
    #[arg(long)]
    output: Option<PathBuf>,

    /// How to read the input
    #[arg(long, value_enum)]
    mode: Option<InputMode>,

    /// Standalone documents or embeddable fragments
    #[arg(long, value_enum)]
    page_mode: Option<PageMode>,

    /// How to report links with malformed filenames
    #[arg(long, value_enum)]
    skipped: Option<SkippedReport>,

    /// Print a documented linkgal.toml with all defaults and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Flags given on the command line, as a TOML overlay for the config file.
    fn overlay(&self) -> Result<toml::Value, toml::ser::Error> {
        let mut table = toml::Table::new();
        let paths = [
            ("input_path", &self.input),
            ("csv_output_path", &self.csv_output),
            ("output_dir", &self.output),
        ];
        for (key, value) in paths {
            if let Some(path) = value {
                table.insert(key.to_string(), toml::Value::try_from(path)?);
            }
        }
        if let Some(mode) = self.mode {
            table.insert("mode".to_string(), toml::Value::try_from(mode)?);
        }
        if let Some(page_mode) = self.page_mode {
            table.insert("page_mode".to_string(), toml::Value::try_from(page_mode)?);
        }
        if let Some(skipped) = self.skipped {
            table.insert("skipped_report".to_string(), toml::Value::try_from(skipped)?);
        }
        Ok(toml::Value::Table(table))
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config: PipelineConfig = config::resolve_config(
        config::stock_defaults_value(),
        [config::load_raw_config(&cli.config)?, Some(cli.overlay()?)],
    )?;

    println!("==> Stage 1: Indexing {}", config.input_path.display());
    let index = index::run_index(&config)?;
    output::print_index_output(&index, &config.csv_output_path);
    if config.skipped_report == SkippedReport::Summary {
        output::print_skipped_summary(&index.skipped);
    }

    println!("==> Stage 2: Rendering \u{2192} {}", config.output_dir.display());
    let pages = render::render(&config.csv_output_path, &config.output_dir, &config)?;
    output::print_render_output(&pages);

    Ok(())
}
