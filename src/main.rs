use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use readme::{
    build_client, fetch_readme, ColorChoice, Config, FsResolver, HttpResolver, Output,
    PrettyOutput, RawOutput, ReadmeError, Repository, Resolve,
};

#[derive(Debug, Parser)]
#[command(name = "readme", version, about = "Render a repository README in the terminal")]
struct Cli {
    /// Repository to fetch, as owner/repository
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    repository: Option<String>,

    /// Render a local markdown file instead of fetching one
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Output the README as plain text
    #[arg(long)]
    raw: bool,

    /// Show image placeholders instead of ASCII art
    #[arg(long)]
    no_images: bool,

    /// Indent content under its heading
    #[arg(long)]
    nest: bool,

    /// Branch to read from
    #[arg(long)]
    branch: Option<String>,

    /// When to use colours
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn merge_into(&self, mut config: Config) -> Config {
        config.raw |= self.raw;
        config.no_images |= self.no_images;
        config.nest_sections |= self.nest;
        if let Some(branch) = &self.branch {
            config.branch = branch.clone();
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        config
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = cli.merge_into(config);
    debug!(?config, "effective configuration");

    let client = build_client(config.timeout())?;

    let (readme, output): (String, Box<dyn Output>) = match (&cli.file, &cli.repository) {
        (Some(path), _) => {
            let readme = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let base_dir = path.parent().map(PathBuf::from).unwrap_or_default();
            let resolver = FsResolver::new(base_dir).with_remote(HttpResolver::new(client));
            (readme, select_output(&config, Box::new(resolver)))
        }
        (None, Some(repository)) => {
            let repository: Repository = repository.parse()?;
            let readme = fetch_readme(&client, &repository, &config.branch)
                .context("Failed to fetch README")?;
            let base = repository.raw_base_url(&config.branch)?;
            let resolver = HttpResolver::with_base(client, base);
            (readme, select_output(&config, Box::new(resolver)))
        }
        (None, None) => return Err(ReadmeError::MissingRepository.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output
        .output(&mut out, &readme)
        .context("Failed to generate output")?;
    out.flush()?;
    Ok(())
}

fn select_output(config: &Config, resolver: Box<dyn Resolve>) -> Box<dyn Output> {
    if config.raw {
        return Box::new(RawOutput);
    }
    Box::new(
        PrettyOutput::new(resolver)
            .with_options(config.render_options())
            .with_theme(config.color.theme()),
    )
}
