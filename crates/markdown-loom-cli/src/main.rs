use anyhow::{Context, Result};
use clap::Parser as _;
use markdown_loom_config::Config;
use markdown_loom_engine::Parser;
use std::{
    io::{self, Read, Write},
    path::PathBuf,
};

#[derive(clap::Parser)]
#[command(name = "markdown-loom")]
#[command(about = "Parse Markdown and print its syntax tree")]
struct Args {
    /// Config file to use instead of ~/.config/markdown-loom/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable a bundled extension by name, in addition to the configured ones
    #[arg(long = "extension", short = 'e')]
    extensions: Vec<String>,

    /// Omit source ranges from the dump
    #[arg(long)]
    no_ranges: bool,

    /// Markdown file to parse; stdin when omitted
    file: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::load()?);
    };
    let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
    log::info!("Config path: {}", path.display());
    Config::load_from_path(&path)?
        .with_context(|| format!("config file {} does not exist", path.display()))
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_ref())?;
    config.parser.extensions.extend(args.extensions);

    let parser = Parser::new(config.parser).context("invalid parser configuration")?;
    let input = read_input(args.file.as_ref())?;
    let document = parser.parse(&input)?;

    let dump = document.ast.dump();
    let dump = if args.no_ranges || !config.dump.ranges {
        dump.without_ranges()
    } else {
        dump
    };
    let mut stdout = io::stdout().lock();
    write!(stdout, "{dump}")?;
    stdout.flush()?;
    Ok(())
}
