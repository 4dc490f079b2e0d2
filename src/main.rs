//! webstory - Web story parser and page cleaner

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use webstory::{Cleaner, CleanerOptions, Disallowed, Story};

#[derive(Parser)]
#[command(name = "webstory")]
#[command(version, about = "Web story parser and page cleaner", long_about = None)]
#[command(after_help = "EXAMPLES:
    webstory info story.html             Show story metadata
    webstory pages story.html --clean    Print every page, cleaned
    webstory clean page.html             Clean a single page fragment")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Show story metadata
    Info {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the pages of a story
    Pages {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Clean each page before printing
        #[arg(long)]
        clean: bool,

        /// Print pages as a JSON array of {id, html}
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: CleanArgs,
    },
    /// Clean a story page fragment
    Clean {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        options: CleanArgs,
    },
}

#[derive(clap::Args)]
struct CleanArgs {
    /// What to do with elements outside the allowlist
    #[arg(long, value_enum, default_value = "unwrap")]
    disallowed: DisallowedArg,

    /// Keep comments
    #[arg(long)]
    keep_comments: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DisallowedArg {
    Unwrap,
    Escape,
    Drop,
}

impl CleanArgs {
    fn cleaner(&self) -> Cleaner {
        let disallowed = match self.disallowed {
            DisallowedArg::Unwrap => Disallowed::Unwrap,
            DisallowedArg::Escape => Disallowed::Escape,
            DisallowedArg::Drop => Disallowed::Drop,
        };
        Cleaner::with_cleaner_options(CleanerOptions {
            disallowed,
            strip_comments: !self.keep_comments,
            ..Default::default()
        })
    }
}

#[derive(Serialize)]
struct PageOutput<'a> {
    id: Option<&'a str>,
    html: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Info { input, json } => show_info(input, *json),
        Command::Pages {
            input,
            clean,
            json,
            options,
        } => show_pages(input, *clean, *json, options),
        Command::Clean { input, options } => clean_fragment(input, options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` decides unless `-v` is given, which then takes over.
fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose > 0 {
        let level = if verbose == 1 { LevelFilter::Debug } else { LevelFilter::Trace };
        builder
            .filter_level(level)
            .filter_module("html5ever", LevelFilter::Warn);
    }
    builder.init();
}

fn open_story(path: &Path) -> Result<Story, String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Story::from_reader(BufReader::new(file)).map_err(|e| format!("{}: {e}", path.display()))
}

fn show_info(path: &Path, json: bool) -> Result<(), String> {
    let story = open_story(path)?;

    if json {
        let out = serde_json::to_string_pretty(&story).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let field = |value: Option<&str>| value.unwrap_or("-").to_string();
    println!("File: {}", path.display());
    println!("Title: {}", field(story.title()));
    println!("Publisher: {}", field(story.publisher()));
    println!("Publisher logo: {}", field(story.publisher_logo_src()));
    println!("Poster (portrait): {}", field(story.poster_portrait_src()));
    println!("Poster (square): {}", field(story.poster_square_src()));
    println!("Poster (landscape): {}", field(story.poster_landscape_src()));
    if let Some(css) = story.custom_css() {
        println!("Custom CSS: {} bytes", css.trim().len());
    }
    println!("Pages: {}", story.pages().len());
    for page in story.pages() {
        println!("  {}", field(page.id()));
    }

    Ok(())
}

fn show_pages(path: &Path, clean: bool, json: bool, options: &CleanArgs) -> Result<(), String> {
    let story = open_story(path)?;
    let cleaner = options.cleaner();

    let pages: Vec<_> = story
        .pages()
        .iter()
        .map(|page| PageOutput {
            id: page.id(),
            html: if clean {
                page.clean_html_with(&cleaner)
            } else {
                page.html()
            },
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&pages).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        for page in pages {
            println!("{}", page.html);
        }
    }

    Ok(())
}

fn clean_fragment(path: &Path, options: &CleanArgs) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let html = webstory::decode_html(&bytes);
    println!("{}", options.cleaner().clean_fragment(&html));
    Ok(())
}
