use clap::{Parser, Subcommand};
use journal::config::Config;
use journal::cover::{attach_covers, CoverOutcome};
use journal::filter::{filter_bar, FilterView, Selection};
use journal::index::PostIndex;
use journal::logging::init_logging;
use journal::parser::Parser as PostParser;
use journal::render;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Lists, archives and illustrates the posts of a blog journal")]
#[command(version)]
struct Cli {
    /// Project file (defaults to the nearest `journal.yaml` above the
    /// working directory)
    #[arg(long, global = true, env = "JOURNAL_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the journal grid, optionally filtered by category
    List {
        /// Category to show; `ALL` shows every post
        #[arg(long, default_value = "ALL")]
        category: Selection,
    },
    /// Print the archive: stats, category cards and the timeline
    Archive,
    /// Print every category with its post count
    Categories,
    /// Add `coverImage` to posts that have a matching image
    Covers,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", error_chain(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

/// Formats `err` followed by each of its sources, separated by `: `.
fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(err) = source {
        out.push_str(": ");
        out.push_str(&err.to_string());
        source = err.source();
    }
    out
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => Config::from_project_file(path)?,
        None => Config::from_directory(&std::env::current_dir()?)?,
    };

    match cli.command {
        Command::List { category } => {
            let posts = PostParser::new(&config.content_directory).parse_posts()?;
            let bar: Vec<String> = filter_bar(&config.categories, &category)
                .into_iter()
                .map(|option| match option.selected {
                    true => format!("[{}]", option.label),
                    false => option.label.to_owned(),
                })
                .collect();
            println!("{}\n", bar.join("  "));

            let view = FilterView::new(&posts, category);
            print!("{}", render::journal_grid(&view, &config.site_root)?);
        }
        Command::Archive => {
            let posts = PostParser::new(&config.content_directory).parse_posts()?;
            print!("{}", render::archive(&PostIndex::new(&posts)));
        }
        Command::Categories => {
            let posts = PostParser::new(&config.content_directory).parse_posts()?;
            print!("{}", render::categories(&PostIndex::new(&posts)));
        }
        Command::Covers => {
            let outcomes = attach_covers(
                &config.content_directory,
                &config.images_directory,
                &config.images_url,
            )?;
            let attached = outcomes
                .iter()
                .filter(|outcome| matches!(outcome, CoverOutcome::Attached { .. }))
                .count();
            for outcome in &outcomes {
                match outcome {
                    CoverOutcome::Attached { slug, image } => {
                        println!("updated {} -> {}", slug, image)
                    }
                    CoverOutcome::AlreadySet { slug } => {
                        println!("skipped {}: already has coverImage", slug)
                    }
                    CoverOutcome::NoImage { slug } => {
                        println!("skipped {}: no image found", slug)
                    }
                    CoverOutcome::MissingFrontmatter { slug } => {
                        println!("skipped {}: no frontmatter found", slug)
                    }
                }
            }
            println!("\nUpdated {}/{} posts", attached, outcomes.len());
        }
    }

    Ok(())
}
