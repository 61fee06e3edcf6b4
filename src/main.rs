use std::{
    io::{BufRead, Write},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

mod backups;
mod bookmarks;
mod cli;
mod config;
mod engine;
mod errors;
mod launcher;
mod logging;
mod notifier;
mod profile;
mod provider;
mod search;
mod source;
#[cfg(test)]
mod tests;
mod watcher;

use config::Config;
use provider::{BookmarkProvider, Icon};
use search::SearchResult;
use source::Source;

pub fn parse_terms(line: &str) -> Vec<String> {
    line.split_whitespace().map(|term| term.to_string()).collect()
}

/// A query refines the previous one when every old term is a prefix of the
/// term at the same position.
pub fn is_refinement(previous: &[String], terms: &[String]) -> bool {
    !previous.is_empty()
        && terms.len() >= previous.len()
        && previous
            .iter()
            .zip(terms)
            .all(|(old, new)| new.to_lowercase().starts_with(&old.to_lowercase()))
}

const ICON_SIZE: u32 = 32;

#[derive(Serialize)]
struct ResultView<'a> {
    #[serde(flatten)]
    result: &'a SearchResult,
    display_name: String,
    icon: Icon,
}

fn print_results(
    provider: &BookmarkProvider,
    results: &[SearchResult],
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let results = if limit > 0 && results.len() > limit {
        &results[..limit]
    } else {
        results
    };

    if json {
        let views = results
            .iter()
            .map(|result| {
                let meta = provider.result_metadata(result);
                ResultView {
                    result,
                    icon: meta.create_icon(ICON_SIZE),
                    display_name: meta.display_name,
                }
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for result in results {
        let meta = provider.result_metadata(result);
        println!("{:>3}  {}\n     {}", result.score, meta.display_name, meta.url);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = cli::Args::parse();

    let config = Config::load_with(&Config::default_base_path()?)?;
    let source = Source::from_env(&config);

    if let cli::Command::Locate {} = args.command {
        let path = source.resolve()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut provider = BookmarkProvider::new(
        source,
        Arc::new(notifier::LogNotifier),
        Box::new(watcher::FsChangeSource),
        Box::new(launcher::BrowserLauncher::new(config.browser_command.clone())),
    );
    provider
        .enable()
        .context("bookmark index could not be started")?;
    log::debug!("bookmark provider is {:?}", provider.status());

    match args.command {
        cli::Command::Locate {} => {}

        cli::Command::Search { terms, json } => {
            let results = provider.initial_results(&terms)?;
            if results.is_empty() && !json {
                println!("no bookmarks found");
            } else {
                print_results(&provider, &results, config.max_results, json)?;
            }
        }

        cli::Command::Open { terms } => {
            let results = provider.initial_results(&terms)?;
            let Some(best) = results.first() else {
                anyhow::bail!("no bookmark matches {:?}", terms.join(" "));
            };
            provider.activate(best)?;
        }

        cli::Command::List { json } => {
            let bmarks = provider
                .engine()
                .map(|engine| engine.bookmarks())
                .unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(bmarks.as_slice())?);
            } else {
                for bmark in bmarks.iter() {
                    println!("{}\t{}", bmark.title, bmark.url);
                }
            }
        }

        cli::Command::Watch { json } => {
            if let Some(engine) = provider.engine() {
                log::info!(
                    "watching {}, one query per line",
                    engine.path().display()
                );
            }

            let mut previous: Option<(Vec<String>, Vec<SearchResult>)> = None;
            for line in std::io::stdin().lock().lines() {
                let terms = parse_terms(&line?);
                let results = match &previous {
                    Some((old_terms, old_results)) if is_refinement(old_terms, &terms) => {
                        provider.subsearch_results(old_results, &terms)?
                    }
                    _ => provider.initial_results(&terms)?,
                };

                print_results(&provider, &results, config.max_results, json)?;
                println!();
                std::io::stdout().flush()?;

                previous = Some((terms, results));
            }
        }
    }

    provider.disable();
    log::debug!("bookmark provider is {:?}", provider.status());
    Ok(())
}
