//! Interactive line-oriented session.
//!
//! Each input line is either a command (starting with `:`) or new search
//! text. The table is redrawn whenever it signals a change.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use airgrid_lib::table::{RenderOptions, SearchTable};

use crate::args::FacetArg;
use crate::error::CliError;

const HELP: &str = "\
Type to search. Commands:
  :more, :m         load the next page
  :sort KEY, :s KEY cycle sort on a column (asc, desc, off)
  :filter KEY=VALUE only rows whose KEY equals VALUE
  :filter KEY?      only rows where KEY is filled in (not none/n/a)
  :filter KEY       drop the filter on KEY; bare :filter drops all
  :values KEY       list the loaded values of KEY
  :clear            clear the search
  :help             show this help
  :quit, :q         exit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    More,
    Sort(String),
    Filter(FacetArg),
    ClearFilters,
    Values(String),
    Redraw,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            if line.trim().is_empty() {
                return Ok(Self::Redraw);
            }
            return Ok(Self::Search(line.to_string()));
        };
        // `::text` searches for a literal leading colon
        if command.starts_with(':') {
            return Ok(Self::Search(command.to_string()));
        }

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match (name, arg) {
            ("q" | "quit", _) => Ok(Self::Quit),
            ("m" | "more", _) => Ok(Self::More),
            ("clear", _) => Ok(Self::Search(String::new())),
            ("h" | "help", _) => Ok(Self::Help),
            ("s" | "sort", "") => Err("usage: :sort KEY".to_string()),
            ("s" | "sort", key) => Ok(Self::Sort(key.to_string())),
            ("f" | "filter", "") => Ok(Self::ClearFilters),
            ("f" | "filter", spec) => spec.parse().map(Self::Filter),
            ("values", "") => Err("usage: :values KEY".to_string()),
            ("values", key) => Ok(Self::Values(key.to_string())),
            _ => Err(format!("unknown command :{}", name)),
        }
    }
}

/// Runs the session until `:quit` or end of input.
pub(crate) async fn run(table: &SearchTable, options: &RenderOptions) -> Result<(), CliError> {
    let mut wakeups = table.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_frame = String::new();

    println!("{}", HELP);
    table.activate();

    loop {
        tokio::select! {
            woke = wakeups.recv() => {
                if woke.is_none() {
                    break;
                }
                wakeups.drain();
                draw(table, options, &mut last_frame, false)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    log::debug!("end of input");
                    break;
                };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Search(text)) => {
                        log::debug!("search text {:?}", text);
                        table.set_search_text(text);
                    }
                    Ok(Command::More) => {
                        if !table.request_more() {
                            println!("(nothing more to load)");
                        }
                    }
                    Ok(Command::Sort(key)) => {
                        if !table.toggle_sort(&key) {
                            println!("(cannot sort by {:?})", key);
                        }
                    }
                    Ok(Command::Filter(facet)) => {
                        table.set_facet(facet.key, facet.filter);
                    }
                    Ok(Command::ClearFilters) => {
                        table.clear_facets();
                    }
                    Ok(Command::Values(key)) => {
                        let values = table.facet_values(&key);
                        if values.is_empty() {
                            println!("(no loaded values for {:?})", key);
                        } else {
                            println!("{}", values.join(" | "));
                        }
                    }
                    Ok(Command::Redraw) => draw(table, options, &mut last_frame, true)?,
                    Ok(Command::Help) => println!("{}", HELP),
                    Err(message) => println!("{}", message),
                }
            }
        }
    }

    table.deactivate();
    Ok(())
}

/// Prints the table unless it looks exactly like the last frame.
fn draw(
    table: &SearchTable,
    options: &RenderOptions,
    last_frame: &mut String,
    force: bool,
) -> Result<(), CliError> {
    let frame = table.render(options);
    if !force && frame == *last_frame {
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    writeln!(out)?;
    writeln!(out, "{}", frame)?;
    out.flush()?;
    *last_frame = frame;
    Ok(())
}
