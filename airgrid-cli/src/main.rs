mod args;
mod columns;
mod demo;
mod error;
mod session;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use airgrid_lib::provider::airtable::{AirtableClient, AirtableConfigBuilder};
use airgrid_lib::provider::{ListClient, MemoryProvider, PageProvider};
use airgrid_lib::table::{RenderOptions, SearchTable, TableOptions};
use simplelog::{Config, WriteLogger};

use crate::args::{CliArgs, SourceArg};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = args::parse_cli();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<(), CliError> {
    let log_file = File::create(&args.log_file)?;
    WriteLogger::init(args.log_level.into(), Config::default(), log_file)?;
    log::info!("starting with source {:?}", args.source);

    let provider = provider(&args)?;
    let columns = columns::build(args.source, args.columns.as_deref());
    let options = TableOptions::new().with_debounce(Duration::from_millis(args.debounce_ms));
    let table = SearchTable::with_options(columns, provider, options);

    if let Some(query) = &args.initial_query {
        table.set_search_text(query.as_str());
    }
    for facet in &args.filters {
        table.set_facet(facet.key.as_str(), facet.filter.clone());
    }
    if let Some(sort) = &args.sort
        && !table.set_sort(Some(sort.0.clone()))
    {
        return Err(CliError::Usage(format!(
            "cannot sort by {:?}: not one of the displayed columns",
            sort.0.key
        )));
    }

    let render = RenderOptions {
        max_cell_width: args.max_cell_width.max(2),
        ..RenderOptions::default()
    };
    session::run(&table, &render).await
}

fn provider(args: &CliArgs) -> Result<Arc<dyn PageProvider>, CliError> {
    match args.source {
        SourceArg::Demo => {
            let mut provider = MemoryProvider::new(demo::records(), demo::MATCH_FIELD);
            if let Some(size) = args.page_size {
                provider = provider.with_page_size(size);
            }
            Ok(Arc::new(provider))
        }
        SourceArg::List => {
            let Some(url) = &args.list_url else {
                return Err(CliError::Usage(
                    "--source list needs --list-url or AIRGRID_LIST_URL".to_string(),
                ));
            };
            let mut client = ListClient::new(url)?;
            if let Some(size) = args.page_size {
                client = client.with_limit(size);
            }
            Ok(Arc::new(client))
        }
        SourceArg::Airtable => {
            let mut config = AirtableConfigBuilder::from_env();
            if let Some(size) = args.page_size {
                config = config.page_size(size);
            }
            let client = AirtableClient::builder().config(config.build()?).build()?;
            log::info!("listing {:?}", client.config());
            Ok(Arc::new(client))
        }
    }
}
