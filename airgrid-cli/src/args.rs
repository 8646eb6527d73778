//! Command-line arguments

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use simplelog::LevelFilter;

use airgrid_lib::table::{FacetFilter, Sort, SortDirection};

/// Command-line arguments accepted by the `airgrid` binary.
#[derive(Parser, Debug)]
#[command(
    name = "airgrid",
    version,
    about = "Search, sort and page through a remote record table"
)]
pub(crate) struct CliArgs {
    #[arg(
        short,
        long,
        value_enum,
        env = "AIRGRID_SOURCE",
        default_value_t = SourceArg::Demo,
        help = "Where records come from"
    )]
    pub(crate) source: SourceArg,
    #[arg(
        long = "list-url",
        value_name = "URL",
        env = "AIRGRID_LIST_URL",
        help = "Base URL serving /api/list (required for --source list)"
    )]
    pub(crate) list_url: Option<String>,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_name = "KEY[:HEADER]",
        help = "Comma-separated columns to show (default: per source)"
    )]
    pub(crate) columns: Option<Vec<ColumnArg>>,
    #[arg(
        long,
        value_name = "KEY[:asc|desc]",
        help = "Initial sort column and direction (default: load order)"
    )]
    pub(crate) sort: Option<SortArg>,
    #[arg(
        short,
        long = "filter",
        value_name = "KEY=VALUE|KEY?",
        action = clap::ArgAction::Append,
        help = "Show only rows whose KEY equals VALUE, or (KEY?) has a usable value; repeatable"
    )]
    pub(crate) filters: Vec<FacetArg>,
    #[arg(
        short = 'q',
        long = "query",
        value_name = "QUERY",
        help = "Initial search text (default: empty)"
    )]
    pub(crate) initial_query: Option<String>,
    #[arg(
        long = "page-size",
        value_name = "NUM",
        help = "Records requested per page (default: provider default)"
    )]
    pub(crate) page_size: Option<usize>,
    #[arg(
        long = "debounce-ms",
        value_name = "MS",
        default_value_t = 300,
        help = "Quiet period after typing before searching"
    )]
    pub(crate) debounce_ms: u64,
    #[arg(
        long = "max-cell-width",
        value_name = "NUM",
        default_value_t = 40,
        help = "Cut cells wider than this"
    )]
    pub(crate) max_cell_width: usize,
    #[arg(
        long = "log-file",
        value_name = "FILE",
        env = "AIRGRID_LOG_FILE",
        default_value = "airgrid.log",
        help = "Where log output goes"
    )]
    pub(crate) log_file: PathBuf,
    #[arg(
        long = "log-level",
        value_enum,
        env = "AIRGRID_LOG_LEVEL",
        default_value_t = LogLevelArg::Info,
        help = "Minimum level written to the log file"
    )]
    pub(crate) log_level: LogLevelArg,
}

/// Parse command line arguments into [`CliArgs`].
pub(crate) fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SourceArg {
    /// Airtable REST API, configured through AIRTABLE_* variables
    Airtable,
    /// A JSON list endpoint
    List,
    /// Built-in sample data
    Demo,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

/// `key` or `key:Header`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ColumnArg {
    pub(crate) key: String,
    pub(crate) header: Option<String>,
}

impl FromStr for ColumnArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, header) = match s.split_once(':') {
            Some((key, header)) => (key.trim(), Some(header.trim())),
            None => (s.trim(), None),
        };
        if key.is_empty() {
            return Err(format!("empty column key in {:?}", s));
        }
        Ok(Self {
            key: key.to_string(),
            header: header.filter(|h| !h.is_empty()).map(str::to_string),
        })
    }
}

/// `key`, `key:asc` or `key:desc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SortArg(pub(crate) Sort);

impl FromStr for SortArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.rsplit_once(':') {
            Some((key, "asc")) => (key, SortDirection::Asc),
            Some((key, "desc")) => (key, SortDirection::Desc),
            Some((_, other)) => return Err(format!("unknown sort direction {:?}", other)),
            None => (s, SortDirection::Asc),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err("empty sort key".to_string());
        }
        Ok(Self(Sort {
            key: key.to_string(),
            direction,
        }))
    }
}

/// `key=value` (exact match), `key?` (filled in and not "none"/"n/a") or
/// bare `key` (no filter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FacetArg {
    pub(crate) key: String,
    pub(crate) filter: Option<FacetFilter>,
}

impl FromStr for FacetArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, filter) = match s.split_once('=') {
            Some((key, value)) => (key, Some(FacetFilter::Equals(value.trim().to_string()))),
            None => match s.trim().strip_suffix('?') {
                Some(key) => (key, Some(FacetFilter::Available)),
                None => (s, None),
            },
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty filter key in {:?}", s));
        }
        Ok(Self {
            key: key.to_string(),
            filter,
        })
    }
}
