//! Minimal CLI parsing for command and projection options.

use std::env;

use shelflife::engine::SortKey;
use shelflife::models::MediaType;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    #[default]
    Status,
    Dashboard,
    Content,
    Sync,
    Cleanup,
    Archive { id: String },
    Delete { id: String },
}

#[derive(Debug, Default)]
pub struct CliOptions {
    pub command: Command,
    pub type_filter: Option<MediaType>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    /// Dispatch the pending action instead of just showing it.
    pub confirm: bool,
    /// Archive destination as an index into the listed folder catalog.
    pub folder: Option<usize>,
}

impl CliOptions {
    pub fn from_args() -> Self {
        let mut options = CliOptions::default();
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "status" => options.command = Command::Status,
                "dashboard" => options.command = Command::Dashboard,
                "content" => options.command = Command::Content,
                "sync" => options.command = Command::Sync,
                "cleanup" => options.command = Command::Cleanup,
                "archive" => {
                    options.command = Command::Archive {
                        id: args.next().unwrap_or_default(),
                    }
                }
                "delete" => {
                    options.command = Command::Delete {
                        id: args.next().unwrap_or_default(),
                    }
                }
                "--confirm" | "--yes" => options.confirm = true,
                "--folder" => {
                    if let Some(value) = args.next() {
                        options.folder = value.parse().ok();
                    }
                }
                _ if arg.starts_with("--folder=") => {
                    options.folder = arg.split_once('=').and_then(|(_, v)| v.parse().ok());
                }
                "--type" => {
                    if let Some(value) = args.next() {
                        options.type_filter = parse_type(&value);
                    }
                }
                _ if arg.starts_with("--type=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.type_filter = parse_type(value);
                    }
                }
                "--search" => {
                    options.search = args.next();
                }
                _ if arg.starts_with("--search=") => {
                    options.search = arg.split_once('=').map(|(_, v)| v.to_string());
                }
                "--sort" => {
                    if let Some(value) = args.next() {
                        options.sort = SortKey::parse(&value);
                    }
                }
                _ if arg.starts_with("--sort=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.sort = SortKey::parse(value);
                    }
                }
                _ => {}
            }
        }
        options
    }
}

fn parse_type(value: &str) -> Option<MediaType> {
    match value {
        "tv" => Some(MediaType::Tv),
        "movie" => Some(MediaType::Movie),
        _ => None,
    }
}
