//! CLI domain: parse, route, output, and presentation only.
//! No snapshot logic; the route table dispatches to the builder.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, SourceArgs};
pub use presentation::{format_output_json, format_output_text};
pub use route::RunContext;
