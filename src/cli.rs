//! CLI domain: parse, route, and output only.
//! Generation itself lives in the orchestrator; routes just wire it up.

mod output;
mod parse;
mod route;

pub use output::{format_plan_json, map_error};
pub use parse::{Cli, Commands};
pub use route::RunContext;
