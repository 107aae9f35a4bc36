//! Arguments of the `search-template` subcommand.

use clap::{ArgGroup, Args};
use serde_json::{Map, Value};

/// Templated search arguments.
///
/// Either a stored template `--id` or an inline `--source` is required.
#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("template").required(true).args(["id", "source"])))]
pub struct SearchTemplateArgs {
    /// Index to search; all indices when omitted
    #[arg(long)]
    pub index: Option<String>,

    /// Id of a stored search template
    #[arg(long)]
    pub id: Option<String>,

    /// Inline template source
    #[arg(long)]
    pub source: Option<String>,

    /// Template parameters as a JSON object
    #[arg(long, value_parser = parse_params)]
    pub params: Option<Map<String, Value>>,

    /// Ask the engine to indent its response; `--pretty=false` sends an explicit false
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub pretty: Option<bool>,

    /// Ask the engine for human-readable numbers
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub human: Option<bool>,

    /// Ask the engine for stack traces on errors
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub error_trace: Option<bool>,

    /// Comma-separated response filters
    #[arg(long, value_delimiter = ',')]
    pub filter_path: Vec<String>,

    /// Extra request header as `name:value`; repeatable
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

/// Parses a JSON object of template parameters.
fn parse_params(s: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str(s) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(_) => Err("params must be a JSON object".to_owned()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// Parses a `name:value` header.
fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `name:value`, got `{s}`"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".to_owned());
    }

    Ok((name.to_owned(), value.trim().to_owned()))
}
