//! Arguments of the `knn` subcommand.

use clap::Args;

/// kNN query arguments.
#[derive(Debug, Clone, Args)]
pub struct KnnArgs {
    /// Dense-vector field to search
    #[arg(long)]
    pub field: String,

    /// Number of nearest neighbors to return
    #[arg(long)]
    pub k: usize,

    /// Number of candidates considered per shard
    #[arg(long)]
    pub num_candidates: usize,

    /// Comma-separated query vector
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub vector: Vec<f64>,

    /// Score multiplier
    #[arg(long)]
    pub boost: Option<f64>,

    /// Restricts candidates with a `field=value` term filter; repeatable
    #[arg(long = "term", value_parser = parse_term)]
    pub terms: Vec<(String, String)>,
}

/// Parses a `field=value` term filter.
fn parse_term(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_owned(), value.to_owned())),
        _ => Err(format!("expected `field=value`, got `{s}`")),
    }
}
