//! Subcommand execution.

mod knn;
mod search_template;

use std::io::Write;

use anyhow::Context;
use elastiq_client::Client;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::{Cli, Command};
use crate::signal::cancel_on_ctrl_c;

/// Runs the parsed subcommand and prints its output to stdout.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Knn(args) => {
            let document = knn::build(&args).context("failed to build kNN query")?;
            print_json(&document)
        }
        Command::SearchTemplate(args) => {
            let client =
                Client::from_config(cli.reqwest).context("failed to create engine client")?;

            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());

            let result = search_template::run(&client, &args, &cancel).await;
            cancel.cancel();

            print_json(&result?)
        }
    }
}

/// Writes `value` as pretty JSON followed by a newline.
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to write output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
