#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint: one batch download, then exit with the run status.

use std::process;

use clap::Parser;
use dragonsync_app::{Cli, run_app};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let summary = cli.summary;

    let exit_code = match run_app(cli).await {
        Ok(report) => {
            match report.render(summary) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("error: {}", err.display_message()),
            }
            report.status.exit_code()
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    };

    if exit_code != 0 {
        process::exit(i32::from(exit_code));
    }
}
