// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PaperModels CLI entry point.
//!
//! # Commands
//!
//! - `papermodels discover <input> [-o out] [-c config]` - Fill in intersections and correspondents
//! - `papermodels check <input>` - Validate relationship lists (exit code 2 on issues)
//! - `papermodels graph <input>` - Print connectivity summary

use std::process::ExitCode;

use clap::Parser;

use papermodels_cli::{Args, Config, Outcome};

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.clone())
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(worker_threads = config.worker_threads, ?args, "Starting PaperModels");

    // Initialize rayon thread pool
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
    {
        tracing::warn!(error = %err, "Using default rayon thread pool");
    }

    match papermodels_cli::run(&args) {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::IssuesFound) => ExitCode::from(2),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
