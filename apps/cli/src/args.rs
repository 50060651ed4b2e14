// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Relationship discovery for structural drawing elements
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover intersections and correspondents and write the updated set
    Discover {
        /// Element set (JSON)
        input: PathBuf,

        /// Output file; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Discovery configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only recompute same-page intersections
        #[arg(long, conflicts_with = "correspondents_only")]
        intersections_only: bool,

        /// Only recompute adjacent-page correspondents
        #[arg(long)]
        correspondents_only: bool,
    },

    /// Check relationship lists for consistency; exits non-zero on issues
    Check {
        /// Element set (JSON)
        input: PathBuf,
    },

    /// Print connected groups, vertical stacks and unconnected elements
    Graph {
        /// Element set (JSON)
        input: PathBuf,
    },
}
