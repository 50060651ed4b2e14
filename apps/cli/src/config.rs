// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process configuration loaded from environment variables.

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads for parallel discovery.
    pub worker_threads: usize,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `PAPERMODELS_WORKER_THREADS` (default: CPU count)
    /// - `PAPERMODELS_LOG`, then `RUST_LOG` (default: `warn,papermodels_elements=info`)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            worker_threads: var("PAPERMODELS_WORKER_THREADS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            log_filter: var("PAPERMODELS_LOG")
                .or_else(|| var("RUST_LOG"))
                .unwrap_or_else(|| "warn,papermodels_elements=info".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
