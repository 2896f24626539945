// Roster
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the user records service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use clap::Parser;
use log::{error, info};
use roster_core::db::Db;
use roster_core::db::sqlite;
use roster_core::env::get_var;
use roster_users::db::init_schema;
use roster_users::serve;
use std::net::Ipv4Addr;
use std::process;
use std::sync::Arc;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "roster-users")]
#[command(version, about = "Serves the user records REST API", long_about = None)]
struct Args {
    /// Port to listen on.  The PORT environment variable takes precedence if set.
    #[arg(long, default_value_t = 6000)]
    port: u16,

    /// Whether to log at debug level by default.  RUST_LOG takes precedence if set.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    debug: bool,

    /// Path to the SQLite database file, which is created if missing.
    #[arg(long, default_value = "users.db")]
    database: String,
}

/// Sets up the database and runs the server until interrupted.
async fn run(args: Args) -> Result<(), String> {
    let port = get_var::<u16>("PORT")?.unwrap_or(args.port);

    info!("Starting user service. PORT: {}, DEBUG: {}", port, args.debug);

    let db = sqlite::connect(&args.database)
        .await
        .map_err(|e| format!("Cannot open database {}: {}", args.database, e))?;
    let db: Arc<dyn Db + Send + Sync> = Arc::new(db);
    let mut ex = db.ex().await.map_err(|e| e.to_string())?;
    init_schema(&mut ex).await.map_err(|e| format!("Cannot initialize schema: {}", e))?;
    drop(ex);

    serve((Ipv4Addr::UNSPECIFIED, port), db).await.map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        process::exit(1);
    }
}
