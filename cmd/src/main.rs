// Copyright 2022 SphereEx Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![warn(unused_must_use)]

use std::str::FromStr;

use clap::{Arg, ArgMatches, Command};
use ignite_error::ClientError;
use thin_client::{ClientConfig, ClientConfigBuilder, ClientConn};
use tokio::runtime::{Builder, Runtime};
use tracing::{error, info, Level};

const IGNITE_CLI_CONFIG_ENV: &str = "IGNITE_CLI_CONFIG";
const IGNITE_CLI_ENDPOINT_ENV: &str = "IGNITE_CLI_ENDPOINT";

fn cache_name_arg() -> Arg<'static> {
    Arg::new("name").help("Cache name").required(true).takes_value(true)
}

fn build_command() -> Command<'static> {
    Command::new("ignite-cli")
        .about("Ignite thin client command line")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config path")
                .env(IGNITE_CLI_CONFIG_ENV)
                .takes_value(true),
        )
        .arg(
            Arg::new("endpoint")
                .short('e')
                .long("endpoint")
                .help("Server endpoint, host:port")
                .env(IGNITE_CLI_ENDPOINT_ENV)
                .takes_value(true),
        )
        .arg(Arg::new("loglevel").long("log-level").help("Log level").takes_value(true))
        .subcommand_required(true)
        .subcommand(Command::new("cache-names").about("List cache names"))
        .subcommand(Command::new("create-cache").about("Create a cache").arg(cache_name_arg()))
        .subcommand(
            Command::new("get-or-create-cache")
                .about("Create a cache unless it exists")
                .arg(cache_name_arg()),
        )
        .subcommand(Command::new("destroy-cache").about("Destroy a cache").arg(cache_name_arg()))
}

fn main() {
    let matches = build_command().get_matches();

    let config = match ClientConfigBuilder::new()
        .with_config_path(matches.value_of("config"))
        .with_endpoint(matches.value_of("endpoint"))
        .with_log_level(matches.value_of("loglevel"))
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt().with_max_level(Level::from_str(config.log_level.as_str()).ok()).init();

    if let Err(e) = build_runtime().block_on(run(config, &matches)) {
        match e.as_server_error() {
            Some(err) => error!(code = err.code(), "{}", err),
            None => error!("{}", e),
        }
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig, matches: &ArgMatches) -> Result<(), ClientError> {
    let mut conn = ClientConn::connect(&config).await?;
    info!("connected to {} (protocol {})", conn.endpoint(), conn.version());

    match matches.subcommand() {
        Some(("cache-names", _)) => {
            for name in conn.cache_names().await? {
                println!("{}", name);
            }
        }
        Some(("create-cache", sub)) => conn.create_cache(cache_name(sub)).await?,
        Some(("get-or-create-cache", sub)) => conn.get_or_create_cache(cache_name(sub)).await?,
        Some(("destroy-cache", sub)) => conn.destroy_cache(cache_name(sub)).await?,
        _ => unreachable!(),
    }

    Ok(())
}

// `name` is required by every cache subcommand.
fn cache_name(matches: &ArgMatches) -> &str {
    matches.value_of("name").unwrap_or_default()
}

pub fn build_runtime() -> Runtime {
    Builder::new_current_thread()
        .thread_name("ignite-cli")
        .enable_all()
        .build()
        .expect("failed to build runtime")
}
