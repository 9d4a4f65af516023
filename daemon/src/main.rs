// Copyright 2025 bgplite Authors
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

use bgplite::config::{Config, NeighborSpec};
use bgplite::server::Router;
use bgplite::{error, info};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bgplited")]
#[command(about = "Policy-aware route processor daemon", version)]
struct Args {
    /// Local autonomous system number
    asn: u32,
    /// Neighbor sessions, one per argument, as port-address-relation
    /// (e.g. 7001-192.168.0.2-cust)
    #[arg(required = true)]
    connections: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let neighbors = args
        .connections
        .iter()
        .map(|spec| spec.parse::<NeighborSpec>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            error!("invalid neighbor argument", "error" => e.to_string());
            e
        })?;
    let config = Config::new(args.asn, neighbors)?;

    info!("starting router",
        "asn" => config.asn,
        "neighbors" => config.neighbors.len());

    let router = Router::bind(config).await.map_err(|e| {
        error!("startup failed", "error" => e.to_string());
        e
    })?;
    router.run().await?;

    Ok(())
}
