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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Errors raised while assembling the startup configuration. All of them
/// are fatal: the process exits non-zero before any socket is bound.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNeighborSpec(String),
    InvalidPort(String),
    InvalidAddress(String),
    InvalidRelation(String),
    NoNeighbors,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidNeighborSpec(s) => {
                write!(f, "invalid neighbor argument (want port-address-relation): {}", s)
            }
            ConfigError::InvalidPort(s) => write!(f, "invalid port: {}", s),
            ConfigError::InvalidAddress(s) => write!(f, "invalid neighbor address: {}", s),
            ConfigError::InvalidRelation(s) => {
                write!(f, "invalid relation (want cust, peer or prov): {}", s)
            }
            ConfigError::NoNeighbors => write!(f, "at least one neighbor is required"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Commercial relationship of a neighbor session. Fixed at startup and
/// the sole input to the export policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Customer,
    Peer,
    Provider,
}

impl FromStr for Relation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cust" => Ok(Relation::Customer),
            "peer" => Ok(Relation::Peer),
            "prov" => Ok(Relation::Provider),
            _ => Err(ConfigError::InvalidRelation(s.to_string())),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Relation::Customer => "cust",
            Relation::Peer => "peer",
            Relation::Provider => "prov",
        };
        write!(f, "{}", s)
    }
}

/// One neighbor session, parsed from a `port-address-relation` argument
/// (e.g. `7001-192.168.0.2-cust`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborSpec {
    pub port: u16,
    pub addr: Ipv4Addr,
    pub relation: Relation,
}

impl FromStr for NeighborSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(port), Some(addr), Some(relation)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConfigError::InvalidNeighborSpec(s.to_string()));
        };
        Ok(NeighborSpec {
            port: port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.to_string()))?,
            addr: addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(addr.to_string()))?,
            relation: relation.parse()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub asn: u32,
    pub neighbors: Vec<NeighborSpec>,
}

impl Config {
    pub fn new(asn: u32, neighbors: Vec<NeighborSpec>) -> Result<Self, ConfigError> {
        if neighbors.is_empty() {
            return Err(ConfigError::NoNeighbors);
        }
        Ok(Config { asn, neighbors })
    }
}
