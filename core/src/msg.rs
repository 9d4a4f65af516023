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

//! Wire messages. Every datagram is a JSON object `{src, dst, type, msg}`;
//! the `type`/`msg` pair maps onto one [`Payload`] variant, parsed once at
//! the dispatcher boundary.

use crate::net::Ipv4Net;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::Ipv4Addr;

/// Route origin attribute. Lower rank is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    IGP = 0,
    EGP = 1,
    UNK = 2,
}

impl Origin {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Body of an `update`. Inbound announcements carry every attribute;
/// re-announcements to neighbors carry only the prefix and path, so the
/// attribute fields are optional and omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMsg {
    #[serde(flatten)]
    pub net: Ipv4Net,
    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localpref: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(rename = "selfOrigin", skip_serializing_if = "Option::is_none")]
    pub self_origin: Option<bool>,
}

/// One row of a `table` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    #[serde(flatten)]
    pub net: Ipv4Net,
    pub peer: Ipv4Addr,
    pub localpref: u32,
    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,
    pub origin: Origin,
    #[serde(rename = "selfOrigin")]
    pub self_origin: bool,
}

/// An empty `msg` body (`{}` on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "msg")]
pub enum Payload {
    #[serde(rename = "handshake")]
    Handshake(Empty),
    #[serde(rename = "update")]
    Update(UpdateMsg),
    #[serde(rename = "withdraw")]
    Withdraw(Vec<Ipv4Net>),
    #[serde(rename = "data")]
    Data(Value),
    #[serde(rename = "dump")]
    Dump(Empty),
    #[serde(rename = "table")]
    Table(Vec<TableEntry>),
    #[serde(rename = "no route")]
    NoRoute(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Envelope {
    pub fn handshake(src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        Envelope {
            src,
            dst,
            payload: Payload::Handshake(Empty {}),
        }
    }

    /// An onward announcement: prefix and path only, no local attributes.
    pub fn announce(src: Ipv4Addr, dst: Ipv4Addr, net: Ipv4Net, as_path: Vec<u32>) -> Self {
        Envelope {
            src,
            dst,
            payload: Payload::Update(UpdateMsg {
                net,
                as_path,
                localpref: None,
                origin: None,
                self_origin: None,
            }),
        }
    }

    pub fn withdraw(src: Ipv4Addr, dst: Ipv4Addr, prefixes: Vec<Ipv4Net>) -> Self {
        Envelope {
            src,
            dst,
            payload: Payload::Withdraw(prefixes),
        }
    }

    pub fn table(src: Ipv4Addr, dst: Ipv4Addr, entries: Vec<TableEntry>) -> Self {
        Envelope {
            src,
            dst,
            payload: Payload::Table(entries),
        }
    }

    pub fn no_route(src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        Envelope {
            src,
            dst,
            payload: Payload::NoRoute(Vec::new()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
