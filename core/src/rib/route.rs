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

use crate::msg::{Origin, TableEntry, UpdateMsg};
use crate::net::Ipv4Net;
use std::net::Ipv4Addr;

/// A forwarding-table entry: a prefix plus the attributes that drive
/// selection and aggregation. `as_path` always starts with the local ASN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub net: Ipv4Net,
    pub peer: Ipv4Addr,
    pub origin: Origin,
    pub localpref: u32,
    pub self_origin: bool,
    pub as_path: Vec<u32>,
}

impl Route {
    /// Build a table entry from an inbound announcement, prepending the
    /// local ASN to the received path. Returns None when a required
    /// attribute is missing.
    pub fn from_update(peer: Ipv4Addr, msg: &UpdateMsg, local_asn: u32) -> Option<Self> {
        let origin = msg.origin?;
        let localpref = msg.localpref?;
        let self_origin = msg.self_origin?;
        let mut as_path = Vec::with_capacity(msg.as_path.len() + 1);
        as_path.push(local_asn);
        as_path.extend_from_slice(&msg.as_path);
        Some(Route {
            net: msg.net,
            peer,
            origin,
            localpref,
            self_origin,
            as_path,
        })
    }

    /// Attribute equality for aggregation: everything but the network base.
    /// Netmask equality is part of the test.
    pub fn same_attributes(&self, other: &Route) -> bool {
        self.net.netmask == other.net.netmask
            && self.peer == other.peer
            && self.origin == other.origin
            && self.localpref == other.localpref
            && self.self_origin == other.self_origin
            && self.as_path == other.as_path
    }

    /// Serialized form for `table` replies. The leading local ASN is
    /// stripped, leaving the path as it was received.
    pub fn to_table_entry(&self) -> TableEntry {
        TableEntry {
            net: self.net,
            peer: self.peer,
            localpref: self.localpref,
            as_path: self.as_path.iter().skip(1).copied().collect(),
            origin: self.origin,
            self_origin: self.self_origin,
        }
    }
}
