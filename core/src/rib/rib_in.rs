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

use crate::msg::UpdateMsg;
use crate::net::Ipv4Net;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq)]
pub enum RibInKind {
    /// The announcement body exactly as received.
    Update(UpdateMsg),
    /// Session establishment; contributes nothing to the table.
    Handshake,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RibInEntry {
    pub peer: Ipv4Addr,
    pub kind: RibInKind,
}

/// Adj-RIB-In: the insertion-ordered log of everything each neighbor has
/// announced. The forwarding table is always derivable from this log, so a
/// withdrawal is handled by revoking the matching record and replaying the
/// rest in order.
#[derive(Debug)]
pub struct AdjRibIn {
    entries: Vec<RibInEntry>,
}

impl AdjRibIn {
    pub fn new() -> Self {
        AdjRibIn {
            entries: Vec::new(),
        }
    }

    pub fn record_update(&mut self, peer: Ipv4Addr, msg: UpdateMsg) {
        self.entries.push(RibInEntry {
            peer,
            kind: RibInKind::Update(msg),
        });
    }

    pub fn record_handshake(&mut self, peer: Ipv4Addr) {
        self.entries.push(RibInEntry {
            peer,
            kind: RibInKind::Handshake,
        });
    }

    /// Remove the first update record from `peer` for `net`.
    /// Returns false when nothing matched.
    pub fn revoke(&mut self, peer: Ipv4Addr, net: Ipv4Net) -> bool {
        let pos = self.entries.iter().position(|e| {
            e.peer == peer && matches!(&e.kind, RibInKind::Update(u) if u.net == net)
        });
        match pos {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remaining records in receive order.
    pub fn entries(&self) -> &[RibInEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AdjRibIn {
    fn default() -> Self {
        Self::new()
    }
}
