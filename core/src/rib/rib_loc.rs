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

use crate::net::{cidr_to_mask, Ipv4Net};
use crate::rib::Route;
use std::net::Ipv4Addr;

/// Loc-RIB: the forwarding table derived from the announcement log.
///
/// Kept aggregated: after every install, adjacent prefixes whose attributes
/// match are merged into the covering one-bit-shorter prefix, and exact
/// duplicates collapse, until no merge applies.
#[derive(Debug)]
pub struct LocRib {
    routes: Vec<Route>,
}

impl LocRib {
    pub fn new() -> Self {
        LocRib { routes: Vec::new() }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_len(&self) -> usize {
        self.routes.len()
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    /// Append a route and re-run aggregation.
    pub fn install(&mut self, route: Route) {
        self.routes.push(route);
        self.aggregate();
    }

    /// All routes whose prefix covers `addr`, in table order.
    pub fn lookup(&self, addr: Ipv4Addr) -> Vec<&Route> {
        self.routes.iter().filter(|r| r.net.covers(addr)).collect()
    }

    /// Merge until a fixed point. Candidates are computed from an immutable
    /// scan and applied one at a time, so a pass never observes a
    /// half-applied table.
    fn aggregate(&mut self) {
        while let Some((keep, dead, merged)) = self.find_merge() {
            self.routes[keep].net = merged;
            self.routes.remove(dead);
        }
    }

    /// Find one applicable merge: a pair of entries with equal attributes
    /// whose prefixes form an exact block. Pairs are considered in
    /// ascending network order; the kept entry is the one with the lower
    /// network.
    fn find_merge(&self) -> Option<(usize, usize, Ipv4Net)> {
        let mut order: Vec<usize> = (0..self.routes.len()).collect();
        order.sort_by_key(|&i| u32::from(self.routes[i].net.network));

        for &i in &order {
            for (j, other) in self.routes.iter().enumerate() {
                if i == j || !self.routes[i].same_attributes(other) {
                    continue;
                }
                let (keep, dead) =
                    if u32::from(self.routes[i].net.network) <= u32::from(other.net.network) {
                        (i, j)
                    } else {
                        (j, i)
                    };
                if let Some(merged) =
                    merged_net(&self.routes[keep].net, &self.routes[dead].net)
                {
                    return Some((keep, dead, merged));
                }
            }
        }
        None
    }
}

impl Default for LocRib {
    fn default() -> Self {
        Self::new()
    }
}

/// The prefix covering an equal-mask pair, when they form one exact block:
/// the same prefix twice (duplicate, mask kept), or siblings whose union is
/// the one-bit-shorter prefix. `lo` must not sort above `hi`.
fn merged_net(lo: &Ipv4Net, hi: &Ipv4Net) -> Option<Ipv4Net> {
    if lo.network == hi.network {
        return Some(*lo);
    }
    let cidr = lo.cidr();
    if cidr == 0 {
        return None;
    }
    let (_, high) = lo.range();
    if u32::from(hi.network) != high.wrapping_add(1) {
        return None;
    }
    // The union must itself be a well-formed prefix: the lower network has
    // to sit on the shorter-mask boundary.
    let parent = cidr_to_mask(cidr - 1);
    if u32::from(lo.network) & u32::from(parent) != u32::from(lo.network) {
        return None;
    }
    Some(Ipv4Net::new(lo.network, parent))
}
