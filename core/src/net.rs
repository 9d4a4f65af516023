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

//! IPv4 prefix arithmetic. Everything here works on plain `u32` values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

pub fn ip_to_u32(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}

pub fn u32_to_ip(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

/// Prefix length of a contiguous netmask.
pub fn mask_to_cidr(mask: Ipv4Addr) -> u8 {
    u32::from(mask).count_ones() as u8
}

pub fn cidr_to_mask(len: u8) -> Ipv4Addr {
    if len == 0 {
        Ipv4Addr::UNSPECIFIED
    } else {
        Ipv4Addr::from(u32::MAX << (32 - u32::from(len)))
    }
}

/// Count of leading identical bits between two addresses. This is a raw
/// bit comparison, independent of any netmask.
pub fn lpm_length(a: Ipv4Addr, b: Ipv4Addr) -> u8 {
    (u32::from(a) ^ u32::from(b)).leading_zeros() as u8
}

/// The local address presented on a neighbor's subnet: the neighbor's /24
/// with the host octet set to 1.
pub fn local_addr_on(neighbor: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = neighbor.octets();
    Ipv4Addr::new(a, b, c, 1)
}

/// An IPv4 prefix, carried on the wire as separate dotted-quad `network`
/// and `netmask` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ipv4Net {
    pub network: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl Ipv4Net {
    pub fn new(network: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Ipv4Net { network, netmask }
    }

    pub fn cidr(&self) -> u8 {
        mask_to_cidr(self.netmask)
    }

    /// Numeric (low, high) bounds of the covered block.
    pub fn range(&self) -> (u32, u32) {
        let low = u32::from(self.network) & u32::from(self.netmask);
        (low, low | !u32::from(self.netmask))
    }

    pub fn covers(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & u32::from(self.netmask)
            == u32::from(self.network) & u32::from(self.netmask)
    }
}

impl fmt::Display for Ipv4Net {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.cidr())
    }
}
