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

//! Datagram dispatch and the handlers behind each message kind.

use crate::msg::{Envelope, Payload, UpdateMsg};
use crate::net::{local_addr_on, Ipv4Net};
use crate::policy;
use crate::rib::{selector, RibInKind, Route};
use crate::server::Router;
use crate::{debug, info, warn};
use std::net::Ipv4Addr;

impl Router {
    /// Parse and dispatch one inbound datagram. The source neighbor is the
    /// session the datagram arrived on; the envelope `src` may name a host
    /// behind it. Nothing here is fatal: bad input is logged and dropped.
    pub(crate) async fn handle_datagram(&mut self, peer: Ipv4Addr, bytes: Vec<u8>) {
        let env = match Envelope::from_json(&bytes) {
            Ok(env) => env,
            Err(e) => {
                warn!("dropping malformed datagram",
                    "neighbor" => peer.to_string(),
                    "error" => e.to_string());
                return;
            }
        };

        match env.payload.clone() {
            Payload::Handshake(_) => self.handle_handshake(peer),
            Payload::Update(update) => self.handle_update(peer, update).await,
            Payload::Withdraw(prefixes) => self.handle_withdraw(peer, prefixes).await,
            Payload::Data(_) => self.handle_data(peer, env).await,
            Payload::Dump(_) => self.handle_dump(peer, env.src).await,
            Payload::Table(_) | Payload::NoRoute(_) => {
                warn!("dropping unexpected message", "neighbor" => peer.to_string());
            }
        }
    }

    fn handle_handshake(&mut self, peer: Ipv4Addr) {
        self.rib_in.record_handshake(peer);
        info!("handshake received", "neighbor" => peer.to_string());
    }

    pub(crate) async fn handle_update(&mut self, peer: Ipv4Addr, update: UpdateMsg) {
        let Some(route) = Route::from_update(peer, &update, self.asn) else {
            warn!("dropping update with missing attributes", "neighbor" => peer.to_string());
            return;
        };
        let net = route.net;
        let as_path = route.as_path.clone();

        self.rib_in.record_update(peer, update);
        self.loc_rib.install(route);
        info!("route installed",
            "prefix" => net.to_string(),
            "neighbor" => peer.to_string(),
            "table_size" => self.loc_rib.routes_len());

        self.propagate_update(peer, net, &as_path).await;
    }

    /// Re-announce to every neighbor the export rule allows, skipping the
    /// session the announcement came from. The outbound body carries only
    /// the prefix and the extended path, no local attributes.
    async fn propagate_update(&self, from: Ipv4Addr, net: Ipv4Net, as_path: &[u32]) {
        let Some(from_rel) = self.relation_of(from) else {
            return;
        };
        for (&addr, neighbor) in self.neighbors.iter() {
            if addr == from || !policy::should_export(from_rel, neighbor.relation) {
                continue;
            }
            let env = Envelope::announce(local_addr_on(addr), addr, net, as_path.to_vec());
            self.send_to(addr, &env).await;
        }
    }

    pub(crate) async fn handle_withdraw(&mut self, peer: Ipv4Addr, prefixes: Vec<Ipv4Net>) {
        for net in &prefixes {
            if self.rib_in.revoke(peer, *net) {
                info!("route revoked",
                    "prefix" => net.to_string(),
                    "neighbor" => peer.to_string());
            } else {
                warn!("withdraw for unknown prefix",
                    "prefix" => net.to_string(),
                    "neighbor" => peer.to_string());
            }
        }
        self.propagate_withdraw(peer, &prefixes).await;
        self.rebuild();
    }

    async fn propagate_withdraw(&self, from: Ipv4Addr, prefixes: &[Ipv4Net]) {
        let Some(from_rel) = self.relation_of(from) else {
            return;
        };
        for (&addr, neighbor) in self.neighbors.iter() {
            if addr == from || !policy::should_export(from_rel, neighbor.relation) {
                continue;
            }
            let env = Envelope::withdraw(local_addr_on(addr), addr, prefixes.to_vec());
            self.send_to(addr, &env).await;
        }
    }

    /// Reconstruct the forwarding table from the announcement log, replaying
    /// the surviving records in receive order. No re-announcement happens
    /// here; install keeps the table aggregated as it goes.
    pub(crate) fn rebuild(&mut self) {
        self.loc_rib.clear();
        for entry in self.rib_in.entries() {
            if let RibInKind::Update(update) = &entry.kind {
                if let Some(route) = Route::from_update(entry.peer, update, self.asn) {
                    self.loc_rib.install(route);
                }
            }
        }
        debug!("table rebuilt",
            "log_entries" => self.rib_in.len(),
            "routes" => self.loc_rib.routes_len());
    }

    /// Forward a data packet along the selected route, or answer `no route`
    /// when nothing covers the destination or the relationship policy
    /// refuses the path. The envelope is relayed unmodified.
    async fn handle_data(&mut self, peer: Ipv4Addr, env: Envelope) {
        let dst = env.dst;
        let src = env.src;

        let Some(route) = selector::select(self.loc_rib.lookup(dst), dst) else {
            debug!("no route to destination", "dst" => dst.to_string());
            self.send_no_route(peer, src).await;
            return;
        };
        let next_hop = route.peer;

        let Some(next_rel) = self.relation_of(next_hop) else {
            warn!("selected route has no session", "next_hop" => next_hop.to_string());
            self.send_no_route(peer, src).await;
            return;
        };
        let inbound = self.relation_covering(src);
        if !policy::may_forward(next_rel, inbound) {
            info!("forwarding refused by policy",
                "src" => src.to_string(),
                "dst" => dst.to_string(),
                "next_hop" => next_hop.to_string());
            self.send_no_route(peer, src).await;
            return;
        }

        debug!("forwarding data",
            "dst" => dst.to_string(),
            "next_hop" => next_hop.to_string());
        self.send_to(next_hop, &env).await;
    }

    /// Relation of the neighbor whose route best covers `addr`, if any.
    fn relation_covering(&self, addr: Ipv4Addr) -> Option<crate::config::Relation> {
        let route = selector::select(self.loc_rib.lookup(addr), addr)?;
        self.relation_of(route.peer)
    }

    /// Send `no route` back toward the sender: via the neighbor that best
    /// covers it, falling back to the arrival session.
    async fn send_no_route(&self, arrival: Ipv4Addr, src: Ipv4Addr) {
        let target = selector::select(self.loc_rib.lookup(src), src)
            .map(|r| r.peer)
            .unwrap_or(arrival);
        let env = Envelope::no_route(local_addr_on(src), src);
        self.send_to(target, &env).await;
    }

    /// Answer a dump with exactly one `table` reply to the requester.
    async fn handle_dump(&mut self, peer: Ipv4Addr, requester: Ipv4Addr) {
        let entries = self
            .loc_rib
            .routes()
            .iter()
            .map(Route::to_table_entry)
            .collect();
        info!("table dumped",
            "neighbor" => peer.to_string(),
            "routes" => self.loc_rib.routes_len());
        let env = Envelope::table(local_addr_on(peer), requester, entries);
        self.send_to(peer, &env).await;
    }
}
