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

//! Black-box harness: fake neighbors exchanging real datagrams with a live
//! router task. Tests observe nothing but the wire.

#![allow(dead_code)]

use bgplite::config::{Config, NeighborSpec};
use bgplite::server::Router;
use serde_json::{json, Value};
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(300);

/// The router's address on a neighbor's subnet (/24 with host octet 1).
pub fn router_addr(neighbor: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = neighbor.octets();
    Ipv4Addr::new(a, b, c, 1)
}

/// A fake neighbor: one bound UDP socket the router believes is a session.
pub struct TestNeighbor {
    pub addr: Ipv4Addr,
    socket: UdpSocket,
}

impl TestNeighbor {
    pub async fn recv_msg(&self) -> Value {
        let mut buf = vec![0u8; 65_535];
        let len = timeout(RECV_TIMEOUT, self.socket.recv(&mut buf))
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for a message to {}", self.addr))
            .expect("recv failed");
        serde_json::from_slice(&buf[..len]).expect("router sent invalid JSON")
    }

    /// Receive until a message of the given type arrives, discarding others
    /// (e.g. announcements interleaved before a table reply).
    pub async fn recv_msg_of_type(&self, kind: &str) -> Value {
        for _ in 0..10 {
            let msg = self.recv_msg().await;
            if msg["type"] == kind {
                return msg;
            }
        }
        panic!("no {} message arrived at {}", kind, self.addr);
    }

    /// Assert that nothing arrives within a quiet window.
    pub async fn expect_silence(&self) {
        let mut buf = vec![0u8; 65_535];
        if let Ok(Ok(len)) = timeout(QUIET, self.socket.recv(&mut buf)).await {
            let msg: Value = serde_json::from_slice(&buf[..len]).unwrap();
            panic!("expected no message at {}, got {}", self.addr, msg);
        }
    }

    pub async fn send_msg(&self, msg: &Value) {
        self.socket
            .send(&serde_json::to_vec(msg).unwrap())
            .await
            .expect("send failed");
    }

    pub async fn send_raw(&self, bytes: &[u8]) {
        self.socket.send(bytes).await.expect("send failed");
    }

    pub async fn send_update(&self, params: UpdateParams<'_>) {
        let msg = json!({
            "src": self.addr.to_string(),
            "dst": router_addr(self.addr).to_string(),
            "type": "update",
            "msg": {
                "network": params.network,
                "netmask": params.netmask,
                "localpref": params.localpref,
                "ASPath": params.as_path,
                "origin": params.origin,
                "selfOrigin": params.self_origin,
            },
        });
        self.send_msg(&msg).await;
    }

    pub async fn send_withdraw(&self, prefixes: &[(&str, &str)]) {
        let body: Vec<Value> = prefixes
            .iter()
            .map(|(network, netmask)| json!({"network": network, "netmask": netmask}))
            .collect();
        let msg = json!({
            "src": self.addr.to_string(),
            "dst": router_addr(self.addr).to_string(),
            "type": "withdraw",
            "msg": body,
        });
        self.send_msg(&msg).await;
    }

    pub async fn send_data(&self, src: &str, dst: &str) {
        let msg = json!({
            "src": src,
            "dst": dst,
            "type": "data",
            "msg": {"payload": "ping"},
        });
        self.send_msg(&msg).await;
    }

    /// Request a dump and return the table rows.
    pub async fn dump_table(&self) -> Vec<Value> {
        let msg = json!({
            "src": self.addr.to_string(),
            "dst": router_addr(self.addr).to_string(),
            "type": "dump",
            "msg": {},
        });
        self.send_msg(&msg).await;
        let reply = self.recv_msg_of_type("table").await;
        assert_eq!(reply["dst"], self.addr.to_string());
        reply["msg"].as_array().expect("table body").clone()
    }
}

/// Inbound announcement parameters, defaulting to an unremarkable route.
pub struct UpdateParams<'a> {
    pub network: &'a str,
    pub netmask: &'a str,
    pub localpref: u32,
    pub as_path: Vec<u32>,
    pub origin: &'a str,
    pub self_origin: bool,
}

impl Default for UpdateParams<'_> {
    fn default() -> Self {
        UpdateParams {
            network: "10.0.0.0",
            netmask: "255.255.0.0",
            localpref: 100,
            as_path: vec![1],
            origin: "IGP",
            self_origin: false,
        }
    }
}

/// Start a router for the given neighbors (`(address, relation)` pairs) and
/// hand back one harness socket per neighbor, handshakes already consumed
/// and verified.
pub async fn start_router(asn: u32, neighbors: &[(&str, &str)]) -> Vec<TestNeighbor> {
    let mut specs = Vec::new();
    let mut harness = Vec::new();

    for (addr, relation) in neighbors {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr: Ipv4Addr = addr.parse().unwrap();
        specs.push(NeighborSpec {
            port: socket.local_addr().unwrap().port(),
            addr,
            relation: relation.parse().unwrap(),
        });
        harness.push(TestNeighbor { addr, socket });
    }

    let config = Config::new(asn, specs).unwrap();
    let router = Router::bind(config).await.expect("router bind");
    tokio::spawn(router.run());

    // The handshake reveals the router's ephemeral endpoint; lock each
    // harness socket onto it.
    for neighbor in &harness {
        let mut buf = vec![0u8; 65_535];
        let (len, from) = timeout(RECV_TIMEOUT, neighbor.socket.recv_from(&mut buf))
            .await
            .expect("timed out waiting for handshake")
            .unwrap();
        let msg: Value = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(msg["type"], "handshake", "first message must greet");
        assert_eq!(msg["src"], router_addr(neighbor.addr).to_string());
        assert_eq!(msg["dst"], neighbor.addr.to_string());
        assert_eq!(msg["msg"], json!({}));
        neighbor.socket.connect(from).await.unwrap();
    }

    harness
}
