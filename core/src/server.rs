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

use crate::config::{Config, Relation};
use crate::msg::Envelope;
use crate::net::local_addr_on;
use crate::rib::{AdjRibIn, LocRib};
use crate::{error, info};
use std::collections::HashMap;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

pub const MAX_DATAGRAM: usize = 65_535;

/// Errors that can occur during startup. Everything after startup is
/// logged and survived.
#[derive(Debug)]
pub enum ServerError {
    BindError(io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::BindError(e) => write!(f, "failed to bind neighbor socket: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

/// A configured neighbor session: the fixed relationship plus the connected
/// socket carrying its datagrams.
pub struct NeighborInfo {
    pub relation: Relation,
    pub socket: Arc<UdpSocket>,
}

/// Operations delivered to the router loop by the per-neighbor reader
/// tasks. One variant today; the channel is the serialization point that
/// guarantees each datagram is handled to completion before the next.
pub enum ServerOp {
    Datagram { peer: Ipv4Addr, bytes: Vec<u8> },
}

pub struct Router {
    pub(crate) asn: u32,
    pub(crate) neighbors: HashMap<Ipv4Addr, NeighborInfo>,
    pub(crate) rib_in: AdjRibIn,
    pub(crate) loc_rib: LocRib,
    op_tx: mpsc::UnboundedSender<ServerOp>,
    op_rx: mpsc::UnboundedReceiver<ServerOp>,
}

impl Router {
    /// Bind one UDP socket per configured neighbor: ephemeral local port on
    /// loopback, connected to the neighbor's port so sends and receives are
    /// scoped to that session.
    pub async fn bind(config: Config) -> Result<Self, ServerError> {
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let mut neighbors = HashMap::new();

        for spec in &config.neighbors {
            let socket = UdpSocket::bind("127.0.0.1:0")
                .await
                .map_err(ServerError::BindError)?;
            socket
                .connect(("127.0.0.1", spec.port))
                .await
                .map_err(ServerError::BindError)?;
            info!("neighbor session bound",
                "neighbor" => spec.addr.to_string(),
                "port" => spec.port,
                "relation" => spec.relation.to_string());
            neighbors.insert(
                spec.addr,
                NeighborInfo {
                    relation: spec.relation,
                    socket: Arc::new(socket),
                },
            );
        }

        Ok(Router {
            asn: config.asn,
            neighbors,
            rib_in: AdjRibIn::new(),
            loc_rib: LocRib::new(),
            op_tx,
            op_rx,
        })
    }

    /// Greet every neighbor, then process datagrams until the process is
    /// terminated. Each inbound datagram is handled to completion —
    /// including all outbound sends — before the next is dequeued;
    /// datagrams from one neighbor arrive in receive order.
    pub async fn run(mut self) -> Result<(), ServerError> {
        info!("router starting", "asn" => self.asn, "neighbors" => self.neighbors.len());

        self.send_handshakes().await;
        self.spawn_readers();

        while let Some(op) = self.op_rx.recv().await {
            match op {
                ServerOp::Datagram { peer, bytes } => self.handle_datagram(peer, bytes).await,
            }
        }
        Ok(())
    }

    async fn send_handshakes(&self) {
        for addr in self.neighbors.keys() {
            let env = Envelope::handshake(local_addr_on(*addr), *addr);
            self.send_to(*addr, &env).await;
        }
    }

    fn spawn_readers(&self) {
        for (addr, neighbor) in &self.neighbors {
            let peer = *addr;
            let socket = Arc::clone(&neighbor.socket);
            let op_tx = self.op_tx.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; MAX_DATAGRAM];
                loop {
                    match socket.recv(&mut buf).await {
                        Ok(len) => {
                            let op = ServerOp::Datagram {
                                peer,
                                bytes: buf[..len].to_vec(),
                            };
                            if op_tx.send(op).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            // Transient by nature on UDP (e.g. a port
                            // unreachable bounced back); keep the session.
                            error!("receive failed",
                                "neighbor" => peer.to_string(),
                                "error" => e.to_string());
                        }
                    }
                }
            });
        }
    }

    pub(crate) fn relation_of(&self, addr: Ipv4Addr) -> Option<Relation> {
        self.neighbors.get(&addr).map(|n| n.relation)
    }

    pub(crate) async fn send_to(&self, neighbor: Ipv4Addr, env: &Envelope) {
        let Some(info) = self.neighbors.get(&neighbor) else {
            error!("send to unknown neighbor", "neighbor" => neighbor.to_string());
            return;
        };
        match env.to_json() {
            Ok(bytes) => {
                if let Err(e) = info.socket.send(&bytes).await {
                    error!("send failed",
                        "neighbor" => neighbor.to_string(),
                        "error" => e.to_string());
                }
            }
            Err(e) => error!("serialize failed", "error" => e.to_string()),
        }
    }
}
