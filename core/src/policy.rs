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

//! The three-class export policy. Routes learned from customers are
//! exported to everyone; routes learned from peers or providers only to
//! customers. The same predicate governs announcements, withdrawals and
//! data forwarding.

use crate::config::Relation;

/// Whether a route learned from `from` may be sent to `to`.
pub fn should_export(from: Relation, to: Relation) -> bool {
    from == Relation::Customer || to == Relation::Customer
}

/// Whether a data packet may be forwarded, given the relation of the chosen
/// next hop and of the neighborhood the traffic entered through (`None`
/// when no route covers the sender). Transit is only carried when one side
/// of the path is a customer.
pub fn may_forward(next_hop: Relation, inbound: Option<Relation>) -> bool {
    next_hop == Relation::Customer || inbound == Some(Relation::Customer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Relation::{Customer, Peer, Provider};

    #[test]
    fn test_export_matrix() {
        let tests = [
            (Customer, Customer, true),
            (Customer, Peer, true),
            (Customer, Provider, true),
            (Peer, Customer, true),
            (Peer, Peer, false),
            (Peer, Provider, false),
            (Provider, Customer, true),
            (Provider, Peer, false),
            (Provider, Provider, false),
        ];
        for (from, to, expected) in tests {
            assert_eq!(
                should_export(from, to),
                expected,
                "export {:?} -> {:?}",
                from,
                to
            );
        }
    }

    #[test]
    fn test_forwarding_matrix() {
        let tests = [
            (Customer, Some(Customer), true),
            (Customer, Some(Peer), true),
            (Customer, Some(Provider), true),
            (Customer, None, true),
            (Peer, Some(Customer), true),
            (Peer, Some(Peer), false),
            (Peer, Some(Provider), false),
            (Peer, None, false),
            (Provider, Some(Customer), true),
            (Provider, Some(Provider), false),
            (Provider, None, false),
        ];
        for (next_hop, inbound, expected) in tests {
            assert_eq!(
                may_forward(next_hop, inbound),
                expected,
                "forward via {:?} from {:?}",
                next_hop,
                inbound
            );
        }
    }
}
