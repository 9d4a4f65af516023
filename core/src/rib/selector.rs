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

use crate::net::lpm_length;
use crate::rib::Route;
use std::cmp::Reverse;
use std::net::Ipv4Addr;

/// Reduce a candidate set to the single preferred route for `dst`.
///
/// Tie-breakers apply in order, each keeping only the best candidates under
/// its key; ties surviving every step fall to the first candidate in table
/// order. The result is deterministic for a given input.
pub fn select<'a>(mut candidates: Vec<&'a Route>, dst: Ipv4Addr) -> Option<&'a Route> {
    // 1. longest raw-bit prefix match of network against dst; the entry's
    //    own netmask plays no part here
    retain_max_by_key(&mut candidates, |r| lpm_length(dst, r.net.network));
    // 2. highest localpref
    retain_max_by_key(&mut candidates, |r| r.localpref);
    // 3. locally-originated routes win; if none is, all survive
    retain_max_by_key(&mut candidates, |r| r.self_origin);
    // 4. shortest AS path
    retain_max_by_key(&mut candidates, |r| Reverse(r.as_path.len()));
    // 5. best origin: IGP over EGP over UNK
    retain_max_by_key(&mut candidates, |r| Reverse(r.origin.rank()));
    // 6. lowest peer address
    retain_max_by_key(&mut candidates, |r| Reverse(u32::from(r.peer)));

    candidates.first().copied()
}

fn retain_max_by_key<K: Ord>(candidates: &mut Vec<&Route>, key: impl Fn(&Route) -> K) {
    if let Some(best) = candidates.iter().map(|r| key(r)).max() {
        candidates.retain(|r| key(r) == best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::Origin;
    use crate::test_helpers::{test_net, test_route_with};

    fn peer(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 0, last)
    }

    #[test]
    fn test_empty_candidates() {
        assert!(select(vec![], Ipv4Addr::new(10, 0, 0, 1)).is_none());
    }

    #[test]
    fn test_longest_prefix_match_wins_first() {
        // The /8 entry's network shares more leading bits with the
        // destination than the /16 entry's network does, localpref
        // notwithstanding.
        let short = test_route_with(peer(2), |r| {
            r.net = test_net([10, 0, 0, 0], 8);
            r.localpref = 50;
        });
        let long = test_route_with(peer(3), |r| {
            r.net = test_net([10, 4, 0, 0], 16);
            r.localpref = 500;
        });
        let chosen = select(vec![&short, &long], Ipv4Addr::new(10, 0, 9, 9)).unwrap();
        assert_eq!(chosen.peer, peer(2));
    }

    #[test]
    fn test_localpref_breaks_equal_prefix() {
        let a = test_route_with(peer(2), |r| r.localpref = 100);
        let b = test_route_with(peer(3), |r| r.localpref = 200);
        let chosen = select(vec![&a, &b], Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert_eq!(chosen.peer, peer(3));
    }

    #[test]
    fn test_self_origin_preferred() {
        let a = test_route_with(peer(2), |r| r.self_origin = true);
        let b = test_route_with(peer(3), |r| r.self_origin = false);
        let chosen = select(vec![&b, &a], Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert_eq!(chosen.peer, peer(2));
    }

    #[test]
    fn test_no_self_origin_keeps_all() {
        // Neither is self-originated; the tie moves on to AS path length.
        let a = test_route_with(peer(2), |r| r.as_path = vec![7, 1, 2]);
        let b = test_route_with(peer(3), |r| r.as_path = vec![7, 1]);
        let chosen = select(vec![&a, &b], Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert_eq!(chosen.peer, peer(3));
    }

    #[test]
    fn test_origin_preference() {
        let tests = [
            (Origin::IGP, Origin::EGP, peer(2)),
            (Origin::IGP, Origin::UNK, peer(2)),
            (Origin::EGP, Origin::UNK, peer(2)),
            (Origin::UNK, Origin::IGP, peer(3)),
        ];
        for (first, second, expected) in tests {
            let a = test_route_with(peer(2), |r| r.origin = first);
            let b = test_route_with(peer(3), |r| r.origin = second);
            let chosen = select(vec![&a, &b], Ipv4Addr::new(10, 0, 0, 1)).unwrap();
            assert_eq!(chosen.peer, expected, "{:?} vs {:?}", first, second);
        }
    }

    #[test]
    fn test_lowest_peer_address_last() {
        let a = test_route_with(Ipv4Addr::new(192, 168, 0, 2), |_| {});
        let b = test_route_with(Ipv4Addr::new(172, 16, 0, 2), |_| {});
        let chosen = select(vec![&a, &b], Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert_eq!(chosen.peer, Ipv4Addr::new(172, 16, 0, 2));
    }

    #[test]
    fn test_full_tie_falls_to_first_candidate() {
        let a = test_route_with(peer(2), |_| {});
        let b = test_route_with(peer(2), |_| {});
        let chosen = select(vec![&a, &b], Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert!(std::ptr::eq(chosen, &a));
    }

    #[test]
    fn test_selection_is_stable() {
        let a = test_route_with(peer(2), |r| r.localpref = 100);
        let b = test_route_with(peer(3), |r| r.localpref = 100);
        let dst = Ipv4Addr::new(10, 0, 0, 1);
        let first = select(vec![&a, &b], dst).unwrap();
        for _ in 0..5 {
            assert!(std::ptr::eq(select(vec![&a, &b], dst).unwrap(), first));
        }
    }
}
