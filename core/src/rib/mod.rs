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

//! Routing state:
//! - Adj-RIB-In: ordered log of everything each neighbor announced,
//!   replayed to rebuild the table after a withdrawal (owned by Router)
//! - Loc-RIB: the derived forwarding table, kept aggregated
//! - selector: reduces covering routes to the single preferred one

pub mod rib_in;
pub mod rib_loc;
mod route;
pub mod selector;

pub use rib_in::{AdjRibIn, RibInEntry, RibInKind};
pub use rib_loc::LocRib;
pub use route::Route;
