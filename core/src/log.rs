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

use std::time::SystemTime;

/// Milliseconds since the Unix epoch, stamped on every log line.
pub fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[macro_export]
macro_rules! info {
    ($msg:expr) => {
        println!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "INFO",
            "message": $msg
        }))
    };
    ($msg:expr, $($key:tt => $val:expr),+ $(,)?) => {
        println!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "INFO",
            "message": $msg,
            $(
                $key: $val
            ),+
        }))
    };
}

#[macro_export]
macro_rules! warn {
    ($msg:expr) => {
        println!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "WARN",
            "message": $msg
        }))
    };
    ($msg:expr, $($key:tt => $val:expr),+ $(,)?) => {
        println!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "WARN",
            "message": $msg,
            $(
                $key: $val
            ),+
        }))
    };
}

#[macro_export]
macro_rules! error {
    ($msg:expr) => {
        eprintln!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "ERROR",
            "message": $msg
        }))
    };
    ($msg:expr, $($key:tt => $val:expr),+ $(,)?) => {
        eprintln!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "ERROR",
            "message": $msg,
            $(
                $key: $val
            ),+
        }))
    };
}

#[macro_export]
macro_rules! debug {
    ($msg:expr) => {
        println!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "DEBUG",
            "message": $msg
        }))
    };
    ($msg:expr, $($key:tt => $val:expr),+ $(,)?) => {
        println!("{}", serde_json::json!({
            "timestamp": $crate::log::timestamp_millis(),
            "level": "DEBUG",
            "message": $msg,
            $(
                $key: $val
            ),+
        }))
    };
}
