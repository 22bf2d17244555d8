// Copyright 2025 ScopeDB <contact@scopedb.io>
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

//! A client library for the Fabo electronic invoicing API.
//!
//! Every call posts a JSON payload to `{base_url}/{command}` authenticated with a bearer token,
//! and the HTTP status of the reply is mapped onto [`Error`].

#![deny(missing_docs)]

mod client;
mod command;
pub mod config;
mod error;
mod options;

pub use self::client::Client;
pub use self::client::ClientBuilder;
pub use self::command::Command;
pub use self::error::Error;
pub use self::options::TransportOptions;

/// A JSON value as returned by the Fabo API; an object for every documented command.
pub type Response = serde_json::Value;
