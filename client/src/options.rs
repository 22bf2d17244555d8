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

use std::time::Duration;

use jiff::SignedDuration;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::error::make_config_error;

/// Tuning knobs handed to the underlying HTTP client.
///
/// The client does not interpret these beyond building a [`reqwest::Client`] from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportOptions {
    /// Total timeout of a single request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<SignedDuration>,
    /// Timeout of the connect phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<SignedDuration>,
    /// Proxy URL used for every scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Ignore proxies configured through the environment.
    #[serde(default)]
    pub no_proxy: bool,
    /// Accept any TLS certificate. Only meant for debugging.
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
    /// Value of the `User-Agent` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Number of redirects to follow. Redirects are not followed when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_limit: Option<usize>,
    /// Log connection-level reads and writes at trace level.
    #[serde(default)]
    pub connection_verbose: bool,
}

impl TransportOptions {
    pub(crate) fn make_http_client(&self) -> Result<reqwest::Client, Error> {
        let redirect = match self.redirect_limit {
            Some(limit) => Policy::limited(limit),
            None => Policy::none(),
        };

        let mut builder = reqwest::ClientBuilder::new()
            .redirect(redirect)
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .connection_verbose(self.connection_verbose);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(to_std_duration("timeout", timeout)?);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(to_std_duration("connect_timeout", timeout)?);
        }
        if self.no_proxy {
            builder = builder.no_proxy();
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(Error::Transport)?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder.build().map_err(Error::Transport)
    }
}

fn to_std_duration(name: &str, duration: SignedDuration) -> Result<Duration, Error> {
    Duration::try_from(duration)
        .map_err(|_| make_config_error(format!("{name} must not be negative: {duration}")))
}
