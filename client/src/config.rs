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

//! Loading client settings from a TOML file layered with `FABO_CONFIG_*` environment variables.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde::de::IntoDeserializer;
use toml_edit::DocumentMut;

use crate::Client;
use crate::ClientBuilder;
use crate::Error;
use crate::TransportOptions;
use crate::error::make_config_error;

/// Prefix of the environment variables that override the config file.
pub const ENV_PREFIX: &str = "FABO_CONFIG_";

/// Everything needed to build a [`Client`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// The access token.
    pub token: String,
    /// The invoicer URL.
    pub base_url: String,
    /// Options for the underlying HTTP client.
    #[serde(default)]
    pub transport: TransportOptions,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ClientConfig {
    /// Build a validated client from this config.
    pub fn build(self) -> Result<Client, Error> {
        ClientBuilder::new(self.token, self.base_url)
            .transport_options(self.transport)
            .build()
    }
}

/// An environment variable that can override a config entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionEntry {
    /// Name of the environment variable.
    pub env_name: &'static str,
    /// Dotted path of the entry in the TOML document.
    pub ent_path: &'static str,
    /// One of `string`, `integer` or `boolean`.
    pub ent_type: &'static str,
}

/// All environment variables understood by [`load_config`].
pub fn known_option_entries() -> Vec<OptionEntry> {
    const fn entry(
        env_name: &'static str,
        ent_path: &'static str,
        ent_type: &'static str,
    ) -> OptionEntry {
        OptionEntry {
            env_name,
            ent_path,
            ent_type,
        }
    }

    vec![
        entry("FABO_CONFIG_TOKEN", "token", "string"),
        entry("FABO_CONFIG_BASE_URL", "base_url", "string"),
        entry("FABO_CONFIG_TRANSPORT_TIMEOUT", "transport.timeout", "string"),
        entry(
            "FABO_CONFIG_TRANSPORT_CONNECT_TIMEOUT",
            "transport.connect_timeout",
            "string",
        ),
        entry("FABO_CONFIG_TRANSPORT_PROXY", "transport.proxy", "string"),
        entry("FABO_CONFIG_TRANSPORT_NO_PROXY", "transport.no_proxy", "boolean"),
        entry(
            "FABO_CONFIG_TRANSPORT_DANGER_ACCEPT_INVALID_CERTS",
            "transport.danger_accept_invalid_certs",
            "boolean",
        ),
        entry(
            "FABO_CONFIG_TRANSPORT_USER_AGENT",
            "transport.user_agent",
            "string",
        ),
        entry(
            "FABO_CONFIG_TRANSPORT_REDIRECT_LIMIT",
            "transport.redirect_limit",
            "integer",
        ),
        entry(
            "FABO_CONFIG_TRANSPORT_CONNECTION_VERBOSE",
            "transport.connection_verbose",
            "boolean",
        ),
    ]
}

/// A loaded config along with non-fatal notes about how it was assembled.
#[derive(Debug)]
pub struct LoadConfigResult {
    /// The resulting config.
    pub config: ClientConfig,
    /// Warnings produced while applying environment overrides.
    pub warnings: Vec<String>,
}

/// Load the config file at `config_file`, overridden by `FABO_CONFIG_*` variables of the current
/// process.
pub fn load_config(config_file: impl AsRef<Path>) -> Result<LoadConfigResult, Error> {
    let config_file = config_file.as_ref();
    let content = std::fs::read_to_string(config_file).map_err(|err| {
        make_config_error(format!(
            "failed to read config file {}: {err}",
            config_file.display()
        ))
    })?;
    load_config_from_str(&content, std::env::vars())
}

/// Load a config from TOML `content`, overridden by the `FABO_CONFIG_*` entries of `env`.
///
/// Entries of `env` without the prefix are ignored; unknown prefixed entries are rejected.
pub fn load_config_from_str<I, K, V>(content: &str, env: I) -> Result<LoadConfigResult, Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    // Layer 0: the config file
    let mut config = DocumentMut::from_str(content)
        .map_err(|err| make_config_error(format!("failed to parse config content: {err}")))?;

    // Layer 1: environment variables
    let mut env = env
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect::<Vec<(String, String)>>();
    env.sort();

    let known_option_entries = known_option_entries();
    let mut warnings = vec![];
    for (k, v) in env {
        let Some(ent) = known_option_entries.iter().find(|e| k == e.env_name) else {
            return Err(make_config_error(format!(
                "failed to parse unknown environment variable {k} with value {v}"
            )));
        };

        let item = match ent.ent_type {
            "string" => toml_edit::value(v),
            "integer" => {
                let value = v.parse::<i64>().map_err(|_| {
                    make_config_error(format!("failed to parse integer value {v} of key {k}"))
                })?;
                toml_edit::value(value)
            }
            "boolean" => {
                let value = v.parse::<bool>().map_err(|_| {
                    make_config_error(format!("failed to parse boolean value {v} of key {k}"))
                })?;
                toml_edit::value(value)
            }
            ty => {
                return Err(make_config_error(format!(
                    "failed to parse environment variable {k} with value {v} and resolved type {ty}"
                )));
            }
        };
        warnings.extend(set_toml_path(&mut config, &k, ent.ent_path, item));
    }

    let config = ClientConfig::deserialize(config.into_deserializer())
        .map_err(|err| make_config_error(format!("failed to deserialize config: {err}")))?;
    Ok(LoadConfigResult { config, warnings })
}

fn set_toml_path(
    doc: &mut DocumentMut,
    key: &str,
    path: &'static str,
    value: toml_edit::Item,
) -> Vec<String> {
    let mut current = doc.as_item_mut();
    let mut warnings = vec![];

    let parts = path.split('.').collect::<Vec<_>>();
    let (last, parents) = match parts.split_last() {
        Some(split) => split,
        None => return warnings,
    };

    for part in parents {
        if current.get(part).is_none() {
            warnings.push(format!(
                "[key={key}] config path '{path}' has missing parent '{part}'; created",
            ));
        }
        current = &mut current[part];
    }

    current[last] = value;
    warnings
}
