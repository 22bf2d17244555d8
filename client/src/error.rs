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

/// Errors that can occur when using the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token, base URL or configuration is malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The server failed, or replied with something this client cannot make sense of.
    #[error("fatal error: {message}")]
    Fatal {
        /// The HTTP status code, if a response was received.
        status: Option<u16>,
        /// A human-readable description.
        message: String,
    },
    /// The server rejected the command parameters ("400 Bad Request").
    #[error("parameter error: {message}")]
    Parameter {
        /// The HTTP status code, absent when the command was rejected locally.
        status: Option<u16>,
        /// The server's description of the invalid parameters.
        message: String,
    },
    /// The server rejected the token ("403 Forbidden").
    #[error("authorization error: {message}")]
    Authorization {
        /// The HTTP status code.
        status: u16,
        /// The server's description of the failure.
        message: String,
    },
    /// The server could not negotiate the request format ("406 Not Acceptable").
    #[error("negotiation error: {message}")]
    Negotiation {
        /// The HTTP status code.
        status: u16,
        /// The server's description of the failure.
        message: String,
    },
}

impl Error {
    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::InvalidConfiguration(_) => None,
            Error::Transport(err) => err.status().map(|status| status.as_u16()),
            Error::Fatal { status, .. } | Error::Parameter { status, .. } => *status,
            Error::Authorization { status, .. } | Error::Negotiation { status, .. } => {
                Some(*status)
            }
        }
    }

    /// The error message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Error::InvalidConfiguration(message) => message.clone(),
            Error::Transport(err) => err.to_string(),
            Error::Fatal { message, .. }
            | Error::Parameter { message, .. }
            | Error::Authorization { message, .. }
            | Error::Negotiation { message, .. } => message.clone(),
        }
    }
}

pub(crate) fn make_config_error(msg: impl ToString) -> Error {
    Error::InvalidConfiguration(msg.to_string())
}
