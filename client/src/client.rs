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

use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

use arc_swap::ArcSwapOption;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;

use crate::Command;
use crate::Error;
use crate::Response;
use crate::TransportOptions;
use crate::error::make_config_error;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{64}$").expect("token pattern must compile"));

static BASE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://.+[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("base url pattern must compile")
});

const INTERNAL_ERROR_MESSAGE: &str = "internal API error, please contact the administrator";
const UNEXPECTED_ERROR_MESSAGE: &str = "unexpected error, please contact the administrator";

/// A builder for creating a `Client`.
#[derive(Clone)]
pub struct ClientBuilder {
    token: String,
    base_url: String,
    transport_options: TransportOptions,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("transport_options", &self.transport_options)
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new client builder with the given access token and invoicer URL.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
            transport_options: TransportOptions::default(),
        }
    }

    /// Set the options used to build the underlying HTTP client.
    pub fn transport_options(mut self, options: TransportOptions) -> Self {
        self.transport_options = options;
        self
    }

    /// Validate the token and URL, then build the client. No request is sent.
    pub fn build(self) -> Result<Client, Error> {
        let Self {
            token,
            base_url,
            transport_options,
        } = self;

        validate_token(&token)?;
        validate_base_url(&base_url)?;
        let client = transport_options.make_http_client()?;

        Ok(Client {
            client,
            token,
            base_url,
            transport_options,
            last_response: ArcSwapOption::empty(),
        })
    }
}

/// A client for the Fabo electronic invoicing API.
pub struct Client {
    client: reqwest::Client,
    token: String,
    base_url: String,
    transport_options: TransportOptions,
    last_response: ArcSwapOption<Response>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("transport_options", &self.transport_options)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with default transport options.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if the token is not 64 lowercase hex characters,
    /// or if the URL is not an HTTP(S) URL containing the invoicer UUID.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, Error> {
        ClientBuilder::new(token, base_url).build()
    }

    /// The access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The invoicer URL every command is posted under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The options the underlying HTTP client was built with.
    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// Replace the transport options used for subsequent calls.
    pub fn set_transport_options(&mut self, options: TransportOptions) -> Result<(), Error> {
        self.client = options.make_http_client()?;
        self.transport_options = options;
        Ok(())
    }

    /// The response body of the most recent call, including calls that failed after the body was
    /// parsed. `None` until such a call happens.
    ///
    /// Concurrent calls overwrite each other; prefer the value returned by the call itself.
    pub fn last_response(&self) -> Option<Arc<Response>> {
        self.last_response.load_full()
    }

    /// Execute an arbitrary command with the given parameters.
    pub async fn execute<P>(&self, command: &str, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        if !is_valid_command(command) {
            return Err(Error::Parameter {
                status: None,
                message: format!("invalid command name: {command:?}"),
            });
        }

        let payload = serde_json::to_vec(params).map_err(|err| Error::Fatal {
            status: None,
            message: format!("failed to serialize parameters: {err}"),
        })?;

        let url = self.endpoint(command);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(Error::Transport)?;
        log::debug!(status = status.as_u16(); "{command} returned");

        let response = parse_response(status, &body)?;
        self.last_response.store(Some(Arc::new(response.clone())));
        check_status(status, &response)?;
        Ok(response)
    }

    /// Execute one of the known commands.
    pub async fn execute_command<P>(&self, command: Command, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute(&command.to_string(), params).await
    }

    /// Execute the `emitir` command.
    pub async fn emit<P>(&self, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute_command(Command::Emit, params).await
    }

    /// Execute the `baja` command.
    pub async fn void<P>(&self, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute_command(Command::Void, params).await
    }

    /// Execute the `correo` command.
    pub async fn email<P>(&self, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute_command(Command::Email, params).await
    }

    /// Execute the `consultar_ruc` command.
    pub async fn query_tax_id<P>(&self, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute_command(Command::QueryTaxId, params).await
    }

    /// Execute the `consultar_ticket` command.
    pub async fn query_ticket<P>(&self, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute_command(Command::QueryTicket, params).await
    }

    /// Execute the `hola` command.
    pub async fn ping<P>(&self, params: &P) -> Result<Response, Error>
    where
        P: Serialize + ?Sized,
    {
        self.execute_command(Command::Ping, params).await
    }
}

impl Client {
    fn endpoint(&self, command: &str) -> String {
        format!("{}/{command}", self.base_url.trim_end_matches('/'))
    }
}

fn validate_token(token: &str) -> Result<(), Error> {
    if TOKEN_PATTERN.is_match(token) {
        Ok(())
    } else {
        Err(make_config_error("malformed token"))
    }
}

// Only the shape is checked; an unusable URL surfaces as a transport error on the first call.
fn validate_base_url(base_url: &str) -> Result<(), Error> {
    if BASE_URL_PATTERN.is_match(base_url) {
        Ok(())
    } else {
        Err(make_config_error(format!("malformed invoicer URL: {base_url}")))
    }
}

fn is_valid_command(command: &str) -> bool {
    !command.is_empty()
        && command
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_response(status: StatusCode, body: &[u8]) -> Result<Response, Error> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) | Err(_) => {
            let code = status.as_u16();
            Err(Error::Fatal {
                status: Some(code),
                message: format!(
                    "{INTERNAL_ERROR_MESSAGE} [{code} - {}]",
                    String::from_utf8_lossy(body)
                ),
            })
        }
        Ok(response) => Ok(response),
    }
}

fn check_status(status: StatusCode, response: &Response) -> Result<(), Error> {
    let code = status.as_u16();
    if code >= 500 {
        return Err(Error::Fatal {
            status: Some(code),
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        });
    }

    match status {
        StatusCode::BAD_REQUEST => Err(Error::Parameter {
            status: Some(code),
            message: format!(
                "{} - {}",
                error_field(response, "descripcion_error"),
                error_field(response, "descripcion_extra")
            ),
        }),
        StatusCode::FORBIDDEN => Err(Error::Authorization {
            status: code,
            message: error_field(response, "descripcion_error").to_string(),
        }),
        StatusCode::NOT_ACCEPTABLE => Err(Error::Negotiation {
            status: code,
            message: error_field(response, "descripcion_error").to_string(),
        }),
        // 401 and 402 are not expected from the API either
        _ if (401..=499).contains(&code) => Err(Error::Fatal {
            status: Some(code),
            message: format!("{UNEXPECTED_ERROR_MESSAGE} [{code}]"),
        }),
        _ => Ok(()),
    }
}

fn error_field<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
}
