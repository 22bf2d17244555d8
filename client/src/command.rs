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

use parse_display::Display;
use parse_display::FromStr;

/// The commands understood by the Fabo API.
///
/// Displays as (and parses from) the path segment the command is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Command {
    /// Emit an electronic document.
    #[display("emitir")]
    Emit,
    /// Void a previously emitted document.
    #[display("baja")]
    Void,
    /// Send a document by email.
    #[display("correo")]
    Email,
    /// Look up a taxpayer by tax id.
    #[display("consultar_ruc")]
    QueryTaxId,
    /// Query the status of a pending ticket.
    #[display("consultar_ticket")]
    QueryTicket,
    /// Check connectivity and credentials.
    #[display("hola")]
    Ping,
}

impl Command {
    /// All known commands.
    pub const ALL: [Command; 6] = [
        Command::Emit,
        Command::Void,
        Command::Email,
        Command::QueryTaxId,
        Command::QueryTicket,
        Command::Ping,
    ];
}
