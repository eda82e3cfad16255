// Copyright 2022 SphereEx Authors
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

use std::io::Error as IoError;

use thin_protocol::err::ProtocolError;
use thiserror::Error as ThisError;

use crate::server::ServerError;

/// Errors returned by the thin client.
///
/// `Server` means the server answered the request and rejected it. Every other
/// variant is a transport or local failure where no such answer exists.
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("protocol error: {0}")]
    Protocol(ProtocolError),

    #[error("stdio error: {0:?}")]
    Io(#[from] IoError),

    #[error("request [{0}] timed out")]
    Timeout(i64),

    #[error("handshake timed out")]
    HandshakeTimeout,

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("config error: {0}")]
    Config(String),
}

// A peer closing the socket is reported as `ConnectionClosed` whether it happens
// during the handshake or while a request waits for its response.
impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::ConnectionClosed => ClientError::ConnectionClosed,
            err => ClientError::Protocol(err),
        }
    }
}

impl ClientError {
    pub fn as_server_error(&self) -> Option<&ServerError> {
        match self {
            ClientError::Server(err) => Some(err),
            _ => None,
        }
    }

    // Code of the server rejection, `None` for transport errors.
    pub fn server_code(&self) -> Option<i32> {
        self.as_server_error().map(ServerError::code)
    }
}
