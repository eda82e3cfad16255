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

use std::{io, string::FromUtf8Error};

use thiserror::Error;

use crate::version::ProtocolVersion;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("stdio error: {0:?}")]
    Io(#[from] io::Error),

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("method: {:?} invalid packet {:?}", .method, .data)]
    InvalidPacket { method: String, data: Vec<u8> },

    #[error("frame length {0} exceeds the limit of {1} bytes")]
    FrameTooLarge(usize, usize),

    #[error("unexpected binary type code {0}")]
    InvalidTypeCode(u8),

    #[error("string decoding error: {0}")]
    StringDecode(#[from] FromUtf8Error),

    #[error("invalid protocol version {0:?}")]
    InvalidVersion(String),

    #[error("unsupport protocol version {0}")]
    UnsupportedVersion(ProtocolVersion),

    #[error("handshake rejected by server (server version {server_version}, code {code}): {message}")]
    HandshakeRejected { server_version: ProtocolVersion, message: String, code: i32 },

    #[error("response for request [{actual}] received while waiting for request [{expected}]")]
    RequestIdMismatch { expected: i64, actual: i64 },
}
