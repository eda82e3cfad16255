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

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::SinkExt;
use ignite_error::{ClientError, ServerError};
use thin_protocol::{
    codec::FrameCodec,
    err::ProtocolError,
    handshake::{handshake, HandshakeRequest},
    message::{Request, Response, ResponseStatus},
    version::ProtocolVersion,
};
use tokio::{net::TcpStream, time};
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::config::ClientConfig;

/// A single handshaken connection to a server node.
///
/// Requests are sent one at a time; each waits for the response carrying its
/// own request id. A request that times out leaves the connection unusable,
/// since its late response would be read by the next request.
#[derive(Debug)]
pub struct ClientConn {
    framed: Framed<TcpStream, FrameCodec>,
    endpoint: String,
    version: ProtocolVersion,
    timeout: Duration,
    last_request_id: i64,
}

impl ClientConn {
    pub async fn connect(config: &ClientConfig) -> Result<ClientConn, ClientError> {
        config.validate()?;
        let version = config.version()?;

        match Self::connect_with_version(config, version).await {
            Err(ClientError::Protocol(ProtocolError::HandshakeRejected {
                server_version,
                message,
                code,
            })) if server_version != version && server_version.is_supported() => {
                warn!(
                    "server rejected protocol version {} ({}, code {}), retrying with {}",
                    version, message, code, server_version
                );
                Self::connect_with_version(config, server_version).await
            }

            res => res,
        }
    }

    async fn connect_with_version(
        config: &ClientConfig,
        version: ProtocolVersion,
    ) -> Result<ClientConn, ClientError> {
        let sock = TcpStream::connect(&config.endpoint).await?;
        sock.set_nodelay(true)?;

        let mut framed =
            Framed::with_capacity(sock, FrameCodec::new(config.max_frame_len), 16384);

        let mut req = HandshakeRequest::new(version);
        if let Some(user) = &config.user {
            req = req.with_credentials(user.clone(), config.password.clone());
        }

        time::timeout(config.timeout(), handshake(&mut framed, req))
            .await
            .map_err(|_| ClientError::HandshakeTimeout)??;

        debug!("connected to {} with protocol version {}", config.endpoint, version);

        Ok(ClientConn {
            framed,
            endpoint: config.endpoint.clone(),
            version,
            timeout: config.timeout(),
            last_request_id: 0,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn next_request_id(&mut self) -> i64 {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// Sends `payload` under `op_code` and returns the response payload.
    ///
    /// A response with a non-zero status is returned as `ClientError::Server`.
    pub async fn request(&mut self, op_code: i16, payload: Bytes) -> Result<BytesMut, ClientError> {
        let request_id = self.next_request_id();
        let req = Request::new(op_code, request_id, payload);

        match time::timeout(self.timeout, self.dispatch(req)).await {
            Ok(res) => res,
            Err(_) => {
                warn!("request [{}] op {} timed out after {:?}", request_id, op_code, self.timeout);
                Err(ClientError::Timeout(request_id))
            }
        }
    }

    async fn dispatch(&mut self, req: Request) -> Result<BytesMut, ClientError> {
        let request_id = req.request_id;
        debug!("send request [{}] op {}", request_id, req.op_code);

        self.framed.send(req).await?;

        let body = match self.framed.next().await {
            Some(Ok(body)) => body,
            Some(Err(e)) => return Err(e.into()),
            None => return Err(ClientError::ConnectionClosed),
        };

        let resp = Response::decode(body)?;
        if resp.request_id != request_id {
            return Err(ProtocolError::RequestIdMismatch {
                expected: request_id,
                actual: resp.request_id,
            }
            .into());
        }

        match resp.status {
            ResponseStatus::Success(payload) => Ok(payload),

            ResponseStatus::Failure { code, message } => {
                let err = ServerError::new(message, code, request_id);
                debug!("{}", err);
                Err(err.into())
            }
        }
    }
}
