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

use bytes::{BufMut, BytesMut};
use futures::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;
use tracing::debug;

use crate::{
    codec::{FrameBody, FrameCodec},
    err::ProtocolError,
    thin_const::*,
    util::{BufExt, BufMutExt},
    version::ProtocolVersion,
};

#[derive(Debug, Clone)]
pub struct HandshakeRequest {
    pub version: ProtocolVersion,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl HandshakeRequest {
    pub fn new(version: ProtocolVersion) -> Self {
        HandshakeRequest { version, user: None, password: None }
    }

    pub fn with_credentials(mut self, user: String, password: Option<String>) -> Self {
        self.user = Some(user);
        self.password = password;
        self
    }
}

impl FrameBody for HandshakeRequest {
    fn write_body(&self, dst: &mut BytesMut) {
        dst.put_u8(HANDSHAKE_CODE);
        dst.put_i16_le(self.version.major);
        dst.put_i16_le(self.version.minor);
        dst.put_i16_le(self.version.patch);
        dst.put_u8(THIN_CLIENT_CODE);

        // Credentials are only understood from 1.1.0 on.
        if self.version.supports_auth() {
            if let Some(user) = &self.user {
                dst.put_binary_string(Some(user));
                dst.put_binary_string(self.password.as_deref());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeResponse {
    Accepted,
    Rejected { server_version: ProtocolVersion, message: String, code: i32 },
}

impl HandshakeResponse {
    pub fn decode(mut body: BytesMut) -> Result<HandshakeResponse, ProtocolError> {
        if body.get_u8_checked("decode_handshake")? == HANDSHAKE_SUCCESS {
            return Ok(HandshakeResponse::Accepted);
        }

        let server_version = ProtocolVersion::new(
            body.get_i16_le_checked("decode_handshake")?,
            body.get_i16_le_checked("decode_handshake")?,
            body.get_i16_le_checked("decode_handshake")?,
        );
        let message = body.get_binary_string()?.unwrap_or_default();
        let code = if body.is_empty() {
            HANDSHAKE_DEFAULT_ERR_CODE
        } else {
            body.get_i32_le_checked("decode_handshake")?
        };

        Ok(HandshakeResponse::Rejected { server_version, message, code })
    }

    pub fn into_result(self) -> Result<(), ProtocolError> {
        match self {
            HandshakeResponse::Accepted => Ok(()),
            HandshakeResponse::Rejected { server_version, message, code } => {
                Err(ProtocolError::HandshakeRejected { server_version, message, code })
            }
        }
    }
}

/// Sends the handshake request and waits for the server's answer.
pub async fn handshake<S>(
    framed: &mut Framed<S, FrameCodec>,
    req: HandshakeRequest,
) -> Result<(), ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let version = req.version.check_supported()?;
    framed.send(req).await?;

    let body = match framed.next().await {
        Some(Ok(body)) => body,
        Some(Err(e)) => return Err(e),
        None => return Err(ProtocolError::ConnectionClosed),
    };

    let resp = HandshakeResponse::decode(body)?;
    debug!("handshake with version {} returned {:?}", version, resp);

    resp.into_result()
}

#[cfg(test)]
mod test {
    use bytes::{BufMut, Bytes, BytesMut};
    use futures::SinkExt;
    use tokio_stream::StreamExt;
    use tokio_util::codec::Framed;

    use super::{handshake, HandshakeRequest, HandshakeResponse};
    use crate::{
        codec::{FrameBody, FrameCodec},
        err::ProtocolError,
        util::{BufExt, BufMutExt},
        version::ProtocolVersion,
    };

    #[test]
    fn test_handshake_request_body() {
        let mut buf = BytesMut::new();
        HandshakeRequest::new(ProtocolVersion::V1_2_0).write_body(&mut buf);
        assert_eq!(&buf[..], &[0x01, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02]);

        let mut buf = BytesMut::new();
        HandshakeRequest::new(ProtocolVersion::V1_1_0)
            .with_credentials("ignite".to_string(), Some("secret".to_string()))
            .write_body(&mut buf);
        let mut creds = buf.split_off(8);
        assert_eq!(creds.get_binary_string().unwrap().as_deref(), Some("ignite"));
        assert_eq!(creds.get_binary_string().unwrap().as_deref(), Some("secret"));

        // 1.0.0 has no authentication, the credentials are dropped
        let mut buf = BytesMut::new();
        HandshakeRequest::new(ProtocolVersion::V1_0_0)
            .with_credentials("ignite".to_string(), None)
            .write_body(&mut buf);
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_decode_handshake_response() {
        let buf = BytesMut::from(&[0x01][..]);
        assert_eq!(HandshakeResponse::decode(buf).unwrap(), HandshakeResponse::Accepted);

        let mut buf = BytesMut::new();
        buf.put_u8(0);
        buf.put_i16_le(1);
        buf.put_i16_le(1);
        buf.put_i16_le(0);
        buf.put_binary_string(Some("Unsupported version."));
        let resp = HandshakeResponse::decode(buf).unwrap();
        assert_eq!(
            resp,
            HandshakeResponse::Rejected {
                server_version: ProtocolVersion::V1_1_0,
                message: "Unsupported version.".to_string(),
                code: 1,
            }
        );

        let mut buf = BytesMut::new();
        buf.put_u8(0);
        buf.put_i16_le(1);
        buf.put_i16_le(2);
        buf.put_i16_le(0);
        buf.put_binary_string(Some("Authentication failed"));
        buf.put_i32_le(2000);
        let res = HandshakeResponse::decode(buf).unwrap().into_result();
        assert!(matches!(res, Err(ProtocolError::HandshakeRejected { code: 2000, .. })));
    }

    #[tokio::test]
    async fn test_handshake_over_duplex() {
        let (client, server) = tokio::io::duplex(1024);
        let mut client = Framed::new(client, FrameCodec::default());
        let mut server = Framed::new(server, FrameCodec::default());

        let srv = tokio::spawn(async move {
            let body = server.next().await.unwrap().unwrap();
            assert_eq!(body[0], 0x01);
            server.send(Bytes::from_static(&[0x01])).await.unwrap();
        });

        handshake(&mut client, HandshakeRequest::new(ProtocolVersion::DEFAULT)).await.unwrap();
        srv.await.unwrap();
    }

    #[tokio::test]
    async fn test_handshake_connection_closed() {
        let (client, server) = tokio::io::duplex(1024);
        let mut client = Framed::new(client, FrameCodec::default());
        let mut server = Framed::new(server, FrameCodec::default());

        let srv = tokio::spawn(async move {
            let _ = server.next().await;
        });

        let res = handshake(&mut client, HandshakeRequest::new(ProtocolVersion::DEFAULT)).await;
        srv.await.unwrap();
        assert!(matches!(res, Err(ProtocolError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_handshake_unsupported_version() {
        let (client, _server) = tokio::io::duplex(64);
        let mut client = Framed::new(client, FrameCodec::default());

        let res = handshake(&mut client, HandshakeRequest::new(ProtocolVersion::new(1, 7, 0))).await;
        assert!(matches!(res, Err(ProtocolError::UnsupportedVersion(_))));
    }
}
