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

use bytes::{BufMut, Bytes, BytesMut};

use crate::{codec::FrameBody, err::ProtocolError, thin_const::STATUS_SUCCESS, util::BufExt};

/// Outbound request: `i16 op code`, `i64 request id`, payload.
#[derive(Debug, Clone)]
pub struct Request {
    pub op_code: i16,
    pub request_id: i64,
    pub payload: Bytes,
}

impl Request {
    pub fn new(op_code: i16, request_id: i64, payload: Bytes) -> Request {
        Request { op_code, request_id, payload }
    }
}

impl FrameBody for Request {
    fn write_body(&self, dst: &mut BytesMut) {
        dst.reserve(10 + self.payload.len());
        dst.put_i16_le(self.op_code);
        dst.put_i64_le(self.request_id);
        dst.extend_from_slice(&self.payload);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    Success(BytesMut),
    // A null message from the server is kept as an empty string.
    Failure { code: i32, message: String },
}

/// Inbound response: `i64 request id`, `i32 status`, then the payload on
/// success or a binary string message on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub request_id: i64,
    pub status: ResponseStatus,
}

impl Response {
    pub fn decode(mut body: BytesMut) -> Result<Response, ProtocolError> {
        let request_id = body.get_i64_le_checked("decode_response")?;
        let code = body.get_i32_le_checked("decode_response")?;

        let status = if code == STATUS_SUCCESS {
            ResponseStatus::Success(body)
        } else {
            let message = body.get_binary_string()?.unwrap_or_default();
            ResponseStatus::Failure { code, message }
        };

        Ok(Response { request_id, status })
    }
}

#[cfg(test)]
mod test {
    use bytes::{BufMut, Bytes, BytesMut};

    use super::{Request, Response, ResponseStatus};
    use crate::{codec::FrameBody, err::ProtocolError, util::BufMutExt};

    #[test]
    fn test_request_body() {
        let req = Request::new(1050, 7, Bytes::from_static(&[0xaa]));
        let mut buf = BytesMut::new();
        req.write_body(&mut buf);

        assert_eq!(&buf[..], &[0x1a, 0x04, 0x07, 0, 0, 0, 0, 0, 0, 0, 0xaa]);
    }

    #[test]
    fn test_decode_success() {
        let mut buf = BytesMut::new();
        buf.put_i64_le(42);
        buf.put_i32_le(0);
        buf.put_slice(&[1, 2]);

        let resp = Response::decode(buf).unwrap();
        assert_eq!(resp.request_id, 42);
        assert_eq!(resp.status, ResponseStatus::Success(BytesMut::from(&[1u8, 2][..])));
    }

    #[test]
    fn test_decode_failure() {
        let mut buf = BytesMut::new();
        buf.put_i64_le(42);
        buf.put_i32_le(2000);
        buf.put_binary_string(Some("Authentication failed"));

        let resp = Response::decode(buf).unwrap();
        assert_eq!(
            resp.status,
            ResponseStatus::Failure { code: 2000, message: "Authentication failed".to_string() }
        );

        let mut buf = BytesMut::new();
        buf.put_i64_le(1);
        buf.put_i32_le(-1);
        buf.put_binary_string(None);

        let resp = Response::decode(buf).unwrap();
        assert_eq!(resp.status, ResponseStatus::Failure { code: -1, message: String::new() });
    }

    #[test]
    fn test_decode_truncated() {
        let buf = BytesMut::from(&[0x01, 0x00, 0x00][..]);
        assert!(matches!(Response::decode(buf), Err(ProtocolError::InvalidPacket { .. })));
    }
}
