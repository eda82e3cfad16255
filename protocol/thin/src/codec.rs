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

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::{
    err::ProtocolError,
    thin_const::{DEFAULT_MAX_FRAME_LEN, FRAME_HEADER_LEN},
};

/// Anything that can be written as the body of a single frame.
pub trait FrameBody {
    fn write_body(&self, dst: &mut BytesMut);
}

// Pre-encoded body
impl FrameBody for Bytes {
    fn write_body(&self, dst: &mut BytesMut) {
        dst.extend_from_slice(self)
    }
}

/// Splits the stream into `i32` length-prefixed frames. The decoded item is the
/// frame body without its length prefix.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_len: usize,
}

impl FrameCodec {
    // The length prefix is an `i32`, larger limits are clamped to it.
    pub fn new(max_frame_len: usize) -> Self {
        FrameCodec { max_frame_len: max_frame_len.min(i32::MAX as usize) }
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        FrameCodec::new(DEFAULT_MAX_FRAME_LEN)
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_HEADER_LEN {
            return Ok(None);
        }

        let length = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        if length < 0 {
            return Err(ProtocolError::InvalidPacket {
                method: "decode_frame".to_string(),
                data: src[..FRAME_HEADER_LEN].to_vec(),
            });
        }

        let length = length as usize;
        if length > self.max_frame_len {
            return Err(ProtocolError::FrameTooLarge(length, self.max_frame_len));
        }

        if src.len() < FRAME_HEADER_LEN + length {
            src.reserve(FRAME_HEADER_LEN + length - src.len());
            return Ok(None);
        }

        src.advance(FRAME_HEADER_LEN);
        trace!("decode frame, length: {}", length);

        Ok(Some(src.split_to(length)))
    }
}

impl<T: FrameBody> Encoder<T> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let start = dst.len();
        dst.put_i32_le(0);
        item.write_body(dst);

        let length = dst.len() - start - FRAME_HEADER_LEN;
        if length > self.max_frame_len {
            dst.truncate(start);
            return Err(ProtocolError::FrameTooLarge(length, self.max_frame_len));
        }

        dst[start..start + FRAME_HEADER_LEN].copy_from_slice(&(length as i32).to_le_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use bytes::{Bytes, BytesMut};
    use tokio_util::codec::{Decoder, Encoder};

    use super::FrameCodec;
    use crate::err::ProtocolError;

    #[test]
    fn test_decode_partial_frame() {
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::from(&[0x03, 0x00, 0x00][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&[0x00, 0x0a, 0x0b]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 6);

        buf.extend_from_slice(&[0x0c, 0x05]);
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&frame[..], &[0x0a, 0x0b, 0x0c]);
        assert_eq!(&buf[..], &[0x05]);
    }

    #[test]
    fn test_decode_invalid_length() {
        let mut codec = FrameCodec::new(16);

        let mut buf = BytesMut::from(&[0xff, 0xff, 0xff, 0xff][..]);
        assert!(matches!(codec.decode(&mut buf), Err(ProtocolError::InvalidPacket { .. })));

        let mut buf = BytesMut::from(&[0x11, 0x00, 0x00, 0x00][..]);
        assert!(matches!(codec.decode(&mut buf), Err(ProtocolError::FrameTooLarge(17, 16))));
    }

    #[test]
    fn test_max_frame_len_clamped() {
        assert_eq!(FrameCodec::new(usize::MAX).max_frame_len(), i32::MAX as usize);
        assert_eq!(FrameCodec::new(1024).max_frame_len(), 1024);
    }

    #[test]
    fn test_encode_frame() {
        let mut codec = FrameCodec::new(4);
        let mut buf = BytesMut::new();

        codec.encode(Bytes::from_static(&[1, 2, 3]), &mut buf).unwrap();
        assert_eq!(&buf[..], &[0x03, 0x00, 0x00, 0x00, 1, 2, 3]);

        let res = codec.encode(Bytes::from_static(&[1, 2, 3, 4, 5]), &mut buf);
        assert!(matches!(res, Err(ProtocolError::FrameTooLarge(5, 4))));
        assert_eq!(buf.len(), 7);
    }
}
