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

use bytes::{Buf, BufMut, BytesMut};

use crate::{
    err::ProtocolError,
    thin_const::{TYPE_CODE_NULL, TYPE_CODE_STRING},
};

// Checked readers, a truncated body yields `InvalidPacket` instead of a panic.
pub trait BufExt: Buf {
    fn check_remaining(&self, len: usize, method: &str) -> Result<(), ProtocolError> {
        if self.remaining() < len {
            return Err(ProtocolError::InvalidPacket {
                method: method.to_string(),
                data: self.chunk().to_vec(),
            });
        }

        Ok(())
    }

    fn get_u8_checked(&mut self, method: &str) -> Result<u8, ProtocolError> {
        self.check_remaining(1, method)?;
        Ok(self.get_u8())
    }

    fn get_i16_le_checked(&mut self, method: &str) -> Result<i16, ProtocolError> {
        self.check_remaining(2, method)?;
        Ok(self.get_i16_le())
    }

    fn get_i32_le_checked(&mut self, method: &str) -> Result<i32, ProtocolError> {
        self.check_remaining(4, method)?;
        Ok(self.get_i32_le())
    }

    fn get_i64_le_checked(&mut self, method: &str) -> Result<i64, ProtocolError> {
        self.check_remaining(8, method)?;
        Ok(self.get_i64_le())
    }

    /// Reads a binary string, `None` for the null type code.
    fn get_binary_string(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.get_u8_checked("get_binary_string")? {
            TYPE_CODE_NULL => Ok(None),

            TYPE_CODE_STRING => {
                let len = self.get_i32_le_checked("get_binary_string")?;
                if len < 0 {
                    return Err(ProtocolError::InvalidPacket {
                        method: "get_binary_string".to_string(),
                        data: len.to_le_bytes().to_vec(),
                    });
                }

                let len = len as usize;
                self.check_remaining(len, "get_binary_string")?;

                let mut data = vec![0; len];
                self.copy_to_slice(&mut data);
                Ok(Some(String::from_utf8(data)?))
            }

            code => Err(ProtocolError::InvalidTypeCode(code)),
        }
    }
}

impl BufExt for BytesMut {}
impl BufExt for &[u8] {}

pub trait BufMutExt: BufMut {
    fn put_binary_string(&mut self, val: Option<&str>) {
        match val {
            Some(val) => {
                self.put_u8(TYPE_CODE_STRING);
                self.put_i32_le(val.len() as i32);
                self.put_slice(val.as_bytes());
            }
            None => self.put_u8(TYPE_CODE_NULL),
        }
    }
}

impl BufMutExt for BytesMut {}
impl BufMutExt for Vec<u8> {}

/// Cache id used by the server: Java `String.hashCode` of the cache name.
#[inline]
pub fn cache_id(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

#[cfg(test)]
mod test {
    use bytes::BytesMut;

    use super::{cache_id, BufExt, BufMutExt};
    use crate::err::ProtocolError;

    #[test]
    fn test_binary_string() {
        let mut buf = BytesMut::new();
        buf.put_binary_string(Some("User"));
        buf.put_binary_string(None);
        buf.put_binary_string(Some(""));

        assert_eq!(&buf[..5], &[0x09, 0x04, 0x00, 0x00, 0x00]);
        assert_eq!(buf.get_binary_string().unwrap().as_deref(), Some("User"));
        assert_eq!(buf.get_binary_string().unwrap(), None);
        assert_eq!(buf.get_binary_string().unwrap().as_deref(), Some(""));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_binary_string_malformed() {
        let mut data: &[u8] = &[0x03, 0x01];
        assert!(matches!(data.get_binary_string(), Err(ProtocolError::InvalidTypeCode(3))));

        // declared length longer than the remaining bytes
        let mut data: &[u8] = &[0x09, 0x08, 0x00, 0x00, 0x00, 0x41];
        assert!(matches!(data.get_binary_string(), Err(ProtocolError::InvalidPacket { .. })));

        let mut data: &[u8] = &[0x09, 0x02, 0x00, 0x00, 0x00, 0xc3, 0x28];
        assert!(matches!(data.get_binary_string(), Err(ProtocolError::StringDecode(_))));
    }

    #[test]
    fn test_cache_id() {
        assert_eq!(cache_id(""), 0);
        assert_eq!(cache_id("a"), 97);
        assert_eq!(cache_id("ignite"), -1190402166);
        assert_eq!(cache_id("PersonCache"), 1215863053);
        assert_eq!(cache_id("Ünïcødé"), 1055433303);
    }
}
