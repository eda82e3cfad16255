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
use ignite_error::ClientError;
use thin_protocol::{
    err::ProtocolError,
    thin_const::*,
    util::{cache_id, BufExt, BufMutExt},
};
use tracing::debug;

use crate::conn::ClientConn;

fn name_payload(name: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(5 + name.len());
    buf.put_binary_string(Some(name));
    buf.freeze()
}

/// Cache management operations.
impl ClientConn {
    pub async fn cache_names(&mut self) -> Result<Vec<String>, ClientError> {
        let mut payload = self.request(OP_CACHE_GET_NAMES, Bytes::new()).await?;

        let count = payload.get_i32_le_checked("cache_names")?;
        if count < 0 {
            return Err(ProtocolError::InvalidPacket {
                method: "cache_names".to_string(),
                data: count.to_le_bytes().to_vec(),
            }
            .into());
        }

        // Every element takes at least one byte, the count alone is not trusted.
        let count = count as usize;
        let mut names = Vec::with_capacity(count.min(payload.remaining()));
        for _ in 0..count {
            names.push(payload.get_binary_string()?.unwrap_or_default());
        }

        Ok(names)
    }

    /// Fails with a server error when the cache already exists.
    pub async fn create_cache(&mut self, name: &str) -> Result<(), ClientError> {
        self.request(OP_CACHE_CREATE_WITH_NAME, name_payload(name)).await?;
        debug!("created cache {}", name);
        Ok(())
    }

    pub async fn get_or_create_cache(&mut self, name: &str) -> Result<(), ClientError> {
        self.request(OP_CACHE_GET_OR_CREATE_WITH_NAME, name_payload(name)).await?;
        Ok(())
    }

    pub async fn destroy_cache(&mut self, name: &str) -> Result<(), ClientError> {
        let mut buf = BytesMut::with_capacity(4);
        buf.put_i32_le(cache_id(name));

        self.request(OP_CACHE_DESTROY, buf.freeze()).await?;
        debug!("destroyed cache {}", name);
        Ok(())
    }
}
