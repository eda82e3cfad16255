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

use std::{fmt, str::FromStr};

use crate::err::ProtocolError;

/// Version negotiated during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: i16,
    pub minor: i16,
    pub patch: i16,
}

impl ProtocolVersion {
    pub const V1_0_0: ProtocolVersion = ProtocolVersion::new(1, 0, 0);
    pub const V1_1_0: ProtocolVersion = ProtocolVersion::new(1, 1, 0);
    pub const V1_2_0: ProtocolVersion = ProtocolVersion::new(1, 2, 0);
    pub const V1_3_0: ProtocolVersion = ProtocolVersion::new(1, 3, 0);

    pub const DEFAULT: ProtocolVersion = ProtocolVersion::V1_2_0;

    pub const fn new(major: i16, minor: i16, patch: i16) -> ProtocolVersion {
        ProtocolVersion { major, minor, patch }
    }

    // Versions whose response header is `request id + i32 status`.
    pub fn is_supported(&self) -> bool {
        *self >= Self::V1_0_0 && *self <= Self::V1_3_0
    }

    pub fn supports_auth(&self) -> bool {
        *self >= Self::V1_1_0
    }

    pub fn check_supported(self) -> Result<ProtocolVersion, ProtocolError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(ProtocolError::UnsupportedVersion(self))
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ProtocolVersion {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|part| part.parse::<i16>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ProtocolError::InvalidVersion(s.to_string()))?;

        match parts[..] {
            [major, minor, patch] => Ok(ProtocolVersion::new(major, minor, patch)),
            _ => Err(ProtocolError::InvalidVersion(s.to_string())),
        }
    }
}
