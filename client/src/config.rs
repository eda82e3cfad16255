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

use std::{fs, str::FromStr, time::Duration};

use ignite_error::ClientError;
use serde::{Deserialize, Serialize};
use thin_protocol::{
    thin_const::{DEFAULT_MAX_FRAME_LEN, DEFAULT_PORT},
    version::ProtocolVersion,
};
use tracing::{trace, Level};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_LOG_LEVEL: &str = "INFO";
// Smallest frame able to carry a response header.
const MIN_FRAME_LEN: usize = 16;
// Frame and string lengths are written as `i32`.
const MAX_FRAME_LEN: usize = i32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub protocol_version: String,
    pub timeout_ms: u64,
    pub max_frame_len: usize,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: format!("127.0.0.1:{}", DEFAULT_PORT),
            user: None,
            password: None,
            protocol_version: ProtocolVersion::DEFAULT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml(s: &str) -> Result<ClientConfig, ClientError> {
        let config = Self::parse_toml(s)?;
        config.validate()?;
        Ok(config)
    }

    // Parses without validating, overrides may still be applied.
    fn parse_toml(s: &str) -> Result<ClientConfig, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn version(&self) -> Result<ProtocolVersion, ClientError> {
        let version = self.protocol_version.parse::<ProtocolVersion>()?.check_supported()?;
        Ok(version)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.version()?;

        if self.endpoint.is_empty() {
            return Err(ClientError::Config("endpoint must not be empty".to_string()));
        }

        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be greater than 0".to_string()));
        }

        if self.max_frame_len < MIN_FRAME_LEN || self.max_frame_len > MAX_FRAME_LEN {
            return Err(ClientError::Config(format!(
                "max_frame_len must be between {} and {}, got {}",
                MIN_FRAME_LEN, MAX_FRAME_LEN, self.max_frame_len
            )));
        }

        if Level::from_str(&self.log_level).is_err() {
            return Err(ClientError::Config(format!("invalid log_level {:?}", self.log_level)));
        }

        Ok(())
    }
}

/// Loads `ClientConfig` from a toml file, or the defaults when no file is
/// given, then applies the command line overrides.
#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    pub _config_path: Option<String>,
    pub _endpoint: Option<String>,
    pub _log_level: Option<String>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        ClientConfigBuilder::default()
    }

    pub fn with_config_path(mut self, path: Option<&str>) -> Self {
        self._config_path = path.map(ToString::to_string);
        self
    }

    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        self._endpoint = endpoint.map(ToString::to_string);
        self
    }

    pub fn with_log_level(mut self, level: Option<&str>) -> Self {
        self._log_level = level.map(ToString::to_string);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let mut config = match &self._config_path {
            Some(path) => {
                trace!("load config from {}", path);
                ClientConfig::parse_toml(&fs::read_to_string(path)?)?
            }
            None => ClientConfig::default(),
        };

        if let Some(endpoint) = self._endpoint {
            config.endpoint = endpoint;
        }

        if let Some(level) = self._log_level {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }
}
