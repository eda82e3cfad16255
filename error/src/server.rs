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

use thiserror::Error as ThisError;

/// The server failed to process a client request.
///
/// Carries the server's status code and message as-is. The description is
/// rendered once, at construction, and never changes afterwards.
#[derive(Debug, Clone, ThisError)]
#[error("{description}")]
pub struct ServerError {
    code: i32,
    message: String,
    request_id: i64,
    description: String,
}

impl ServerError {
    pub fn new(server_message: impl Into<String>, server_code: i32, request_id: i64) -> ServerError {
        let message = server_message.into();
        let description = format!(
            "Ignite failed to process request [{}]: {} (server status code [{}])",
            request_id, message, server_code
        );

        ServerError { code: server_code, message, request_id, description }
    }

    /// Server error code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Server error message, without the request id and code.
    pub fn server_error_message(&self) -> &str {
        &self.message
    }

    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
