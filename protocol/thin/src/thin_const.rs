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

pub const FRAME_HEADER_LEN: usize = 4;
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024 * 1024;
pub const DEFAULT_PORT: u16 = 10800;

pub const HANDSHAKE_CODE: u8 = 1;
pub const THIN_CLIENT_CODE: u8 = 2;
pub const HANDSHAKE_SUCCESS: u8 = 1;
// Reported when a rejected handshake carries no explicit code.
pub const HANDSHAKE_DEFAULT_ERR_CODE: i32 = 1;

pub const STATUS_SUCCESS: i32 = 0;

pub const TYPE_CODE_STRING: u8 = 9;
pub const TYPE_CODE_NULL: u8 = 101;

pub const OP_CACHE_GET_NAMES: i16 = 1050;
pub const OP_CACHE_CREATE_WITH_NAME: i16 = 1051;
pub const OP_CACHE_GET_OR_CREATE_WITH_NAME: i16 = 1052;
pub const OP_CACHE_DESTROY: i16 = 1056;
