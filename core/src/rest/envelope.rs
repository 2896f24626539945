// Roster
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The JSON envelope that wraps every API response.

use axum::Json;
use axum::response::IntoResponse;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A successful response of the form `{"result": true, "<key>": <payload>}`.
#[derive(Debug)]
pub struct Envelope<T> {
    /// Name of the field that holds the payload.
    key: &'static str,

    /// The payload to return to the client.
    payload: T,
}

impl<T> Envelope<T> {
    /// Wraps `payload` under the field `key`.
    pub fn new(key: &'static str, payload: T) -> Self {
        assert_ne!("result", key, "The result field is reserved");
        Self { key, payload }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("result", &true)?;
        map.serialize_entry(self.key, &self.payload)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Contents of the `errors` field of a failed response.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Errors {
    /// A single message, serialized as a plain string.
    One(String),

    /// Zero or more messages, serialized as a list of strings.
    Many(Vec<String>),
}

impl Errors {
    /// Returns all messages regardless of the representation.
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Errors::One(msg) => vec![msg.as_str()],
            Errors::Many(msgs) => msgs.iter().map(String::as_str).collect(),
        }
    }
}

/// A failed response of the form `{"result": false, "errors": <details>}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Always false for failed responses.
    pub result: bool,

    /// Details about the problems that caused the request to fail.
    pub errors: Errors,
}
