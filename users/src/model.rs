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

//! High-level data types.

use derive_getters::Getters;
use roster_core::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Page number used when the client does not request one.
pub(crate) const DEFAULT_PAGE_NUM: i64 = 1;

/// Page size used when the client does not request one.
pub(crate) const DEFAULT_PAGE_SIZE: i64 = 10;

/// Identifier of a user, as assigned by the database at creation time.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct UserId(i64);

impl UserId {
    /// Creates a new identifier from its raw value.
    pub(crate) fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw value of the identifier.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Represents a correctly-formatted user name.
///
/// Names must be non-empty and can only contain ASCII letters, spaces, hyphens and apostrophes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct UserName(String);

impl UserName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        let valid = !s.is_empty() && s.chars().all(|ch| ch.is_ascii_alphabetic() || " -'".contains(ch));
        if !valid {
            return Err(ModelError("invalid name sequence".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&'static str> for UserName {
    /// Creates a new name from a hardcoded string, which must be valid.
    fn from(name: &'static str) -> Self {
        UserName::new(name).expect("Hardcoded names must be valid")
    }
}

/// A deserialization visitor for a `UserName`.
struct UserNameVisitor;

impl Visitor<'_> for UserNameVisitor {
    type Value = UserName;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        UserName::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        UserName::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for UserName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(UserNameVisitor)
    }
}

/// A user record.
///
/// Timestamps are expressed in microseconds since the Unix epoch.  There is no way to modify a
/// user after creation, so `updated_at` always matches `created_at` for records created by this
/// service.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct User {
    /// Identifier of the user.
    #[getter(copy)]
    id: UserId,

    /// Name of the user.
    name: UserName,

    /// Creation time of the record.
    #[getter(copy)]
    created_at: i64,

    /// Last modification time of the record.
    #[getter(copy)]
    updated_at: i64,
}

impl User {
    /// Creates a new user record from its parts.
    pub(crate) fn new(id: UserId, name: UserName, created_at: i64, updated_at: i64) -> Self {
        Self { id, name, created_at, updated_at }
    }
}

/// Selection of a window of results in a listing.
///
/// The values are not range-checked: a zero or negative page number or page size results in a
/// window that the database interprets as it sees fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Pagination {
    /// Maximum number of results to return.
    limit: i64,

    /// Number of results to skip.
    offset: i64,
}

impl Pagination {
    /// Computes the window for the 1-based page `page_num` with `page_size` results per page.
    pub(crate) fn new(page_num: i64, page_size: i64) -> ModelResult<Self> {
        let offset = page_num
            .checked_sub(1)
            .and_then(|n| n.checked_mul(page_size))
            .ok_or_else(|| ModelError("invalid page_num".to_owned()))?;
        Ok(Self { limit: page_size, offset })
    }

    /// Returns the maximum number of results to return.
    pub(crate) fn limit(&self) -> i64 {
        self.limit
    }

    /// Returns the number of results to skip.
    pub(crate) fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: DEFAULT_PAGE_SIZE, offset: (DEFAULT_PAGE_NUM - 1) * DEFAULT_PAGE_SIZE }
    }
}
