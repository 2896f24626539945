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

//! Builder for parameterized `SELECT` statements over the `users` table.
//!
//! Column names come from a fixed set known at compile time.  Values supplied by clients are only
//! ever returned as positional arguments to bind, so they never end up in the statement text.

use crate::model::{Pagination, UserId};

/// A value to bind to a placeholder of a built statement.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum QueryArg {
    /// An integer value.
    Int(i64),

    /// A text value.
    Text(String),
}

/// Builder for a query that lists users.
///
/// The pieces can be added in any order: `build` always emits them in the order SQL requires.
#[derive(Debug, Default)]
pub(crate) struct SelectUsers {
    /// Equality filters joined with `AND`, as column name and value pairs.
    filters: Vec<(&'static str, QueryArg)>,

    /// Whether to sort the results by descending creation time.
    newest_first: bool,

    /// Window of results to return, if any.
    page: Option<Pagination>,
}

impl SelectUsers {
    /// Starts a query that matches all users.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Restricts the results to users whose name is exactly `name`.
    pub(crate) fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.filters.push(("name", QueryArg::Text(name.into())));
        self
    }

    /// Restricts the results to the user identified by `id`.
    pub(crate) fn with_id(mut self, id: UserId) -> Self {
        self.filters.push(("id", QueryArg::Int(id.as_i64())));
        self
    }

    /// Sorts the results so that the most recently created users come first.
    pub(crate) fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Returns only the window of results described by `page`.
    pub(crate) fn paginate(mut self, page: Pagination) -> Self {
        self.page = Some(page);
        self
    }

    /// Assembles the statement text and the arguments to bind to its placeholders, in order.
    pub(crate) fn build(self) -> (String, Vec<QueryArg>) {
        let mut query_str = "SELECT * FROM users".to_owned();
        let mut args = Vec::with_capacity(self.filters.len() + 2);

        for (i, (column, value)) in self.filters.into_iter().enumerate() {
            query_str.push_str(if i == 0 { " WHERE " } else { " AND " });
            query_str.push_str(column);
            query_str.push_str(" = ?");
            args.push(value);
        }

        if self.newest_first {
            query_str.push_str(" ORDER BY created_at DESC");
        }

        if let Some(page) = self.page {
            query_str.push_str(" LIMIT ? OFFSET ?");
            args.push(QueryArg::Int(page.limit()));
            args.push(QueryArg::Int(page.offset()));
        }

        (query_str, args)
    }
}
