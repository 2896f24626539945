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

//! Test utilities for the REST API.

use crate::driver;
use crate::model::User;
use crate::rest::app;
use axum::Router;
use serde::Deserialize;

/// Successful response of the API that lists users.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    /// Always true for successful responses.
    pub(crate) result: bool,

    /// The users returned by the API.
    pub(crate) users: Vec<User>,
}

/// Successful response of the API that creates a user.
#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    /// Always true for successful responses.
    pub(crate) result: bool,

    /// The newly-created user.
    pub(crate) user: User,
}

/// Successful response of the API that fetches a user by its identifier.
#[derive(Debug, Deserialize)]
pub(crate) struct UserByIdResponse {
    /// Always true for successful responses.
    pub(crate) result: bool,

    /// The matching users, which are either none or one.
    #[serde(rename = "userById")]
    pub(crate) user_by_id: Vec<User>,
}

/// State of a running test.
pub(crate) struct TestContext {
    /// Context of the business layer, which owns the database and the clock.
    inner: driver::testutils::TestContext,

    /// The router for the app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let inner = driver::testutils::TestContext::setup().await;
        let app = app(inner.driver());
        Self { inner, app }
    }

    /// Gets a copy of the router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Returns the current time of the clock in microseconds.
    pub(crate) fn now_micros(&self) -> i64 {
        self.inner.now_micros()
    }

    /// Creates a user named `name` directly in the database.  Users created later sort first.
    pub(crate) async fn create_user(&self, name: &'static str) -> User {
        self.inner.create_user(name).await
    }

    /// Drops the users table so that subsequent operations fail.
    pub(crate) async fn break_db(&self) {
        self.inner.break_db().await
    }
}
