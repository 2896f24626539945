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

//! Entry point to the REST server.

use crate::driver::UsersDriver;
use axum::Router;

mod ping_get;
#[cfg(test)]
mod testutils;
mod user_get;
mod users_get;
mod users_post;

/// Creates the router for the application.
pub(crate) fn app(driver: UsersDriver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/users/ping", get(ping_get::handler))
        .route("/users/:user_id", get(user_get::handler))
        .route("/users", get(users_get::handler).post(users_post::handler))
        .with_state(driver)
}
