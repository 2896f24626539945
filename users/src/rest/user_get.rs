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

//! API to fetch a single user by its identifier.

use crate::driver::UsersDriver;
use crate::model::UserId;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use roster_core::rest::{Envelope, RestError, parse_argument};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<UsersDriver>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, RestError> {
    let user_id = UserId::new(parse_argument("user_id", &user_id)?);

    let users = driver.get_users_by_id(user_id).await?;
    Ok(Envelope::new("userById", users))
}
