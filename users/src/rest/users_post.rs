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

//! API to create a new user.

use crate::driver::UsersDriver;
use crate::model::UserName;
use axum::extract::State;
use axum::response::IntoResponse;
use log::warn;
use roster_core::rest::{Arguments, Envelope, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<UsersDriver>,
    args: Arguments,
) -> Result<impl IntoResponse, RestError> {
    let name = args.get_required("name")?;
    let name = UserName::new(name).map_err(|e| {
        warn!("Rejecting user name '{}': {}", name, e);
        RestError::from(e)
    })?;

    let user = driver.create_user(name).await?;
    Ok(Envelope::new("user", user))
}
