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

//! Operations on the collection of users.

use crate::db;
use crate::db::query::SelectUsers;
use crate::driver::UsersDriver;
use crate::model::{Pagination, User, UserName};
use log::error;
use roster_core::clocks::Clock;
use roster_core::driver::{DriverError, DriverResult};

/// Message returned to clients when a new record cannot be stored.
const ADD_USER_ERROR: &str = "Error while adding user to db";

impl UsersDriver {
    /// Lists the users in the window described by `page`, most recently created first.
    ///
    /// If `name` is present, only the users whose name matches it exactly are returned.
    pub(crate) async fn list_users(
        self,
        name: Option<String>,
        page: Pagination,
    ) -> DriverResult<Vec<User>> {
        let mut select = SelectUsers::new();
        if let Some(name) = name {
            select = select.with_name(name);
        }
        let select = select.newest_first().paginate(page);

        let mut ex = self.db.ex().await?;
        let users = db::list_users(&mut ex, select).await?;
        Ok(users)
    }

    /// Creates a new user named `name` and returns the stored record.
    pub(crate) async fn create_user(self, name: UserName) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;

        let now = self.clock.now_micros();
        let user = match db::create_user(tx.ex(), name, now).await {
            Ok(user) => user,
            Err(e) => {
                error!("Failed to insert user: {}", e);
                return Err(DriverError::BackendError(ADD_USER_ERROR.to_owned()));
            }
        };

        tx.commit().await?;
        Ok(user)
    }
}
