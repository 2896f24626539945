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

//! Operations on a single user.

use crate::db;
use crate::driver::UsersDriver;
use crate::model::{User, UserId};
use roster_core::driver::DriverResult;

impl UsersDriver {
    /// Gets the users identified by `id`.
    ///
    /// A missing user is not an error: the result is simply empty.
    pub(crate) async fn get_users_by_id(self, id: UserId) -> DriverResult<Vec<User>> {
        let mut ex = self.db.ex().await?;
        let users = db::get_users_by_id(&mut ex, id).await?;
        Ok(users)
    }
}
