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

//! Database abstraction to store and retrieve user records.

use crate::model::{User, UserId, UserName};
use futures::TryStreamExt;
use roster_core::db::sqlite::{self, map_sqlx_error};
use roster_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub(crate) mod query;
use query::{QueryArg, SelectUsers};


/// Initializes the database schema.
///
/// This is idempotent: running it against an already-initialized database keeps existing data.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,
    }
}

impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(map_sqlx_error)?;
        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let updated_at: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

        Ok(User::new(UserId::new(id), UserName::new(name)?, created_at, updated_at))
    }
}

/// Creates a new user named `name` with both timestamps set to `now_us`.
pub(crate) async fn create_user(ex: &mut Executor, name: UserName, now_us: i64) -> DbResult<User> {
    let (rows_affected, last_id) = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO users (name, created_at, updated_at) VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(name.as_str())
                .bind(now_us)
                .bind(now_us)
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            (done.rows_affected(), done.last_insert_rowid())
        }
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError(format!(
            "Insertion affected {} rows instead of one",
            rows_affected
        )));
    }
    if last_id <= 0 {
        return Err(DbError::BackendError("Insertion did not report a row id".to_owned()));
    }
    Ok(User::new(UserId::new(last_id), name, now_us, now_us))
}

/// Runs the `select` query and returns all matching users in the order the query defines.
pub(crate) async fn list_users(ex: &mut Executor, select: SelectUsers) -> DbResult<Vec<User>> {
    let (query_str, args) = select.build();

    match ex {
        Executor::Sqlite(ex) => {
            let mut query = sqlx::query(&query_str);
            for arg in args {
                query = match arg {
                    QueryArg::Int(i) => query.bind(i),
                    QueryArg::Text(s) => query.bind(s),
                };
            }

            let mut users = vec![];
            let mut rows = query.fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
                users.push(User::try_from(row)?);
            }
            Ok(users)
        }
    }
}

/// Gets the users identified by `id`, which is either an empty list or a list with one user.
pub(crate) async fn get_users_by_id(ex: &mut Executor, id: UserId) -> DbResult<Vec<User>> {
    list_users(ex, SelectUsers::new().with_id(id)).await
}
