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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::UsersDriver;
use crate::model::{User, UserName};
use roster_core::clocks::Clock;
use roster_core::clocks::testutils::SettableClock;
use roster_core::db::{Db, Executor};
use std::sync::Arc;
use std::time::Duration;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock backing the driver, which tests can adjust.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: UsersDriver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(roster_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2023-12-01 05:50:20.290 UTC)));
        let driver = UsersDriver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver.
    pub(crate) fn driver(&self) -> UsersDriver {
        self.driver.clone()
    }

    /// Advances the clock by one second so that the next record sorts after the previous ones.
    pub(crate) fn tick(&self) {
        self.clock.advance(Duration::from_secs(1));
    }

    /// Returns the current time of the clock in microseconds.
    pub(crate) fn now_micros(&self) -> i64 {
        self.clock.now_micros()
    }

    /// Creates a user named `name` directly in the database and advances the clock.
    pub(crate) async fn create_user(&self, name: &'static str) -> User {
        let user = db::create_user(&mut self.ex().await, UserName::from(name), self.now_micros())
            .await
            .unwrap();
        self.tick();
        user
    }

    /// Drops the users table so that subsequent operations fail.
    pub(crate) async fn break_db(&self) {
        let Executor::Sqlite(mut ex) = self.ex().await;
        sqlx::query("DROP TABLE users").execute(ex.conn()).await.unwrap();
    }
}
