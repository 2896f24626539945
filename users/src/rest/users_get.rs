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

//! API to list users, optionally filtered by name.

use crate::driver::UsersDriver;
use crate::model::{DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE, Pagination};
use axum::extract::State;
use axum::response::IntoResponse;
use log::warn;
use roster_core::rest::{Arguments, Envelope, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<UsersDriver>,
    args: Arguments,
) -> Result<impl IntoResponse, RestError> {
    let page_num = args.get_parsed_or("page_num", DEFAULT_PAGE_NUM)?;
    let page_size = args.get_parsed_or("page_size", DEFAULT_PAGE_SIZE)?;
    let page = Pagination::new(page_num, page_size).map_err(|e| {
        warn!("Cannot compute page {} of size {}: {}", page_num, page_size, e);
        RestError::InvalidArgument(e.to_string())
    })?;
    let name = args.get("name").map(str::to_owned);

    let users = driver.list_users(name, page).await?;
    Ok(Envelope::new("users", users))
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use axum::http;
    use roster_core::rest::Errors;
    use roster_core::rest::testutils::*;

    fn route() -> (http::Method, &'static str) {
        (http::Method::GET, "/users")
    }

    /// Extracts the names of the users in `response`, preserving their order.
    fn names(response: &UsersResponse) -> Vec<&str> {
        response.users.iter().map(|u| u.name().as_str()).collect()
    }

    /// Creates one user per name in `names`, in order, so that the last one is the newest.
    async fn create_users(context: &TestContext, names: &[&'static str]) {
        for name in names {
            context.create_user(*name).await;
        }
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let body = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        assert_eq!(r#"{"result":true,"users":[]}"#, body);
    }

    #[tokio::test]
    async fn test_default_page() {
        let context = TestContext::setup().await;
        create_users(&context, &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"])
            .await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert!(response.result);
        assert_eq!(vec!["L", "K", "J", "I", "H", "G", "F", "E", "D", "C"], names(&response));
    }

    #[tokio::test]
    async fn test_explicit_page() {
        let context = TestContext::setup().await;
        create_users(&context, &["A", "B", "C", "D", "E", "F", "G"]).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_num", "2"), ("page_size", "3")])
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert_eq!(vec!["D", "C", "B"], names(&response));
    }

    #[tokio::test]
    async fn test_page_past_the_end() {
        let context = TestContext::setup().await;
        create_users(&context, &["A", "B"]).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_num", "5")])
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert!(response.result);
        assert!(response.users.is_empty());
    }

    #[tokio::test]
    async fn test_zero_page_size() {
        let context = TestContext::setup().await;
        create_users(&context, &["A", "B"]).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_size", "0")])
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert!(response.users.is_empty());
    }

    #[tokio::test]
    async fn test_filter_by_name() {
        let context = TestContext::setup().await;
        let jane1 = context.create_user("Jane Doe").await;
        context.create_user("John Doe").await;
        let jane2 = context.create_user("Jane Doe").await;
        context.create_user("jane doe").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("name", "Jane Doe")])
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert_eq!(vec![jane2, jane1], response.users);
    }

    #[tokio::test]
    async fn test_filter_by_name_trims_value() {
        let context = TestContext::setup().await;
        context.create_user("Jane").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("name", "  Jane ")])
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert_eq!(vec!["Jane"], names(&response));
    }

    #[tokio::test]
    async fn test_filter_by_name_is_not_sql() {
        let context = TestContext::setup().await;
        context.create_user("Jane").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("name", "x' OR '1'='1")])
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert!(response.users.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_reads_are_stable() {
        let context = TestContext::setup().await;
        create_users(&context, &["A", "B", "C"]).await;

        let mut bodies = vec![];
        for _ in 0..2 {
            let body = OneShotBuilder::new(context.app(), route())
                .with_query([("page_size", "2")])
                .send_empty()
                .await
                .take_body_as_text()
                .await;
            bodies.push(body);
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn test_invalid_page_num() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_num", "abc")])
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .take_error_response()
            .await;
        assert_eq!(Errors::One("invalid page_num".to_owned()), response.errors);
    }

    #[tokio::test]
    async fn test_invalid_page_size() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_size", "1.5")])
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .take_error_response()
            .await;
        assert_eq!(Errors::One("invalid page_size".to_owned()), response.errors);
    }

    #[tokio::test]
    async fn test_page_num_reported_first() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_size", "x"), ("page_num", "y")])
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^invalid page_num$")
            .await;
    }

    #[tokio::test]
    async fn test_page_num_overflow() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .with_query([("page_num", i64::MAX.to_string()), ("page_size", "10".to_owned())])
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^invalid page_num$")
            .await;
    }

    #[tokio::test]
    async fn test_page_values_outside_i64() {
        let context = TestContext::setup().await;

        let cases = [("page_num", "9223372036854775808"), ("page_size", "-9223372036854775809")];
        for (name, value) in cases {
            OneShotBuilder::new(context.app(), route())
                .with_query([(name, value)])
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error(&format!("^invalid {}$", name))
                .await;
        }
    }

    #[tokio::test]
    async fn test_page_values_with_underscores() {
        let context = TestContext::setup().await;

        for name in ["page_num", "page_size"] {
            OneShotBuilder::new(context.app(), route())
                .with_query([(name, "1_000")])
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error(&format!("^invalid {}$", name))
                .await;
        }
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let context = TestContext::setup().await;
        context.break_db().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("no such table")
            .await;
    }
}
