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

//! Generic code for REST handlers.
//!
//! All services should implement an `app` function in this module that returns the `Router` for the
//! application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! Every JSON response is wrapped in an envelope: successful responses look like
//! `{"result": true, "<key>": <payload>}` and are built with `Envelope`, whereas failed responses
//! look like `{"result": false, "errors": <details>}` and are built by returning a `RestError`.

use crate::driver::DriverError;
use crate::model::ModelError;
use axum::Json;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use log::error;

mod arguments;
pub use arguments::{Arguments, parse_argument};
mod envelope;
pub use envelope::{Envelope, ErrorResponse, Errors};

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
///
/// The shape of the `errors` field in the response depends on the variant: some carry a single
/// message and some carry a list of messages, matching what clients of the service expect for each
/// kind of problem.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates that a request argument could not be parsed.  Reported as a single message.
    #[error("{0}")]
    InvalidArgument(String),

    /// Indicates that the contents of the request failed validation.  Reported as a list of
    /// messages, one per problem.
    #[error("{}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// Indicates that a required request argument was not provided.
    #[error("Missing argument {0}")]
    MissingArgument(String),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::BackendError(msg) => RestError::InternalError(msg),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidInput(vec![e.to_string()])
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        let (status, errors) = match self {
            RestError::InternalError(msg) => {
                error!("Request failed with internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Errors::Many(vec![msg]))
            }
            RestError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, Errors::One(msg)),
            RestError::InvalidInput(msgs) => (StatusCode::BAD_REQUEST, Errors::Many(msgs)),
            RestError::MissingArgument(_) => (StatusCode::BAD_REQUEST, Errors::One(message)),
        };

        let response = ErrorResponse { result: false, errors };

        (status, Json(response)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Extracts the header `name` from `headers` and ensures it has at most one value.
pub fn get_unique_header<'a>(
    headers: &'a HeaderMap,
    name: &HeaderName,
) -> RestResult<Option<&'a HeaderValue>> {
    let mut iter = headers.get_all(name).iter();
    let value = iter.next();
    if iter.next().is_some() {
        return Err(RestError::InvalidArgument(format!(
            "Header {} cannot have more than one value",
            name.as_str()
        )));
    }
    Ok(value)
}

/// Common test code for the REST server.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::extract::Request;
    use axum::http::{self, HeaderName};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Boundary used to separate the parts of multipart payloads.
    const MULTIPART_BOUNDARY: &str = "roster-test-boundary";

    /// Builder for a single request to the API server.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Extends the URI in the request with a `query`.
        pub fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
            let uri = self.builder.uri_ref().unwrap().to_string();
            assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
            assert!(!uri.contains('#'), "URI contains a fragment: {}", uri);
            self.builder = self.builder.uri(format!(
                "{}?{}",
                uri,
                serde_urlencoded::to_string(query).unwrap()
            ));
            self
        }

        /// Sets the header `name` to `value` in the outgoing request.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a form encoded in the
        /// body as the payload.
        pub async fn send_form<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
                .body(axum::body::Body::from(serde_urlencoded::to_string(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a `multipart/form-data` payload that
        /// carries one text part per entry in `fields`.
        pub async fn send_multipart<'a, F>(self, fields: F) -> ResponseChecker
        where
            F: IntoIterator<Item = (&'a str, &'a str)>,
        {
            let mut body = String::new();
            for (name, value) in fields {
                body.push_str(&format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    MULTIPART_BOUNDARY, name, value
                ));
            }
            body.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));

            let request = self
                .builder
                .header(
                    http::header::CONTENT_TYPE,
                    format!("{}; boundary={}", mime::MULTIPART_FORM_DATA, MULTIPART_BOUNDARY),
                )
                .body(axum::body::Body::from(body))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Type alias for the complex type returned by the `oneshot` function.
    type HttpResponse = axum::response::Response;

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: HttpResponse,

        /// Expected HTTP status code in the response above.
        exp_status: http::StatusCode,
    }

    impl From<HttpResponse> for ResponseChecker {
        fn from(response: HttpResponse) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Asserts that the response declares `exp` as its content type.
        fn verify_content_type(&self, exp: &mime::Mime) {
            let content_type = self
                .response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .map(|v| v.to_str().unwrap().to_owned())
                .unwrap_or_default();
            assert!(
                content_type.starts_with(exp.essence_str()),
                "Content type '{}' is not '{}'",
                content_type,
                exp
            );
        }

        /// Consumes the response and returns its body as raw bytes.
        async fn into_body_bytes(self) -> Vec<u8> {
            axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap().to_vec()
        }

        /// Finishes checking the response and returns its body parsed as an error envelope.
        pub async fn take_error_response(self) -> ErrorResponse {
            self.verify();
            self.verify_content_type(&mime::APPLICATION_JSON);

            let body = self.into_body_bytes().await;
            let response: ErrorResponse = match serde_json::from_slice(&body) {
                Ok(response) => response,
                Err(e) => {
                    let body = String::from_utf8(body).unwrap();
                    panic!("Invalid error response due to {}; content was {}", e, body);
                }
            };
            assert!(!response.result, "Error envelope must carry result=false");
            response
        }

        /// Finishes checking the response and expects its body to be an error envelope with at
        /// least one message that matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Error messages are never empty");

            let response = self.take_error_response().await;
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(
                response.errors.messages().iter().any(|m| re.is_match(m)),
                "Response content '{:?}' does not match re '{}'",
                response,
                exp_re
            );
        }

        /// Finishes checking the response and expects it to contain a valid JSON object of
        /// type `T`.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            self.verify();
            self.verify_content_type(&mime::APPLICATION_JSON);

            let body = self.into_body_bytes().await;
            serde_json::from_slice::<T>(&body).unwrap()
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use take_body_as_text to validate empty responses");

            self.verify();

            let body = String::from_utf8(self.into_body_bytes().await).unwrap();
            assert!(
                !body.contains("\"errors\":"),
                "Use expect_error to validate errors wrapped in an ErrorResponse"
            );
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and returns the body of the response as UTF-8.
        pub async fn take_body_as_text(self) -> String {
            self.verify();

            String::from_utf8(self.into_body_bytes().await).unwrap()
        }

        /// Finishes checking the response and returns the response itself for out of band
        /// validation of properties not supported by the `ResponseChecker`.
        pub async fn take_response(self) -> HttpResponse {
            self.verify();

            self.response
        }
    }
}
