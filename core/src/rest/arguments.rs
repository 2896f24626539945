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

//! Extraction of loosely-typed request arguments.

use crate::rest::{RestError, RestResult, get_unique_header};
use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use log::warn;
use std::str::FromStr;

/// Request arguments gathered from the query string and, for form submissions, from the body.
///
/// Both URL-encoded and multipart forms are understood.  Only the text fields of a multipart form
/// are considered.
///
/// Arguments from the body come after those from the query string.  When an argument appears more
/// than once, the last occurrence wins.  Values are returned with surrounding whitespace removed.
#[derive(Debug, Default)]
pub struct Arguments(Vec<(String, String)>);

impl Arguments {
    /// Gets the value of the argument `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().rev().find(|(key, _)| key == name).map(|(_, value)| value.trim())
    }

    /// Gets the value of the argument `name`, failing the request if it is not present.
    pub fn get_required(&self, name: &str) -> RestResult<&str> {
        self.get(name).ok_or_else(|| {
            warn!("Request lacks required argument {}", name);
            RestError::MissingArgument(name.to_owned())
        })
    }

    /// Gets the value of the argument `name` parsed as a `T`, or `default` if not present.
    pub fn get_parsed_or<T: FromStr>(&self, name: &str, default: T) -> RestResult<T> {
        match self.get(name) {
            Some(raw) => parse_argument(name, raw),
            None => Ok(default),
        }
    }
}

/// Parses the `raw` value of the argument `name` as a `T`.
///
/// Surrounding whitespace is ignored.  Failures are reported as `invalid <name>`.
pub fn parse_argument<T: FromStr>(name: &str, raw: &str) -> RestResult<T> {
    raw.trim().parse::<T>().map_err(|_| {
        warn!("Error while parsing {}: {}", name, raw);
        RestError::InvalidArgument(format!("invalid {}", name))
    })
}

/// Parses a URL-encoded sequence of `key=value` pairs that came from `what`.
fn parse_urlencoded(raw: &[u8], what: &str) -> RestResult<Vec<(String, String)>> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(raw)
        .map_err(|e| RestError::InvalidArgument(format!("Invalid {}: {}", what, e)))
}

/// Encodings of a form carried in the body of a request.
#[derive(Debug, PartialEq)]
enum FormKind {
    /// `application/x-www-form-urlencoded` body.
    UrlEncoded,

    /// `multipart/form-data` body.
    Multipart,
}

/// Determines which kind of form, if any, the request described by `headers` carries in its body.
fn form_kind(headers: &HeaderMap) -> RestResult<Option<FormKind>> {
    let Some(value) = get_unique_header(headers, &CONTENT_TYPE)? else {
        return Ok(None);
    };
    let Some(content_type) = value.to_str().ok().and_then(|v| v.parse::<mime::Mime>().ok()) else {
        return Ok(None);
    };

    let essence = content_type.essence_str();
    if essence == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        Ok(Some(FormKind::UrlEncoded))
    } else if essence == mime::MULTIPART_FORM_DATA.essence_str() {
        Ok(Some(FormKind::Multipart))
    } else {
        Ok(None)
    }
}

/// Reads the text fields of a `multipart` body.  Parts that carry a file name are skipped.
async fn read_multipart(mut multipart: Multipart) -> RestResult<Vec<(String, String)>> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        RestError::InvalidArgument(format!("Invalid multipart body: {}", e))
    };

    let mut args = vec![];
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(invalid)?;
        args.push((name, value));
    }
    Ok(args)
}

#[async_trait]
impl<S> FromRequest<S> for Arguments
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut args = match req.uri().query() {
            Some(query) => parse_urlencoded(query.as_bytes(), "query string")?,
            None => vec![],
        };

        match form_kind(req.headers())? {
            Some(FormKind::UrlEncoded) => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| RestError::InvalidArgument(e.body_text()))?;
                args.extend(parse_urlencoded(&body, "form body")?);
            }
            Some(FormKind::Multipart) => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| RestError::InvalidArgument(e.body_text()))?;
                args.extend(read_multipart(multipart).await?);
            }
            None => (),
        }

        Ok(Arguments(args))
    }
}
