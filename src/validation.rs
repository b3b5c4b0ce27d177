/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Input checks for submitted threads, comments and listing parameters

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use percent_encoding::percent_decode_str;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Title is required.")]
    MissingTitle,
    #[error("Content is required.")]
    MissingContent,
    #[error("Thread too long! Max {0} words.")]
    ThreadTooLong(usize),
    #[error("Comment too long! Max {0} words.")]
    CommentTooLong(usize),
    #[error("malformed page parameter")]
    InvalidPage,
    #[error("malformed tag")]
    InvalidTag,
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest()
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

pub fn count_words(text: &str) -> usize {
    text.trim().split_whitespace().count()
}

pub fn check_thread(title: &str, content: &str, max_words: usize) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if content.trim().is_empty() {
        return Err(ValidationError::MissingContent);
    }
    if count_words(content) > max_words {
        return Err(ValidationError::ThreadTooLong(max_words));
    }
    Ok(())
}

pub fn check_comment(content: &str, max_words: usize) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::MissingContent);
    }
    if count_words(content) > max_words {
        return Err(ValidationError::CommentTooLong(max_words));
    }
    Ok(())
}

/// Decodes a `{tag}` path segment. The router leaves `%2B`, `%2F` and `%25`
/// encoded, so tag links built with `urlencode_strict` are decoded here.
pub fn decode_tag(segment: &str) -> Result<String, ValidationError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|tag| tag.into_owned())
        .map_err(|_| ValidationError::InvalidTag)
}
