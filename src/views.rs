/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! HTML views

use actix_web::{HttpResponse, error};
use askama::Template;
use log::error;

use crate::{db::{comments::Comment, threads::Thread}, tags::TagCount};

/// Popular threads and trending tags shown beside every listing.
pub struct Sidebar {
    pub popular: Vec<Thread>,
    pub trending: Vec<TagCount>,
}

/// Home page, tag filter and search results all share this view. `kind` is one of
/// `"home"`, `"tag"` or `"search"` and decides how pagination links are built from
/// `term`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub heading: String,
    pub kind: &'a str,
    pub term: &'a str,
    pub threads: &'a [Thread],
    pub page: i64,
    pub total_pages: i64,
    pub sidebar: &'a Sidebar,
}

#[derive(Template)]
#[template(path = "new_thread.html")]
pub struct NewThreadTemplate {
    pub max_words: usize,
}

#[derive(Template)]
#[template(path = "thread.html")]
pub struct ThreadTemplate<'a> {
    pub thread: &'a Thread,
    pub comments: &'a [Comment],
    pub max_words: usize,
}

pub fn render<T: Template>(template: &T) -> actix_web::Result<HttpResponse> {
    let html = template.render().map_err(|e| {
        error!("template error: {}", e);
        error::ErrorInternalServerError("INTERNAL_SERVER_ERROR")
    })?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}
