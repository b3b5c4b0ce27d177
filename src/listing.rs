/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Thread listings: home page, tag filter and search

use actix_web::{HttpResponse, get, web};
use log::debug;
use serde::Deserialize;

use crate::{
    db::{DbError, Pool, threads::{self, ThreadFilter}},
    pagination::{offset, parse_page, total_pages},
    settings::Settings,
    tags::trending_tags,
    validation::decode_tag,
    views::{IndexTemplate, Sidebar, render},
};

#[derive(Deserialize)]
struct PageQuery {
    page: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    page: Option<String>,
}

pub async fn load_sidebar(pool: &Pool, settings: &Settings) -> Result<Sidebar, DbError> {
    let popular = threads::get_popular_threads(pool, settings.popular_limit).await?;
    let tags = threads::get_all_tags(pool).await?;
    Ok(Sidebar {
        popular,
        trending: trending_tags(&tags, settings.trending_limit),
    })
}

async fn render_listing(
    pool: &Pool,
    settings: &Settings,
    filter: ThreadFilter,
    page: i64,
    heading: String,
) -> actix_web::Result<HttpResponse> {
    let total = threads::count_threads(pool, &filter).await?;
    let listed = threads::list_threads(pool, &filter, settings.page_size, offset(page, settings.page_size)).await?;
    let sidebar = load_sidebar(pool, settings).await?;
    let (kind, term) = match &filter {
        ThreadFilter::All => ("home", ""),
        ThreadFilter::Tag(tag) => ("tag", tag.as_str()),
        ThreadFilter::Search(query) => ("search", query.as_str()),
    };
    render(&IndexTemplate {
        heading,
        kind,
        term,
        threads: &listed,
        page,
        total_pages: total_pages(total, settings.page_size),
        sidebar: &sidebar,
    })
}

#[get("/")]
async fn index(
    query: web::Query<PageQuery>,
    pool: web::Data<Pool>,
    settings: web::Data<Settings>,
) -> actix_web::Result<HttpResponse> {
    let page = parse_page(query.page.as_deref())?;
    render_listing(&pool, &settings, ThreadFilter::All, page, "Latest threads".to_owned()).await
}

#[get("/tag/{tag}")]
async fn tag_filter(
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    pool: web::Data<Pool>,
    settings: web::Data<Settings>,
) -> actix_web::Result<HttpResponse> {
    let page = parse_page(query.page.as_deref())?;
    let tag = decode_tag(&path.into_inner())?;
    debug!("threads tagged '{}' requested, page {}", tag, page);
    let heading = format!("Threads tagged \"{}\"", tag);
    render_listing(&pool, &settings, ThreadFilter::Tag(tag), page, heading).await
}

#[get("/search")]
async fn search(
    query: web::Query<SearchQuery>,
    pool: web::Data<Pool>,
    settings: web::Data<Settings>,
) -> actix_web::Result<HttpResponse> {
    let page = parse_page(query.page.as_deref())?;
    let q = query.q.as_deref().unwrap_or("").trim().to_owned();
    debug!("search for '{}' requested, page {}", q, page);
    let heading = format!("Search results for \"{}\"", q);
    render_listing(&pool, &settings, ThreadFilter::Search(q), page, heading).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(tag_filter)
        .service(search);
}
