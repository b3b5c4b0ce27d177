/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! DB queries related to threads

use chrono::{DateTime, FixedOffset, Utc};
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SimpleExpr};
use sqlx::Row;

use crate::db::{DbError, DbRow, Pool, Vote, contains_pattern};

#[derive(Iden)]
pub enum Threads {
    Table,
    Id,
    Title,
    Content,
    CreatedAt,
    Upvotes,
    Downvotes,
    Tags,
}

#[derive(Debug, Clone)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub tags: String,
}

impl Thread {
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    /// The trimmed, non-empty entries of the comma-separated tags field.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split(',').map(str::trim).filter(|tag| !tag.is_empty()).collect()
    }
}

pub struct NewThread {
    pub title: String,
    pub content: String,
    pub tags: String,
}

/// Which threads a listing covers.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadFilter {
    All,
    /// Case-insensitive substring of the tags field.
    Tag(String),
    /// Case-insensitive substring of title, content or tags.
    Search(String),
}

impl ThreadFilter {
    fn condition(&self) -> Option<SimpleExpr> {
        match self {
            ThreadFilter::All => None,
            ThreadFilter::Tag(tag) => Some(Expr::cust_with_values(
                "LOWER(tags) LIKE ? ESCAPE '!'",
                vec![contains_pattern(tag)],
            )),
            ThreadFilter::Search(query) => {
                let pattern = contains_pattern(query);
                Some(Expr::cust_with_values(
                    "(LOWER(title) LIKE ? ESCAPE '!' OR LOWER(content) LIKE ? ESCAPE '!' OR LOWER(tags) LIKE ? ESCAPE '!')",
                    vec![pattern.clone(), pattern.clone(), pattern],
                ))
            }
        }
    }
}

fn get_default_thread_query() -> SelectStatement {
    Query::select()
        .columns(vec![
            Threads::Id, Threads::Title, Threads::Content, Threads::CreatedAt,
            Threads::Upvotes, Threads::Downvotes, Threads::Tags,
        ])
        .from(Threads::Table)
        .to_owned()
}

fn read_thread(row: &DbRow) -> Result<Thread, DbError> {
    let created_at: String = row.try_get(3)?;
    Ok(Thread {
        id: row.try_get(0)?,
        title: row.try_get(1)?,
        content: row.try_get(2)?,
        created_at: DateTime::parse_from_rfc3339(created_at.as_str())?,
        upvotes: row.try_get(4)?,
        downvotes: row.try_get(5)?,
        tags: row.try_get(6)?,
    })
}

pub async fn count_threads(pool: &Pool, filter: &ThreadFilter) -> Result<i64, DbError> {
    let mut query = Query::select();
    query.expr(Expr::col(Threads::Id).count()).from(Threads::Table);
    if let Some(condition) = filter.condition() {
        query.and_where(condition);
    }
    pool.count(&query).await
}

/// Newest first.
pub async fn list_threads(
    pool: &Pool,
    filter: &ThreadFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Thread>, DbError> {
    let mut query = get_default_thread_query();
    if let Some(condition) = filter.condition() {
        query.and_where(condition);
    }
    query.order_by(Threads::Id, Order::Desc)
        .limit(limit as u64)
        .offset(offset as u64);
    pool.select(&query).await?.iter().map(read_thread).collect()
}

pub async fn get_thread(pool: &Pool, id: i64) -> Result<Option<Thread>, DbError> {
    let mut query = get_default_thread_query();
    query.and_where(Expr::col(Threads::Id).eq(id));
    match pool.select_optional(&query).await? {
        Some(row) => Ok(Some(read_thread(&row)?)),
        None => Ok(None),
    }
}

pub async fn create_thread(pool: &Pool, data: NewThread) -> Result<(), DbError> {
    pool.insert(Query::insert()
        .into_table(Threads::Table)
        .columns(vec![Threads::Title, Threads::Content, Threads::CreatedAt, Threads::Tags])
        .values_panic(vec![
            data.title.into(),
            data.content.into(),
            Utc::now().to_rfc3339().into(),
            data.tags.into(),
        ])).await
}

/// Returns the number of rows touched: 0 when the thread does not exist.
pub async fn vote_thread(pool: &Pool, id: i64, vote: Vote) -> Result<u64, DbError> {
    let (column, increment) = match vote {
        Vote::Up => (Threads::Upvotes, "upvotes + 1"),
        Vote::Down => (Threads::Downvotes, "downvotes + 1"),
    };
    pool.update(Query::update()
        .table(Threads::Table)
        .value_expr(column, Expr::cust(increment))
        .and_where(Expr::col(Threads::Id).eq(id))).await
}

/// Highest score first, oldest first among equal scores.
pub async fn get_popular_threads(pool: &Pool, limit: i64) -> Result<Vec<Thread>, DbError> {
    let mut query = get_default_thread_query();
    query.order_by_expr(Expr::cust("upvotes - downvotes"), Order::Desc)
        .order_by(Threads::Id, Order::Asc)
        .limit(limit as u64);
    pool.select(&query).await?.iter().map(read_thread).collect()
}

/// Every non-empty tags field, in insertion order.
pub async fn get_all_tags(pool: &Pool) -> Result<Vec<String>, DbError> {
    let rows = pool.select(Query::select()
        .column(Threads::Tags)
        .from(Threads::Table)
        .and_where(Expr::col(Threads::Tags).ne(""))
        .order_by(Threads::Id, Order::Asc)).await?;
    let mut tags = Vec::with_capacity(rows.len());
    for row in rows {
        tags.push(row.try_get(0)?);
    }
    Ok(tags)
}
