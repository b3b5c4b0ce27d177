/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! DB queries related to comments

use chrono::{DateTime, FixedOffset, Utc};
use sea_query::{Expr, Iden, Order, Query};
use sqlx::Row;

use crate::db::{DbError, Pool, Vote, is_foreign_key_violation};

#[derive(Iden)]
pub enum Comments {
    Table,
    Id,
    ThreadId,
    Content,
    CreatedAt,
    Upvotes,
    Downvotes,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub thread_id: i64,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    pub upvotes: i64,
    pub downvotes: i64,
}

pub struct NewComment {
    pub content: String,
}

/// Oldest first.
pub async fn get_comments(pool: &Pool, thread_id: i64) -> Result<Vec<Comment>, DbError> {
    let rows = pool.select(Query::select()
        .columns(vec![
            Comments::Id, Comments::ThreadId, Comments::Content, Comments::CreatedAt,
            Comments::Upvotes, Comments::Downvotes,
        ])
        .from(Comments::Table)
        .and_where(Expr::col(Comments::ThreadId).eq(thread_id))
        .order_by(Comments::Id, Order::Asc)).await?;
    let mut comments = Vec::with_capacity(rows.len());
    for row in rows {
        let created_at: String = row.try_get(3)?;
        comments.push(Comment {
            id: row.try_get(0)?,
            thread_id: row.try_get(1)?,
            content: row.try_get(2)?,
            created_at: DateTime::parse_from_rfc3339(created_at.as_str())?,
            upvotes: row.try_get(4)?,
            downvotes: row.try_get(5)?,
        });
    }
    Ok(comments)
}

/// The thread's existence is left to the foreign key; a violation is reported as
/// [`DbError::MissingThread`].
pub async fn post_comment(pool: &Pool, thread_id: i64, data: NewComment) -> Result<(), DbError> {
    let result = pool.insert(Query::insert()
        .into_table(Comments::Table)
        .columns(vec![Comments::ThreadId, Comments::Content, Comments::CreatedAt])
        .values_panic(vec![
            thread_id.into(),
            data.content.into(),
            Utc::now().to_rfc3339().into(),
        ])).await;
    match result {
        Err(DbError::SqlxError(ref err)) if is_foreign_key_violation(err) => Err(DbError::MissingThread),
        other => other,
    }
}

/// Returns the number of rows touched: 0 when the comment does not exist.
pub async fn vote_comment(pool: &Pool, id: i64, vote: Vote) -> Result<u64, DbError> {
    let (column, increment) = match vote {
        Vote::Up => (Comments::Upvotes, "upvotes + 1"),
        Vote::Down => (Comments::Downvotes, "downvotes + 1"),
    };
    pool.update(Query::update()
        .table(Comments::Table)
        .value_expr(column, Expr::cust(increment))
        .and_where(Expr::col(Comments::Id).eq(id))).await
}
