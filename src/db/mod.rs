/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Forum database abstraction

use std::{collections::HashSet, time::Duration};

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::{error, info};
use sea_query::{Iden, InsertStatement, Query, SelectStatement, UpdateStatement};
use sqlx::Row;
use thiserror::Error;

use crate::settings::Settings;

#[cfg(not(feature = "postgres"))]
use sea_query::SqliteQueryBuilder;

#[cfg(not(feature = "postgres"))]
sea_query::sea_query_driver_sqlite!();

#[cfg(not(feature = "postgres"))]
use sea_query_driver_sqlite::bind_query;

#[cfg(feature = "postgres")]
use sea_query::PostgresQueryBuilder;

#[cfg(feature = "postgres")]
sea_query::sea_query_driver_postgres!();

#[cfg(feature = "postgres")]
use sea_query_driver_postgres::bind_query;

pub mod comments;
pub mod migrations;
pub mod threads;

#[cfg(not(feature = "postgres"))]
const BACKEND: SqliteQueryBuilder = SqliteQueryBuilder;

#[cfg(feature = "postgres")]
const BACKEND: PostgresQueryBuilder = PostgresQueryBuilder;

#[cfg(not(feature = "postgres"))]
pub type DbRow = sqlx::sqlite::SqliteRow;

#[cfg(feature = "postgres")]
pub type DbRow = sqlx::postgres::PgRow;

#[cfg(not(feature = "postgres"))]
type InnerPool = sqlx::SqlitePool;

#[cfg(feature = "postgres")]
type InnerPool = sqlx::PgPool;

/// SQLSTATE / extended result code reported when a foreign key is violated.
#[cfg(not(feature = "postgres"))]
const FOREIGN_KEY_VIOLATION: &str = "787";

#[cfg(feature = "postgres")]
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct Pool(InnerPool);

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQL error")]
    SqlxError(#[from] sqlx::error::Error),
    #[error("Date parsing error")]
    ChronoError(#[from] chrono::ParseError),
    #[error("Unsupported database connection string")]
    UnsupportedConnectionString,
    #[error("thread not found")]
    MissingThread,
}

impl ResponseError for DbError {
    fn status_code(&self) -> StatusCode {
        match self {
            DbError::MissingThread => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            DbError::MissingThread => HttpResponse::NotFound().body(self.to_string()),
            _ => {
                error!("database error: {:?}", self);
                HttpResponse::InternalServerError().body("INTERNAL_SERVER_ERROR")
            }
        }
    }
}

/// Whether the error is the store rejecting a row that references a missing parent.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map_or(false, |code| code == FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

/// Which counter a vote increments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vote {
    Up,
    Down,
}

#[derive(Iden)]
enum Versions {
    Table,
    Version,
}

impl Pool {
    #[cfg(not(feature = "postgres"))]
    pub async fn connect(settings: &Settings) -> Result<Pool, DbError> {
        use std::str::FromStr;
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        if !settings.database_url.starts_with("sqlite:") {
            return Err(DbError::UnsupportedConnectionString);
        }
        let options = SqliteConnectOptions::from_str(&settings.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_timeout(Duration::from_secs(settings.connect_timeout))
            .connect_with(options)
            .await?;
        Ok(Pool(pool))
    }

    #[cfg(feature = "postgres")]
    pub async fn connect(settings: &Settings) -> Result<Pool, DbError> {
        use sqlx::postgres::PgPoolOptions;

        if !(settings.database_url.starts_with("postgres:") || settings.database_url.starts_with("postgresql:")) {
            return Err(DbError::UnsupportedConnectionString);
        }
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_timeout(Duration::from_secs(settings.connect_timeout))
            .connect(&settings.database_url)
            .await?;
        Ok(Pool(pool))
    }

    pub async fn select(&self, query: &SelectStatement) -> Result<Vec<DbRow>, DbError> {
        let (sql, values) = query.build(BACKEND);
        Ok(bind_query(sqlx::query(&sql), &values).fetch_all(&self.0).await?)
    }

    pub async fn select_optional(&self, query: &SelectStatement) -> Result<Option<DbRow>, DbError> {
        let (sql, values) = query.build(BACKEND);
        Ok(bind_query(sqlx::query(&sql), &values).fetch_optional(&self.0).await?)
    }

    pub async fn count(&self, query: &SelectStatement) -> Result<i64, DbError> {
        let (sql, values) = query.build(BACKEND);
        let row = bind_query(sqlx::query(&sql), &values).fetch_one(&self.0).await?;
        Ok(row.try_get(0)?)
    }

    pub async fn insert(&self, query: &InsertStatement) -> Result<(), DbError> {
        let (sql, values) = query.build(BACKEND);
        bind_query(sqlx::query(&sql), &values).execute(&self.0).await?;
        Ok(())
    }

    pub async fn update(&self, query: &UpdateStatement) -> Result<u64, DbError> {
        let (sql, values) = query.build(BACKEND);
        Ok(bind_query(sqlx::query(&sql), &values).execute(&self.0).await?.rows_affected())
    }
}

/// Escape character for LIKE patterns built by [`contains_pattern`].
pub const LIKE_ESCAPE: char = '!';

/// Escapes LIKE metacharacters and wraps the lower-cased needle in wildcards.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub async fn install(settings: &Settings) -> Result<Pool, DbError> {
    let pool = Pool::connect(settings).await?;
    let Pool(inner) = &pool;
    sqlx::query("create table if not exists versions (version varchar(100) not null)")
        .execute(inner)
        .await?;
    let mut versions: HashSet<String> = HashSet::new();
    for row in pool.select(Query::select().column(Versions::Version).from(Versions::Table)).await? {
        versions.insert(row.try_get(0)?);
    }
    for (name, statements) in migrations::MIGRATIONS {
        if versions.contains(*name) {
            continue;
        }
        info!("Running migration: {}", name);
        let mut tx = inner.begin().await?;
        for statement in statements.iter() {
            sqlx::query(statement).execute(&mut tx).await?;
        }
        let (sql, values) = Query::insert()
            .into_table(Versions::Table)
            .columns(vec![Versions::Version])
            .values_panic(vec![(*name).into()])
            .build(BACKEND);
        bind_query(sqlx::query(&sql), &values).execute(&mut tx).await?;
        tx.commit().await?;
    }
    Ok(pool)
}
