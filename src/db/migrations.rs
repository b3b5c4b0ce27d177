/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Minimal migration system

#[cfg(not(feature = "postgres"))]
pub static MIGRATIONS: &'static [(&'static str, &'static [&'static str])] = &[
    ("V1_Init", &[
     "create table threads (
         id integer primary key autoincrement,
         title text not null,
         content text not null,
         created_at text not null,
         upvotes integer not null default 0,
         downvotes integer not null default 0,
         tags text not null default ''
     )",
     "create table comments (
         id integer primary key autoincrement,
         thread_id integer not null references threads (id) on delete cascade,
         content text not null,
         created_at text not null,
         upvotes integer not null default 0,
         downvotes integer not null default 0
     )",
     "create index comments_thread_id on comments (thread_id)",
    ]),
];

#[cfg(feature = "postgres")]
pub static MIGRATIONS: &'static [(&'static str, &'static [&'static str])] = &[
    ("V1_Init", &[
     "create table threads (
         id bigserial primary key,
         title text not null,
         content text not null,
         created_at varchar(50) not null,
         upvotes bigint not null default 0,
         downvotes bigint not null default 0,
         tags text not null default ''
     )",
     "create table comments (
         id bigserial primary key,
         thread_id bigint not null references threads (id) on delete cascade,
         content text not null,
         created_at varchar(50) not null,
         upvotes bigint not null default 0,
         downvotes bigint not null default 0
     )",
     "create index comments_thread_id on comments (thread_id)",
    ]),
];
