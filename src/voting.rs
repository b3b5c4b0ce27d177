/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Up- and downvotes for threads and comments
//!
//! Votes are plain counters: any client may vote any number of times, and a vote
//! for an id that does not exist changes nothing but still redirects.

use actix_web::{HttpRequest, HttpResponse, get, http::header, web};
use log::debug;

use crate::db::{Pool, Vote, comments, threads};

/// Redirects to the referring page, or home when the client sent none.
fn back(request: &HttpRequest) -> HttpResponse {
    let location = request.headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("/");
    HttpResponse::Found().header(header::LOCATION, location).finish()
}

async fn vote_thread(request: HttpRequest, pool: &Pool, id: i64, vote: Vote) -> actix_web::Result<HttpResponse> {
    if threads::vote_thread(pool, id, vote).await? == 0 {
        debug!("{:?} vote for unknown thread {}", vote, id);
    }
    Ok(back(&request))
}

async fn vote_comment(request: HttpRequest, pool: &Pool, id: i64, vote: Vote) -> actix_web::Result<HttpResponse> {
    if comments::vote_comment(pool, id, vote).await? == 0 {
        debug!("{:?} vote for unknown comment {}", vote, id);
    }
    Ok(back(&request))
}

#[get("/upvote/{id:\\d+}")]
async fn upvote_thread(request: HttpRequest, path: web::Path<i64>, pool: web::Data<Pool>) -> actix_web::Result<HttpResponse> {
    vote_thread(request, &pool, path.into_inner(), Vote::Up).await
}

#[get("/downvote/{id:\\d+}")]
async fn downvote_thread(request: HttpRequest, path: web::Path<i64>, pool: web::Data<Pool>) -> actix_web::Result<HttpResponse> {
    vote_thread(request, &pool, path.into_inner(), Vote::Down).await
}

#[get("/comment/upvote/{id:\\d+}")]
async fn upvote_comment(request: HttpRequest, path: web::Path<i64>, pool: web::Data<Pool>) -> actix_web::Result<HttpResponse> {
    vote_comment(request, &pool, path.into_inner(), Vote::Up).await
}

#[get("/comment/downvote/{id:\\d+}")]
async fn downvote_comment(request: HttpRequest, path: web::Path<i64>, pool: web::Data<Pool>) -> actix_web::Result<HttpResponse> {
    vote_comment(request, &pool, path.into_inner(), Vote::Down).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(upvote_thread)
        .service(downvote_thread)
        .service(upvote_comment)
        .service(downvote_comment);
}

#[cfg(all(test, not(feature = "postgres")))]
mod tests {
    use actix_web::{App, dev::ServiceResponse, http::StatusCode, test};

    use super::*;
    use crate::db::{
        comments::NewComment,
        testing::test_pool,
        threads::{NewThread, ThreadFilter},
    };

    async fn send(pool: &Pool, request: test::TestRequest) -> ServiceResponse {
        let mut app = test::init_service(App::new().data(pool.clone()).configure(config)).await;
        test::call_service(&mut app, request.to_request()).await
    }

    fn location(response: &ServiceResponse) -> &str {
        response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
    }

    async fn seed(pool: &Pool) -> (i64, i64) {
        threads::create_thread(pool, NewThread {
            title: "t".to_owned(),
            content: "c".to_owned(),
            tags: String::new(),
        }).await.unwrap();
        let thread_id = threads::list_threads(pool, &ThreadFilter::All, 1, 0).await.unwrap()[0].id;
        comments::post_comment(pool, thread_id, NewComment { content: "c".to_owned() }).await.unwrap();
        let comment_id = comments::get_comments(pool, thread_id).await.unwrap()[0].id;
        (thread_id, comment_id)
    }

    #[actix_rt::test]
    async fn thread_votes_redirect_to_referer() {
        let (_dir, _settings, pool) = test_pool().await;
        let (thread_id, _) = seed(&pool).await;
        for _ in 0..2 {
            let response = send(&pool, test::TestRequest::get()
                .uri(&format!("/upvote/{}", thread_id))
                .header(header::REFERER, "/?page=2")).await;
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(location(&response), "/?page=2");
        }
        let response = send(&pool, test::TestRequest::get().uri(&format!("/downvote/{}", thread_id))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");

        let thread = threads::get_thread(&pool, thread_id).await.unwrap().unwrap();
        assert_eq!((thread.upvotes, thread.downvotes), (2, 1));
    }

    #[actix_rt::test]
    async fn comment_votes_redirect_home_without_referer() {
        let (_dir, _settings, pool) = test_pool().await;
        let (thread_id, comment_id) = seed(&pool).await;
        let response = send(&pool, test::TestRequest::get().uri(&format!("/comment/upvote/{}", comment_id))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");
        let response = send(&pool, test::TestRequest::get()
            .uri(&format!("/comment/downvote/{}", comment_id))
            .header(header::REFERER, format!("/thread/{}", thread_id))).await;
        assert_eq!(location(&response), format!("/thread/{}", thread_id));

        let comment = &comments::get_comments(&pool, thread_id).await.unwrap()[0];
        assert_eq!((comment.upvotes, comment.downvotes), (1, 1));
    }

    #[actix_rt::test]
    async fn votes_on_missing_ids_are_tolerated() {
        let (_dir, _settings, pool) = test_pool().await;
        let (thread_id, _) = seed(&pool).await;
        for uri in &["/upvote/999", "/downvote/999", "/comment/upvote/999", "/comment/downvote/999"] {
            let response = send(&pool, test::TestRequest::get().uri(uri)).await;
            assert_eq!(response.status(), StatusCode::FOUND, "{}", uri);
            assert_eq!(location(&response), "/");
        }
        let thread = threads::get_thread(&pool, thread_id).await.unwrap().unwrap();
        assert_eq!((thread.upvotes, thread.downvotes), (0, 0));
        let comment = &comments::get_comments(&pool, thread_id).await.unwrap()[0];
        assert_eq!((comment.upvotes, comment.downvotes), (0, 0));
    }
}
