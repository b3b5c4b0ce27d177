/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Creating threads and comments, and the thread page

use actix_web::{HttpResponse, error, get, http::header, post, web};
use log::{debug, info};
use serde::Deserialize;

use crate::{
    db::{Pool, comments::{self, NewComment}, threads::{self, NewThread}},
    settings::Settings,
    validation::{check_comment, check_thread},
    views::{NewThreadTemplate, ThreadTemplate, render},
};

#[derive(Deserialize)]
struct NewThreadData {
    title: String,
    content: String,
    tags: Option<String>,
}

#[derive(Deserialize)]
struct NewCommentData {
    content: String,
}

async fn render_thread(pool: &Pool, settings: &Settings, id: i64) -> actix_web::Result<HttpResponse> {
    let thread = threads::get_thread(pool, id).await?
        .ok_or_else(|| error::ErrorNotFound("thread not found"))?;
    let comments = comments::get_comments(pool, id).await?;
    render(&ThreadTemplate {
        thread: &thread,
        comments: &comments,
        max_words: settings.max_comment_words,
    })
}

#[get("/new")]
async fn new_thread_form(settings: web::Data<Settings>) -> actix_web::Result<HttpResponse> {
    render(&NewThreadTemplate { max_words: settings.max_thread_words })
}

#[post("/new")]
async fn create_thread(
    data: web::Form<NewThreadData>,
    pool: web::Data<Pool>,
    settings: web::Data<Settings>,
) -> actix_web::Result<HttpResponse> {
    check_thread(&data.title, &data.content, settings.max_thread_words)?;
    let data = data.into_inner();
    let title = data.title.clone();
    threads::create_thread(&pool, NewThread {
        title: data.title,
        content: data.content,
        tags: data.tags.unwrap_or_default(),
    }).await?;
    info!("Created new thread: '{}'", title);
    Ok(HttpResponse::Found().header(header::LOCATION, "/").finish())
}

#[get("/thread/{id:\\d+}")]
async fn view_thread(
    path: web::Path<i64>,
    pool: web::Data<Pool>,
    settings: web::Data<Settings>,
) -> actix_web::Result<HttpResponse> {
    render_thread(&pool, &settings, path.into_inner()).await
}

#[post("/thread/{id:\\d+}")]
async fn create_comment(
    path: web::Path<i64>,
    data: web::Form<NewCommentData>,
    pool: web::Data<Pool>,
    settings: web::Data<Settings>,
) -> actix_web::Result<HttpResponse> {
    let thread_id = path.into_inner();
    check_comment(&data.content, settings.max_comment_words)?;
    debug!("Adding comment to thread {}", thread_id);
    comments::post_comment(&pool, thread_id, NewComment {
        content: data.into_inner().content,
    }).await?;
    info!("Created new comment in thread {}", thread_id);
    render_thread(&pool, &settings, thread_id).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(new_thread_form)
        .service(create_thread)
        .service(view_thread)
        .service(create_comment);
}

#[cfg(all(test, not(feature = "postgres")))]
mod tests {
    use actix_web::{App, dev::ServiceResponse, http::StatusCode, test};

    use super::*;
    use crate::db::{testing::test_pool, threads::ThreadFilter};

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    async fn send(pool: &Pool, settings: &Settings, request: test::TestRequest) -> ServiceResponse {
        let mut app = test::init_service(App::new()
            .data(pool.clone())
            .data(settings.clone())
            .configure(config)).await;
        test::call_service(&mut app, request.to_request()).await
    }

    async fn body_of(response: ServiceResponse) -> String {
        String::from_utf8(test::read_body(response).await.to_vec()).unwrap()
    }

    async fn thread_count(pool: &Pool) -> i64 {
        threads::count_threads(pool, &ThreadFilter::All).await.unwrap()
    }

    async fn seed_thread(pool: &Pool) -> i64 {
        threads::create_thread(pool, NewThread {
            title: "Seed".to_owned(),
            content: "seed content".to_owned(),
            tags: "seed".to_owned(),
        }).await.unwrap();
        threads::list_threads(pool, &ThreadFilter::All, 1, 0).await.unwrap()[0].id
    }

    #[actix_rt::test]
    async fn form_is_rendered() {
        let (_dir, settings, pool) = test_pool().await;
        let response = send(&pool, &settings, test::TestRequest::get().uri("/new")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_of(response).await.contains("max 500 words"));
    }

    #[actix_rt::test]
    async fn thread_at_word_limit_redirects_home() {
        let (_dir, settings, pool) = test_pool().await;
        let content = words(500);
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri("/new")
            .set_form(&[("title", "Long"), ("content", content.as_str()), ("tags", "a, b")])).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap().to_str().unwrap(), "/");
        let stored = &threads::list_threads(&pool, &ThreadFilter::All, 1, 0).await.unwrap()[0];
        assert_eq!(stored.title, "Long");
        assert_eq!(stored.tags, "a, b");
    }

    #[actix_rt::test]
    async fn thread_over_word_limit_is_rejected() {
        let (_dir, settings, pool) = test_pool().await;
        let content = words(501);
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri("/new")
            .set_form(&[("title", "Too long"), ("content", content.as_str())])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(response).await.contains("500"));
        assert_eq!(thread_count(&pool).await, 0);
    }

    #[actix_rt::test]
    async fn tags_are_optional() {
        let (_dir, settings, pool) = test_pool().await;
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri("/new")
            .set_form(&[("title", "No tags"), ("content", "hello")])).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let stored = &threads::list_threads(&pool, &ThreadFilter::All, 1, 0).await.unwrap()[0];
        assert_eq!(stored.tags, "");
    }

    #[actix_rt::test]
    async fn blank_title_is_rejected() {
        let (_dir, settings, pool) = test_pool().await;
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri("/new")
            .set_form(&[("title", "  "), ("content", "hello")])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(thread_count(&pool).await, 0);
    }

    #[actix_rt::test]
    async fn thread_page_lists_comments() {
        let (_dir, settings, pool) = test_pool().await;
        let id = seed_thread(&pool).await;
        comments::post_comment(&pool, id, NewComment { content: "first reply".to_owned() }).await.unwrap();
        let response = send(&pool, &settings, test::TestRequest::get().uri(&format!("/thread/{}", id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert!(body.contains("seed content"));
        assert!(body.contains("first reply"));
        let comment_id = comments::get_comments(&pool, id).await.unwrap()[0].id;
        assert!(body.contains(&format!("href=\"/thread/{}#comment-{}\"", id, comment_id)));
    }

    #[actix_rt::test]
    async fn unknown_thread_is_not_found() {
        let (_dir, settings, pool) = test_pool().await;
        let response = send(&pool, &settings, test::TestRequest::get().uri("/thread/404")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(&pool, &settings, test::TestRequest::get().uri("/thread/abc")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn comment_at_word_limit_rerenders_thread() {
        let (_dir, settings, pool) = test_pool().await;
        let id = seed_thread(&pool).await;
        let content = format!("{} {}", words(149), "closing");
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri(&format!("/thread/{}", id))
            .set_form(&[("content", content.as_str())])).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_of(response).await.contains("closing"));
        assert_eq!(comments::get_comments(&pool, id).await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn comment_over_word_limit_is_rejected() {
        let (_dir, settings, pool) = test_pool().await;
        let id = seed_thread(&pool).await;
        let content = words(151);
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri(&format!("/thread/{}", id))
            .set_form(&[("content", content.as_str())])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(response).await.contains("150"));
        assert!(comments::get_comments(&pool, id).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn comment_on_missing_thread_fails() {
        let (_dir, settings, pool) = test_pool().await;
        let response = send(&pool, &settings, test::TestRequest::post()
            .uri("/thread/77")
            .set_form(&[("content", "anyone there?")])).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(comments::get_comments(&pool, 77).await.unwrap().is_empty());
    }
}
