/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::io;

use actix_web::{App, HttpServer, middleware};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use crate::settings::Settings;

mod db;
mod listing;
mod pagination;
mod posting;
mod settings;
mod tags;
mod validation;
mod views;
mod voting;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::new().map_err(|e| {
        error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Starting forum server...");

    let pool = db::install(&settings).await.map_err(|e| {
        error!("database setup failed: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    let listen = settings.listen.clone();
    info!("Listening on {}", listen);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .data(pool.clone())
            .data(settings.clone())
            .configure(listing::config)
            .configure(posting::config)
            .configure(voting::config)
            .service(actix_files::Files::new("/static", settings.static_dir.clone()))
    })
    .bind(listen)?
    .run()
    .await
}
