/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Forum server settings

use std::env;

use config::{Config, ConfigError, Environment};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub listen: String,
    pub database_url: String,
    pub page_size: i64,
    pub popular_limit: i64,
    pub trending_limit: usize,
    pub max_thread_words: usize,
    pub max_comment_words: usize,
    pub max_connections: u32,
    pub connect_timeout: u64,
    pub static_dir: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut s = Config::default();
        s.set_default("listen", "127.0.0.1:5000")?;
        s.set_default("page_size", 5)?;
        s.set_default("popular_limit", 5)?;
        s.set_default("trending_limit", 10)?;
        s.set_default("max_thread_words", 500)?;
        s.set_default("max_comment_words", 150)?;
        s.set_default("max_connections", 5)?;
        s.set_default("connect_timeout", 10)?;
        s.set_default("static_dir", "static")?;
        s.merge(Environment::with_prefix("FORUM"))?;
        if let Ok(url) = env::var("DATABASE_URL") {
            s.set("database_url", url)?;
        }
        let settings: Settings = s.try_into()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::Message("DATABASE_URL must not be empty".to_owned()));
        }
        if self.page_size < 1 || self.popular_limit < 1 || self.trending_limit < 1 {
            return Err(ConfigError::Message(
                "page_size, popular_limit and trending_limit must be positive".to_owned(),
            ));
        }
        if self.max_connections < 1 {
            return Err(ConfigError::Message("max_connections must be positive".to_owned()));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn for_database(database_url: String) -> Settings {
        Settings {
            listen: "127.0.0.1:0".to_owned(),
            database_url,
            page_size: 5,
            popular_limit: 5,
            trending_limit: 10,
            max_thread_words: 500,
            max_comment_words: 150,
            max_connections: 5,
            connect_timeout: 10,
            static_dir: "static".to_owned(),
        }
    }
}
