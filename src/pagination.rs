/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Page arithmetic for thread listings

use crate::validation::ValidationError;

/// Parses the 1-based `page` query parameter. Absent means the first page.
pub fn parse_page(page: Option<&str>) -> Result<i64, ValidationError> {
    match page {
        None => Ok(1),
        Some(s) => match s.trim().parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ValidationError::InvalidPage),
        },
    }
}

pub fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}

pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1).saturating_mul(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_page_is_first_page() {
        assert_eq!(parse_page(None), Ok(1));
        assert_eq!(parse_page(Some("3")), Ok(3));
        assert_eq!(parse_page(Some(" 2 ")), Ok(2));
    }

    #[test]
    fn malformed_pages_are_rejected() {
        for input in &["", "abc", "0", "-1", "1.5", "99999999999999999999"] {
            assert_eq!(parse_page(Some(*input)), Err(ValidationError::InvalidPage), "{}", input);
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(12, 5), 3);
    }

    #[test]
    fn offsets_step_by_page_size() {
        assert_eq!(offset(1, 5), 0);
        assert_eq!(offset(3, 5), 10);
        assert_eq!(offset(i64::MAX, 5), i64::MAX);
    }
}
