/// Small helpers shared by the route handlers: pagination and money rounding.

use serde::Deserialize;

const DEFAULT_RECORDS_PER_PAGE: u64 = 10;
const DEFAULT_PAGE: u64 = 1;

/// Raw `?page=&recordPerPage=` query; kept as strings so that garbage
/// falls back to the defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub record_per_page: Option<String>,
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn from_query(query: &PaginationQuery) -> Self {
        Self {
            number: parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            size: parse_positive(query.record_per_page.as_deref())
                .unwrap_or(DEFAULT_RECORDS_PER_PAGE),
        }
    }

    /// Number of records before this page, capped at `i64::MAX` since the
    /// Mongo driver refuses anything larger
    pub fn skip(&self) -> u64 {
        (self.number - 1)
            .saturating_mul(self.size)
            .min(i64::MAX as u64)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            size: DEFAULT_RECORDS_PER_PAGE,
        }
    }
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map(|v| v as u64)
}

/// Round half away from zero to `precision` decimal places
pub fn to_fixed(num: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (num * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, size: Option<&str>) -> PaginationQuery {
        PaginationQuery {
            page: page.map(str::to_string),
            record_per_page: size.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        let page = Page::from_query(&PaginationQuery::default());
        assert_eq!(page, Page { number: 1, size: 10 });
        assert_eq!(page.skip(), 0);
    }

    #[test]
    fn test_skip_math() {
        let page = Page::from_query(&query(Some("3"), Some("25")));
        assert_eq!(page.skip(), 50);
    }

    #[test]
    fn test_huge_page_skip_is_capped() {
        let page = Page::from_query(&query(Some("9223372036854775807"), Some("2")));
        assert_eq!(page.skip(), i64::MAX as u64);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let page = Page::from_query(&query(Some("0"), Some("-4")));
        assert_eq!(page, Page::default());

        let page = Page::from_query(&query(Some("abc"), Some("1.5")));
        assert_eq!(page, Page::default());
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(12.346, 2), 12.35);
        assert_eq!(to_fixed(12.344, 2), 12.34);
        assert_eq!(to_fixed(-2.5, 0), -3.0);
        assert_eq!(to_fixed(10.0, 2), 10.0);
    }
}
