use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DiscoverySettings;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// `page` is 1-indexed. Missing values fall back to page 1 and the
    /// configured default size.
    pub fn from_query(
        page: Option<i64>,
        page_size: Option<i64>,
        settings: &DiscoverySettings,
    ) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        if page < 1 || page > u32::MAX as i64 {
            return Err(AppError::Input(format!(
                "page must be a positive number, got {}",
                page
            )));
        }

        let max = settings.max_page_size.max(1);
        let page_size = page_size.unwrap_or(settings.default_page_size.min(max) as i64);
        if page_size < 1 || page_size > max as i64 {
            return Err(AppError::Input(format!(
                "page_size must be between 1 and {}, got {}",
                max, page_size
            )));
        }

        Ok(Self {
            page: page as u32,
            page_size: page_size as u32,
        })
    }

    fn bounds(&self, len: usize) -> (usize, usize) {
        let size = self.page_size as usize;
        let start = (self.page as usize - 1).saturating_mul(size).min(len);
        let end = start.saturating_add(size).min(len);
        (start, end)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub count: usize,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

/// Slices `[(page-1)*size, page*size)` out of the fully sorted set. `count` is the
/// size of the whole set; pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let count = items.len();
    let (start, end) = request.bounds(count);
    let results = items.into_iter().skip(start).take(end - start).collect();

    Page {
        count,
        page: request.page,
        page_size: request.page_size,
        results,
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Highest score first. Stable, so ties keep their input order.
pub fn sort_by_score_desc<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
}

/// Earliest date first, then nearest; unknown distance sorts after any known one.
pub fn sort_by_date_then_distance<T>(
    items: &mut [T],
    key: impl Fn(&T) -> (NaiveDate, Option<f64>),
) {
    items.sort_by(|a, b| {
        let (date_a, dist_a) = key(a);
        let (date_b, dist_b) = key(b);
        date_a.cmp(&date_b).then_with(|| {
            dist_a
                .unwrap_or(f64::INFINITY)
                .partial_cmp(&dist_b.unwrap_or(f64::INFINITY))
                .unwrap_or(Ordering::Equal)
        })
    });
}
