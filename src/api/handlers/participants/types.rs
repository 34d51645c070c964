//! Request/response types and input validation for participant endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sort columns accepted by the list endpoint; anything else falls back to
/// `created_at`. Keeping this an allow-list is what lets the column name be
/// interpolated into the ORDER BY clause.
pub(super) const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "birth_place",
    "birth_date",
    "campus",
    "major",
    "cohort",
    "phone",
    "created_at",
    "updated_at",
];

pub(super) const DEFAULT_SORT_BY: &str = "created_at";
pub(super) const DEFAULT_SORT_ORDER: &str = "desc";
pub(super) const DEFAULT_PAGE: i64 = 1;
pub(super) const DEFAULT_LIMIT: i64 = 10;
pub(super) const MAX_LIMIT: i64 = 100;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ParticipantForm {
    pub name: String,
    pub birth_place: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub birth_date: String,
    pub campus: String,
    pub major: String,
    pub cohort: String,
    pub phone: String,
}

impl ParticipantForm {
    /// Validate field presence, lengths, and the birth date format.
    pub(super) fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim();
        if name.len() < 2 || name.len() > 100 {
            return Err("name must be between 2 and 100 characters");
        }
        let birth_place = self.birth_place.trim();
        if birth_place.len() < 2 || birth_place.len() > 255 {
            return Err("birth_place must be between 2 and 255 characters");
        }
        if !valid_date(self.birth_date.trim()) {
            return Err("birth_date must be a valid YYYY-MM-DD date");
        }
        if self.campus.trim().is_empty() {
            return Err("campus is required");
        }
        if self.major.trim().is_empty() {
            return Err("major is required");
        }
        if self.cohort.trim().is_empty() {
            return Err("cohort is required");
        }
        if !valid_phone(self.phone.trim()) {
            return Err("phone must be 8 to 20 digits, optionally with a leading +");
        }
        Ok(())
    }
}

/// Query parameters for the list endpoint. Values arrive as raw strings and
/// are parsed leniently: anything unparsable falls back to its default
/// instead of rejecting the request.
#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug)]
pub(super) struct ListParams {
    pub(super) page: i64,
    pub(super) limit: i64,
    pub(super) search: Option<String>,
    pub(super) sort_by: String,
    pub(super) sort_order: String,
}

impl ListParams {
    pub(super) fn from_query(query: &ListQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(DEFAULT_PAGE);
        let limit = query
            .limit
            .as_deref()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|limit| *limit > 0 && *limit <= MAX_LIMIT)
            .unwrap_or(DEFAULT_LIMIT);
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_string);
        let sort_by = query
            .sort_by
            .as_deref()
            .filter(|column| SORTABLE_COLUMNS.contains(column))
            .unwrap_or(DEFAULT_SORT_BY)
            .to_string();
        let sort_order = match query.sort_order.as_deref() {
            Some("asc") => "asc".to_string(),
            Some("desc") => "desc".to_string(),
            _ => DEFAULT_SORT_ORDER.to_string(),
        };
        Self {
            page,
            limit,
            search,
            sort_by,
            sort_order,
        }
    }

    pub(super) fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").is_ok_and(|regex| regex.is_match(phone))
}

fn valid_date(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return false;
    }
    let (Ok(year), Ok(month), Ok(day)) = (
        year.parse::<i32>(),
        month.parse::<u32>(),
        day.parse::<u32>(),
    ) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };
    (1..=days_in_month).contains(&day)
}
