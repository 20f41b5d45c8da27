use core_types::ValidationErrors;
use serde::Deserialize;

/// The fixed allow-list of accepted sort values. A leading `-` selects
/// descending order. Nothing outside this list ever reaches the query text.
const SORT_SAFELIST: [&str; 8] = [
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

/// The hard cap on page size, regardless of what the caller asks for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination and sort parameters for a filtered listing.
///
/// Callers must pass these through [`Filters::validate`] (the repository does
/// so itself before executing anything); an unrecognized sort value is
/// rejected before any query runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            page: 1,
            page_size: 20,
            sort: "id".to_string(),
        }
    }
}

impl Filters {
    /// Checks every filter rule, collecting all violations.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = ValidationErrors::new();

        v.check(self.page > 0, "page", "must be greater than zero");
        v.check(
            self.page <= 10_000_000,
            "page",
            "must be a maximum of 10 million",
        );
        v.check(self.page_size > 0, "page_size", "must be greater than zero");
        v.check(
            self.page_size <= MAX_PAGE_SIZE,
            "page_size",
            "must be a maximum of 100",
        );
        v.check(
            SORT_SAFELIST.contains(&self.sort.as_str()),
            "sort",
            "invalid sort value",
        );

        v.into_result()
    }

    /// Resolves the sort column through the allow-list.
    ///
    /// The returned string is always one of the safelist's own literals, so
    /// raw caller input never reaches the query text. Falls back to `id` for
    /// anything unvalidated.
    pub(crate) fn sort_column(&self) -> &'static str {
        for candidate in SORT_SAFELIST {
            if self.sort == candidate {
                return candidate.trim_start_matches('-');
            }
        }
        "id"
    }

    pub(crate) fn sort_direction(&self) -> &'static str {
        if self.sort.starts_with('-') { "DESC" } else { "ASC" }
    }

    pub(crate) fn limit(&self) -> i64 {
        self.page_size
    }

    pub(crate) fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_validate() {
        assert!(Filters::default().validate().is_ok());
    }

    #[test]
    fn every_safelisted_sort_value_is_accepted() {
        for sort in SORT_SAFELIST {
            let filters = Filters {
                sort: sort.to_string(),
                ..Filters::default()
            };
            assert!(filters.validate().is_ok(), "rejected {sort}");
        }
    }

    #[test]
    fn unknown_sort_values_are_rejected() {
        for sort in ["created_at", "title; DROP TABLE movies", "", "ID", "--id"] {
            let filters = Filters {
                sort: sort.to_string(),
                ..Filters::default()
            };
            let errors = filters.validate().unwrap_err();
            assert_eq!(errors.get("sort"), Some("invalid sort value"));
        }
    }

    #[test]
    fn sort_resolution_only_emits_safelist_literals() {
        let filters = Filters {
            sort: "-year".to_string(),
            ..Filters::default()
        };
        assert_eq!(filters.sort_column(), "year");
        assert_eq!(filters.sort_direction(), "DESC");

        // Unvalidated input never reaches the query text.
        let hostile = Filters {
            sort: "title; DROP TABLE movies".to_string(),
            ..Filters::default()
        };
        assert_eq!(hostile.sort_column(), "id");
    }

    #[test]
    fn page_bounds_are_enforced_and_collected() {
        let filters = Filters {
            page: 0,
            page_size: 500,
            sort: "nope".to_string(),
        };
        let errors = filters.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("page"), Some("must be greater than zero"));
        assert_eq!(errors.get("page_size"), Some("must be a maximum of 100"));
    }

    #[test]
    fn limit_and_offset_follow_the_page_window() {
        let filters = Filters {
            page: 3,
            page_size: 20,
            sort: "id".to_string(),
        };
        assert_eq!(filters.limit(), 20);
        assert_eq!(filters.offset(), 40);

        assert_eq!(Filters::default().offset(), 0);
    }
}
