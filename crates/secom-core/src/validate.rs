//! # Request Validation
//!
//! The [`Validate`] trait for request DTOs and the [`Pagination`] window
//! accepted by the discovery search.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::SecomError;

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;

    /// Validate and lift the message into a [`SecomError::Validation`].
    fn validated(&self) -> Result<(), SecomError> {
        self.validate().map_err(SecomError::Validation)
    }
}

/// Page window forwarded to the search collaborator.
///
/// Both values are hints; the collaborator owns ranking and windowing.
/// Fields are unsigned and private. Handlers build it from signed query
/// values through [`Pagination::new`], so a negative value never reaches a
/// collaborator. `Default` is the unbounded first page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page: Option<u32>,
    page_size: Option<u32>,
}

impl Pagination {
    /// Validate raw query values. Absent values stay absent.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self, SecomError> {
        Ok(Self {
            page: non_negative("page", page)?,
            page_size: non_negative("pageSize", page_size)?,
        })
    }

    /// Requested page number, if any.
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Requested page size, if any.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Number of leading items to skip, treating an absent page as 0.
    ///
    /// Returns 0 when no page size is set (unbounded window).
    pub fn offset(&self) -> usize {
        match self.page_size {
            Some(size) => (self.page.unwrap_or(0) as usize).saturating_mul(size as usize),
            None => 0,
        }
    }
}

fn non_negative(name: &str, value: Option<i64>) -> Result<Option<u32>, SecomError> {
    match value {
        None => Ok(None),
        Some(v) if v < 0 => Err(SecomError::Validation(format!(
            "{name} must be greater than or equal to 0, got {v}"
        ))),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| SecomError::Validation(format!("{name} is out of range: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use proptest::prelude::*;

    #[test]
    fn absent_values_are_accepted() {
        let p = Pagination::new(None, None).unwrap();
        assert_eq!(p.page(), None);
        assert_eq!(p.page_size(), None);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn default_matches_absent_values() {
        assert_eq!(Pagination::default(), Pagination::new(None, None).unwrap());
    }

    #[test]
    fn zero_is_accepted() {
        let p = Pagination::new(Some(0), Some(0)).unwrap();
        assert_eq!(p.page(), Some(0));
        assert_eq!(p.page_size(), Some(0));
    }

    #[test]
    fn negative_page_is_rejected() {
        let err = Pagination::new(Some(-1), Some(10)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(err.to_string().contains("page"));
    }

    #[test]
    fn negative_page_size_is_rejected() {
        let err = Pagination::new(Some(0), Some(-5)).unwrap_err();
        assert!(err.to_string().contains("pageSize"));
    }

    #[test]
    fn overflowing_value_is_rejected() {
        assert!(Pagination::new(Some(i64::MAX), None).is_err());
    }

    #[test]
    fn offset_multiplies_page_by_size() {
        let p = Pagination::new(Some(3), Some(10)).unwrap();
        assert_eq!(p.offset(), 30);
    }

    #[test]
    fn serializes_camel_case() {
        let p = Pagination::new(Some(1), Some(2)).unwrap();
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json, serde_json::json!({"page": 1, "pageSize": 2}));
    }

    proptest! {
        #[test]
        fn any_negative_value_is_a_validation_failure(
            neg in i64::MIN..0i64,
            other in proptest::option::of(0i64..1000),
            page_side in any::<bool>(),
        ) {
            let result = if page_side {
                Pagination::new(Some(neg), other)
            } else {
                Pagination::new(other, Some(neg))
            };
            prop_assert_eq!(result.unwrap_err().kind(), FailureKind::Validation);
        }

        #[test]
        fn any_non_negative_pair_is_accepted(page in 0i64..100_000, size in 0i64..100_000) {
            let p = Pagination::new(Some(page), Some(size)).unwrap();
            prop_assert_eq!(p.page(), Some(page as u32));
            prop_assert_eq!(p.page_size(), Some(size as u32));
        }
    }
}
