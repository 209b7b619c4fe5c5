//! # Discovery Interface Objects
//!
//! `POST /v1/searchService`: search for service instances to consume.
//! The filter is opaque to the contract beyond structural checks; ranking
//! and matching belong to the search collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::not_blank_if_present;
use crate::validate::Validate;

/// Structured search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchParameters>,
    /// Free-text query matched against names, descriptions and keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freetext: Option<String>,
    /// Geographic bound as WKT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
}

impl Validate for SearchFilter {
    fn validate(&self) -> Result<(), String> {
        not_blank_if_present("freetext", &self.freetext)?;
        not_blank_if_present("geometry", &self.geometry)?;
        if let (Some(from), Some(to)) = (self.valid_from, self.valid_to) {
            if from > to {
                return Err(format!(
                    "validFrom ({from}) must not be after validTo ({to})"
                ));
            }
        }
        if let Some(query) = &self.query {
            not_blank_if_present("query.instanceId", &query.instance_id)?;
        }
        Ok(())
    }
}

/// Attribute-level search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_id: Option<String>,
    /// Reference to a specific instance. An unresolvable reference is a
    /// not-found failure, unlike a filter that simply matches nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_uri: Option<String>,
}

/// A matched service instance descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchObjectResult {
    pub instance_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implements_design: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implements_design_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_doc: Option<String>,
    /// Coverage area as WKT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_area: Option<String>,
}

impl SearchObjectResult {
    /// Minimal descriptor with every optional attribute unset.
    pub fn new(instance_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            name: name.into(),
            version: None,
            status: None,
            description: None,
            data_product_type: None,
            organization_id: None,
            endpoint_uri: None,
            endpoint_type: None,
            keywords: None,
            unlocode: None,
            implements_design: None,
            implements_design_version: None,
            api_doc: None,
            coverage_area: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_filter_is_valid() {
        assert!(SearchFilter::default().validate().is_ok());
    }

    #[test]
    fn empty_json_object_deserializes() {
        let filter: SearchFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, SearchFilter::default());
    }

    #[test]
    fn blank_freetext_fails() {
        let filter = SearchFilter {
            freetext: Some(" ".into()),
            ..Default::default()
        };
        assert!(filter.validate().unwrap_err().contains("freetext"));
    }

    #[test]
    fn inverted_time_window_fails() {
        let filter = SearchFilter {
            valid_from: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            valid_to: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(filter.validate().unwrap_err().contains("validFrom"));
    }

    #[test]
    fn blank_instance_reference_fails() {
        let filter = SearchFilter {
            query: Some(SearchParameters {
                instance_id: Some(String::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn query_parameters_use_camel_case() {
        let json = r#"{"query":{"dataProductType":"S-124","instanceId":"urn:mrn:x"}}"#;
        let filter: SearchFilter = serde_json::from_str(json).unwrap();
        let query = filter.query.unwrap();
        assert_eq!(query.data_product_type.as_deref(), Some("S-124"));
        assert_eq!(query.instance_id.as_deref(), Some("urn:mrn:x"));
    }

    #[test]
    fn result_skips_unset_attributes() {
        let json = serde_json::to_value(SearchObjectResult::new("urn:mrn:svc", "NAVTEX")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"instanceId": "urn:mrn:svc", "name": "NAVTEX"})
        );
    }
}
