//! # Encryption Key Response
//!
//! Carries a response text and, on success, key material signed by the
//! signature provider. The discovery interface also uses this object as its
//! error body.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ResponseObject;

/// Encryption key material together with its digital signature.
///
/// All binary values are lowercase hex. `certificate` is the JSON form of
/// the signing certificate so a receiver can verify without a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedKeyMaterial {
    pub encryption_key: String,
    pub iv: String,
    #[schema(value_type = Object)]
    pub certificate: serde_json::Value,
    pub algorithm: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKeyResponse {
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<SignedKeyMaterial>,
}

impl EncryptionKeyResponse {
    pub fn signed(material: SignedKeyMaterial) -> Self {
        Self {
            response_text: "OK".to_string(),
            encryption_key: Some(material),
        }
    }
}

impl ResponseObject for EncryptionKeyResponse {
    fn failure(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            encryption_key: None,
        }
    }

    fn response_text(&self) -> &str {
        &self.response_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_omits_key_material() {
        let json = serde_json::to_value(EncryptionKeyResponse::failure("Information not found"))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"responseText": "Information not found"})
        );
    }

    #[test]
    fn signed_response_nests_material() {
        let resp = EncryptionKeyResponse::signed(SignedKeyMaterial {
            encryption_key: "00ff".into(),
            iv: "0a".into(),
            certificate: serde_json::json!({"certificateAlias": "a"}),
            algorithm: "Ed25519".into(),
            signature: "ab".into(),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["encryptionKey"]["encryptionKey"], "00ff");
        assert_eq!(json["encryptionKey"]["certificate"]["certificateAlias"], "a");
        assert_eq!(resp.response_text(), "OK");
    }
}
