//! OData references, collections and extended-info messages

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relative path identifying a node in the resource graph (`@odata.id`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceReference(String);

impl ResourceReference {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring match against the reference path
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }

    /// Append a path segment, inserting a single `/` between the two
    pub fn join(&self, segment: &str) -> Self {
        Self(format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            segment.trim_start_matches('/')
        ))
    }

    /// Last non-empty path segment (the member identifier)
    pub fn id(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceReference {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ResourceReference {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// A `{"@odata.id": ...}` link object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "@odata.id")]
    pub odata_id: ResourceReference,
}

impl Link {
    pub fn new(reference: impl Into<ResourceReference>) -> Self {
        Self {
            odata_id: reference.into(),
        }
    }
}

/// Body of a collection resource
///
/// The `Members` sequence is authoritative. `Members@odata.count` is
/// informational and may disagree with it on some firmware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEnvelope {
    #[serde(rename = "Members", default)]
    pub members: Vec<Link>,

    #[serde(
        rename = "Members@odata.count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub declared_count: Option<usize>,
}

impl CollectionEnvelope {
    /// Build an envelope whose declared count matches its members
    pub fn from_references<I, R>(references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ResourceReference>,
    {
        let members: Vec<Link> = references.into_iter().map(Link::new).collect();
        Self {
            declared_count: Some(members.len()),
            members,
        }
    }

    pub fn references(&self) -> impl Iterator<Item = &ResourceReference> {
        self.members.iter().map(|link| &link.odata_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when there is no declared count or it equals the member count
    pub fn count_is_consistent(&self) -> bool {
        self.declared_count.map_or(true, |n| n == self.members.len())
    }
}

/// One entry of `@Message.ExtendedInfo`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExtendedInfo {
    pub message: String,
    pub message_id: Option<String>,
    pub severity: Option<String>,
}

/// Response body of PATCH/POST actions that report through extended info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(rename = "@Message.ExtendedInfo", default)]
    pub extended_info: Vec<ExtendedInfo>,
}

impl MessageResponse {
    /// First human-readable message, if the service sent any
    pub fn first_message(&self) -> Option<&str> {
        self.extended_info.first().map(|info| info.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{
            "@odata.id": "/redfish/v1/Managers/iDRAC.Embedded.1/Accounts",
            "Members": [
                {"@odata.id": "/redfish/v1/Managers/iDRAC.Embedded.1/Accounts/1"},
                {"@odata.id": "/redfish/v1/Managers/iDRAC.Embedded.1/Accounts/2"}
            ],
            "Members@odata.count": 2
        }"#;
        let envelope: CollectionEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.len(), 2);
        assert!(envelope.count_is_consistent());
        let ids: Vec<&str> = envelope.references().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_declared_count_mismatch_is_informational() {
        let json = r#"{"Members": [{"@odata.id": "/a"}], "Members@odata.count": 4}"#;
        let envelope: CollectionEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.len(), 1);
        assert!(!envelope.count_is_consistent());
    }

    #[test]
    fn test_reference_join_and_id() {
        let base = ResourceReference::new("/redfish/v1/Systems/System.Embedded.1/");
        let joined = base.join("/Storage");
        assert_eq!(joined.as_str(), "/redfish/v1/Systems/System.Embedded.1/Storage");
        assert_eq!(joined.id(), "Storage");
    }

    #[test]
    fn test_first_message() {
        let json = r#"{"@Message.ExtendedInfo": [
            {"Message": "Successfully Completed Request", "Severity": "OK"},
            {"Message": "The request completed successfully."}
        ]}"#;
        let resp: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_message(), Some("Successfully Completed Request"));
        assert_eq!(MessageResponse::default().first_message(), None);
    }
}
