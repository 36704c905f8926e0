//! Wire types of the users REST resource.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::{ApiError, ApiResult};

/// Server-assigned identifier. Never changes once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "REGION1")]
    Region1,
    #[serde(rename = "REGION2")]
    Region2,
    #[serde(rename = "REGION3")]
    Region3,
}

impl Region {
    pub const ALL: [Self; 3] = [Self::Region1, Self::Region2, Self::Region3];

    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Region1 => "REGION1",
            Self::Region2 => "REGION2",
            Self::Region3 => "REGION3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Region1 => "Region 1",
            Self::Region2 => "Region 2",
            Self::Region3 => "Region 3",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown region: {0}")]
pub struct ParseRegionError(pub String);

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRegionError(s.to_owned()))
    }
}

/// The backend stores the phone number as a nullable column.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    pub aadhar_number: String,
    pub region: Region,
    pub amount: i32,
}

/// Request body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub phone_number: String,
    pub aadhar_number: String,
    pub region: Region,
    pub amount: i32,
}

impl From<&User> for NewUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone_number: user.phone_number.clone(),
            aadhar_number: user.aadhar_number.clone(),
            region: user.region,
            amount: user.amount,
        }
    }
}

/// One page of users as returned by `GET /api/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub content: Vec<User>,
    pub total_pages: usize,
}

impl PageView {
    /// Both `content` (a sequence of users) and `totalPages` are required;
    /// anything else is [`ApiError::Malformed`].
    pub fn parse(body: &[u8]) -> ApiResult<Self> {
        serde_json::from_slice(body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_round_trips_through_wire_name() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>(), Ok(region));
        }
        assert_eq!("region2".parse::<Region>(), Ok(Region::Region2));
        assert_eq!(
            "REGION4".parse::<Region>(),
            Err(ParseRegionError("REGION4".to_owned()))
        );
        assert_eq!(Region::Region3.to_string(), "Region 3");
    }

    #[test]
    fn user_uses_camel_case_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Asha",
            "phoneNumber": null,
            "aadharNumber": "1234567890123456",
            "region": "REGION2",
            "amount": 250
        }))
        .unwrap();

        assert_eq!(user.id, UserId(7));
        assert_eq!(user.phone_number, "");
        assert_eq!(user.region, Region::Region2);

        let body = serde_json::to_value(NewUser::from(&user)).unwrap();
        assert_eq!(body["aadharNumber"], "1234567890123456");
        assert_eq!(body["region"], "REGION2");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn page_view_parses_well_formed_body() {
        let view = PageView::parse(
            br#"{"content":[{"id":1,"name":"A","phoneNumber":"1","aadharNumber":"1234567890123456","region":"REGION1","amount":5}],"totalPages":3,"totalElements":21}"#,
        )
        .unwrap();

        assert_eq!(view.content.len(), 1);
        assert_eq!(view.total_pages, 3);
    }

    #[test]
    fn page_view_rejects_missing_or_wrong_shaped_content() {
        for body in [
            &br#"{"totalPages":3}"#[..],
            br#"{"content":{"id":1},"totalPages":3}"#,
            br#"{"content":[]}"#,
            br#"[1,2,3]"#,
            b"not json",
        ] {
            assert!(
                matches!(PageView::parse(body), Err(ApiError::Malformed(_))),
                "{}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
