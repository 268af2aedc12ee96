//! Actor list decoder
//!
//! The actor endpoint answers a form POST with a JSON array of records:
//! `{"peopleNm": "...", "cast": "...", "actorGb": "1", ...}`.

use crate::transport::{Endpoint, FormFields, Transport};
use crate::{KobisError, Result};
use serde::{Deserialize, Serialize};

/// Billing of an actor in a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    Lead,
    Supporting,
    SpecialAppearance,
    Extra,
    Unknown,
}

impl RoleType {
    /// Maps the site's role code; 4 and anything unlisted are `Unknown`
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Lead,
            2 => Self::Supporting,
            3 => Self::SpecialAppearance,
            5 => Self::Extra,
            _ => Self::Unknown,
        }
    }

    /// Label the site displays for the role
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Lead => Some("주연"),
            Self::Supporting => Some("조연"),
            Self::SpecialAppearance => Some("특별출연"),
            Self::Extra => Some("단역"),
            Self::Unknown => None,
        }
    }
}

/// One credited actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorEntry {
    pub actor_name: String,
    pub character_name: String,
    pub role_type: RoleType,
}

/// Role code as sent by the site: normally a string, occasionally a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRoleCode {
    Number(i64),
    Text(String),
}

impl RawRoleCode {
    fn role_type(&self) -> RoleType {
        match self {
            Self::Number(code) => RoleType::from_code(*code),
            Self::Text(text) => text
                .trim()
                .parse()
                .map(RoleType::from_code)
                .unwrap_or(RoleType::Unknown),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActorRecord {
    #[serde(rename = "peopleNm", default)]
    people_nm: Option<String>,
    #[serde(default)]
    cast: Option<String>,
    #[serde(rename = "actorGb", default)]
    actor_gb: Option<RawRoleCode>,
}

impl From<ActorRecord> for ActorEntry {
    fn from(record: ActorRecord) -> Self {
        Self {
            actor_name: record.people_nm.unwrap_or_default(),
            character_name: record.cast.unwrap_or_default(),
            role_type: record
                .actor_gb
                .as_ref()
                .map_or(RoleType::Unknown, RawRoleCode::role_type),
        }
    }
}

/// Decodes the actor endpoint's JSON body
pub fn parse_actor_list(json: &str) -> Result<Vec<ActorEntry>> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    let records: Vec<ActorRecord> =
        serde_path_to_error::deserialize(deserializer).map_err(|e| KobisError::Json {
            path: e.path().to_string(),
            source: e.into_inner(),
        })?;

    Ok(records.into_iter().map(ActorEntry::from).collect())
}

/// Credited actors of a movie
pub async fn actor_list(transport: &Transport, code: u32) -> Result<Vec<ActorEntry>> {
    tracing::debug!("Fetching actor list for movie {}", code);
    let body = transport
        .post_json(Endpoint::ActorList, &FormFields::actor_list(code))
        .await?;
    parse_actor_list(&body)
}
