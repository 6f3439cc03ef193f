use serde::{Deserialize, Serialize};

/// A client record as served by the backend collection.
///
/// `avatar` and `email` appear in list responses but are never populated or
/// edited here; they are skipped when absent so a full-record update body
/// carries exactly the fields the backend knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Creation payload for the `/adduser` endpoint.
///
/// The backend takes every field as a string, and the region foreign key
/// travels as `ID_region`. Observed wire contract, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub nom: String,
    pub prenom: String,
    pub age: String,
    #[serde(rename = "ID_region")]
    pub region_id: String,
}
