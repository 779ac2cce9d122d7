//! Client Module
//!
//! Invoice recipients, identified by their national identification number.

use serde::{Deserialize, Serialize};

use crate::models::Identified;

/// Client form input; any field may still be blank while the user types.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientDTO {
    pub id: Option<i64>,
    pub identification_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// A stored client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    #[serde(default)]
    pub identification_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl Identified for Client {
    fn id(&self) -> i64 {
        self.id
    }
}

pub mod validators;
