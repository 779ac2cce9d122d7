//! User Module
//!
//! Application accounts. A user is a person (identified by cédula) with a
//! login name, a password and at least one role.

use serde::{Deserialize, Serialize};

use crate::models::Identified;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDTO {
    pub id: Option<i64>,
    pub identification_number: String,
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub roles: Vec<String>,
}

/// A stored user. Passwords are never part of the snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub identification_number: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}

pub mod validators;
