//! Billing entities and the context they are validated in

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod client;
pub mod product;
pub mod user;

use client::{Client, ClientDTO};
use product::{Product, ProductDTO};
use user::{User, UserDTO};

/// Whether a record is being created or an existing one edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Client,
    User,
    Product,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Client => "client",
            RecordKind::User => "user",
            RecordKind::Product => "product",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Create => f.write_str("create"),
            ValidationMode::Update => f.write_str("update"),
        }
    }
}

/// A record as typed into a form, possibly incomplete.
#[derive(Debug, Clone, PartialEq)]
pub enum PartialRecord {
    Client(ClientDTO),
    User(UserDTO),
    Product(ProductDTO),
}

impl PartialRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            PartialRecord::Client(_) => RecordKind::Client,
            PartialRecord::User(_) => RecordKind::User,
            PartialRecord::Product(_) => RecordKind::Product,
        }
    }
}

/// Read-only snapshot of stored records of one kind, used for uniqueness checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ExistingRecords {
    Client(Vec<Client>),
    User(Vec<User>),
    Product(Vec<Product>),
}

impl ExistingRecords {
    pub fn kind(&self) -> RecordKind {
        match self {
            ExistingRecords::Client(_) => RecordKind::Client,
            ExistingRecords::User(_) => RecordKind::User,
            ExistingRecords::Product(_) => RecordKind::Product,
        }
    }

    pub fn empty(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Client => ExistingRecords::Client(Vec::new()),
            RecordKind::User => ExistingRecords::User(Vec::new()),
            RecordKind::Product => ExistingRecords::Product(Vec::new()),
        }
    }
}

/// Stored records carry a database id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Records a uniqueness check must compare against.
///
/// On update the record being edited is skipped so it never collides with
/// its own stored copy.
pub(crate) fn others<'a, R: Identified>(
    existing: &'a [R],
    own_id: Option<i64>,
) -> impl Iterator<Item = &'a R> + Clone {
    existing
        .iter()
        .filter(move |record| Some(record.id()) != own_id)
}
