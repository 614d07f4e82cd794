//! Person nodes.

use geno_core::EntityId;
use serde::{Deserialize, Serialize};

/// Gender marker, drawn as the node shape by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    #[default]
    Unknown,
}

impl Gender {
    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non_binary",
            Gender::Unknown => "unknown",
        }
    }
}

/// A person in the family graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identity, never reassigned
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    /// Marks the client the genogram is drawn around
    #[serde(default)]
    pub is_client: bool,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Person {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: Gender::Unknown,
            birth_year: None,
            death_year: None,
            is_client: false,
            memo: None,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn with_death_year(mut self, year: i32) -> Self {
        self.death_year = Some(year);
        self
    }

    pub fn as_client(mut self) -> Self {
        self.is_client = true;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn is_deceased(&self) -> bool {
        self.death_year.is_some()
    }
}

/// Partial change to a [`Person`]. The id is not editable.
///
/// Optional-of-optional fields distinguish "leave as is" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_year: Option<Option<i32>>,
    pub death_year: Option<Option<i32>>,
    pub is_client: Option<bool>,
    pub memo: Option<Option<String>>,
}

impl PersonUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.birth_year.is_none()
            && self.death_year.is_none()
            && self.is_client.is_none()
            && self.memo.is_none()
    }

    /// Produce the updated record, leaving `person` untouched.
    pub fn apply_to(&self, person: &Person) -> Person {
        let mut next = person.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(gender) = self.gender {
            next.gender = gender;
        }
        if let Some(birth_year) = self.birth_year {
            next.birth_year = birth_year;
        }
        if let Some(death_year) = self.death_year {
            next.death_year = death_year;
        }
        if let Some(is_client) = self.is_client {
            next.is_client = is_client;
        }
        if let Some(memo) = &self.memo {
            next.memo = memo.clone();
        }
        next
    }
}
