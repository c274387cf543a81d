use crate::aircraft::{Aircraft, Registration};
use crate::error::{Error, Result};
use crate::instructor::{Instructor, InstructorId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Aircraft,
    Instructor,
}

/// Something a flight occupies: an aircraft by registration or an instructor by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Aircraft(Registration),
    Instructor(InstructorId),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Aircraft(_) => ResourceKind::Aircraft,
            Resource::Instructor(_) => ResourceKind::Instructor,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Resource::Aircraft(key) | Resource::Instructor(key) => &**key,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Aircraft(reg) => write!(f, "aircraft {}", reg),
            Resource::Instructor(id) => write!(f, "instructor {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a resource, expected ac:<registration> or in:<instructor id>")]
pub struct ResourceParseError(pub String);

impl FromStr for Resource {
    type Err = ResourceParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("ac", key)) if !key.is_empty() => Ok(Resource::Aircraft(key.into())),
            Some(("in", key)) if !key.is_empty() => Ok(Resource::Instructor(key.into())),
            _ => Err(ResourceParseError(s.to_string())),
        }
    }
}

/// Read-only fleet and staff catalogs, kept in the order they were loaded.
#[derive(Debug, Default)]
pub struct Directory {
    aircraft: Vec<Aircraft>,
    instructors: Vec<Instructor>,
}

impl Directory {
    pub fn new(aircraft: Vec<Aircraft>, instructors: Vec<Instructor>) -> Result<Directory> {
        let mut registrations = HashSet::new();
        if let Some(dup) = aircraft
            .iter()
            .find(|a| !registrations.insert(a.registration.clone()))
        {
            return Err(Error::Config(format!(
                "registration {} is used by more than one aircraft",
                dup.registration
            )));
        }

        let mut ids = HashSet::new();
        if let Some(dup) = instructors.iter().find(|i| !ids.insert(i.id.clone())) {
            return Err(Error::Config(format!(
                "instructor id {} is used more than once",
                dup.id
            )));
        }

        Ok(Directory {
            aircraft,
            instructors,
        })
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    pub fn aircraft_by_registration(&self, registration: &str) -> Option<&Aircraft> {
        self.aircraft
            .iter()
            .find(|a| &*a.registration == registration)
    }

    pub fn instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructors.iter().find(|i| &*i.id == id)
    }

    /// Looks an instructor up by id, falling back to display name.
    ///
    /// A name only resolves when exactly one instructor carries it.
    pub fn resolve_instructor(&self, key: &str) -> Option<&Instructor> {
        self.instructor(key).or_else(|| {
            let mut named = self.instructors.iter().filter(|i| i.name == key);
            match (named.next(), named.next()) {
                (Some(found), None) => Some(found),
                _ => None,
            }
        })
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        match resource {
            Resource::Aircraft(reg) => self.aircraft_by_registration(reg).is_some(),
            Resource::Instructor(id) => self.instructor(id).is_some(),
        }
    }

    pub fn is_pair_authorized(&self, registration: &str, instructor_id: &str) -> bool {
        self.instructor(instructor_id)
            .map_or(false, |i| i.is_authorized_for(registration))
    }

    /// Human-facing label: the registration for aircraft, the name for instructors.
    pub fn display_name(&self, resource: &Resource) -> String {
        match resource {
            Resource::Aircraft(reg) => reg.to_string(),
            Resource::Instructor(id) => self
                .instructor(id)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| id.to_string()),
        }
    }

    /// Instructors allowed on at least one of `registrations`.
    pub fn instructors_for_any(&self, registrations: &[Registration]) -> Vec<&Instructor> {
        self.instructors
            .iter()
            .filter(|i| registrations.iter().any(|r| i.is_authorized_for(r)))
            .collect()
    }

    /// Aircraft that at least one of `instructor_ids` may fly.
    pub fn aircraft_for_any(&self, instructor_ids: &[InstructorId]) -> Vec<&Aircraft> {
        let chosen = instructor_ids
            .iter()
            .filter_map(|id| self.instructor(id))
            .collect::<Vec<_>>();
        self.aircraft
            .iter()
            .filter(|a| chosen.iter().any(|i| i.is_authorized_for(&a.registration)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::tests::utils::{aircraft, id, instructor};

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let result = Directory::new(vec![aircraft("1", "N1"), aircraft("2", "N1")], vec![]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_duplicate_instructor_id_is_rejected() {
        let result = Directory::new(
            vec![],
            vec![instructor("1", "Ann", &[]), instructor("1", "Bob", &[])],
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_instructor_prefers_id_and_needs_unique_name() {
        let directory = Directory::new(
            vec![],
            vec![
                instructor("1", "Ann", &[]),
                instructor("2", "Bob", &[]),
                instructor("3", "Bob", &[]),
                instructor("Ann", "Cid", &[]),
            ],
        )
        .unwrap();

        assert_eq!(Some(id("2")), directory.resolve_instructor("2").map(|i| i.id.clone()));
        assert_eq!(Some(id("Ann")), directory.resolve_instructor("Ann").map(|i| i.id.clone()));
        assert_eq!(Some(id("Ann")), directory.resolve_instructor("Cid").map(|i| i.id.clone()));
        assert!(directory.resolve_instructor("Bob").is_none());
        assert!(directory.resolve_instructor("Dee").is_none());
    }

    #[test]
    fn test_filter_candidates() {
        let directory = Directory::new(
            vec![aircraft("1", "N1"), aircraft("2", "N2"), aircraft("3", "N3")],
            vec![
                instructor("1", "Ann", &["N1"]),
                instructor("2", "Bob", &["N2", "N3"]),
                instructor("3", "Cid", &[]),
            ],
        )
        .unwrap();

        let names = directory
            .instructors_for_any(&[id("N1"), id("N3")])
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(vec!["Ann", "Bob"], names);

        let regs = directory
            .aircraft_for_any(&[id("2"), id("3"), id("missing")])
            .iter()
            .map(|a| a.registration.clone())
            .collect::<Vec<_>>();
        assert_eq!(vec![id("N2"), id("N3")], regs);
    }

    #[test]
    fn test_resource_parsing() {
        assert_eq!(Ok(Resource::Aircraft(id("N1"))), "ac:N1".parse());
        assert_eq!(Ok(Resource::Instructor(id("7"))), "in:7".parse());
        assert!("N1".parse::<Resource>().is_err());
        assert!("ac:".parse::<Resource>().is_err());
        assert_eq!(ResourceKind::Instructor, Resource::Instructor(id("7")).kind());
    }
}
