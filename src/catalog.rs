//! Fixed table of supported job types.
//!
//! Durations are expressed in abstract time units; the worker scales them by
//! the configured `time_unit_ms`.

use crate::error::{Result, WorkerError};

/// Duration used by the executor for a type that is not in the catalog.
pub const DEFAULT_DURATION_UNITS: u32 = 2;

/// One entry of the job type catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTypeSpec {
    pub name: &'static str,
    pub duration_units: u32,
    pub description: &'static str,
}

const JOB_TYPES: &[JobTypeSpec] = &[
    JobTypeSpec {
        name: "email",
        duration_units: 2,
        description: "Send email",
    },
    JobTypeSpec {
        name: "image",
        duration_units: 5,
        description: "Process image",
    },
    JobTypeSpec {
        name: "data_sync",
        duration_units: 3,
        description: "Sync data",
    },
    JobTypeSpec {
        name: "report",
        duration_units: 4,
        description: "Generate report",
    },
];

/// Read-only view over the job type table.
pub struct JobCatalog;

impl JobCatalog {
    pub fn all() -> &'static [JobTypeSpec] {
        JOB_TYPES
    }

    pub fn lookup(name: &str) -> Option<&'static JobTypeSpec> {
        JOB_TYPES.iter().find(|spec| spec.name == name)
    }

    /// Names of every supported type, in catalog order.
    pub fn names() -> Vec<String> {
        JOB_TYPES.iter().map(|spec| spec.name.to_string()).collect()
    }

    /// Returns the catalog entry for `name` or an `InvalidJobType` error
    /// listing every valid name.
    pub fn validate(name: &str) -> Result<&'static JobTypeSpec> {
        Self::lookup(name).ok_or_else(|| WorkerError::InvalidJobType {
            given: name.to_string(),
            valid: Self::names(),
        })
    }

    /// Simulated duration in units. Unknown types get the default.
    pub fn duration_units(name: &str) -> u32 {
        Self::lookup(name)
            .map(|spec| spec.duration_units)
            .unwrap_or(DEFAULT_DURATION_UNITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_published_table() {
        let table: Vec<(&str, u32, &str)> = JobCatalog::all()
            .iter()
            .map(|s| (s.name, s.duration_units, s.description))
            .collect();
        assert_eq!(
            table,
            vec![
                ("email", 2, "Send email"),
                ("image", 5, "Process image"),
                ("data_sync", 3, "Sync data"),
                ("report", 4, "Generate report"),
            ]
        );
    }

    #[test]
    fn validate_rejects_unknown_type() {
        let err = JobCatalog::validate("bogus").unwrap_err();
        match err {
            WorkerError::InvalidJobType { given, valid } => {
                assert_eq!(given, "bogus");
                assert_eq!(valid, vec!["email", "image", "data_sync", "report"]);
            }
            other => panic!("expected InvalidJobType, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_falls_back_to_default_duration() {
        assert_eq!(JobCatalog::duration_units("image"), 5);
        assert_eq!(JobCatalog::duration_units("fax"), DEFAULT_DURATION_UNITS);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(JobCatalog::lookup("Email").is_none());
        assert!(JobCatalog::lookup("email").is_some());
    }
}
