//! Name-indexed registry of the shipped benchmark kinds.

use stepmark_core::InvalidModeError;

use crate::kind::BenchmarkKind;
use crate::kinds::{BoxResize, CustomUpdater, Empty, HardSphere};

static KINDS: &[&dyn BenchmarkKind] = &[&HardSphere, &Empty, &CustomUpdater, &BoxResize];

/// Every registered kind, in registration order.
pub fn all() -> &'static [&'static dyn BenchmarkKind] {
    KINDS
}

/// Look up a kind by its registry name, case-insensitively.
pub fn lookup(name: &str) -> Result<&'static dyn BenchmarkKind, InvalidModeError> {
    KINDS
        .iter()
        .copied()
        .find(|kind| kind.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| InvalidModeError::new("benchmark", name, known_names()))
}

fn known_names() -> String {
    KINDS
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_resolves() {
        for kind in all() {
            assert_eq!(lookup(kind.name()).unwrap().name(), kind.name());
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("Hard-Sphere").unwrap().name(), "hard-sphere");
        assert_eq!(lookup("EMPTY").unwrap().name(), "empty");
    }

    #[test]
    fn unknown_name_lists_the_alternatives() {
        let err = lookup("molecular-dynamics").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown benchmark 'molecular-dynamics'"));
        for kind in all() {
            assert!(msg.contains(kind.name()), "missing {} in {msg}", kind.name());
        }
    }

    #[test]
    fn names_are_unique_and_descriptions_nonempty() {
        let mut names: Vec<_> = all().iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all().len());
        for kind in all() {
            assert!(!kind.description().is_empty());
        }
    }
}
