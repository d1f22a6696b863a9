//! Validation of resolved contexts

use std::collections::BTreeSet;

use crate::node::{Mapping, Node};
use crate::{Error, Result};

/// Character template variable names may not contain.
pub const DISALLOWED_KEY_CHAR: char = '-';

/// Reject the context if any key, at any depth, contains a dash.
///
/// Only nested mappings are descended into; mappings inside sequences, such
/// as template list entries, are left alone. All offending names are
/// reported at once, sorted and de-duplicated.
pub fn validate_names(context: &Mapping) -> Result<()> {
    let mut keys = BTreeSet::new();
    collect_keys(context, &mut keys);

    let names: Vec<String> = keys
        .into_iter()
        .filter(|key| key.contains(DISALLOWED_KEY_CHAR))
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidKeyNames { names })
    }
}

fn collect_keys<'a>(map: &'a Mapping, keys: &mut BTreeSet<&'a str>) {
    for (key, value) in map {
        keys.insert(key);
        if let Node::Mapping(nested) = value {
            collect_keys(nested, keys);
        }
    }
}

/// Require every name in `required` to be set at the top level.
///
/// A name counts as missing when it is absent, null or the empty string.
/// All missing names are reported together, in the order given.
pub fn check_required<S: AsRef<str>>(context: &Mapping, required: &[S]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| context.get(*name).is_none_or(Node::is_blank))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingRequiredVars {
            missing,
            required: required.iter().map(|name| name.as_ref().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_valid_names_pass() {
        assert!(validate_names(&map("{good: 1, nested: {also_good: [1, 2]}}")).is_ok());
    }

    #[test]
    fn test_dashed_key_is_rejected() {
        let err = validate_names(&map("{good: 1, my-var: 2}")).unwrap_err();
        match err {
            Error::InvalidKeyNames { names } => assert_eq!(names, vec!["my-var"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_names_sorted_and_deduplicated() {
        let context = map("{z-top: 1, app: {x-b: 1, inner: {x-a: 2}}, other: {x-b: 3}}");
        let err = validate_names(&context).unwrap_err();
        match err {
            Error::InvalidKeyNames { names } => assert_eq!(names, vec!["x-a", "x-b", "z-top"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_keys_inside_sequences_are_not_checked() {
        assert!(validate_names(&map("{templates: [{template: a.j2, some-tag: x}]}")).is_ok());
        assert!(validate_names(&map("{matrix: [[{a-b: 1}]]}")).is_ok());
    }

    #[test]
    fn test_dashes_in_values_are_fine() {
        assert!(validate_names(&map("{image: nginx-alpine, args: [--verbose]}")).is_ok());
    }

    #[test]
    fn test_check_required_reports_only_empty() {
        let err = check_required(&map("{a: x, b: ''}"), &["a", "b"]).unwrap_err();
        match err {
            Error::MissingRequiredVars { missing, required } => {
                assert_eq!(missing, vec!["b"]);
                assert_eq!(required, vec!["a", "b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_required_aggregates_in_request_order() {
        let err = check_required(&map("{present: 1, blank: ~}"), &["zeta", "blank", "present", "alpha"])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredVars { missing, .. } if missing == vec!["zeta", "blank", "alpha"]
        ));
    }

    #[test]
    fn test_check_required_accepts_non_string_values() {
        let context = map("{port: 0, debug: false, list: [], nested: {}}");
        assert!(check_required(&context, &["port", "debug", "list", "nested"]).is_ok());
    }

    #[test]
    fn test_check_required_only_looks_at_top_level() {
        let err = check_required(&map("{nested: {token: abc}}"), &["token"]).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredVars { .. }));
    }
}
