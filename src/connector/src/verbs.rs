//! Wildcard verb expansion

use std::collections::BTreeSet;

/// The full standard verb set a wildcard expands to.
pub const STANDARD_VERBS: [&str; 8] = [
    "get",
    "list",
    "watch",
    "create",
    "update",
    "patch",
    "delete",
    "deletecollection",
];

/// Per-object verbs exposed as entitlements on inventory kinds
/// (`deletecollection` is a collection-level verb and is not).
pub const RESOURCE_VERBS: [&str; 7] =
    ["get", "list", "watch", "create", "update", "patch", "delete"];

/// Computes the effective verb set of a rule: sorted and deduplicated, with
/// `"*"` or `""` anywhere in the list replacing everything else with the
/// full standard set. An empty input yields an empty output.
pub fn determine_grant_verbs(rule_verbs: &[String]) -> Vec<String> {
    let expand = rule_verbs.iter().any(|verb| verb == "*" || verb.is_empty());
    let verbs: BTreeSet<&str> = if expand {
        STANDARD_VERBS.iter().copied().collect()
    } else {
        rule_verbs.iter().map(String::as_str).collect()
    };
    verbs.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbs(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn wildcard_expands_to_standard_set() {
        let expanded = determine_grant_verbs(&verbs(&["*"]));
        assert_eq!(expanded.len(), 8);
        assert_eq!(expanded, {
            let mut sorted: Vec<String> =
                STANDARD_VERBS.iter().map(|v| v.to_string()).collect();
            sorted.sort();
            sorted
        });
    }

    #[test]
    fn wildcard_replaces_explicit_verbs() {
        // Expansion ignores whatever else the rule lists.
        let with_extras = determine_grant_verbs(&verbs(&["get", "*", "exotic"]));
        assert_eq!(with_extras, determine_grant_verbs(&verbs(&["*"])));
    }

    #[test]
    fn empty_string_verb_expands_too() {
        assert_eq!(
            determine_grant_verbs(&verbs(&["", "get"])),
            determine_grant_verbs(&verbs(&["*"]))
        );
    }

    #[test]
    fn explicit_verbs_are_sorted_and_deduplicated() {
        assert_eq!(
            determine_grant_verbs(&verbs(&["watch", "get", "get", "list"])),
            verbs(&["get", "list", "watch"])
        );
    }

    #[test]
    fn empty_input_yields_no_verbs() {
        assert!(determine_grant_verbs(&[]).is_empty());
    }
}
