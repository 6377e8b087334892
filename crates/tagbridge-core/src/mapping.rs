//! Product → Tag Mapping
//!
//! A rule applies when its title, case-folded, is a substring of a purchased
//! item's description, case-folded. Every matching rule contributes its tag;
//! a rule titled "Room" therefore matches "Deluxe Room Upgrade".

use crate::model::{ProductTagRule, TagSet};

/// Tag attached to every paying customer
pub const DEFAULT_TAG: &str = "customer";

/// Compute the tags for a checkout from its item descriptions.
///
/// The result always starts with [`DEFAULT_TAG`], followed by matched tags in
/// first-match order with duplicates removed.
pub fn compute_tags<S: AsRef<str>>(descriptions: &[S], rules: &[ProductTagRule]) -> TagSet {
    let mut tags = TagSet::new();
    tags.insert(DEFAULT_TAG);

    let titles: Vec<String> = rules.iter().map(|r| r.title.to_lowercase()).collect();

    for description in descriptions {
        let description = description.as_ref().to_lowercase();
        for (rule, title) in rules.iter().zip(&titles) {
            if description.contains(title.as_str()) {
                tags.insert(rule.tag.clone());
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(title: &str, tag: &str) -> ProductTagRule {
        ProductTagRule::new(title, tag)
    }

    fn tags_of(set: &TagSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn test_no_rules_yields_default_only() {
        let tags = compute_tags(&["Deluxe Room"], &[]);
        assert_eq!(tags_of(&tags), vec!["customer"]);
    }

    #[test]
    fn test_no_items_yields_default_only() {
        let tags = compute_tags::<&str>(&[], &[rule("room", "stay")]);
        assert_eq!(tags_of(&tags), vec!["customer"]);
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let tags = compute_tags(&["Deluxe ROOM Upgrade"], &[rule("room", "stay")]);
        assert_eq!(tags_of(&tags), vec!["customer", "stay"]);
    }

    #[test]
    fn test_longer_title_does_not_match_shorter_description() {
        let tags = compute_tags(&["room"], &[rule("rooms", "stay")]);
        assert_eq!(tags_of(&tags), vec!["customer"]);
    }

    #[test]
    fn test_whitespace_is_significant() {
        let tags = compute_tags(&["Deluxe Room"], &[rule("deluxe  room", "stay")]);
        assert_eq!(tags_of(&tags), vec!["customer"]);
    }

    #[test]
    fn test_all_matching_rules_contribute() {
        let rules = vec![
            rule("room", "stay"),
            rule("deluxe", "premium"),
            rule("breakfast", "food"),
        ];
        let tags = compute_tags(&["Deluxe Room Upgrade"], &rules);
        assert_eq!(tags_of(&tags), vec!["customer", "stay", "premium"]);
    }

    #[test]
    fn test_duplicate_tags_are_collapsed() {
        let rules = vec![
            rule("room", "stay"),
            rule("suite", "stay"),
            rule("room", "stay"),
            rule("spa", "customer"),
        ];
        let tags = compute_tags(&["Room", "Suite", "Spa day", "Room"], &rules);
        assert_eq!(tags_of(&tags), vec!["customer", "stay"]);
    }
}
