//! Integration tests for change type grouping and release generation.

use changes::release::{
    ChangeTypeMatcher, EntryGroup, GroupingStrategy, LineTemplate, ReleaseRenderer,
    WithChangeTypeStrategy,
};
use changes::ChangeTypeParseError;

const IMPROVED: &str = "IMPROVED";
const NEW: &str = "NEW";
const IMPROVED_MSG: &str = "IMPROVED -m message";

/// Every label bound to the literal template `IMPROVED`, as authored by
/// a project whose line format was just the word.
fn strategy_with(release_template: &str) -> WithChangeTypeStrategy {
    let candidates = [IMPROVED, NEW]
        .iter()
        .map(|label| LineTemplate::compile(label, IMPROVED).expect("valid line template"))
        .collect();
    WithChangeTypeStrategy::new(
        ChangeTypeMatcher::new(candidates),
        ReleaseRenderer::compile(release_template).expect("valid release template"),
    )
}

fn strategy() -> WithChangeTypeStrategy {
    strategy_with("{{ releaseNumber }}")
}

fn group(label: &str, items: &[&str]) -> EntryGroup {
    EntryGroup {
        label: label.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_creates_group_for_matching_line() {
    let mut strategy = strategy();

    strategy.process_line(IMPROVED_MSG).unwrap();

    assert_eq!(
        strategy.entry_groups().as_slice(),
        &[group(IMPROVED, &[IMPROVED_MSG])]
    );
}

#[test]
fn test_appends_to_existing_group() {
    let mut strategy = strategy();

    strategy.process_line(IMPROVED_MSG).unwrap();
    strategy.process_line("IMPROVED -m new message").unwrap();

    assert_eq!(
        strategy.entry_groups().as_slice(),
        &[group(IMPROVED, &[IMPROVED_MSG, "IMPROVED -m new message"])]
    );
}

#[test]
fn test_known_change_type_without_matching_template() {
    let mut strategy = strategy();

    let err = strategy.process_line("NEW -m message").unwrap_err();

    assert!(err.to_string().contains("unable to parse change type"));
    assert!(matches!(err, ChangeTypeParseError::TemplateMismatch { ref label, .. } if label == NEW));
    assert!(strategy.entry_groups().is_empty());
}

#[test]
fn test_unknown_change_type() {
    let mut strategy = strategy();

    let err = strategy.process_line("SUCCESS -m message").unwrap_err();

    assert!(err.to_string().contains("unable to parse change type"));
    assert!(matches!(err, ChangeTypeParseError::UnknownChangeType { .. }));
    assert!(strategy.entry_groups().is_empty());
}

#[test]
fn test_failed_line_leaves_state_unchanged() {
    let mut strategy = strategy();
    strategy.process_line(IMPROVED_MSG).unwrap();
    let before = strategy.entry_groups().clone();

    assert!(strategy.process_line("SUCCESS -m message").is_err());
    assert!(strategy.process_line("NEW -m message").is_err());

    assert_eq!(strategy.entry_groups(), &before);
}

#[test]
fn test_group_order_is_first_seen() {
    let candidates = ["NEW", "IMPROVED", "FIXED"]
        .iter()
        .map(|label| LineTemplate::compile(label, "{{ changeType }}: {{ message }}").unwrap())
        .collect();
    let mut strategy = WithChangeTypeStrategy::new(
        ChangeTypeMatcher::new(candidates),
        ReleaseRenderer::default(),
    );

    strategy.process_line("FIXED: a").unwrap();
    strategy.process_line("NEW: b").unwrap();
    strategy.process_line("FIXED: c").unwrap();

    assert_eq!(
        strategy.entry_groups().as_slice(),
        &[group("FIXED", &["FIXED: a", "FIXED: c"]), group("NEW", &["NEW: b"])]
    );
}

#[test]
fn test_generate_renders_all_groups_with_release_number() {
    let mut strategy = strategy_with(
        "{{ releaseNumber }}|{% for g in entryGroups %}{{ g.label }}={{ g.items | join(\",\") }};{% endfor %}",
    );
    strategy.process_line(IMPROVED_MSG).unwrap();

    let out = strategy.generate(IMPROVED, "1").unwrap();

    assert_eq!(out, "1|IMPROVED=IMPROVED -m message;");
}

#[test]
fn test_generate_ignores_label_argument() {
    let mut strategy = strategy_with(
        "{% for g in entryGroups %}{{ g.label }}{% endfor %}",
    );
    strategy.process_line(IMPROVED_MSG).unwrap();

    assert_eq!(strategy.generate("SUCCESS", "1").unwrap(), "IMPROVED");
    assert_eq!(strategy.generate(NEW, "1").unwrap(), "IMPROVED");
}

#[test]
fn test_generate_with_no_entries() {
    let strategy = strategy_with("{{ releaseNumber }}:{{ entryGroups | length }}");

    assert_eq!(strategy.generate(IMPROVED, "1").unwrap(), "1:0");
    assert_eq!(strategy.generate("SUCCESS", "1").unwrap(), "1:0");
}

#[test]
fn test_generate_is_repeatable() {
    let mut strategy = strategy_with("{% for g in entryGroups %}{{ g.items | length }}{% endfor %}");
    strategy.process_line(IMPROVED_MSG).unwrap();

    let first = strategy.generate(IMPROVED, "1").unwrap();
    let second = strategy.generate(IMPROVED, "1").unwrap();

    assert_eq!(first, second);
    assert_eq!(strategy.entry_groups().entry_count(), 1);
}
