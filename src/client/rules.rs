use super::{Position, TagMask};

/// Initial placement for windows whose class, instance and title contain
/// the given substrings. Absent fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub title: Option<String>,
    pub tags: TagMask,
    pub position: Position,
    pub monitor: Option<usize>,
}

impl Rule {
    pub fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        let contains = |pattern: &Option<String>, value: &str| {
            pattern.as_deref().is_none_or(|p| value.contains(p))
        };

        contains(&self.class, class)
            && contains(&self.instance, instance)
            && contains(&self.title, title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleOutcome {
    pub tags: TagMask,
    pub position: Position,
    pub monitor: Option<usize>,
}

/// Fold every matching rule in order: tags accumulate, the last match sets
/// the position and the last match naming an existing monitor picks it.
pub fn apply_rules(
    rules: &[Rule],
    class: &str,
    instance: &str,
    title: &str,
    monitor_count: usize,
) -> RuleOutcome {
    rules
        .iter()
        .filter(|rule| rule.matches(class, instance, title))
        .fold(RuleOutcome::default(), |mut outcome, rule| {
            outcome.tags |= rule.tags;
            outcome.position = rule.position;
            if let Some(m) = rule.monitor.filter(|&m| m < monitor_count) {
                outcome.monitor = Some(m);
            }
            outcome
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: Option<&str>, tags: TagMask, position: Position) -> Rule {
        Rule {
            class: class.map(String::from),
            tags,
            position,
            ..Rule::default()
        }
    }

    #[test]
    fn substring_matching_on_all_fields() {
        let r = Rule {
            class: Some("irefox".into()),
            title: Some("Private".into()),
            ..Rule::default()
        };

        assert!(r.matches("Firefox", "Navigator", "Private Browsing"));
        assert!(!r.matches("Firefox", "Navigator", "Mozilla"));
        assert!(Rule::default().matches("", "", ""));
    }

    #[test]
    fn later_rules_override_position_and_accumulate_tags() {
        let rules = vec![
            rule(None, 0, Position::Tiled),
            rule(Some("Gimp"), 1 << 3, Position::None),
            rule(Some("Gimp"), 1 << 4, Position::Center),
        ];

        let outcome = apply_rules(&rules, "Gimp", "gimp", "GNU Image", 1);
        assert_eq!(outcome.tags, (1 << 3) | (1 << 4));
        assert_eq!(outcome.position, Position::Center);

        let outcome = apply_rules(&rules, "st", "st", "zsh", 1);
        assert_eq!(outcome, RuleOutcome {
            tags: 0,
            position: Position::Tiled,
            monitor: None
        });
    }

    #[test]
    fn monitors_that_do_not_exist_are_ignored() {
        let rules = vec![
            Rule {
                monitor: Some(1),
                ..Rule::default()
            },
            Rule {
                monitor: Some(4),
                ..Rule::default()
            },
        ];

        assert_eq!(apply_rules(&rules, "a", "b", "c", 2).monitor, Some(1));
        assert_eq!(apply_rules(&rules, "a", "b", "c", 1).monitor, None);
    }
}
