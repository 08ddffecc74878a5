use regex::Regex;
use serde::{Deserialize, Serialize};

/// A find/replace rule applied to text before it is pasted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PasteRule {
    pub find: String,
    pub replace: String,
    #[serde(default)]
    pub is_regex: bool,
}

impl PasteRule {
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            is_regex: false,
        }
    }

    pub fn regex(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            is_regex: true,
            ..Self::literal(find, replace)
        }
    }
}

#[derive(Debug, Clone)]
enum Compiled {
    Skip,
    Literal,
    Pattern(Regex),
}

/// Paste rules with their regular expressions compiled once.
///
/// Rules run in order, each on the output of the previous one. Rules with an
/// empty `find` and regex rules that fail to compile are skipped.
#[derive(Debug, Clone, Default)]
pub struct PasteRuleSet {
    rules: Vec<PasteRule>,
    compiled: Vec<Compiled>,
}

impl PasteRuleSet {
    pub fn new(rules: Vec<PasteRule>) -> Self {
        let compiled = rules
            .iter()
            .map(|rule| {
                if rule.find.is_empty() {
                    Compiled::Skip
                } else if rule.is_regex {
                    match Regex::new(&rule.find) {
                        Ok(re) => Compiled::Pattern(re),
                        Err(e) => {
                            tracing::debug!(pattern = %rule.find, error = %e, "skipping malformed paste rule");
                            Compiled::Skip
                        }
                    }
                } else {
                    Compiled::Literal
                }
            })
            .collect();
        Self { rules, compiled }
    }

    pub fn rules(&self) -> &[PasteRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (rule, compiled) in self.rules.iter().zip(&self.compiled) {
            match compiled {
                Compiled::Skip => {}
                Compiled::Literal => out = out.replace(&rule.find, &rule.replace),
                Compiled::Pattern(re) => {
                    out = re.replace_all(&out, rule.replace.as_str()).into_owned()
                }
            }
        }
        out
    }
}

pub fn apply_paste_rules(text: &str, rules: &[PasteRule]) -> String {
    PasteRuleSet::new(rules.to_vec()).apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_rule_replaces_every_occurrence() {
        let rules = [PasteRule::literal("\r\n", "\n")];
        assert_eq!(apply_paste_rules("a\r\nb\r\n", &rules), "a\nb\n");
    }

    #[test]
    fn rules_apply_in_order() {
        let rules = [PasteRule::literal("a", "b"), PasteRule::literal("b", "c")];
        assert_eq!(apply_paste_rules("ab", &rules), "cc");
    }

    #[test]
    fn regex_rule_expands_groups() {
        let rules = [PasteRule::regex(r"(\w+)@(\w+)", "$2 at $1")];
        assert_eq!(apply_paste_rules("me@host", &rules), "host at me");
    }

    #[test]
    fn malformed_and_empty_rules_are_skipped() {
        let rules = [
            PasteRule::regex("(unclosed", "x"),
            PasteRule::literal("", "y"),
            PasteRule::regex(r"\s+", " "),
        ];
        assert_eq!(apply_paste_rules("a  \t b", &rules), "a b");
    }

    #[test]
    fn regex_flag_defaults_to_false_when_missing() {
        let rule: PasteRule = serde_json::from_str(r#"{"find":"a","replace":"b"}"#).unwrap();
        assert!(!rule.is_regex);
    }
}
