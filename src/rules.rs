//! named rules and receipt classification

use serde::{Deserialize, Serialize};

use crate::conditions::Condition;
use crate::receipt::Receipt;

/// a named condition, optionally assigning a category to matching receipts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub when: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>, when: Condition) -> Self {
        Self {
            name: name.into(),
            when,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matches(&self, receipt: &Receipt) -> bool {
        self.when.evaluate(receipt)
    }
}

/// ordered rules applied to receipts
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    first_match: bool,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            first_match: false,
        }
    }

    /// stop at the first matching rule
    pub fn with_first_match(mut self, first_match: bool) -> Self {
        self.first_match = first_match;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// rules matching `receipt`, in declaration order
    pub fn classify(&self, receipt: &Receipt) -> Vec<&Rule> {
        let mut matched = Vec::new();
        for rule in &self.rules {
            if rule.matches(receipt) {
                log::debug!("rule '{}' matched", rule.name);
                matched.push(rule);
                if self.first_match {
                    break;
                }
            }
        }
        matched
    }

    /// category of the first matching rule that assigns one
    pub fn category_for(&self, receipt: &Receipt) -> Option<&str> {
        self.classify(receipt)
            .into_iter()
            .find_map(|rule| rule.category.as_deref())
    }
}
