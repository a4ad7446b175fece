use serde::{Deserialize, Serialize};

use crate::rules::{Rule, RuleSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(self.rules.clone()).with_first_match(self.settings.first_match)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// stop classifying at the first matching rule
    #[serde(default)]
    pub first_match: bool,
}
