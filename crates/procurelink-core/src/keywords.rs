//! Keyword classification of procurement free text.
//!
//! Matching is a case-insensitive substring scan. It is a heuristic: the rule
//! set comes from configuration and callers treat the result as a hint.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Maintenance,
    Fuel,
    Insurance,
    Software,
    Hardware,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Maintenance,
        Category::Fuel,
        Category::Insurance,
        Category::Software,
        Category::Hardware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Maintenance => "maintenance",
            Category::Fuel => "fuel",
            Category::Insurance => "insurance",
            Category::Software => "software",
            Category::Hardware => "hardware",
        }
    }

    fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Maintenance => &["manutenzione", "riparazione", "revisione", "tagliando"],
            Category::Fuel => &["carburante", "benzina", "diesel", "rifornimento"],
            Category::Insurance => &["assicurazione", "polizza", "copertura"],
            Category::Software => &["software", "licenza", "programma", "applicazione"],
            Category::Hardware => &["hardware", "computer", "stampante", "monitor"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword lists per category, checked in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordRules {
    rules: IndexMap<Category, Vec<String>>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            rules: Category::ALL
                .iter()
                .map(|c| {
                    let words = c.default_keywords().iter().map(|w| w.to_string()).collect();
                    (*c, words)
                })
                .collect(),
        }
    }
}

impl KeywordRules {
    /// Rules with no categories at all.
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Replaces the keyword list of one category. Keywords are lowercased.
    pub fn set(&mut self, category: Category, keywords: impl IntoIterator<Item = impl Into<String>>) {
        let words = keywords
            .into_iter()
            .map(|w| w.into().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self.rules.insert(category, words);
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.rules.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every category with at least one keyword contained in `text`.
    pub fn classify(&self, text: &str) -> Vec<Category> {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .filter(|(_, words)| words.iter().any(|w| text.contains(w.to_lowercase().as_str())))
            .map(|(category, _)| *category)
            .collect()
    }

    pub fn matches(&self, category: Category, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords(category)
            .iter()
            .any(|w| text.contains(w.to_lowercase().as_str()))
    }
}
