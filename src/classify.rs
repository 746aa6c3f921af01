//! Keyword-based classification of transaction descriptions into spending categories.
//!
//! Classification is a walk down an ordered table of rules. The first rule with a keyword that
//! appears anywhere in the lower-cased description wins, even if a later rule would match more
//! keywords. Adding a category is a matter of adding a row to the table.

use crate::model::TransactionKind;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The label given to every income transaction.
pub const INCOME: &str = "income";

/// The label given to an expense that no rule matched.
pub const OTHER: &str = "other";

/// The built-in rules, in priority order.
const BUILT_IN: &[(&str, &[&str])] = &[
    (
        "groceries",
        &[
            "grocery",
            "supermarket",
            "bigbasket",
            "vegetables",
            "fruits",
            "milk",
            "bread",
        ],
    ),
    (
        "transport",
        &[
            "uber", "ola", "rapido", "bus", "train", "taxi", "auto", "petrol", "diesel",
        ],
    ),
    (
        "food",
        &[
            "restaurant",
            "lunch",
            "dinner",
            "breakfast",
            "cafe",
            "coffee",
            "tea",
            "zomato",
            "swiggy",
        ],
    ),
    (
        "entertainment",
        &[
            "movie", "netflix", "prime", "hotstar", "concert", "game", "outing",
        ],
    ),
    (
        "shopping",
        &[
            "clothes", "shoes", "amazon", "flipkart", "myntra", "ajio", "shopping",
        ],
    ),
    (
        "utilities",
        &[
            "electricity",
            "water",
            "internet",
            "wifi",
            "mobile",
            "recharge",
            "bill",
        ],
    ),
    (
        "healthcare",
        &["hospital", "doctor", "medicine", "medical", "pharmacy"],
    ),
    (
        "education",
        &["books", "course", "tuition", "school", "college"],
    ),
];

/// One row of the classification table: a category and the keywords that select it.
///
/// In `config.json` this looks like `{"category": "pets", "keywords": ["vet", "kibble"]}`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    category: String,
    keywords: Vec<String>,
}

impl KeywordRule {
    /// Creates a rule. The category and keywords are lower-cased and trimmed; blank keywords are
    /// dropped since they would match every description.
    pub fn new<S, I, K>(category: S, keywords: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            category: category.as_ref().trim().to_lowercase(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// `text` must already be lower-cased.
    fn matches(&self, text: &str) -> bool {
        !self.category.is_empty() && self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

/// An ordered classification table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Classifier {
    rules: Vec<KeywordRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: built_in_rules(),
        }
    }
}

impl Classifier {
    /// A classifier that consults `rules` first, in the given order, and then the built-in table.
    pub fn with_rules(rules: impl IntoIterator<Item = KeywordRule>) -> Self {
        let mut all: Vec<KeywordRule> = rules.into_iter().collect();
        all.extend(built_in_rules());
        Self { rules: all }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Picks a category label for a transaction. Never fails: income is always `income` and an
    /// expense that matches nothing is `other`.
    pub fn classify(&self, description: &str, kind: TransactionKind) -> String {
        if kind == TransactionKind::Income {
            return INCOME.to_string();
        }
        let text = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| OTHER.to_string())
    }
}

/// Classifies with the built-in table only.
pub fn classify(description: &str, kind: TransactionKind) -> String {
    static BUILT_IN_CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
    BUILT_IN_CLASSIFIER
        .get_or_init(Classifier::default)
        .classify(description, kind)
}

fn built_in_rules() -> Vec<KeywordRule> {
    BUILT_IN
        .iter()
        .map(|(category, keywords)| KeywordRule::new(category, keywords.iter()))
        .collect()
}
