//! Column role classification by keyword substring.
//!
//! Roles are assigned from column names alone. Matching is a best-effort
//! heuristic: false positives and misses are expected behavior.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheetviz_sheet::CleanedTable;
use unicode_normalization::UnicodeNormalization;

/// Semantic category of a column, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Quantity,
    MonetaryAmount,
    ProductIdentifier,
    Unclassified,
}

/// One row of the rule table: a role and the substrings that select it.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: ColumnRole,
    pub keywords: &'static [&'static str],
}

/// Keywords are matched against the lower-cased, NFC-normalized column name.
pub const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::Quantity,
        keywords: &["lượng"],
    },
    RoleRule {
        role: ColumnRole::MonetaryAmount,
        keywords: &["thành", "tiền"],
    },
    RoleRule {
        role: ColumnRole::ProductIdentifier,
        keywords: &["sản phẩm", "sp"],
    },
];

/// Column names bucketed by role, each bucket in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    buckets: IndexMap<ColumnRole, Vec<String>>,
    unclassified: Vec<String>,
}

impl Classification {
    fn empty() -> Self {
        Self {
            buckets: ROLE_RULES
                .iter()
                .map(|rule| (rule.role, Vec::new()))
                .collect(),
            unclassified: Vec::new(),
        }
    }

    /// Columns assigned to `role`, in column order.
    #[must_use]
    pub fn columns(&self, role: ColumnRole) -> &[String] {
        if role == ColumnRole::Unclassified {
            return &self.unclassified;
        }
        self.buckets.get(&role).map_or(&[] as &[String], Vec::as_slice)
    }

    /// The first column assigned to `role`.
    #[must_use]
    pub fn first(&self, role: ColumnRole) -> Option<&str> {
        self.columns(role).first().map(String::as_str)
    }

    /// Columns that matched no rule.
    #[must_use]
    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }

    /// True when no column matched any role.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Roles whose keywords appear in `name`. Empty when nothing matches.
#[must_use]
pub fn roles_for(name: &str) -> Vec<ColumnRole> {
    let folded = fold(name);
    ROLE_RULES
        .iter()
        .filter(|rule| rule.keywords.iter().any(|kw| folded.contains(&fold(kw))))
        .map(|rule| rule.role)
        .collect()
}

/// Classify column names. A column may land in several buckets.
#[must_use]
pub fn classify_columns<S: AsRef<str>>(names: &[S]) -> Classification {
    let mut classification = Classification::empty();
    for name in names {
        let name = name.as_ref();
        let roles = roles_for(name);
        if roles.is_empty() {
            classification.unclassified.push(name.to_string());
        }
        for role in roles {
            classification
                .buckets
                .entry(role)
                .or_default()
                .push(name.to_string());
        }
    }
    classification
}

/// Classify the columns of a cleaned sheet.
#[must_use]
pub fn classify(table: &CleanedTable) -> Classification {
    classify_columns(table.columns())
}
