use serde::{Deserialize, Serialize};

/// Name of the catch-all category every catalog carries.
pub const FALLBACK_CATEGORY: &str = "Other";

const FALLBACK_COLOR: &str = "#64748b";

/// Expense colours, grouped essentials / lifestyle / financial / other.
const EXPENSE_CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Housing", "#8b5cf6"),
    ("Utilities", "#6366f1"),
    ("Food", "#f97316"),
    ("Groceries", "#f59e0b"),
    ("Transportation", "#84cc16"),
    ("Entertainment", "#ec4899"),
    ("Shopping", "#d946ef"),
    ("Dining Out", "#f43f5e"),
    ("Travel", "#0ea5e9"),
    ("Health", "#14b8a6"),
    ("Debt Payment", "#ef4444"),
    ("Insurance", "#3b82f6"),
    ("Savings", "#10b981"),
    ("Investments", "#22c55e"),
    ("Education", "#6b7280"),
    ("Gifts", "#d97706"),
    ("Charity", "#7c3aed"),
    ("Miscellaneous", "#94a3b8"),
    ("Other", FALLBACK_COLOR),
];

const INCOME_SOURCE_COLORS: &[(&str, &str)] = &[
    ("Salary", "#10b981"),
    ("Freelance", "#22c55e"),
    ("Business", "#16a34a"),
    ("Investments", "#84cc16"),
    ("Rental Income", "#65a30d"),
    ("Interest", "#0ea5e9"),
    ("Dividends", "#0284c7"),
    ("Gifts", "#6366f1"),
    ("Other", FALLBACK_COLOR),
];

const HASH_PALETTE: [&str; 8] = [
    "#22c55e", "#ef4444", "#3b82f6", "#f97316", "#8b5cf6", "#f59e0b", "#10b981", "#ec4899",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Catalog entry as it appears in configuration files and request bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Category catalog must contain at least one category.")]
    Empty,
    #[error("Category names cannot be blank.")]
    BlankName,
    #[error("Duplicate category name: {0}.")]
    DuplicateName(String),
}

/// Ordered list of valid categories.
///
/// Names are unique ignoring case and the catalog always holds a fallback
/// entry, so every name handed out by inference can be submitted as-is.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    entries: Vec<Category>,
    folded: Vec<String>,
    fallback: usize,
}

impl CategoryCatalog {
    pub fn new(entries: Vec<Category>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut cleaned: Vec<Category> = Vec::with_capacity(entries.len() + 1);
        let mut folded: Vec<String> = Vec::with_capacity(entries.len() + 1);
        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(CatalogError::BlankName);
            }
            let key = name.to_lowercase();
            if folded.contains(&key) {
                return Err(CatalogError::DuplicateName(name.to_string()));
            }
            let color = match entry.color.trim() {
                "" => default_color_for(name),
                color => color.to_string(),
            };
            cleaned.push(Category::new(name, color));
            folded.push(key);
        }

        let fallback_key = FALLBACK_CATEGORY.to_lowercase();
        let fallback = match folded.iter().position(|key| *key == fallback_key) {
            Some(index) => index,
            None => {
                cleaned.push(Category::new(FALLBACK_CATEGORY, FALLBACK_COLOR));
                folded.push(fallback_key);
                cleaned.len() - 1
            }
        };

        Ok(Self {
            entries: cleaned,
            folded,
            fallback,
        })
    }

    pub fn from_seeds(seeds: Vec<CategorySeed>) -> Result<Self, CatalogError> {
        Self::new(
            seeds
                .into_iter()
                .map(|seed| Category::new(seed.name, seed.color.unwrap_or_default()))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[Category] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn fallback(&self) -> &Category {
        &self.entries[self.fallback]
    }

    /// Case-insensitive lookup returning the canonical entry.
    pub fn find(&self, name: &str) -> Option<&Category> {
        let key = name.trim().to_lowercase();
        self.folded
            .iter()
            .position(|candidate| *candidate == key)
            .map(|index| &self.entries[index])
    }

    /// Entries paired with their lower-cased names, in catalog order.
    pub(crate) fn folded_entries(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.folded.iter().map(String::as_str).zip(self.entries.iter())
    }
}

/// Dashboard expense categories plus the ones the default keyword table targets.
pub fn default_expense_catalog() -> CategoryCatalog {
    let entries: Vec<Category> = [
        ("Food", "#f97316"),
        ("Transportation", "#8b5cf6"),
        ("Entertainment", "#22c55e"),
        ("Shopping", "#ec4899"),
        ("Bills", "#3b82f6"),
        ("Health", "#14b8a6"),
        ("Education", "#6b7280"),
        (FALLBACK_CATEGORY, FALLBACK_COLOR),
    ]
    .into_iter()
    .map(|(name, color)| Category::new(name, color))
    .collect();

    CategoryCatalog {
        folded: entries.iter().map(|entry| entry.name.to_lowercase()).collect(),
        fallback: entries.len() - 1,
        entries,
    }
}

pub fn default_color_for(name: &str) -> String {
    EXPENSE_CATEGORY_COLORS
        .iter()
        .chain(INCOME_SOURCE_COLORS.iter())
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, color)| (*color).to_string())
        .unwrap_or_else(|| color_from_string(name).to_string())
}

/// Stable palette pick for names without a predefined colour.
///
/// Matches the dashboard's JavaScript hash: only the shift is truncated to
/// 32 bits, the running sum is not.
pub fn color_from_string(value: &str) -> &'static str {
    let hash = value.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit) + shifted - hash
    });
    HASH_PALETTE[(hash.unsigned_abs() % HASH_PALETTE.len() as u64) as usize]
}
