use serde::{Deserialize, Serialize};

use crate::services::catalog::{Category, CategoryCatalog};

/// Keyword groups consulted after exact and substring matching, in order.
const DEFAULT_KEYWORD_GROUPS: &[(&str, &[&str])] = &[
    // Food
    (
        "Food",
        &[
            "restaurant",
            "grocery",
            "groceries",
            "supermarket",
            "cafe",
            "coffee",
            "bakery",
            "dining",
            "lunch",
            "dinner",
        ],
    ),
    // Transportation
    (
        "Transportation",
        &["uber", "lyft", "taxi", "fuel", "petrol", "parking", "transit", "toll"],
    ),
    // Bills / utilities
    (
        "Bills",
        &[
            "rent",
            "electricity",
            "utility",
            "internet",
            "water",
            "phone",
            "mortgage",
            "insurance",
        ],
    ),
    // Entertainment
    (
        "Entertainment",
        &["movie", "cinema", "netflix", "spotify", "concert"],
    ),
    // Shopping
    ("Shopping", &["amazon", "clothing", "apparel", "electronics"]),
    // Health
    (
        "Health",
        &["dental", "pharmacy", "doctor", "hospital", "clinic", "medical"],
    ),
    // Education
    ("Education", &["tuition", "school", "course", "textbook"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: String,
}

/// Ordered keyword → category mapping used as the last matching stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    /// Keywords are lower-cased and trimmed; blank keywords or categories are dropped.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter_map(|rule| {
                let keyword = rule.keyword.trim().to_lowercase();
                let category = rule.category.trim().to_string();
                (!keyword.is_empty() && !category.is_empty())
                    .then_some(KeywordRule { keyword, category })
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORD_GROUPS
                .iter()
                .flat_map(|(category, keywords)| {
                    keywords.iter().map(|keyword| KeywordRule {
                        keyword: (*keyword).to_string(),
                        category: (*category).to_string(),
                    })
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    Substring,
    Keyword,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMatch<'a> {
    pub category: &'a Category,
    pub rule: MatchRule,
}

impl CategoryMatch<'_> {
    pub fn name(&self) -> &str {
        &self.category.name
    }
}

/// Infer the catalog category for a free-text expense type (e.g. "Uber ride").
///
/// Stages, first hit wins:
/// - exact name match, ignoring case
/// - substring match in either direction, in catalog order
/// - keyword table, in table order, skipping categories the catalog lacks
/// - the catalog fallback ("Other")
///
/// Blank input goes straight to the fallback. The returned category is always
/// an entry of `catalog`.
pub fn infer_category<'a>(
    expense_type: &str,
    catalog: &'a CategoryCatalog,
    keywords: &KeywordTable,
) -> CategoryMatch<'a> {
    let needle = expense_type.trim().to_lowercase();
    if needle.is_empty() {
        return fallback(catalog);
    }

    if let Some((_, category)) = catalog.folded_entries().find(|(name, _)| *name == needle) {
        return CategoryMatch {
            category,
            rule: MatchRule::Exact,
        };
    }

    // Order-dependent when several names overlap the needle; first entry wins.
    if let Some((_, category)) = catalog
        .folded_entries()
        .find(|(name, _)| needle.contains(name) || name.contains(needle.as_str()))
    {
        return CategoryMatch {
            category,
            rule: MatchRule::Substring,
        };
    }

    let keyword_hit = keywords
        .rules()
        .iter()
        .filter(|rule| needle.contains(rule.keyword.as_str()))
        .find_map(|rule| catalog.find(&rule.category));
    if let Some(category) = keyword_hit {
        return CategoryMatch {
            category,
            rule: MatchRule::Keyword,
        };
    }

    fallback(catalog)
}

fn fallback(catalog: &CategoryCatalog) -> CategoryMatch<'_> {
    CategoryMatch {
        category: catalog.fallback(),
        rule: MatchRule::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::{infer_category, KeywordRule, KeywordTable, MatchRule};
    use crate::services::catalog::{default_expense_catalog, Category, CategoryCatalog};

    fn infer(expense_type: &str) -> (String, MatchRule) {
        let catalog = default_expense_catalog();
        let matched = infer_category(expense_type, &catalog, &KeywordTable::default());
        (matched.name().to_string(), matched.rule)
    }

    fn rule(keyword: &str, category: &str) -> KeywordRule {
        KeywordRule {
            keyword: keyword.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn every_catalog_name_matches_itself() {
        let catalog = default_expense_catalog();
        let keywords = KeywordTable::default();
        for category in catalog.entries() {
            let matched = infer_category(&category.name, &catalog, &keywords);
            assert_eq!(matched.name(), category.name);
            assert_eq!(matched.rule, MatchRule::Exact);
        }
    }

    #[test]
    fn blank_input_falls_back() {
        assert_eq!(infer(""), ("Other".to_string(), MatchRule::Fallback));
        assert_eq!(infer("  \t\n"), ("Other".to_string(), MatchRule::Fallback));
    }

    #[test]
    fn keyword_table_resolves_common_labels() {
        assert_eq!(infer("restaurant"), ("Food".to_string(), MatchRule::Keyword));
        assert_eq!(infer("uber"), ("Transportation".to_string(), MatchRule::Keyword));
        assert_eq!(infer("Uber ride").0, "Transportation");
        assert_eq!(infer("Electricity bill").0, "Bills");
        assert_eq!(infer("dental checkup").0, "Health");
        assert_eq!(infer("Tuition fee").0, "Education");
        assert_eq!(infer("grandrestaurant").0, "Food");
    }

    #[test]
    fn exact_match_ignores_case_and_padding() {
        assert_eq!(infer("  SHOPPING "), ("Shopping".to_string(), MatchRule::Exact));
    }

    #[test]
    fn substring_matches_in_both_directions() {
        assert_eq!(infer("fast food"), ("Food".to_string(), MatchRule::Substring));
        assert_eq!(infer("entertain"), ("Entertainment".to_string(), MatchRule::Substring));
    }

    #[test]
    fn substring_match_follows_catalog_order() {
        let catalog = CategoryCatalog::new(vec![
            Category::new("Car", ""),
            Category::new("Car Rental", ""),
        ])
        .unwrap();
        let matched = infer_category("car rental deposit", &catalog, &KeywordTable::default());
        assert_eq!(matched.name(), "Car");
        assert_eq!(matched.rule, MatchRule::Substring);
    }

    #[test]
    fn unknown_label_falls_back() {
        assert_eq!(
            infer("completely-unrecognized-xyz"),
            ("Other".to_string(), MatchRule::Fallback)
        );
    }

    #[test]
    fn inference_is_idempotent() {
        let catalog = default_expense_catalog();
        let keywords = KeywordTable::default();
        for label in ["Uber ride", "groceries", "", "zzz", "Bills"] {
            assert_eq!(
                infer_category(label, &catalog, &keywords),
                infer_category(label, &catalog, &keywords)
            );
        }
    }

    #[test]
    fn skips_keywords_for_categories_missing_from_catalog() {
        let catalog = CategoryCatalog::new(vec![Category::new("Bills", "")]).unwrap();
        let keywords = KeywordTable::new(vec![
            rule("dental", "Health"),
            rule("insurance", "Bills"),
        ]);

        let only_missing = infer_category("dental", &catalog, &keywords);
        assert_eq!(only_missing.name(), "Other");
        assert_eq!(only_missing.rule, MatchRule::Fallback);

        let later_hit = infer_category("dental insurance", &catalog, &keywords);
        assert_eq!(later_hit.name(), "Bills");
        assert_eq!(later_hit.rule, MatchRule::Keyword);
    }

    #[test]
    fn keyword_results_use_catalog_casing() {
        let catalog = CategoryCatalog::new(vec![Category::new("food", "")]).unwrap();
        let keywords = KeywordTable::new(vec![rule("  PIZZA ", "Food")]);
        assert_eq!(infer_category("pizza night", &catalog, &keywords).name(), "food");
    }

    #[test]
    fn returned_names_always_come_from_catalog() {
        let catalog = CategoryCatalog::new(vec![Category::new("Food", "")]).unwrap();
        let keywords = KeywordTable::default();
        for label in ["uber", "rent", "movie", "restaurant", "x", "", "other"] {
            let name = infer_category(label, &catalog, &keywords).name().to_string();
            assert!(catalog.entries().iter().any(|c| c.name == name), "{name}");
        }
    }

    #[test]
    fn table_drops_blank_rules() {
        let table = KeywordTable::new(vec![rule(" ", "Food"), rule("pizza", " "), rule("Taco", "Food")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rules()[0].keyword, "taco");
        assert!(KeywordTable::default().len() >= 30);
    }
}
