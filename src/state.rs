use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::catalog::{default_expense_catalog, CategoryCatalog, CategorySeed};
use crate::services::expense_categorization::{KeywordRule, KeywordTable};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<CategoryCatalog>,
    pub keywords: Arc<KeywordTable>,
}

impl AppState {
    pub fn build(config: AppConfig) -> AppResult<Self> {
        let catalog = match config.category_catalog_path.as_deref() {
            Some(path) => CategoryCatalog::from_seeds(read_json::<Vec<CategorySeed>>(path)?)?,
            None => default_expense_catalog(),
        };
        let keywords = match config.keyword_table_path.as_deref() {
            Some(path) => KeywordTable::new(read_json::<Vec<KeywordRule>>(path)?),
            None => KeywordTable::default(),
        };

        if keywords.is_empty() {
            tracing::warn!("Keyword table is empty; inference uses catalog names only");
        }

        let unreachable = keywords
            .rules()
            .iter()
            .filter(|rule| catalog.find(&rule.category).is_none())
            .count();
        if unreachable > 0 {
            tracing::warn!(
                unreachable,
                "Keyword rules point at categories missing from the catalog; they will be skipped"
            );
        }

        tracing::info!(
            categories = catalog.len(),
            keywords = keywords.len(),
            "Category inference configured"
        );

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            keywords: Arc::new(keywords),
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> AppResult<T> {
    let raw = std::fs::read_to_string(Path::new(path))
        .map_err(|error| AppError::Internal(format!("Could not read {path}: {error}")))?;
    serde_json::from_str(&raw)
        .map_err(|error| AppError::Internal(format!("Could not parse {path}: {error}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::AppState;
    use crate::config::AppConfig;
    use crate::error::AppError;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("fintrack-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_without_files() {
        let state = AppState::build(AppConfig::for_tests()).unwrap();
        assert_eq!(state.catalog.fallback().name, "Other");
        assert!(!state.keywords.is_empty());
    }

    #[test]
    fn loads_catalog_and_keywords_from_files() {
        let mut config = AppConfig::for_tests();
        config.category_catalog_path = Some(write_temp(
            "catalog.json",
            r##"[{"name": "Groceries"}, {"name": "Pets", "color": "#123456"}]"##,
        ));
        config.keyword_table_path = Some(write_temp(
            "keywords.json",
            r#"[{"keyword": "Vet", "category": "Pets"}]"#,
        ));

        let state = AppState::build(config).unwrap();
        let names: Vec<&str> = state.catalog.entries().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Pets", "Other"]);
        assert_eq!(state.keywords.rules()[0].keyword, "vet");
    }

    #[test]
    fn blank_keyword_file_yields_empty_table() {
        let mut config = AppConfig::for_tests();
        config.keyword_table_path = Some(write_temp(
            "blank-keywords.json",
            r#"[{"keyword": "  ", "category": "Food"}]"#,
        ));
        let state = AppState::build(config).unwrap();
        assert!(state.keywords.is_empty());
        assert_eq!(state.catalog.len(), 8);
    }

    #[test]
    fn invalid_catalog_file_is_rejected() {
        let mut config = AppConfig::for_tests();
        config.category_catalog_path = Some(write_temp("empty.json", "[]"));
        assert!(matches!(
            AppState::build(config),
            Err(AppError::UnprocessableEntity(_))
        ));

        let mut config = AppConfig::for_tests();
        config.keyword_table_path = Some("/nonexistent/fintrack/keywords.json".to_string());
        assert!(matches!(AppState::build(config), Err(AppError::Internal(_))));
    }
}
