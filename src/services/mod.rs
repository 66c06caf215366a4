pub mod catalog;
pub mod expense_categorization;
pub mod expense_draft;
pub mod receipt;
