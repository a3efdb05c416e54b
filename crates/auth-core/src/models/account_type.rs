//! Seed-row account type lookup. Read-only after bootstrap.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountTypeKind {
    Individual,
    IndependentCompany,
    MarketingAgency,
}

impl AccountTypeKind {
    pub fn requires_company_fields(&self) -> bool {
        matches!(self, Self::IndependentCompany | Self::MarketingAgency)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::IndependentCompany => "Independent Company",
            Self::MarketingAgency => "Marketing Agency",
        }
    }

    /// The three seed rows bootstrapped once at first migration, analogous
    /// to the teacher's `UserStatus::default()` seeding.
    pub fn seed_rows() -> [(AccountTypeKind, &'static str); 3] {
        [
            (Self::Individual, Self::Individual.display_name()),
            (
                Self::IndependentCompany,
                Self::IndependentCompany.display_name(),
            ),
            (Self::MarketingAgency, Self::MarketingAgency.display_name()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountType {
    pub id: i64,
    pub kind: AccountTypeKind,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_types_require_company_fields() {
        assert!(!AccountTypeKind::Individual.requires_company_fields());
        assert!(AccountTypeKind::IndependentCompany.requires_company_fields());
        assert!(AccountTypeKind::MarketingAgency.requires_company_fields());
    }

    #[test]
    fn seed_rows_cover_all_three_kinds() {
        let rows = AccountTypeKind::seed_rows();
        assert_eq!(rows.len(), 3);
    }
}
