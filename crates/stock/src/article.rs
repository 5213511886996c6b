use serde::{Deserialize, Serialize};

use atelier_core::DomainError;

/// Which table a stocked article lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    Material,
    Product,
}

impl ArticleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleKind::Material => "material",
            ArticleKind::Product => "product",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "material" => Ok(ArticleKind::Material),
            "product" => Ok(ArticleKind::Product),
            other => Err(DomainError::validation(format!(
                "unknown article kind: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for ArticleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind + row id, enough to address any stocked article.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleRef {
    pub kind: ArticleKind,
    pub id: i64,
}

impl ArticleRef {
    pub fn material(id: impl Into<i64>) -> Self {
        Self {
            kind: ArticleKind::Material,
            id: id.into(),
        }
    }

    pub fn product(id: impl Into<i64>) -> Self {
        Self {
            kind: ArticleKind::Product,
            id: id.into(),
        }
    }
}

/// Snapshot of a stocked article (material or product) as returned by the
/// ledger after a mutation.
///
/// Quantities are only ever changed through the ledger's adjust path; direct
/// field writes bypass the audit trail and are not part of the public
/// surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub kind: ArticleKind,
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub min_quantity: f64,
    pub unit_price: f64,
}

impl Article {
    pub fn is_below_min(&self) -> bool {
        self.quantity < self.min_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_round_trip() {
        assert_eq!(ArticleKind::parse("material").unwrap(), ArticleKind::Material);
        assert_eq!(ArticleKind::parse("product").unwrap(), ArticleKind::Product);
        assert!(ArticleKind::parse("service").is_err());
    }
}
