//! Static study catalog.

use crate::error::InsightError;
use crate::models::Study;

/// Read-only ordered list of studies, keyed by id.
#[derive(Debug, Clone)]
pub struct StudyCatalog {
    studies: Vec<Study>,
}

impl Default for StudyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StudyCatalog {
    /// The studies shipped with the tool.
    pub fn builtin() -> Self {
        Self::from_studies(vec![
            Study::new(
                "1",
                "E\u{2011}commerce checkout experience",
                "Understand friction points in the checkout flow for repeat customers.",
                "Frequent online shoppers",
            ),
            Study::new(
                "2",
                "B2B SaaS onboarding",
                "Discover how team admins experience onboarding in our B2B product.",
                "Mid\u{2011}market IT admins",
            ),
        ])
    }

    pub fn from_studies(studies: Vec<Study>) -> Self {
        Self { studies }
    }

    /// All studies in catalog order.
    pub fn all(&self) -> &[Study] {
        &self.studies
    }

    pub fn get(&self, id: &str) -> Option<&Study> {
        self.studies.iter().find(|s| s.id == id)
    }

    /// Look up a study, treating a miss as an error.
    pub fn require(&self, id: &str) -> Result<&Study, InsightError> {
        self.get(id)
            .ok_or_else(|| InsightError::StudyNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let catalog = StudyCatalog::builtin();
        let ids: Vec<&str> = catalog.all().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(catalog.get("2").unwrap().title, "B2B SaaS onboarding");
    }

    #[test]
    fn test_miss_is_not_found() {
        let catalog = StudyCatalog::builtin();
        assert!(catalog.get("42").is_none());
        assert!(matches!(
            catalog.require("42"),
            Err(InsightError::StudyNotFound(id)) if id == "42"
        ));
    }
}
