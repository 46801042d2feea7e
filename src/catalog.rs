use anyhow::{ensure, Context};
use serde::Deserialize;

use crate::models::{Criterion, Level, Rating, CRITERIA};

const CATALOG_JSON: &str = include_str!("../assets/catalog.json");

/// Which language a report renders in. Chosen by the derived level, not by
/// the teacher: A1/A2 students get Portuguese, everyone above gets English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageVariant {
    Portuguese,
    English,
}

impl LanguageVariant {
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::A1 | Level::A2 => LanguageVariant::Portuguese,
            Level::B1 | Level::B2OrHigher => LanguageVariant::English,
        }
    }
}

/// All report strings, both language variants. Deserialized once at startup
/// from the embedded asset; a structurally incomplete catalog fails the load.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    pt: VariantStrings,
    en: VariantStrings,
}

#[derive(Debug, Deserialize)]
pub struct VariantStrings {
    pub title: String,
    pub labels: IdentityLabels,
    pub headings: SectionHeadings,
    pub recommendations: String,
    feedback: FeedbackTable,
}

/// Labels for the identity block at the top of the report.
#[derive(Debug, Deserialize)]
pub struct IdentityLabels {
    pub student_name: String,
    pub student_email: String,
    pub date: String,
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct SectionHeadings {
    pub feedback: String,
    pub comment: String,
    pub recommendations: String,
}

#[derive(Debug, Deserialize)]
struct FeedbackTable {
    #[serde(rename = "Vocabulary")]
    vocabulary: FeedbackScale,
    #[serde(rename = "Fluency")]
    fluency: FeedbackScale,
    #[serde(rename = "Accuracy")]
    accuracy: FeedbackScale,
    #[serde(rename = "Pronunciation")]
    pronunciation: FeedbackScale,
    #[serde(rename = "Communication")]
    communication: FeedbackScale,
}

#[derive(Debug, Deserialize)]
struct FeedbackScale {
    #[serde(rename = "R")]
    restricted: String,
    #[serde(rename = "S")]
    satisfactory: String,
    #[serde(rename = "A")]
    advanced: String,
}

impl Catalog {
    /// Loads and validates the embedded catalog. Any missing or empty entry
    /// is a configuration error and aborts startup.
    pub fn load() -> anyhow::Result<Self> {
        let catalog: Catalog =
            serde_json::from_str(CATALOG_JSON).context("failed to parse embedded catalog")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn variant(&self, variant: LanguageVariant) -> &VariantStrings {
        match variant {
            LanguageVariant::Portuguese => &self.pt,
            LanguageVariant::English => &self.en,
        }
    }

    pub fn feedback(&self, variant: LanguageVariant, criterion: Criterion, rating: Rating) -> &str {
        self.variant(variant).feedback(criterion, rating)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, strings) in [("pt", &self.pt), ("en", &self.en)] {
            ensure!(!strings.title.trim().is_empty(), "catalog {name}: empty title");
            ensure!(
                !strings.recommendations.trim().is_empty(),
                "catalog {name}: empty recommendations"
            );
            for criterion in CRITERIA {
                for rating in Rating::SCALE {
                    ensure!(
                        !strings.feedback(criterion, rating).trim().is_empty(),
                        "catalog {name}: empty feedback for {criterion} / {rating}"
                    );
                }
            }
        }
        Ok(())
    }
}

impl VariantStrings {
    pub fn feedback(&self, criterion: Criterion, rating: Rating) -> &str {
        let scale = match criterion {
            Criterion::Vocabulary => &self.feedback.vocabulary,
            Criterion::Fluency => &self.feedback.fluency,
            Criterion::Accuracy => &self.feedback.accuracy,
            Criterion::Pronunciation => &self.feedback.pronunciation,
            Criterion::Communication => &self.feedback.communication,
        };
        match rating {
            Rating::Restricted => &scale.restricted,
            Rating::Satisfactory => &scale.satisfactory,
            Rating::Advanced => &scale.advanced,
        }
    }
}
