use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used in the `Date` column and on the report.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The five scored criteria, in form and report order.
pub const CRITERIA: [Criterion; 5] = [
    Criterion::Vocabulary,
    Criterion::Fluency,
    Criterion::Accuracy,
    Criterion::Pronunciation,
    Criterion::Communication,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Vocabulary,
    Fluency,
    Accuracy,
    Pronunciation,
    Communication,
}

impl Criterion {
    pub fn name(self) -> &'static str {
        match self {
            Criterion::Vocabulary => "Vocabulary",
            Criterion::Fluency => "Fluency",
            Criterion::Accuracy => "Accuracy",
            Criterion::Pronunciation => "Pronunciation",
            Criterion::Communication => "Communication",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step on the three-point rating scale. Ordered by weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "R")]
    Restricted,
    #[serde(rename = "S")]
    Satisfactory,
    #[serde(rename = "A")]
    Advanced,
}

impl Rating {
    pub const SCALE: [Rating; 3] = [Rating::Restricted, Rating::Satisfactory, Rating::Advanced];

    pub fn weight(self) -> u32 {
        match self {
            Rating::Restricted => 1,
            Rating::Satisfactory => 2,
            Rating::Advanced => 3,
        }
    }

    /// Single-letter symbol stored in the table, `R`/`S`/`A`.
    pub fn symbol(self) -> &'static str {
        match self {
            Rating::Restricted => "R",
            Rating::Satisfactory => "S",
            Rating::Advanced => "A",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "R" | "RESTRICTED" => Ok(Rating::Restricted),
            "S" | "SATISFACTORY" => Ok(Rating::Satisfactory),
            "A" | "ADVANCED" => Ok(Rating::Advanced),
            other => Err(format!("unknown rating '{other}', expected R, S or A")),
        }
    }
}

/// Estimated CEFR-like level derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    #[serde(rename = "B2 or higher")]
    B2OrHigher,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2OrHigher => "B2 or higher",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rating per criterion, all required.
#[derive(Debug, Clone, Copy)]
pub struct Ratings {
    pub vocabulary: Rating,
    pub fluency: Rating,
    pub accuracy: Rating,
    pub pronunciation: Rating,
    pub communication: Rating,
}

impl Ratings {
    pub fn get(&self, criterion: Criterion) -> Rating {
        match criterion {
            Criterion::Vocabulary => self.vocabulary,
            Criterion::Fluency => self.fluency,
            Criterion::Accuracy => self.accuracy,
            Criterion::Pronunciation => self.pronunciation,
            Criterion::Communication => self.communication,
        }
    }
}

/// One completed evaluation, before flattening into a table row.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub teacher_email: String,
    pub student_name: String,
    pub student_email: String,
    pub taken_at: NaiveDateTime,
    pub ratings: Ratings,
    pub comment: String,
}

/// One row of the assessments table. Column names are the header contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    #[serde(rename = "Teacher Email")]
    pub teacher_email: String,
    #[serde(rename = "Student Name")]
    pub student_name: String,
    #[serde(rename = "Student Email")]
    pub student_email: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Vocabulary")]
    pub vocabulary: Rating,
    #[serde(rename = "Fluency")]
    pub fluency: Rating,
    #[serde(rename = "Accuracy")]
    pub accuracy: Rating,
    #[serde(rename = "Pronunciation")]
    pub pronunciation: Rating,
    #[serde(rename = "Communication")]
    pub communication: Rating,
    #[serde(rename = "Total")]
    pub total: u32,
    #[serde(rename = "Level")]
    pub level: Level,
    #[serde(rename = "Teacher Comment")]
    pub comment: String,
}
