use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod catalog;
mod models;
mod report;
mod rubric;
mod store;

use catalog::{Catalog, LanguageVariant};
use models::{Assessment, AssessmentRecord, Rating, Ratings, CRITERIA, DATE_FORMAT};
use store::RecordStore;

#[derive(Parser)]
#[command(name = "oral-assessment")]
#[command(about = "Oral assessment scoring and reporting for FluencyPass teachers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a new oral test, record it and produce the PDF report
    Assess {
        /// Teacher email owning the assessment
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        student_name: String,
        #[arg(long)]
        student_email: String,
        /// Vocabulary rating: R, S or A
        #[arg(long)]
        vocabulary: Rating,
        /// Fluency rating: R, S or A
        #[arg(long)]
        fluency: Rating,
        /// Accuracy rating: R, S or A
        #[arg(long)]
        accuracy: Rating,
        /// Pronunciation rating: R, S or A
        #[arg(long)]
        pronunciation: Rating,
        /// Communication rating: R, S or A
        #[arg(long)]
        communication: Rating,
        /// Free-text comment included verbatim on the report
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long, default_value = "avaliacoes.csv")]
        store: PathBuf,
        /// Branding image embedded at the top of the report when present
        #[arg(long, default_value = "logo.png")]
        logo: PathBuf,
        /// Directory the PDF report is written into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// List assessments recorded by a teacher
    History {
        #[arg(long)]
        teacher: String,
        /// Case-insensitive substring filter on the student email
        #[arg(long, default_value = "")]
        student: String,
        #[arg(long, default_value = "avaliacoes.csv")]
        store: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::load()?;

    match cli.command {
        Commands::Assess {
            teacher,
            student_name,
            student_email,
            vocabulary,
            fluency,
            accuracy,
            pronunciation,
            communication,
            comment,
            store,
            logo,
            out_dir,
        } => {
            if student_name.trim().is_empty() || student_email.trim().is_empty() {
                anyhow::bail!("Please fill out all fields.");
            }

            let assessment = Assessment {
                teacher_email: teacher,
                student_name,
                student_email,
                taken_at: Local::now().naive_local(),
                ratings: Ratings {
                    vocabulary,
                    fluency,
                    accuracy,
                    pronunciation,
                    communication,
                },
                comment,
            };

            let total = rubric::total_score(&assessment.ratings);
            let level = rubric::classify_level(total);
            let date = assessment.taken_at.format(DATE_FORMAT).to_string();

            let pdf = report::render_report(
                &catalog,
                &assessment.student_name,
                &assessment.student_email,
                level,
                &date,
                &assessment.ratings,
                &assessment.comment,
                &logo,
            )?;

            let record = AssessmentRecord {
                teacher_email: assessment.teacher_email.clone(),
                student_name: assessment.student_name.clone(),
                student_email: assessment.student_email.clone(),
                date,
                vocabulary: assessment.ratings.vocabulary,
                fluency: assessment.ratings.fluency,
                accuracy: assessment.ratings.accuracy,
                pronunciation: assessment.ratings.pronunciation,
                communication: assessment.ratings.communication,
                total,
                level,
                comment: assessment.comment.clone(),
            };
            RecordStore::new(store).append(&record)?;

            let out_path = out_dir.join(report::report_file_name(&assessment.student_name));
            std::fs::write(&out_path, &pdf)
                .with_context(|| format!("failed to write {}", out_path.display()))?;

            println!("Estimated Level: {level}");
            // The on-screen summary is always English; only the PDF follows
            // the level.
            for criterion in CRITERIA {
                let rating = assessment.ratings.get(criterion);
                println!(
                    "- {}: {}",
                    criterion,
                    catalog.feedback(LanguageVariant::English, criterion, rating)
                );
            }
            println!("Report written to {}.", out_path.display());
        }
        Commands::History {
            teacher,
            student,
            store,
        } => {
            let store = RecordStore::new(store);
            if !store.exists() {
                println!("No records available yet.");
                return Ok(());
            }

            let rows = store.query_by_owner(&teacher, &student)?;
            if rows.is_empty() {
                println!("No assessments found for the given filters.");
                return Ok(());
            }

            println!("Assessments recorded by {teacher}:");
            for row in &rows {
                let mut line = format!(
                    "- {} ({}) on {}: V:{} F:{} A:{} P:{} C:{} total {} level {}",
                    row.student_name,
                    row.student_email,
                    row.date,
                    row.vocabulary,
                    row.fluency,
                    row.accuracy,
                    row.pronunciation,
                    row.communication,
                    row.total,
                    row.level
                );
                if !row.comment.is_empty() {
                    line.push_str(&format!(" | {}", row.comment));
                }
                println!("{line}");
            }
        }
    }

    Ok(())
}
