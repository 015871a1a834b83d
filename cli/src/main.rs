use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ieltsprep::Config;
use ieltsprep::content::{
    AuthoringForm, GroupType, TestData, TestForm, ValidationScope, Validator, assemble,
};
use ieltsprep::error::AppResult;
use ieltsprep::model::{DbConnection, ModelManager, entity::ReadingTest};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for authoring and importing reading tests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a test document and print the report
    Validate {
        /// JSON file holding a `Detailedtest` document
        file: PathBuf,
        /// Check part2 and part3 as well
        #[arg(long, default_value_t = false)]
        all_parts: bool,
        /// Require answers to reference existing options or choices
        #[arg(long, default_value_t = false)]
        check_answers: bool,
    },

    /// Build a test document from an authoring form and print it
    Assemble {
        /// JSON file holding the form
        form: PathBuf,
    },

    /// Assemble, validate and store a form under an exam
    Import {
        #[arg(long)]
        exam_id: Uuid,
        /// JSON file holding the form
        form: PathBuf,
    },

    /// Print a fresh group of the given type, ready to be filled in
    NewGroup {
        /// FILL_BLANKS, TFNG, MCQ, MULTI, MATCH_TABLE, DRAG_DROP, MATCHING_HEADER or DROPDOWN
        kind: GroupType,
        /// Blank questions to add
        #[arg(long, default_value_t = 1)]
        questions: usize,
        /// Number the first question follows
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=100_000))]
        start: u32,
    },
}

fn read_form(path: &PathBuf) -> AppResult<TestForm> {
    let source = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

async fn database_uri() -> String {
    match std::env::var("DATABASE_URL") {
        Ok(uri) => uri,
        Err(_) => Config::get_or_init(true)
            .await
            .app()
            .database_uri()
            .to_string(),
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    match args.command {
        Commands::Validate {
            file,
            all_parts,
            check_answers,
        } => {
            let source = std::fs::read_to_string(file)?;
            let data: TestData = serde_json::from_str(&source)?;

            let scope = if all_parts {
                ValidationScope::AllParts
            } else {
                ValidationScope::FirstPart
            };
            let report = Validator::new(scope, check_answers).validate(&data);
            println!("{}", serde_json::to_string_pretty(&report)?);

            if !report.valid {
                std::process::exit(1);
            }
        }

        Commands::Assemble { form } => {
            let form = read_form(&form)?;
            println!("{}", serde_json::to_string_pretty(&assemble(&form))?);
        }

        Commands::Import { exam_id, form } => {
            ieltsprep::setup_trace();
            let form = read_form(&form)?;
            tracing::debug!(title = %form.title, test_type = form.test_type.as_str(), "importing form");

            let db = DbConnection::connect(&database_uri().await)?;
            db.migrate().await?;
            let mm = ModelManager::new(db);

            let created = ReadingTest::submit(
                &mm,
                exam_id,
                &assemble(&form),
                form.test_type,
                &Validator::default(),
            )
            .await?;

            for row in &created {
                tracing::info!(part = row.part_number(), id = %row.id(), %exam_id, "part stored");
            }
        }

        Commands::NewGroup {
            kind,
            questions,
            start,
        } => {
            let mut form = AuthoringForm::new(start);
            let index = form.add_group(kind);
            for _ in 0..questions {
                form.add_question(index)?;
            }
            println!("{}", serde_json::to_string_pretty(&form.groups()[index])?);
        }
    }

    Ok(())
}
