use crate::infra::InMemoryLeadRepository;
use clap::Args;
use lead_ai::error::AppError;
use lead_ai::leads::{LeadService, LeadSubmission};
use lead_ai::scoring::{LeadScoringService, LeadSnapshot, SampleLead};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Lead name
    #[arg(long)]
    pub(crate) name: String,
    /// Lead email address
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Lead company
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Lead phone number
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Override the training data path from the configuration
    #[arg(long)]
    pub(crate) training_data: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional lead sample file to train the model for the demo
    #[arg(long)]
    pub(crate) training_data: Option<PathBuf>,
    /// Skip the CSV import portion of the demo
    #[arg(long)]
    pub(crate) skip_import: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        name,
        email,
        company,
        phone,
        notes,
        training_data,
    } = args;

    let scorer = build_scorer(training_data)?;
    let snapshot = LeadSnapshot {
        name: Some(name),
        email,
        company,
        phone,
        notes,
        ..LeadSnapshot::default()
    };

    let outcome = scorer.score_lead(&snapshot);
    println!(
        "Quality score: {:.3} (source: {})",
        outcome.value(),
        outcome.label()
    );
    if !scorer.is_model_trained() {
        println!("Note: no trained model available; rule-based scoring was used");
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        training_data,
        skip_import,
    } = args;

    println!("Lead intelligence demo");

    let scorer = match training_data {
        Some(path) => Arc::new(LeadScoringService::from_path(path)),
        None => Arc::new(LeadScoringService::from_samples(demo_samples())),
    };
    println!(
        "Conversion model: {}",
        if scorer.is_model_trained() {
            "trained"
        } else {
            "unavailable (rule-based fallback)"
        }
    );

    let repository = Arc::new(InMemoryLeadRepository::default());
    let service = Arc::new(LeadService::new(repository, scorer.clone()));

    println!("\nLead intake");
    for submission in demo_submissions() {
        let shown_name = submission.name.clone().unwrap_or_default();
        match service.create(submission) {
            Ok(record) => println!(
                "- {} -> {} (score {:.3}, status {})",
                shown_name,
                record.profile.lead_id.0,
                record.quality_score,
                record.status.label()
            ),
            Err(err) => println!("- {} rejected: {}", shown_name, err),
        }
    }

    let invalid = LeadSubmission {
        name: Some("Avery Quinn".to_string()),
        email: Some("not-an-email".to_string()),
        ..LeadSubmission::default()
    };
    if let Err(err) = service.create(invalid) {
        println!("- Avery Quinn (bad email) rejected: {}", err);
    }

    if !skip_import {
        println!("\nCSV import");
        let csv_data = "name,email,company\n\
Rowan Ellis,rowan@meridian.io,Meridian Digital\n\
X,,\n\
Jules Barron,jules@barronlogistics.com,Barron Logistics\n";
        let summary = service.import_csv(Cursor::new(csv_data))?;
        println!(
            "- {} leads created, {} rows skipped",
            summary.created, summary.skipped
        );
    }

    println!("\nStored leads");
    let records = service.list()?;
    for record in &records {
        println!(
            "- {} | {} | score {:.3} | status {}",
            record.profile.lead_id.0,
            record.profile.name,
            record.quality_score,
            record.status.label()
        );
    }

    if let Some(record) = records.first() {
        match serde_json::to_string_pretty(&record.view()) {
            Ok(json) => println!("\nPublic lead payload:\n{}", json),
            Err(err) => println!("\nPublic lead payload unavailable: {}", err),
        }
    }

    println!("\nCSV export");
    let rendered = service.export_csv()?;
    print!("{}", rendered);

    Ok(())
}

fn build_scorer(training_data: Option<PathBuf>) -> Result<Arc<LeadScoringService>, AppError> {
    let path = match training_data {
        Some(path) => path,
        None => lead_ai::config::AppConfig::load()?.scoring.training_data,
    };
    Ok(Arc::new(LeadScoringService::from_path(path)))
}

fn demo_submissions() -> Vec<LeadSubmission> {
    vec![
        LeadSubmission {
            name: Some("Dakota Reyes".to_string()),
            email: Some("dakota@lumen-systems.com".to_string()),
            company: Some("Lumen Systems".to_string()),
            phone: Some("+1-515-555-0142".to_string()),
            status: Some("new".to_string()),
            notes: Some("asked for an onboarding call".to_string()),
        },
        LeadSubmission {
            name: Some("Harper Lane".to_string()),
            email: None,
            company: None,
            phone: None,
            status: Some("contacted".to_string()),
            notes: None,
        },
    ]
}

fn demo_samples() -> Vec<SampleLead> {
    vec![
        SampleLead {
            name: "Dana Reed".to_string(),
            email: "dana@signalworks.com".to_string(),
            company: "Signalworks Technology".to_string(),
            score: 0.82,
            converted: 1,
        },
        SampleLead {
            name: "Morgan Wu".to_string(),
            email: "morgan@brightpath.io".to_string(),
            company: "Brightpath Digital".to_string(),
            score: 0.74,
            converted: 1,
        },
        SampleLead {
            name: "Pat Doyle".to_string(),
            email: "pat@plainmail.biz".to_string(),
            company: "Doyle Farms".to_string(),
            score: 0.2,
            converted: 0,
        },
        SampleLead {
            name: "Sam Hill".to_string(),
            email: "sam@hillside.biz".to_string(),
            company: "Hillside Goods".to_string(),
            score: 0.1,
            converted: 0,
        },
    ]
}
