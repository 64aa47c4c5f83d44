use clap::Parser;
use jira_bug_import::domain::ports::IssueTracker;
use jira_bug_import::utils::{logger, validation::Validate};
use jira_bug_import::{
    BugReportReader, CliConfig, ImportError, ImportPipeline, IssueSubmitter, JiraClient,
    JiraSettings, PriorityFilter, Result, StdinConfirm,
};

/// Exit code for errors that stop the run before or between rows.
const EXIT_FATAL: i32 = 2;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let exit_code = match run(config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("❌ Import aborted: {} (kind: {})", e, e.kind());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            EXIT_FATAL
        }
    };

    std::process::exit(exit_code);
}

async fn run(config: CliConfig) -> Result<i32> {
    config.validate()?;
    let settings = JiraSettings::load(config.config.as_deref())?;
    settings.validate()?;
    tracing::info!(
        "Using Jira {} (project {}, issue type {})",
        settings.base_url,
        settings.project_key,
        settings.issue_type
    );

    let client = JiraClient::new(&settings)?;

    if config.list_fields {
        list_fields(&client, &settings).await?;
        return Ok(0);
    }

    let path = config.filename.clone().ok_or_else(|| ImportError::Config {
        message: "no CSV file given".to_string(),
    })?;
    println!("Reading CSV {}", path.display());
    let rows = BugReportReader::open(&path)?;

    let submitter = IssueSubmitter::new(client, &settings, config.submit_options());
    let mut pipeline = ImportPipeline::new(PriorityFilter::new(config.priority.clone()), submitter);
    if config.confirm {
        pipeline = pipeline.with_confirmation(Box::new(StdinConfirm));
    }

    let summary = pipeline
        .run(rows, |report| {
            if let Some(line) = report.status_line() {
                println!("{}", line);
            }
        })
        .await?;

    println!(
        "Found {} bugs with priority '{}'. {}",
        summary.eligible, config.priority, summary
    );
    if summary.created_no_sprint > 0 {
        println!(
            "⚠️  {} issue(s) exist in Jira but were not added to the sprint",
            summary.created_no_sprint
        );
    }

    Ok(summary.exit_code())
}

/// Prints every field that can be set when creating an issue of the
/// configured type. Custom field ids differ between projects.
async fn list_fields(client: &JiraClient, settings: &JiraSettings) -> Result<()> {
    let fields = client
        .create_fields(&settings.project_key, &settings.issue_type)
        .await?;

    let required: Vec<&str> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.key.as_str())
        .collect();
    println!("Required fields: {:?}", required);

    for field in &fields {
        println!(
            "{:<28} {:<24} {:<8} {:<10} [{}]",
            field.key,
            field.name,
            if field.required { "required" } else { "" },
            field.schema_type,
            field.operations.join(", ")
        );
    }
    Ok(())
}
