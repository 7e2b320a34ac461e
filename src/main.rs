use clap::Parser;
use sprint_report::app::inspect;
use sprint_report::core::Pipeline;
use sprint_report::utils::{logger, validation::Validate};
use sprint_report::{
    Cli, Command, JiraClient, LocalStorage, ReportArgs, ReportConfig, ReportEngine, ReportError,
    Result, StatsPipeline, WorkbookPipeline,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting sprint-report");
    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ sprint-report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Stats(args) => {
            let config = prepare(config, &args)?;
            let storage = LocalStorage::new(config.output_folder.clone());
            let pipeline = StatsPipeline::new(storage, config)?;
            report(pipeline).await
        }
        Command::Workbook(args) => {
            let config = prepare(config, &args)?;
            let storage = LocalStorage::new(config.output_folder.clone());
            let pipeline = WorkbookPipeline::new(storage, config)?;
            report(pipeline).await
        }
        Command::Sprint { sprint } => {
            let config = config.with_overrides(sprint, None);
            config.validate()?;
            let client = JiraClient::new(&config.server)?;
            println!("{}", inspect::sprint_json(&client, config.require_sprint_id()?).await?);
            Ok(())
        }
        Command::Issue { key } => {
            config.validate()?;
            let client = JiraClient::new(&config.server)?;
            println!("{}", inspect::issue_json(&client, &key).await?);
            Ok(())
        }
        Command::Boards => {
            config.validate()?;
            let client = JiraClient::new(&config.server)?;
            print!("{}", inspect::board_listing(&client, config.page_size).await?);
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&str>) -> Result<ReportConfig> {
    let path = match explicit {
        Some(path) => PathBuf::from(path),
        None => ReportConfig::default_path()?,
    };
    tracing::info!("📁 Loading configuration from: {}", path.display());

    ReportConfig::from_file(&path).map_err(|e| match e {
        ReportError::IoError(io) => ReportError::ConfigError {
            message: format!("cannot read '{}': {}", path.display(), io),
        },
        other => other,
    })
}

fn prepare(config: ReportConfig, args: &ReportArgs) -> Result<ReportConfig> {
    let config = config.with_overrides(args.sprint, args.output.clone());
    config.validate()?;
    tracing::info!(
        "✅ Configuration validated: sprint {:?}, {} team(s), output '{}'",
        config.sprint_id,
        config.teams.len(),
        config.output_folder
    );
    Ok(config)
}

async fn report<P: Pipeline>(pipeline: P) -> Result<()> {
    let engine = ReportEngine::new(pipeline);
    let written = engine.run().await?;

    println!("✅ Sprint report completed successfully!");
    for path in written {
        println!("📁 {}", path);
    }
    Ok(())
}
