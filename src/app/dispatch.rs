use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use dialoguer::Input;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use vidlytics::Config;
use vidlytics::analysis::{AnalysisRequest, response_schema};
use vidlytics::chat::{ChatDriver, TurnOutcome};
use vidlytics::ingest::{FileSelection, ingest_all};
use vidlytics::llm::{CliStreamSink, GeminiProvider, Provider};
use vidlytics::ui::{render_message, render_report, style};
use vidlytics::workflow::{Phase, Workflow, WorkflowEvent, run_analysis};

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            files,
            model,
            temperature,
            json,
            chat,
        } => {
            if let Some(model) = model {
                config.model = model;
            }
            if let Some(temperature) = temperature {
                config.temperature = temperature;
            }
            config.validate()?;
            let provider = GeminiProvider::new(&config);
            run_analyze(&provider, files, json.as_deref(), chat).await
        }
        Commands::Prompt { files } => run_prompt(files).await,
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&response_schema())?);
            Ok(())
        }
    }
}

async fn run_analyze(
    provider: &dyn Provider,
    files: Vec<PathBuf>,
    json_path: Option<&Path>,
    chat: bool,
) -> Result<()> {
    let workflow = Workflow::new().apply(WorkflowEvent::FilesSelected(files));
    if workflow.selection().is_empty() {
        bail!("No CSV files to analyze");
    }

    let workflow = workflow.apply(WorkflowEvent::AnalysisStarted);
    eprintln!(
        "{} Analyzing {} with {}...",
        style::accent("›"),
        style::value(workflow.selection().names().join(", ")),
        provider.name()
    );
    let event = run_analysis(provider, &workflow).await;
    let workflow = workflow.apply(event);

    let result = match (workflow.phase(), workflow.result()) {
        (Phase::Report, Some(result)) => result,
        (Phase::Failed(message), _) => bail!("Analysis failed: {message}"),
        (phase, _) => bail!("Analysis did not produce a report (phase: {phase:?})"),
    };

    for file in workflow.files().iter().filter(|f| f.is_truncated()) {
        eprintln!(
            "{} {} was truncated before analysis",
            style::yellow("!"),
            file.name()
        );
    }
    println!("{}", render_report(result));

    if let Some(path) = json_path {
        let body = serde_json::to_string_pretty(result)?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!(
            "{} Result written to {}",
            style::success("✓"),
            style::value(path.display())
        );
    }

    if chat {
        chat_loop(provider, workflow).await?;
    }
    Ok(())
}

async fn run_prompt(files: Vec<PathBuf>) -> Result<()> {
    let mut selection = FileSelection::default();
    selection.add(files);
    if selection.is_empty() {
        bail!("No CSV files to read");
    }
    let uploaded = ingest_all(selection.files()).await?;
    let request = AnalysisRequest::new(&uploaded);

    println!("{}", style::header("System instruction"));
    println!("{}\n", request.system_instruction);
    println!("{}", style::header("Content"));
    println!("{}", request.content);
    Ok(())
}

async fn chat_loop(provider: &dyn Provider, workflow: Workflow) -> Result<()> {
    let Some(result) = workflow.result() else {
        bail!("No analysis result to chat about");
    };

    eprintln!("{}", style::dim("Preparing chat session..."));
    let mut driver = ChatDriver::open(provider, workflow.files(), result)
        .await
        .context("Failed to open chat session")?;
    let mut workflow = workflow.apply(WorkflowEvent::ChatOpened);
    info!(generation = workflow.generation(), "chat session ready");

    for message in driver.state().messages() {
        println!("{}", render_message(message));
    }
    println!("{}", style::dim("Type /exit or an empty line to quit, /reset to start over."));

    let sink = CliStreamSink::new();
    loop {
        let line = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("you")
                .allow_empty(true)
                .interact_text()
        })
        .await??;

        match line.trim() {
            "" | "/exit" => break,
            "/reset" => {
                workflow = workflow.apply(WorkflowEvent::Reset);
                drop(driver);
                println!(
                    "{}",
                    style::dim("Session cleared. Run `vidlytics analyze` with new files to start over.")
                );
                break;
            }
            text => {
                print!("{} ", style::accent("vidlytics ›"));
                std::io::stdout().flush().ok();
                if let TurnOutcome::Failed(_) = driver.send(text, &sink).await
                    && let Some(notice) = driver.state().messages().last()
                {
                    println!();
                    println!("{}", style::error(render_message(notice)));
                }
            }
        }
    }

    tracing::debug!(phase = ?workflow.phase(), "chat loop finished");
    Ok(())
}
