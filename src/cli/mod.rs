use crate::api::routes::recordings::ProcessedResponse;
use crate::app::build_orchestrator;
use crate::config::Config;
use crate::error::NotesError;
use crate::pipeline::ProcessedRecording;
use crate::transcript::{Recording, TranscriptionStatus};
use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;

mod args;

pub use args::{Cli, CliCommand, ListCliArgs, OutputCliArgs, ProcessCliArgs};

fn user_error(err: NotesError) -> anyhow::Error {
    anyhow!(err.user_message())
}

pub async fn handle_list_command(config: &Config, args: ListCliArgs) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let limit = args.limit.unwrap_or(config.fireflies.list_limit);

    let recordings = orchestrator.list_recent(limit).await.map_err(user_error)?;

    if recordings.is_empty() {
        println!("No recordings found yet.");
        return Ok(());
    }

    println!("Found {} recording(s):\n", recordings.len());
    for recording in &recordings {
        print_recording(recording);
    }
    println!("\nTo summarize a recording, use: confnotes process <ID>");

    Ok(())
}

fn print_recording(recording: &Recording) {
    let date = recording
        .date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let status = match recording.status {
        TranscriptionStatus::Completed => "ready",
        TranscriptionStatus::Processing => "processing",
    };

    println!("ID: {}", recording.id);
    println!("Title: {}", recording.title);
    println!("Date: {}", date);
    println!("Duration: {:.0} min ({})", recording.duration, status);
    println!("---");
}

pub async fn handle_process_command(config: &Config, args: ProcessCliArgs) -> Result<()> {
    let orchestrator = orchestrator_for(config, &args.output)?;
    let result = orchestrator
        .process_recording(&args.id)
        .await
        .map_err(user_error)?;
    report(result, &args.output)
}

pub async fn handle_latest_command(config: &Config, args: OutputCliArgs) -> Result<()> {
    let orchestrator = orchestrator_for(config, &args)?;
    let result = orchestrator.process_latest().await.map_err(user_error)?;
    report(result, &args)
}

fn orchestrator_for(
    config: &Config,
    output: &OutputCliArgs,
) -> Result<crate::pipeline::Orchestrator> {
    let orchestrator = build_orchestrator(config)?;
    if output.no_publish {
        return Ok(orchestrator.with_publish_endpoint(None));
    }
    Ok(orchestrator)
}

fn report(result: ProcessedRecording, output: &OutputCliArgs) -> Result<()> {
    let markdown = result.summary.to_markdown();

    if let Some(warning) = result.summary.warning {
        eprintln!("Warning: {}", warning);
    }
    if !result.publish.success {
        eprintln!(
            "Warning: summary was not saved to the document: {}",
            result.publish.error.as_deref().unwrap_or("unknown error")
        );
    } else if result.published() {
        eprintln!("Summary appended to the document.");
    }

    if output.json {
        let response = ProcessedResponse::from(result);
        let json =
            serde_json::to_string_pretty(&response).context("Failed to serialize result")?;
        println!("{}", json);
    } else {
        println!("# {}\n", result.summary.title);
        if let Some(date) = result.summary.date {
            println!("_{}_\n", date.format("%Y-%m-%d"));
        }
        println!("{}", markdown);
    }

    if output.copy {
        match copy_to_clipboard(&markdown) {
            Ok(()) => eprintln!("Copied summary to clipboard ({} chars)", markdown.len()),
            Err(e) => eprintln!("Warning: {}", e),
        }
    }

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| anyhow!("Failed to initialize clipboard: {}", e))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| anyhow!("Failed to copy to clipboard: {}", e))
}

pub fn handle_status_command(config: &Config) -> Result<()> {
    let status = config.status();
    let mark = |configured: bool| if configured { "configured" } else { "missing" };

    println!("Fireflies API key:  {}", mark(status.fireflies_configured));
    println!("Anthropic API key:  {}", mark(status.anthropic_configured));
    println!(
        "Publish endpoint:   {}",
        if status.publish_configured {
            "configured"
        } else {
            "not set (publishing disabled)"
        }
    );
    println!("Model:              {}", config.anthropic.model);

    if !status.fireflies_configured || !status.anthropic_configured {
        println!(
            "\nSet {} and {} in the environment or in the config file.",
            crate::config::FIREFLIES_API_KEY,
            crate::config::ANTHROPIC_API_KEY
        );
    }

    Ok(())
}
