use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{
    load_document, ClientError, HttpRagService, Key, KeyAction, KeyPress, ResearchClient,
    SessionEvent, TurnOutcome, ViewSync,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod commands;
mod config;
mod view;

use commands::{parse_line, ConsoleCommand, HELP};
use config::{load_settings, normalize_api_base};
use view::{render_upload_event, TerminalView};

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the ingestion / question-answering backend.
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long, default_value = "console.toml")]
    config: PathBuf,
    /// Document to upload before the first question.
    #[arg(long)]
    upload: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(api_base) = &args.api_base {
        settings.api_base = normalize_api_base(api_base);
    }
    info!(api_base = %settings.api_base, "starting console client");

    let client = ResearchClient::with_service(
        Arc::new(HttpRagService::new(settings.api_base.clone())),
        Duration::from_millis(settings.auto_close_ms),
    );
    let _view_sync = ViewSync::spawn(
        &client.session,
        Arc::new(TerminalView::new(Arc::clone(&client.session))),
    );
    spawn_status_printers(&client);

    println!("Welcome to ResearchIQ. Upload a PDF document and start asking questions.");
    println!("{HELP}\n");

    if let Some(path) = args.upload {
        upload_path(&client, Some(path)).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Status => print_status(&client).await,
            ConsoleCommand::OpenUpload => client.upload.open_modal().await,
            ConsoleCommand::CloseUpload => client.upload.close_modal().await,
            ConsoleCommand::Select(path) => {
                select_path(&client, path).await;
            }
            ConsoleCommand::Upload(path) => upload_path(&client, path).await,
            ConsoleCommand::Type { text, continued } => type_line(&client, &text, continued).await,
        }
    }

    Ok(())
}

fn spawn_status_printers(client: &ResearchClient) {
    let mut upload_events = client.upload.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = upload_events.recv().await {
            if let Some(line) = render_upload_event(&event) {
                println!("{line}");
            }
        }
    });

    let mut session_events = client.session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = session_events.recv().await {
            if event == SessionEvent::PendingChanged(true) {
                println!("Bot: ...");
            }
        }
    });
}

async fn type_line(client: &ResearchClient, text: &str, continued: bool) {
    for c in text.chars() {
        client.chat.handle_key(KeyPress::plain(Key::Char(c))).await;
    }
    if continued {
        client.chat.handle_key(KeyPress::shifted(Key::Enter)).await;
        return;
    }

    match client.chat.handle_key(KeyPress::plain(Key::Enter)).await {
        // Claimed here, in line order; only the answer is awaited off the
        // input loop.
        KeyAction::Submit(text) => match client.chat.begin_question(&text).await {
            Ok(turn) => {
                tokio::spawn(async move {
                    if let TurnOutcome::Failed { kind, .. } = turn.resolve().await {
                        warn!(?kind, "question failed");
                    }
                });
            }
            Err(err) => {
                println!("{err}");
                client.chat.set_draft(text).await;
            }
        },
        _ if client.session.is_pending().await => {
            println!("(still waiting for the previous answer; your text is kept)");
        }
        _ => {}
    }
}

/// Returns `false` when the document could not be read; the previous
/// selection is left untouched in that case.
async fn select_path(client: &ResearchClient, path: Option<PathBuf>) -> bool {
    client.upload.open_modal().await;
    let Some(path) = path else {
        client.upload.select_file(None).await;
        return true;
    };
    match load_document(&path).await {
        Ok(document) => {
            client.upload.select_file(Some(document)).await;
            true
        }
        Err(err) => {
            println!("{err:#}");
            false
        }
    }
}

async fn upload_path(client: &ResearchClient, path: Option<PathBuf>) {
    if path.is_some() && !select_path(client, path).await {
        return;
    }
    let upload = client.upload.clone();
    tokio::spawn(async move {
        match upload.submit_upload().await {
            // Validation failures already surface through the upload events.
            Ok(_) | Err(ClientError::Validation(_)) => {}
            Err(err) => println!("[upload] {err}"),
        }
    });
}

async fn print_status(client: &ResearchClient) {
    let state = client.upload.state().await;
    let selected = state
        .selected_file
        .as_ref()
        .map(|file| file.filename.as_str())
        .unwrap_or("none");
    println!(
        "upload: {} | selected: {selected} | status: {}",
        if state.modal_open { "open" } else { "closed" },
        state.phase.status_line().unwrap_or_else(|| "-".into())
    );
    println!(
        "chat: {} messages | {}",
        client.session.len().await,
        if client.session.is_pending().await {
            "waiting for answer"
        } else {
            "ready"
        }
    );
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
