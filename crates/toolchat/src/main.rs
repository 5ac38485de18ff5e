//! A terminal front end for `toolchat`.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;
use toolchat::SessionBuilder;
use toolchat::config::config_from_env;
use toolchat::render::{
    BAR_CHAR, EMPTY_STATE_HINT, render_catalog, render_health, render_message,
};

const HELP: &str = "Commands: /health, /tools, /quit";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match config_from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    info!("using endpoint {}", config.endpoint());

    let (idle_tx, mut idle_rx) = mpsc::unbounded_channel();
    let session = SessionBuilder::with_config(config)
        .on_idle(move || {
            idle_tx.send(()).ok();
        })
        .build();

    println!("{}{}", BAR_CHAR.bright_black(), EMPTY_STATE_HINT.dimmed());
    println!("{}{}", BAR_CHAR.bright_black(), HELP.dimmed());

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut shown = 0;

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim_end_matches(['\r', '\n']);

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => {
                println!("{HELP}");
                continue;
            }
            "/health" => {
                match session.health().await {
                    Ok(health) => println!("{}", render_health(&health)),
                    Err(err) => println!(
                        "{}{}",
                        BAR_CHAR.bright_red(),
                        format!("Network error: {err}").red()
                    ),
                }
                continue;
            }
            "/tools" => {
                match session.list_tools().await {
                    Ok(catalog) => println!("{}", render_catalog(&catalog)),
                    Err(err) => println!(
                        "{}{}",
                        BAR_CHAR.bright_red(),
                        format!("Network error: {err}").red()
                    ),
                }
                continue;
            }
            _ => {}
        }

        session.send_message(line);

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        loop {
            progress_bar.inc(1);
            let tick = sleep(Duration::from_millis(100));
            select! {
                idle = idle_rx.recv() => {
                    if idle.is_none() {
                        progress_bar.finish_and_clear();
                        return;
                    }
                    break;
                },
                _ = tick => {}
            }
        }
        progress_bar.finish_and_clear();

        let snapshot = session.snapshot();
        for msg in &snapshot.transcript[shown..] {
            if let Some(rendered) = render_message(msg) {
                println!("{rendered}");
            }
        }
        shown = snapshot.transcript.len();
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
