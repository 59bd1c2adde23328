//! medbot-repl: ask the assistant questions from a terminal.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medbot_server::config::Config;

const PROMPT: &str = "Ask your health question: ";

#[tokio::main]
async fn main() {
    // Logs go to stderr so answers stay readable on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().expect("Invalid configuration");
    let store = medbot_server::db::connect(&config.store)
        .await
        .expect("Failed to open record store");
    let assistant = medbot_server::build_assistant(&config, store)
        .await
        .expect("Failed to build assistant");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Welcome to the Medical Chatbot! Type 'exit' or 'quit' to stop.");
    loop {
        stdout.write_all(PROMPT.as_bytes()).await.ok();
        stdout.flush().await.ok();

        let Ok(Some(line)) = lines.next_line().await else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }
        if question.chars().count() > config.max_input_chars {
            println!("Please keep your question under {} characters.\n", config.max_input_chars);
            continue;
        }

        match assistant.get_reply(question).await {
            Ok(reply) => println!("\n{}\n", reply.reply),
            Err(e) => {
                tracing::error!(error = %e, "Request failed");
                println!("\nSorry, the doctor directory is unavailable right now.\n");
            }
        }
    }

    println!("Goodbye!");
}
