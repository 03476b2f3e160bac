//! sqlscout CLI application
//!
//! Command-line interface for the sqlscout library.

use clap::{Args, Parser, Subcommand};
use sqlscout::{Config, Database, OpenAiProvider, Orchestrator, SessionOutcome, SqlScoutError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlscout")]
#[command(about = "A natural-language-to-SQL agent with retrieval-grounded schema lookup")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct LlmArgs {
    /// API key for the completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", default_value = "")]
    api_key: String,

    /// Base URL for OpenAI-compatible servers (e.g. Ollama)
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Model name
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// SQLite database file (omit to use the bundled demo database)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the answer
    Ask {
        /// The question, in natural language
        question: String,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Interactive question-answering session
    Chat {
        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Print the schema catalog
    Schema {
        /// Show only this table
        table: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { question, llm } => {
            ask_command(question, llm).await?;
        }
        Commands::Chat { llm } => {
            chat_command(llm).await?;
        }
        Commands::Schema { table } => {
            schema_command(table)?;
        }
    }

    Ok(())
}

fn build_config(llm: &LlmArgs) -> Config {
    let mut config = Config::default();
    config.llm.api_key = llm.api_key.clone();
    config.llm.base_url = llm.base_url.clone();
    config.llm.model = llm.model.clone();
    config
}

fn open_database(path: &Option<PathBuf>) -> sqlscout::Result<Database> {
    match path {
        Some(path) => Database::open(path),
        None => Database::demo(),
    }
}

async fn ask_command(question: String, llm: LlmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&llm);
    let provider = OpenAiProvider::new(&config.llm)?;
    let db = open_database(&llm.database)?;
    let mut agent = Orchestrator::bootstrap(&config, db)?;

    run_question(&mut agent, &provider, &question).await?;
    Ok(())
}

async fn chat_command(llm: LlmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&llm);
    let provider = OpenAiProvider::new(&config.llm)?;
    let db = open_database(&llm.database)?;
    let mut agent = Orchestrator::bootstrap(&config, db)?;

    println!("💬 Ask questions about the database. Type 'quit' or 'exit' to end.");
    println!();

    loop {
        print!("❓ Question: ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            println!("👋 Goodbye!");
            break;
        }

        run_question(&mut agent, &provider, input).await?;
        println!();
    }

    Ok(())
}

/// Run one question to completion. Exhausted and inconclusive turns print an
/// explanation and return Ok; infrastructure failures propagate so the
/// process exits non-zero.
async fn run_question(
    agent: &mut Orchestrator,
    provider: &OpenAiProvider,
    question: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match agent.answer(provider, question).await {
        Ok(answer) => {
            if let Some(session) = &answer.session {
                if let Some(SessionOutcome::Answered { sql, .. }) = &session.outcome {
                    println!("🔎 SQL: {}", sql);
                }
            }
            println!("✅ {}", answer.answer);
        }
        Err(SqlScoutError::Inconclusive(message)) => {
            println!("🤷 No confident answer: {}", message);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn schema_command(table: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = sqlscout::catalog::builtin::ecommerce_catalog()?;

    match table {
        Some(name) => {
            let entry = catalog
                .table(&name)
                .ok_or_else(|| SqlScoutError::NotFound(format!("no table named '{}'", name)))?;
            println!("{}", entry.render());
            for column in catalog.columns_of(&name) {
                println!("  {}", column.render());
            }
        }
        None => {
            println!("{}", catalog.render());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["sqlscout", "ask", "how many members are there?"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_schema_subcommand_parses() {
        let cli = Cli::try_parse_from(["sqlscout", "schema", "members"]);
        assert!(cli.is_ok());
    }
}
