use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the convai relay REST endpoints", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List agents
    Agents,
    /// Show one agent
    Agent { agent_id: String },
    /// List conversations
    Conversations,
    /// Show one conversation
    Conversation { conversation_id: String },
    /// Create an agent from a JSON configuration file
    CreateAgent { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Agents => client.get(format!("{}/agents-list", base)).send().await?,
        Commands::Agent { agent_id } => {
            client
                .get(format!("{}/detail-agent", base))
                .query(&[("agent_id", agent_id)])
                .send()
                .await?
        }
        Commands::Conversations => {
            client
                .get(format!("{}/conversation-list", base))
                .send()
                .await?
        }
        Commands::Conversation { conversation_id } => {
            client
                .get(format!("{}/detail-conversation", base))
                .query(&[("conversation_id", conversation_id)])
                .send()
                .await?
        }
        Commands::CreateAgent { file } => {
            let agent: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            client
                .post(format!("{}/create_agent", base))
                .json(&agent)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
