//! reckon — reckoner CLI client
//!
//! Exercises every RPC the daemon exposes, one subcommand per call.

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use reckoner::client::ServiceClient;
use reckoner::{EntryDraft, EntryRecord};

/// Reckoner CLI client
#[derive(Parser)]
#[command(name = "reckon")]
#[command(version = reckoner::PKG_VERSION)]
#[command(about = "Reckoner calculator service client")]
struct Args {
    /// Server address
    #[arg(
        short,
        long,
        env = "RECKOND_ADDRESS",
        default_value = "http://127.0.0.1:50051"
    )]
    address: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check service health
    Health,

    /// Add two numbers (unary)
    Sum {
        first: i64,
        second: i64,
    },

    /// Stream the prime factors of a number (server streaming)
    Decompose {
        number: i64,
    },

    /// Average a list of numbers (client streaming)
    Average {
        #[arg(required = true)]
        numbers: Vec<i64>,
    },

    /// Stream running maxima for a list of numbers (bidirectional streaming)
    Max {
        #[arg(required = true)]
        numbers: Vec<i64>,
    },

    /// Square root, demonstrating the INVALID_ARGUMENT error path
    Sqrt {
        number: i64,
    },

    /// Journal entry operations
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },
}

#[derive(Subcommand)]
enum EntryCommand {
    /// Create a new entry
    Create {
        author: String,
        title: String,
        content: String,
    },
    /// Read an entry by id
    Read { id: u64 },
    /// Replace an entry's fields
    Update {
        id: u64,
        author: String,
        title: String,
        content: String,
    },
    /// Delete an entry by id
    Delete { id: u64 },
    /// List all entries
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let client = ServiceClient::connect(&args.address).await?;

    match args.command {
        Command::Health => {
            let (healthy, version) = client.health().await?;
            let status = if healthy { "healthy" } else { "unhealthy" };
            println!("reckond {version}");
            println!("status: {status}");
        }

        Command::Sum { first, second } => {
            println!("{}", client.sum(first, second).await?);
        }

        Command::Decompose { number } => {
            let mut factors = client.prime_number_decomposition(number).await?;
            while let Some(factor) = factors.next().await {
                println!("{}", factor?);
            }
        }

        Command::Average { numbers } => {
            println!("{}", client.compute_average(numbers).await?);
        }

        Command::Max { numbers } => {
            let mut maxima = client.find_maximum(numbers).await?;
            while let Some(maximum) = maxima.next().await {
                println!("{}", maximum?);
            }
        }

        Command::Sqrt { number } => match client.square_root(number).await {
            Ok(root) => println!("{root}"),
            Err(reckoner::ReckonerError::InvalidArgument(msg)) => {
                eprintln!("invalid argument: {msg}");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },

        Command::Entry { command } => run_entry_command(&client, command).await?,
    }

    Ok(())
}

async fn run_entry_command(
    client: &ServiceClient,
    command: EntryCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        EntryCommand::Create {
            author,
            title,
            content,
        } => {
            let record = client
                .create_entry(EntryDraft {
                    author_id: author,
                    title,
                    content,
                })
                .await?;
            print_entry(&record);
        }

        EntryCommand::Read { id } => {
            print_entry(&client.read_entry(id).await?);
        }

        EntryCommand::Update {
            id,
            author,
            title,
            content,
        } => {
            let record = client
                .update_entry(&EntryRecord {
                    id,
                    author_id: author,
                    title,
                    content,
                })
                .await?;
            print_entry(&record);
        }

        EntryCommand::Delete { id } => {
            client.delete_entry(id).await?;
            println!("deleted entry {id}");
        }

        EntryCommand::List => {
            let mut entries = client.list_entries().await?;
            while let Some(entry) = entries.next().await {
                print_entry(&entry?);
            }
        }
    }
    Ok(())
}

fn print_entry(record: &EntryRecord) {
    println!(
        "[{}] {} (by {})\n{}",
        record.id, record.title, record.author_id, record.content
    );
}
