use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use prepchat::{
    BackendClient, ChatSession, Config, PdfLibrary, PdfUploadForm, StaticToken,
};

#[derive(Parser)]
#[command(name = "prepchat")]
#[command(about = "Format chat messages and talk to the exam-prep backend")]
struct Cli {
    /// Config file (TOML)
    #[arg(long, env = "PREPCHAT_CONFIG", default_value = "prepchat.toml")]
    config: PathBuf,

    /// Backend base URL, overrides the config file
    #[arg(long, env = "PREPCHAT_BACKEND_URL")]
    backend_url: Option<String>,

    /// Bearer token for backend calls
    #[arg(long, env = "PREPCHAT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format chat text (a file, or stdin when omitted)
    Render {
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = RenderOutput::Html)]
        output: RenderOutput,
    },
    #[command(flatten)]
    Backend(BackendCommand),
}

/// Commands that talk to the backend
#[derive(Subcommand)]
enum BackendCommand {
    /// Start a conversation with a first question
    Start { text: String },
    /// List conversations
    Conversations,
    /// Show a conversation with formatted messages
    Conversation { id: String },
    /// Send a message to a conversation
    Send { id: String, message: String },
    /// List uploaded PDF documents
    Pdfs,
    /// Upload a PDF document
    Upload {
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        grade: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a PDF document
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum RenderOutput {
    Html,
    Markup,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(&cli.config)?;
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }

    match cli.command {
        Command::Render { input, output } => render(input.as_ref(), output, &config),
        Command::Backend(command) => run_backend(command, cli.token, &config).await,
    }
}

async fn run_backend(command: BackendCommand, token: Option<String>, config: &Config) -> Result<()> {
    let tokens = Arc::new(StaticToken::from(token));
    let client = BackendClient::new(&config.backend, tokens)
        .with_context(|| format!("cannot use backend {}", config.backend.url))?;

    match command {
        BackendCommand::Start { text } => {
            let session = ChatSession::start(&client, &text).await?;
            println!("Started conversation {}", session.conversation_id);
            print_session(&session, config);
        }
        BackendCommand::Conversations => {
            for conversation in client.list_conversations().await? {
                let title = conversation.title.as_deref().unwrap_or("(untitled)");
                println!("{}\t{}", conversation.id, title);
            }
        }
        BackendCommand::Conversation { id } => {
            let mut session = ChatSession::new(id);
            session.load(&client).await?;
            print_session(&session, config);
        }
        BackendCommand::Send { id, message } => {
            let mut session = ChatSession::new(id);
            session.send(&client, &message).await?;
            print_session(&session, config);
        }
        BackendCommand::Pdfs => {
            let mut library = PdfLibrary::default();
            library.refresh(&client).await?;
            if library.documents.is_empty() {
                println!("No PDFs uploaded yet");
                return Ok(());
            }
            println!(
                "{} documents, {} subjects, {} grades",
                library.documents.len(),
                library.subject_count(),
                library.grade_count()
            );
            for doc in &library.documents {
                println!(
                    "{}\t{}\t{} / {}\t{}",
                    doc.id,
                    doc.title,
                    doc.subject,
                    doc.grade,
                    doc.display_size()
                );
            }
        }
        BackendCommand::Upload {
            file,
            title,
            subject,
            grade,
            description,
        } => {
            let bytes =
                fs::read(&file).with_context(|| format!("Error reading {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document.pdf".to_string());

            let mut form = PdfUploadForm::new(title, description, subject, grade);
            form.select_file(name, bytes)?;

            let mut library = PdfLibrary::default();
            let document = library.upload(&client, &mut form).await?;
            println!("Uploaded {} ({})", document.title, document.id);
        }
        BackendCommand::Delete { id } => {
            let mut library = PdfLibrary::default();
            library.delete(&client, &id).await?;
            println!("Deleted {id}");
        }
    }

    Ok(())
}

fn render(input: Option<&PathBuf>, output: RenderOutput, config: &Config) -> Result<()> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Error reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Error reading stdin")?;
            buf
        }
    };

    match output {
        RenderOutput::Html => println!(
            "{}",
            prepchat::format_to_html_with_config(&text, &config.render)
        ),
        RenderOutput::Markup => println!("{}", prepchat::format(&text).to_markup()),
        RenderOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&prepchat::format(&text))?)
        }
    }
    Ok(())
}

fn print_session(session: &ChatSession, config: &Config) {
    if let Some(title) = &session.title {
        println!("# {title}");
    }
    for message in &session.messages {
        let who = if message.is_from_user() { "you" } else { "tutor" };
        let html = prepchat::format_to_html_with_config(&message.message, &config.render);
        println!("[{who}] {html}");
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
