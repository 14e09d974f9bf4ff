use clap::{Parser, Subcommand};
use pdf_chat_core::{
    AnswerError, CharacterNgramEmbedder, ChatSession, EmbeddingProvider, FlatFileIndex,
    LopdfExtractor, OllamaEmbedder, OllamaGenerator, DEFAULT_INDEX_FILE, DEFAULT_TOP_K,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-chat", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path of the on-disk vector index.
    #[arg(long, default_value = DEFAULT_INDEX_FILE)]
    index_path: PathBuf,

    /// Ollama base URL.
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Embedding model served by Ollama.
    #[arg(long, env = "OLLAMA_EMBED_MODEL", default_value = "nomic-embed-text")]
    embed_model: String,

    /// Output dimensions of the embedding model.
    #[arg(long, default_value = "768")]
    embed_dimensions: usize,

    /// Generation model served by Ollama.
    #[arg(long, env = "OLLAMA_GENERATE_MODEL", default_value = "llama3")]
    generate_model: String,

    /// Embed with the built-in deterministic hashing embedder instead of
    /// Ollama. Answer synthesis still needs a running Ollama server.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Extract, chunk, and embed one PDF into a fresh index.
    Index {
        /// PDF file to index.
        #[arg(long)]
        file: PathBuf,
    },
    /// Answer one question against the previously built index.
    Ask {
        /// Question to answer.
        #[arg(long)]
        question: String,
        /// Number of chunks to retrieve as context.
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Index a PDF, then answer questions interactively.
    Chat {
        /// PDF file to index.
        #[arg(long)]
        file: PathBuf,
        /// Number of chunks to retrieve as context.
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "pdf-chat boot");

    let extractor = LopdfExtractor::default();
    let index = FlatFileIndex::new(&cli.index_path);
    let synthesizer = OllamaGenerator::new(cli.ollama_url.clone(), cli.generate_model.clone());

    if cli.offline {
        let embedder = CharacterNgramEmbedder::default();
        let session = ChatSession::new(extractor, embedder, index, synthesizer);
        run(cli.command, session, &cli.index_path).await
    } else {
        let embedder = OllamaEmbedder::new(
            cli.ollama_url.clone(),
            cli.embed_model.clone(),
            cli.embed_dimensions,
        );
        let session = ChatSession::new(extractor, embedder, index, synthesizer);
        run(cli.command, session, &cli.index_path).await
    }
}

async fn run<E>(
    command: Command,
    mut session: ChatSession<LopdfExtractor, E, FlatFileIndex, OllamaGenerator>,
    index_path: &Path,
) -> anyhow::Result<()>
where
    E: EmbeddingProvider + Send + Sync,
{
    match command {
        Command::Index { file } => {
            let report = session.build_index(&file).await?;
            println!(
                "{} chunks indexed from {} into {}",
                report.chunk_count,
                report.document.document_title,
                index_path.display()
            );
        }
        Command::Ask { question, top_k } => {
            session = session.with_top_k(top_k);
            if !session.resume().await {
                anyhow::bail!(
                    "no index found at {} (run `pdf-chat index --file <pdf>` first)",
                    index_path.display()
                );
            }
            let answer = session.answer(&question).await?;
            println!("{answer}");
        }
        Command::Chat { file, top_k } => {
            session = session.with_top_k(top_k);
            let report = session.build_index(&file).await?;
            println!(
                "{} is ready ({} chunks). Type a question, or \"exit\" to quit.",
                report.document.document_title, report.chunk_count
            );

            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let mut buffer = String::new();

            loop {
                print!("\n> ");
                stdout.flush()?;

                buffer.clear();
                if stdin.read_line(&mut buffer)? == 0 {
                    break;
                }

                let question = buffer.trim();
                if question.is_empty() {
                    continue;
                }
                if question.eq_ignore_ascii_case("exit") {
                    println!("Goodbye!");
                    break;
                }

                match session.answer(question).await {
                    Ok(answer) => println!("{answer}"),
                    // A thin document can leave nothing to retrieve; keep the loop alive.
                    Err(error @ AnswerError::RetrievalUnavailable(_)) => println!("{error}"),
                    Err(error) => return Err(error.into()),
                }
            }
        }
    }

    Ok(())
}
