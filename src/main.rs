use std::error::Error;
use std::sync::Arc;

use doc_index::embed::ollama::OllamaEmbedder;
use doc_index::{QdrantFacade, ingest::ingest_dir};
use grounder::{AskOptions, OllamaGenerator, QaConfig, QaService};
use llm_service::OllamaService;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  paper-qa ingest <dir>      index all .txt/.md files in <dir>");
    eprintln!("  paper-qa ask <question>    answer a question from the index");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| usage());

    let cfg = QaConfig::from_env();
    let index_cfg = cfg.make_index_config();
    index_cfg.validate()?;

    let facade = Arc::new(QdrantFacade::new(&index_cfg)?);
    let embed_svc = Arc::new(OllamaService::new(cfg.make_embed_llm_config())?);
    let embedder = Arc::new(OllamaEmbedder::new(embed_svc, cfg.embedding_dim));

    match command.as_str() {
        "ingest" => {
            let dir = args.next().unwrap_or_else(|| usage());
            let total = ingest_dir(&index_cfg, &facade, embedder.as_ref(), &dir).await?;
            println!("Indexed {total} chunks from {dir}");
        }
        "ask" => {
            let question = args.collect::<Vec<_>>().join(" ");
            if question.trim().is_empty() {
                usage();
            }

            let gen_svc = Arc::new(OllamaService::new(cfg.make_generator_llm_config())?);
            let llm = Arc::new(OllamaGenerator::new(gen_svc));
            let service = QaService::new(cfg, facade, embedder, llm);

            let qa = service.ask(&question, AskOptions::default()).await?;
            println!("{}", qa.answer);
            if !qa.context.is_empty() {
                println!("\nSources:");
                for c in &qa.context {
                    println!("  [{:.3}] {}", c.score, c.tag);
                }
            }
        }
        _ => usage(),
    }

    Ok(())
}
