use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use errors::PaperchatdErrors;
use paperchat::{
  chat::{
    ChatMessage, GroqClient, PaperChat, PaperInfo, DEFAULT_HISTORY_WINDOW, DEFAULT_MODEL,
    GROQ_KEY_VAR,
  },
  clients::{
    arxiv::extract_arxiv_id, scholar::SERPAPI_KEY_VAR, ArxivClient, ScholarClient,
    SearchProvider, Source,
  },
  download::{default_download_dir, ArxivPdfFetcher, PdfFetcher},
  errors::PaperchatError,
  format::pdf_filename,
  normalize::LexicalNormalizer,
  paper::Paper,
  recommend::{Recommender, DEFAULT_RECOMMENDATIONS},
};
use serde::Deserialize;
use server::AppState;
use tracing::{debug, info, trace, warn};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod errors;
pub mod server;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");
static ROBOT: Emoji<'_, '_> = Emoji("🤖 ", "");

/// Keywords printed per recommendation.
const KEYWORDS_SHOWN: usize = 6;

/// Characters of a summary shown in listings.
const PREVIEW_LENGTH: usize = 100;

#[derive(Parser)]
#[command(author, version, about = "HTTP host and CLI for the paperchat research assistant")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the HTTP host for the browser front end
  Serve {
    /// Address to bind
    #[arg(long, env = "PAPERCHAT_HOST", default_value = "127.0.0.1")]
    host:           String,
    /// Port to listen on
    #[arg(long, short, env = "PAPERCHAT_PORT", default_value_t = 5000)]
    port:           u16,
    /// Directory downloaded PDFs are saved to
    #[arg(long, env = "PAPERCHAT_DOWNLOAD_DIR")]
    download_dir:   Option<PathBuf>,
    /// Also write daily rotated log files to this directory
    #[arg(long)]
    log_dir:        Option<PathBuf>,
    /// Conversation turns sent along with each chat message
    #[arg(long, default_value_t = DEFAULT_HISTORY_WINDOW)]
    history_window: usize,
    /// Chat model
    #[arg(long, env = "PAPERCHAT_MODEL", default_value = DEFAULT_MODEL)]
    model:          String,
  },
  /// Search arXiv or Google Scholar
  Search {
    /// Search query
    query:  String,
    /// Where to search (arxiv, scholar)
    #[arg(long, short, default_value = "arxiv")]
    source: Source,
  },
  /// Rank papers from a JSON file against a target paper
  Recommend {
    /// JSON file of the form {"targetPaper": {...}, "allPapers": [...]}
    #[arg(long, short)]
    input: PathBuf,
    /// Number of recommendations
    #[arg(short = 'n', long = "count", default_value_t = DEFAULT_RECOMMENDATIONS)]
    count: usize,
  },
  /// Download the PDF of an arXiv paper
  Download {
    /// arXiv identifier or arxiv.org URL
    identifier: String,
    /// Title the file is named after
    #[arg(long, short)]
    title:      String,
    /// Target directory, the download directory by default
    #[arg(long, short)]
    dir:        Option<PathBuf>,
  },
  /// Chat with the model about an arXiv paper
  Chat {
    /// arXiv identifier or arxiv.org URL
    identifier:     String,
    /// Conversation turns sent along with each message
    #[arg(long, default_value_t = DEFAULT_HISTORY_WINDOW)]
    history_window: usize,
    /// Chat model
    #[arg(long, env = "PAPERCHAT_MODEL", default_value = DEFAULT_MODEL)]
    model:          String,
  },
}

/// Input file of `recommend`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendInput {
  /// Paper to find neighbours for
  target_paper: Paper,
  /// Candidate pool
  all_papers:   Vec<Paper>,
}

/// Setup logging with the specified verbosity level, optionally into daily log files too
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Result<(), PaperchatdErrors> {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let stderr_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let file_layer = match log_dir {
    Some(dir) => {
      let appender = rolling::RollingFileAppender::builder()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("paperchatd")
        .filename_suffix("log")
        .build(dir)?;
      Some(
        fmt::layer()
          .with_writer(appender)
          .with_ansi(false)
          .with_thread_ids(true)
          .with_target(true)
          .with_file(true)
          .with_line_number(true),
      )
    },
    None => None,
  };

  tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).init();
  Ok(())
}

/// Prints a numbered paper listing.
fn print_paper(index: usize, paper: &Paper) {
  println!("\n{}. {}", style(index).yellow(), style(&paper.title).white().bold());
  if let Some(published) = paper.published() {
    println!("   {} {}", style("Published:").green(), style(published.date_naive()).white());
  }
  if let Some(link) = paper.link().filter(|link| !link.is_empty()) {
    println!("   {} {}", style("Link:").green(), style(link).blue().underlined());
  }
  if !paper.summary.is_empty() {
    let preview = paper.summary.chars().take(PREVIEW_LENGTH).collect::<String>();
    let preview = if paper.summary.chars().count() > PREVIEW_LENGTH {
      format!("{preview}...")
    } else {
      preview
    };
    println!("   {} {}", style("Summary:").green(), style(preview).white().italic());
  }
}

#[tokio::main]
async fn main() -> Result<(), PaperchatdErrors> {
  if let Err(e) = dotenvy::dotenv() {
    if !e.not_found() {
      eprintln!("{} Ignoring unreadable .env file: {e}", style(WARNING).yellow());
    }
  }
  let cli = Cli::parse();

  match cli.command {
    Commands::Serve { host, port, download_dir, log_dir, history_window, model } => {
      setup_logging(cli.verbose.max(1), log_dir.as_deref())?;

      let download_dir = download_dir.unwrap_or_else(default_download_dir);
      let chat_client = GroqClient::from_env().with_model(model);
      if !chat_client.has_api_key() {
        warn!("{GROQ_KEY_VAR} is not set, /chat will answer with errors");
      }
      let scholar = ScholarClient::from_env();
      if !scholar.has_api_key() {
        warn!("{SERPAPI_KEY_VAR} is not set, /scholar-results will answer with errors");
      }
      info!("Saving PDFs to {}", download_dir.display());

      let state = AppState {
        recommender: Recommender::new(Arc::new(LexicalNormalizer::new())),
        arxiv: Arc::new(ArxivClient::new()),
        scholar: Arc::new(scholar),
        fetcher: Arc::new(ArxivPdfFetcher::new()),
        chat: PaperChat::new(Arc::new(chat_client)).with_window(history_window),
        download_dir,
      };

      let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
      println!(
        "{} Serving on {}",
        style(ROCKET).cyan(),
        style(format!("http://{}", listener.local_addr()?)).yellow()
      );
      server::serve(listener, server::router(state)).await?;
      Ok(())
    },

    Commands::Search { query, source } => {
      setup_logging(cli.verbose, None)?;
      let provider: Box<dyn SearchProvider> = match source {
        Source::Arxiv => Box::new(ArxivClient::new()),
        Source::Scholar => Box::new(ScholarClient::from_env()),
      };

      println!(
        "{} Searching {} for: {}",
        style(LOOKING_GLASS).cyan(),
        style(provider.name()).cyan(),
        style(&query).yellow()
      );
      let papers = provider.search(&query).await?;
      if papers.is_empty() {
        println!(
          "{} No papers found matching: {}",
          style(WARNING).yellow(),
          style(&query).yellow()
        );
        return Ok(());
      }

      println!("\n{} Found {} papers:", style(SUCCESS).green(), style(papers.len()).yellow());
      for (i, paper) in papers.iter().enumerate() {
        debug!("Paper details: {:?}", paper);
        print_paper(i + 1, paper);
      }
      Ok(())
    },

    Commands::Recommend { input, count } => {
      setup_logging(cli.verbose, None)?;
      trace!("Reading papers from {}", input.display());
      let RecommendInput { target_paper, all_papers } =
        serde_json::from_str(&std::fs::read_to_string(&input)?)?;

      let recommender = Recommender::new(Arc::new(LexicalNormalizer::new()));
      let ranked = recommender.rank(&target_paper, &all_papers);

      println!(
        "{} Papers similar to: {}",
        style(BOOKS).cyan(),
        style(&target_paper.title).white().bold()
      );
      if ranked.is_empty() || count == 0 {
        println!("{} No candidates to recommend", style(WARNING).yellow());
        return Ok(());
      }

      for (i, recommendation) in ranked.iter().take(count).enumerate() {
        let paper = &recommendation.paper;
        println!(
          "\n{}. {} {}",
          style(i + 1).yellow(),
          style(&paper.title).white().bold(),
          style(format!("({:.3})", recommendation.score)).cyan()
        );
        let keywords = recommender.normalizer().keywords(&paper.text(), KEYWORDS_SHOWN);
        if !keywords.is_empty() {
          println!("   {} {}", style("Keywords:").green(), style(keywords.join(", ")).white());
        }
      }
      Ok(())
    },

    Commands::Download { identifier, title, dir } => {
      setup_logging(cli.verbose, None)?;
      let arxiv_id = extract_arxiv_id(&identifier)?;
      let dir = dir.unwrap_or_else(default_download_dir);

      println!("{} Downloading: {}", style(PAPER).cyan(), style(&arxiv_id).yellow());
      let path =
        ArxivPdfFetcher::new().fetch_and_save(&arxiv_id, &dir, &pdf_filename(&title)).await?;
      println!("{} Saved to: {}", style(SAVE).green(), style(path.display()).yellow());
      Ok(())
    },

    Commands::Chat { identifier, history_window, model } => {
      setup_logging(cli.verbose, None)?;
      let client = GroqClient::from_env().with_model(model);
      if !client.has_api_key() {
        return Err(PaperchatError::MissingApiKey(GROQ_KEY_VAR).into());
      }

      println!("{} Fetching paper: {}", style(LOOKING_GLASS).cyan(), style(&identifier).yellow());
      let paper = ArxivClient::new().fetch_paper(&identifier).await?;
      print_paper(1, &paper);
      println!(
        "\n{} Ask anything about this paper. An empty line or {} ends the chat.",
        style(ROBOT).cyan(),
        style("exit").yellow()
      );

      let chat = PaperChat::new(Arc::new(client)).with_window(history_window);
      let info = PaperInfo::from(&paper);
      let mut history = Vec::<ChatMessage>::new();
      loop {
        let input = dialoguer::Input::<String>::new()
          .with_prompt(style("You").green().bold().to_string())
          .allow_empty(true)
          .interact_text()?;
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("exit") {
          break;
        }

        history.push(ChatMessage::human(input));
        match chat.reply(&info, &history).await {
          Ok(reply) => {
            println!("{} {}", style(ROBOT).cyan(), reply.content);
            history.push(reply);
          },
          Err(e) => {
            history.pop();
            println!("{} {}", style(WARNING).yellow(), style(e).red());
          },
        }
      }
      println!("{} Goodbye!", style(SUCCESS).green());
      Ok(())
    },
  }
}
