// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rhyme_finder::utils::logging::{format_error, format_heading, format_info, format_notice};
use rhyme_finder::{
    Action, Config, GeminiClient, GoogleSpeechClient, GoogleTranslateClient, Language,
    Orchestrator, Outcome, PdfSource, PoemOrigin, Session, StepProgress, Validator,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type LiveOrchestrator = Orchestrator<GeminiClient, GoogleTranslateClient, GoogleSpeechClient>;

#[derive(Parser)]
#[command(name = "rhyme_finder")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Find, translate and voice nursery rhymes from PDF charts", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "RHYME_FINDER_CONFIG",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    /// Show the step spinner (only drawn when stderr is a terminal)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    progress: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a poem by title, generating it when no document contains it
    Find {
        #[arg(short, long)]
        title: String,

        /// Language name or code used for translation and voice
        #[arg(short, long, default_value = "English")]
        lang: Language,

        /// Additional PDF to search
        #[arg(long, value_name = "FILE")]
        pdf: Option<PathBuf>,

        /// Override the built-in PDF path
        #[arg(long, value_name = "FILE")]
        builtin: Option<PathBuf>,
    },

    /// List the supported languages
    Languages,

    /// Interactive session with title, language and upload fields
    Session {
        #[arg(long, value_name = "FILE")]
        builtin: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rhyme_finder::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Multilingual Poem Finder");

    if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
    }
    let mut config =
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?;
    let show_progress = StepProgress::should_draw(cli.progress);

    match cli.command {
        Commands::Find {
            title,
            lang,
            pdf,
            builtin,
        } => {
            if let Some(builtin) = builtin {
                config.documents.builtin_path = builtin;
            }
            cmd_find(&config, title, lang, pdf.as_deref(), show_progress).await?;
        }
        Commands::Languages => {
            cmd_languages();
        }
        Commands::Session { builtin } => {
            if let Some(builtin) = builtin {
                config.documents.builtin_path = builtin;
            }
            cmd_session(&config, show_progress).await?;
        }
    }

    Ok(())
}

fn build_orchestrator(config: &Config, show_progress: bool) -> Result<LiveOrchestrator> {
    let generator = GeminiClient::new(&config.generator, &config.http)
        .context("Failed to create Gemini client")?;
    let translator = GoogleTranslateClient::new(&config.translator, &config.http)
        .context("Failed to create translation client")?;
    let speech = GoogleSpeechClient::new(&config.speech, &config.http)
        .context("Failed to create speech client")?;

    let orchestrator =
        Orchestrator::new(config, generator, translator, speech).with_progress(show_progress);

    for notice in orchestrator.startup_notices() {
        println!("{}", format_notice(&notice));
    }

    Ok(orchestrator)
}

fn load_upload(path: &Path) -> Result<PdfSource> {
    Validator::validate_upload(path)?;
    let source = PdfSource::load(path)?;
    info!("Loaded upload {}", path.display());
    Ok(source)
}

async fn cmd_find(
    config: &Config,
    title: String,
    language: Language,
    pdf: Option<&Path>,
    show_progress: bool,
) -> Result<()> {
    let orchestrator = build_orchestrator(config, show_progress)?;

    let mut session = Session::new().with_title(title).with_language(language);
    if let Some(path) = pdf {
        session = session.with_upload(load_upload(path).context("Failed to load PDF")?);
    }

    let session = orchestrator.handle(session, Action::FindOrGenerate).await;
    if let Some(outcome) = &session.last_outcome {
        render_outcome(outcome);
    }

    Ok(())
}

fn cmd_languages() {
    println!("{}", format_heading("Languages"));
    for language in Language::ALL {
        println!("  {:<10} {}", language.name(), language.code());
    }
}

async fn cmd_session(config: &Config, show_progress: bool) -> Result<()> {
    let orchestrator = build_orchestrator(config, show_progress)?;
    let mut session = Session::new();

    print_session_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "title" => {
                session.title = argument.to_string();
            }
            "lang" => match argument.parse::<Language>() {
                Ok(language) => session.language = language,
                Err(e) => println!("{}", format_error(&e)),
            },
            "upload" => match load_upload(Path::new(argument)) {
                Ok(source) => session.upload = Some(source),
                Err(e) => println!("{}", format_error(&format!("{:#}", e))),
            },
            "find" => {
                session = orchestrator.handle(session, Action::FindOrGenerate).await;
                if let Some(outcome) = &session.last_outcome {
                    render_outcome(outcome);
                }
            }
            "clear" => {
                session = orchestrator.handle(session, Action::ClearAll).await;
                println!("{}", format_info("Session cleared"));
            }
            "show" => print_session(&session),
            "help" => print_session_help(),
            "quit" | "exit" => break,
            other => println!("{}", format_error(&format!("Unknown command: {}", other))),
        }
    }

    Ok(())
}

fn print_session_help() {
    println!("{}", format_heading("Commands"));
    println!("  title <text>    set the poem title");
    println!("  lang <name>     set the translation and voice language");
    println!("  upload <file>   add your own PDF");
    println!("  find            find or generate the poem");
    println!("  clear           clear all fields");
    println!("  show            print the current fields and last result");
    println!("  quit            leave the session");
}

fn print_session(session: &Session) {
    println!("  title:    {}", session.title);
    println!(
        "  language: {} ({})",
        session.language,
        session.language.code()
    );
    match &session.upload {
        Some(upload) => println!("  upload:   {}", upload.name()),
        None => println!("  upload:   none"),
    }
    if let Some(outcome) = &session.last_outcome {
        render_outcome(outcome);
    }
}

fn render_outcome(outcome: &Outcome) {
    for notice in &outcome.notices {
        println!("{}", format_notice(notice));
    }

    if let Some(poem) = &outcome.poem {
        let heading = match poem.origin {
            PoemOrigin::Found => "Poem (from PDF)",
            PoemOrigin::Generated => "Poem (generated)",
        };
        println!("\n{}", format_heading(heading));
        println!("{}", poem.text);
    }

    if let Some(translation) = &outcome.translation {
        println!(
            "\n{}",
            format_heading(&format!("Translated ({})", translation.language))
        );
        println!("{}", translation.text);
    }

    if let Some(audio) = &outcome.audio {
        println!("\n{}", format_heading("Audio"));
        println!("{}", audio.display());
    }
}
