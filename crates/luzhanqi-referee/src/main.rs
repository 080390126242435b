//! Luzhanqi referee — command-line entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use luzhanqi_referee::config::store::{
    CredentialStore, FileCredentialStore, GEMINI_KEY_ID, OPENAI_KEY_ID,
};
use luzhanqi_referee::config::{ProviderConfig, ProviderKind};
use luzhanqi_referee::pipeline::Pipeline;
use luzhanqi_referee::provider;
use luzhanqi_referee::speech::{AudioSink, NullSink, RodioSink, VoiceResponder};

#[derive(Parser)]
#[command(
    name = "luzhanqi-referee",
    about = "Luzhanqi referee — photograph two pieces, ask a vision model which is removed",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline on a frame loaded from an image file.
    Judge {
        /// Path to the photo of the two pieces.
        #[arg(short, long)]
        image: String,

        /// Inference backend to use.
        #[arg(short, long, value_enum, default_value_t = ProviderKind::ChatVision)]
        provider: ProviderKind,

        /// Speak the verdict aloud after printing it.
        #[arg(long)]
        speak: bool,
    },

    /// Manage stored API keys.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Generate shell completions.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store a key for a provider.
    Set {
        #[arg(value_enum)]
        provider: KeyProvider,
        value: String,
    },

    /// Remove a stored key.
    Clear {
        #[arg(value_enum)]
        provider: KeyProvider,
    },

    /// Show which keys are configured.
    Status,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum KeyProvider {
    Openai,
    Gemini,
}

impl KeyProvider {
    fn store_id(self) -> &'static str {
        match self {
            KeyProvider::Openai => OPENAI_KEY_ID,
            KeyProvider::Gemini => GEMINI_KEY_ID,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Judge {
            image,
            provider: kind,
            speak,
        } => {
            let store = FileCredentialStore::default_store()?;
            let config = ProviderConfig::resolve(kind, &store);

            let frame = luzhanqi_vision::frame_from_file(&image)?;
            let provider = provider::from_config(&config);

            let responder = if speak {
                let sink: Box<dyn AudioSink> = match RodioSink::spawn() {
                    Ok(sink) => Box::new(sink),
                    Err(e) => {
                        tracing::warn!("audio output unavailable, verdict will not be spoken: {e}");
                        Box::new(NullSink)
                    }
                };
                Some(VoiceResponder::new(&config, sink))
            } else {
                None
            };

            let pipeline = Pipeline::new(provider, responder);
            let verdict = pipeline.run(&frame).await?;
            println!("{verdict}");
        }

        Commands::Key { action } => {
            let mut store = FileCredentialStore::default_store()?;
            match action {
                KeyAction::Set { provider, value } => {
                    store.set(provider.store_id(), &value)?;
                    println!("Stored {} key", provider.store_id());
                }
                KeyAction::Clear { provider } => {
                    if store.delete(provider.store_id())? {
                        println!("Cleared {} key", provider.store_id());
                    } else {
                        println!("No {} key was stored", provider.store_id());
                    }
                }
                KeyAction::Status => {
                    for id in [OPENAI_KEY_ID, GEMINI_KEY_ID] {
                        let state = if store.get(id).is_some() {
                            "configured"
                        } else {
                            "not set"
                        };
                        println!("{id}: {state}");
                    }
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "luzhanqi-referee", &mut std::io::stdout());
        }
    }

    Ok(())
}
