//! gtranslate: entry point.

use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use gtranslate::{build_url, LangCode, DEFAULT_ENDPOINT};
use gtranslate_cli::output::{render_json, render_plain};
use gtranslate_cli::{resolve_data_dir, resolve_endpoint, Translator, TranslatorOptions};

#[derive(Parser)]
#[command(
    name = "gtranslate",
    about = "Translate text by scraping the Google Translate mobile page",
    version
)]
struct Cli {
    /// Data directory holding cache/ and cookie/.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Endpoint base URL (default: https://translate.google.com/m?).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate text given as arguments, or read from stdin.
    Translate {
        /// Source language (default: auto).
        #[arg(short, long)]
        from: Option<String>,

        /// Target language.
        #[arg(short, long)]
        to: String,

        /// Request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        text: Vec<String>,
    },

    /// Print the request URL without sending it.
    Url {
        #[arg(short, long)]
        from: Option<String>,

        #[arg(short, long)]
        to: String,

        text: Vec<String>,
    },

    /// Percent-decode a string.
    Decode {
        /// Keep `+` literal instead of decoding it to a space.
        #[arg(long)]
        raw: bool,

        text: String,
    },

    /// Launch interactive REPL mode.
    Repl {
        #[arg(short, long)]
        from: Option<String>,

        #[arg(short, long, default_value = "en")]
        to: String,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   gtranslate completions bash > ~/.local/share/bash-completion/completions/gtranslate
    ///   gtranslate completions zsh > ~/.zfunc/_gtranslate
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    gtranslate::global_init();
    let outcome = run(cli);
    gtranslate::global_cleanup();
    outcome
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let endpoint = resolve_endpoint(cli.endpoint.as_deref());

    match cli.command {
        Commands::Translate {
            from,
            to,
            timeout,
            json,
            text,
        } => {
            let text = text_or_stdin(text)?;
            let data_dir = resolve_data_dir(cli.data_dir.as_deref());
            tracing::info!("Data dir: {}", data_dir.display());

            let options = TranslatorOptions {
                from: from.as_deref(),
                to: &to,
                data_dir: Some(&data_dir),
                endpoint: endpoint.as_deref(),
                timeout: timeout.map(Duration::from_secs),
            };
            let mut translator = Translator::open(&options)?;
            let translation = translator
                .translate(&text)
                .with_context(|| format!("translating {} -> {}", translator.source(), translator.target()))?;

            if json {
                let url = translator.session().url()?;
                println!("{}", render_json(&translation, &url)?);
            } else {
                println!("{}", render_plain(&translation));
            }
        }

        Commands::Url { from, to, text } => {
            let url = url_preview(endpoint.as_deref(), from.as_deref(), &to, &text.join(" "))?;
            println!("{url}");
        }

        Commands::Decode { raw, text } => {
            let decoded = gtranslate::decode(text.as_bytes(), raw)
                .context("malformed percent-encoding")?;
            println!("{}", String::from_utf8_lossy(&decoded));
        }

        Commands::Repl { from, to } => {
            let data_dir = resolve_data_dir(cli.data_dir.as_deref());
            let options = TranslatorOptions {
                from: from.as_deref(),
                to: &to,
                data_dir: Some(&data_dir),
                endpoint: endpoint.as_deref(),
                timeout: None,
            };
            let mut translator = Translator::open(&options)?;
            gtranslate_cli::repl::run(&mut translator)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gtranslate", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Build the request URL without touching the network.
fn url_preview(
    endpoint: Option<&str>,
    from: Option<&str>,
    to: &str,
    text: &str,
) -> anyhow::Result<String> {
    anyhow::ensure!(!to.is_empty(), "target language cannot be empty");
    let base = endpoint.unwrap_or(DEFAULT_ENDPOINT);
    anyhow::ensure!(
        base.starts_with("http://") || base.starts_with("https://"),
        "endpoint must be an http(s) URL: {base:?}"
    );
    let source = from
        .filter(|f| !f.is_empty())
        .map(LangCode::new)
        .unwrap_or_default();
    Ok(build_url(base, &source, &LangCode::new(to), text.as_bytes())?)
}

fn text_or_stdin(args: Vec<String>) -> anyhow::Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading text from stdin")?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}
