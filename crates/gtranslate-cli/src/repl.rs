//! Interactive translation REPL.
//!
//! Launch with `gtranslate repl`. Plain lines are translated with the current
//! languages; `/help` lists commands, Tab completes them.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use gtranslate::Transport;

use crate::translator::Translator;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/from", "Set the source language (empty for auto)"),
    ("/to", "Set the target language"),
    ("/swap", "Swap source and target languages"),
    ("/url", "Show the request URL for some text"),
    ("/status", "Show languages, directories and last error"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Language codes offered for completion after `/from` and `/to`.
const COMMON_LANGS: &[&str] = &[
    "auto", "ar", "de", "en", "es", "fr", "hi", "id", "it", "ja", "ko", "nl", "pl", "pt", "ru",
    "th", "tr", "uk", "vi", "zh-CN", "zh-TW",
];

/// REPL helper for tab completion.
#[derive(Default)]
struct TranslateHelper;

impl Completer for TranslateHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];
        if !input.starts_with('/') {
            return Ok((pos, Vec::new()));
        }

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<12} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        if cmd == "/from" || cmd == "/to" {
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = COMMON_LANGS
                .iter()
                .filter(|code| code.starts_with(args.trim()))
                .map(|code| Pair {
                    display: code.to_string(),
                    replacement: code.to_string(),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for TranslateHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for TranslateHelper {}
impl Validator for TranslateHelper {}
impl Helper for TranslateHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// What the loop should do after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Run the interactive REPL.
pub fn run<T: Transport>(translator: &mut Translator<T>) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[1mgtranslate v{}\x1b[0m \x1b[90m{} -> {}\x1b[0m",
        env!("CARGO_PKG_VERSION"),
        translator.source(),
        translator.target()
    );
    eprintln!();
    eprintln!(
        "    Type text to translate, \x1b[36m/\x1b[0m for commands, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<TranslateHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(TranslateHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".gtranslate_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    loop {
        let prompt = format!(" \x1b[36m{}>{}\x1b[0m ", translator.source(), translator.target());
        match rl.readline(&prompt) {
            Ok(line) => {
                if handle_line(translator, &line) == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);
    Ok(())
}

fn handle_line<T: Transport>(translator: &mut Translator<T>, line: &str) -> Flow {
    let line = line.trim();
    if line.is_empty() {
        return Flow::Continue;
    }

    let Some(input) = line.strip_prefix('/') else {
        cmd_translate(translator, line);
        return Flow::Continue;
    };

    let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
    let args = args.trim();

    match cmd {
        "exit" | "quit" => return Flow::Exit,
        "" | "help" | "h" | "?" => cmd_help(),
        "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
        "from" => report(translator.set_source(Some(args).filter(|a| !a.is_empty()))),
        "to" => {
            if args.is_empty() {
                eprintln!("  Usage: /to <lang>");
            } else {
                report(translator.set_target(args));
            }
        }
        "swap" => report(translator.swap()),
        "url" => match translator.preview_url(args) {
            Ok(url) => println!("{url}"),
            Err(e) => eprintln!("  Error: {e}"),
        },
        "status" => cmd_status(translator),
        _ => eprintln!("  Unknown command '/{cmd}'. Type /help for commands."),
    }

    Flow::Continue
}

fn report<E: std::fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        eprintln!("  Error: {e}");
    }
}

fn cmd_translate<T: Transport>(translator: &mut Translator<T>, text: &str) {
    match translator.translate(text) {
        Ok(translation) => println!("{}", translation.result),
        Err(e) => eprintln!("  Error: {e}"),
    }
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<14} {desc}");
    }
    eprintln!();
    eprintln!("  Any other line is translated.");
    eprintln!();
}

fn cmd_status<T: Transport>(translator: &Translator<T>) {
    let session = translator.session();
    let show = |p: Option<&std::path::Path>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    eprintln!();
    eprintln!("  Languages:  {} -> {}", translator.source(), translator.target());
    eprintln!("  Endpoint:   {}", session.endpoint());
    eprintln!("  Cache dir:  {}", show(session.cache_dir()));
    eprintln!("  Cookie dir: {}", show(session.cookie_dir()));
    eprintln!("  Buffer:     {} bytes allocated", session.response_buffer().capacity());
    eprintln!("  Last error: {}", session.last_error().unwrap_or("-"));
    eprintln!();
}
