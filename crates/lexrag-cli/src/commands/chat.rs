use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use lexrag_application::SessionController;
use lexrag_core::notice::Notice;

use crate::files::read_local_file;
use crate::render;

const COMMANDS: [&str; 8] = [
    "/upload", "/remove", "/docs", "/compare", "/clauses", "/clear", "/help", "/quit",
];

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Ask(String),
    Upload(Vec<String>),
    Remove(String),
    Docs,
    Compare(String, String),
    Clauses(String),
    Clear,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<ReplCommand, String> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        // Questions go out exactly as typed
        return Ok(ReplCommand::Ask(line.to_string()));
    }

    let (command, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();
    match (command, args.as_slice()) {
        ("/upload", []) => Err("Usage: /upload <file>...".to_string()),
        ("/upload", paths) => Ok(ReplCommand::Upload(
            paths.iter().map(|p| p.to_string()).collect(),
        )),
        ("/remove", []) => Err("Usage: /remove <document name>".to_string()),
        ("/remove", _) => Ok(ReplCommand::Remove(rest.trim().to_string())),
        ("/docs", _) => Ok(ReplCommand::Docs),
        ("/compare", [first, second]) => Ok(ReplCommand::Compare(
            first.to_string(),
            second.to_string(),
        )),
        ("/compare", _) => Err("Usage: /compare <first.pdf> <second.pdf>".to_string()),
        ("/clauses", []) => Err("Usage: /clauses <document name>".to_string()),
        ("/clauses", _) => Ok(ReplCommand::Clauses(rest.trim().to_string())),
        ("/clear", _) => Ok(ReplCommand::Clear),
        ("/help", _) => Ok(ReplCommand::Help),
        ("/quit" | "/exit", _) => Ok(ReplCommand::Quit),
        (other, _) => Err(format!("Unknown command: {other}")),
    }
}

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

fn print_help() {
    println!("{}", "Type a question, or one of:".bright_black());
    println!("  /upload <file>...           upload pdf, docx or txt files");
    println!("  /remove <name>              hide a document from the list");
    println!("  /docs                       list documents");
    println!("  /compare <a.pdf> <b.pdf>    compare two contracts");
    println!("  /clauses <name>             show extracted clauses");
    println!("  /clear                      delete every document on the backend");
    println!("  /quit                       exit");
}

/// Prints transcript entries appended since `seen` and advances it.
async fn print_new_messages(session: &SessionController, seen: &mut usize) {
    let messages = session.messages().await;
    for message in messages.iter().skip(*seen) {
        // The user's own line is already on screen
        if !message.is_user() {
            render::message(message);
        }
    }
    *seen = messages.len();
}

/// Shows the initial library once the background load has finished.
/// Never waits on it.
async fn show_loaded_library(
    session: &SessionController,
    loader: &mut Option<JoinHandle<bool>>,
) {
    let Some(handle) = loader.take_if(|handle| handle.is_finished()) else {
        return;
    };
    if matches!(handle.await, Ok(true)) {
        let documents = session.documents().await;
        if !documents.is_empty() {
            render::documents(&documents);
        }
    }
}

async fn execute(session: &SessionController, command: ReplCommand) -> Result<()> {
    match command {
        ReplCommand::Ask(question) => {
            session.submit_question(&question).await;
        }
        ReplCommand::Upload(paths) => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                match read_local_file(path).await {
                    Ok(file) => files.push(file),
                    Err(e) => eprintln!("{}", format!("{e:#}").red()),
                }
            }
            if files.is_empty() {
                return Ok(());
            }
            println!("{}", format!("Uploading {} file(s)...", files.len()).bright_black());
            let report = session.upload_files(files).await;
            tracing::debug!("[Chat] Upload finished: {:?}", report.status);
        }
        ReplCommand::Remove(name) => {
            if !session.remove_document(&name).await {
                println!("{}", format!("No document named '{name}'").yellow());
            }
        }
        ReplCommand::Docs => render::documents(&session.documents().await),
        ReplCommand::Compare(first, second) => {
            let first = read_local_file(&first).await?;
            let second = read_local_file(&second).await?;
            if let Ok(report) = session.compare_documents(first, second).await {
                render::comparison(&report);
            }
        }
        ReplCommand::Clauses(name) => {
            if let Ok(clauses) = session.clauses(&name).await {
                render::clauses(&name, &clauses);
            }
        }
        ReplCommand::Clear => {
            let _ = session.clear_knowledge_base().await;
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
    Ok(())
}

pub async fn run(
    session: Arc<SessionController>,
    mut notices: UnboundedReceiver<Notice>,
) -> Result<()> {
    let mut loader = Some(session.start());

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== LexRAG ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Backend: {}", session.config().backend_url).bright_black()
    );
    let mut seen = 0;
    print_new_messages(&session, &mut seen).await;
    println!("{}", "Type '/help' for commands.".bright_black());
    println!();

    loop {
        show_loaded_library(&session, &mut loader).await;

        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match parse(&line) {
                    Ok(ReplCommand::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => {
                        if let Err(e) = execute(&session, command).await {
                            eprintln!("{}", format!("{e:#}").red());
                        }
                    }
                    Err(usage) => println!("{}", usage.yellow()),
                }

                print_new_messages(&session, &mut seen).await;
                render::drain_notices(&mut notices);
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexrag_core::config::ClientConfig;
    use lexrag_interaction::HttpBackendGateway;
    use tokio::sync::mpsc;

    fn offline_session() -> SessionController {
        let gateway = HttpBackendGateway::new("http://127.0.0.1:9").unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        SessionController::new(Arc::new(gateway), ClientConfig::default(), tx)
    }

    #[tokio::test]
    async fn test_pending_load_does_not_hold_prompt() {
        let session = offline_session();
        let mut loader = Some(tokio::spawn(std::future::pending::<bool>()));

        show_loaded_library(&session, &mut loader).await;
        assert!(loader.is_some());

        let mut finished = Some(tokio::spawn(async { true }));
        while !finished.as_ref().unwrap().is_finished() {
            tokio::task::yield_now().await;
        }
        show_loaded_library(&session, &mut finished).await;
        assert!(finished.is_none());
    }

    #[test]
    fn test_plain_text_is_question_verbatim() {
        assert_eq!(
            parse("  What is the term? ").unwrap(),
            ReplCommand::Ask("  What is the term? ".to_string())
        );
    }

    #[test]
    fn test_upload_takes_several_paths() {
        assert_eq!(
            parse("/upload a.pdf  docs/b.docx").unwrap(),
            ReplCommand::Upload(vec!["a.pdf".into(), "docs/b.docx".into()])
        );
        assert!(parse("/upload").is_err());
    }

    #[test]
    fn test_names_may_contain_spaces() {
        assert_eq!(
            parse("/remove Master Agreement.pdf").unwrap(),
            ReplCommand::Remove("Master Agreement.pdf".into())
        );
        assert_eq!(
            parse("/clauses Master Agreement.pdf").unwrap(),
            ReplCommand::Clauses("Master Agreement.pdf".into())
        );
    }

    #[test]
    fn test_compare_needs_two_paths() {
        assert_eq!(
            parse("/compare old.pdf new.pdf").unwrap(),
            ReplCommand::Compare("old.pdf".into(), "new.pdf".into())
        );
        assert!(parse("/compare old.pdf").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse("/frobnicate").unwrap_err(), "Unknown command: /frobnicate");
        assert_eq!(parse("/exit").unwrap(), ReplCommand::Quit);
    }
}
