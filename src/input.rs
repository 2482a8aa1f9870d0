use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper, KeyCode,
    KeyEvent, Modifiers,
};

/// Completes slash commands from the registry.
pub struct CommandCompleter {
    command_registry: CommandDispatcher,
}

impl CommandCompleter {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self { command_registry }
    }

    fn candidates(&self, line: &str, pos: usize) -> Vec<Pair> {
        let Some(typed) = line.get(1..pos).filter(|_| line.starts_with('/')) else {
            return Vec::new();
        };
        if typed.contains(char::is_whitespace) {
            return Vec::new();
        }

        let mut names = self.command_registry.get_command_names();
        names.sort();
        names
            .into_iter()
            .filter(|name| name.starts_with(typed))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // 1 is the position after '/'
        Ok((1, self.candidates(line, pos)))
    }
}

pub struct ChatHelper {
    completer: CommandCompleter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            completer: CommandCompleter::new(command_registry),
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {}

impl Validator for ChatHelper {}

pub type ChatEditor = Editor<ChatHelper, FileHistory>;

/// Creates the line editor. Enter submits; Enter with a modifier inserts a
/// line break instead.
pub fn create_editor(command_registry: CommandDispatcher) -> Result<ChatEditor, ChatError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(command_registry)));

    for modifiers in [Modifiers::ALT, Modifiers::SHIFT] {
        editor.bind_sequence(KeyEvent(KeyCode::Enter, modifiers), Cmd::Newline);
    }

    let history_path = Config::input_history_path();
    if let Err(e) = editor.load_history(&history_path) {
        tracing::debug!(path = %history_path.display(), error = %e, "no input history loaded");
    }

    Ok(editor)
}

/// Reads one submission. `None` means the user asked to leave.
pub fn read_input(editor: &mut ChatEditor) -> Result<Option<String>, ChatError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor
                    .add_history_entry(line.as_str())
                    .map_err(|e| ChatError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
    }
}

/// Drops keystrokes typed while a reply was pending so they are not
/// submitted as the next message.
pub fn discard_pending_input() {
    #[cfg(unix)]
    if let Err(e) = discard_typed_ahead(std::io::stdin()) {
        tracing::debug!(error = %e, "could not flush pending terminal input");
    }
}

/// Returns whether anything was flushed; non-terminals are left alone.
#[cfg(unix)]
fn discard_typed_ahead<F: std::os::fd::AsFd>(fd: F) -> nix::Result<bool> {
    use is_terminal::IsTerminal;
    use nix::sys::termios::{FlushArg, tcflush};

    if !fd.is_terminal() {
        return Ok(false);
    }
    tcflush(fd, FlushArg::TCIFLUSH)?;
    Ok(true)
}

pub fn save_history(editor: &mut ChatEditor) -> Result<(), ChatError> {
    let history_path = Config::input_history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatError::Input(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;

    fn names(pairs: Vec<Pair>) -> Vec<String> {
        pairs.into_iter().map(|p| p.replacement).collect()
    }

    #[test]
    fn completes_command_prefixes() {
        let completer = CommandCompleter::new(create_command_registry());
        assert_eq!(names(completer.candidates("/cl", 3)), vec!["clear"]);
        assert_eq!(names(completer.candidates("/c", 2)), vec!["clear", "context"]);
    }

    #[test]
    fn plain_text_and_arguments_are_not_completed() {
        let completer = CommandCompleter::new(create_command_registry());
        assert!(completer.candidates("hello", 5).is_empty());
        assert!(completer.candidates("/model gem", 10).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn typed_ahead_flush_skips_non_terminals() {
        let null = std::fs::File::open("/dev/null").unwrap();
        assert!(!discard_typed_ahead(&null).unwrap());
    }
}
