//! Line-oriented host collaborators: a numbered multi-select picker, a
//! restart prompt and a shell-backed restart.

use engine::host::{HostControl, Notifier, PickOptions, SelectionUi};
use engine::types::PickItem;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::process::Command;
use std::rc::Rc;

/// Invalid answers tolerated before the picker gives up
const MAX_ATTEMPTS: usize = 3;

/// Input and output shared by the picker, the notifier and the host
pub struct Console<R, W> {
    input: R,
    output: W,
    errors_shown: usize,
}

pub type SharedConsole<R, W> = Rc<RefCell<Console<R, W>>>;

/// Console over stdin and stderr, leaving stdout for command output
pub fn stdio_console() -> SharedConsole<io::StdinLock<'static>, io::Stderr> {
    Console::shared(io::stdin().lock(), io::stderr())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            errors_shown: 0,
        }
    }

    pub fn shared(input: R, output: W) -> SharedConsole<R, W> {
        Rc::new(RefCell::new(Self::new(input, output)))
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Errors shown so far through the notifier
    pub fn errors_shown(&self) -> usize {
        self.errors_shown
    }

    fn say(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.output.write_fmt(args).and_then(|_| self.output.flush()) {
            log::warn!("Failed to write to terminal: {e}");
        }
    }

    /// Next line without its terminator, None at end of input
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("Failed to read from terminal: {e}");
                None
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },
    #[error("range {start}-{end} is reversed")]
    ReversedRange { start: usize, end: usize },
    #[error("only one theme can be picked")]
    SingleOnly,
}

/// Parse an answer such as `1,3 5-7` or `*` into zero-based indices,
/// sorted and without duplicates
pub fn parse_selection(answer: &str, len: usize) -> Result<Vec<usize>, SelectionError> {
    let answer = answer.trim();
    if answer == "*" {
        return Ok((0..len).collect());
    }

    let position = |token: &str| -> Result<usize, SelectionError> {
        let index = token
            .trim()
            .parse::<usize>()
            .map_err(|_| SelectionError::NotANumber(token.trim().to_string()))?;
        if index == 0 || index > len {
            return Err(SelectionError::OutOfRange { index, len });
        }
        Ok(index)
    };

    let mut picked = BTreeSet::new();
    for token in answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        match token.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (position(start)?, position(end)?);
                if start > end {
                    return Err(SelectionError::ReversedRange { start, end });
                }
                picked.extend(start - 1..end);
            }
            None => {
                picked.insert(position(token)? - 1);
            }
        }
    }
    Ok(picked.into_iter().collect())
}

/// Numbered multi-select over the console
pub struct TerminalSelection<R, W> {
    console: SharedConsole<R, W>,
}

impl<R: BufRead, W: Write> TerminalSelection<R, W> {
    pub fn new(console: SharedConsole<R, W>) -> Self {
        Self { console }
    }
}

impl<R: BufRead, W: Write> SelectionUi for TerminalSelection<R, W> {
    fn pick_many(&mut self, items: &[PickItem], options: &PickOptions) -> Option<Vec<PickItem>> {
        let mut console = self.console.borrow_mut();
        if items.is_empty() {
            console.say(format_args!("No themes to choose from.\n"));
            return None;
        }

        console.say(format_args!("{}:\n", options.placeholder));
        for (i, item) in items.iter().enumerate() {
            let mark = if item.picked { "x" } else { " " };
            console.say(format_args!(
                "{:>3}) [{mark}] {} ({})\n",
                i + 1,
                item.label,
                item.description
            ));
        }

        for _ in 0..MAX_ATTEMPTS {
            console.say(format_args!(
                "Select themes (e.g. 1,3,5-7 or * for all, blank to cancel): "
            ));
            let answer = console.read_line()?;
            if answer.trim().is_empty() {
                return None;
            }

            let parsed = parse_selection(&answer, items.len()).and_then(|indices| {
                if !options.can_pick_many && indices.len() > 1 {
                    Err(SelectionError::SingleOnly)
                } else {
                    Ok(indices)
                }
            });
            match parsed {
                Ok(indices) => return Some(indices.into_iter().map(|i| items[i].clone()).collect()),
                Err(e) => console.say(format_args!("Invalid selection: {e}\n")),
            }
        }

        log::debug!("Giving up on selection after {MAX_ATTEMPTS} invalid answers");
        None
    }
}

/// Restart prompt and error display over the console
pub struct TerminalNotifier<R, W> {
    console: SharedConsole<R, W>,
}

impl<R: BufRead, W: Write> TerminalNotifier<R, W> {
    pub fn new(console: SharedConsole<R, W>) -> Self {
        Self { console }
    }
}

impl<R: BufRead, W: Write> Notifier for TerminalNotifier<R, W> {
    fn prompt_restart(&mut self, message: &str) -> bool {
        let mut console = self.console.borrow_mut();
        console.say(format_args!("{message}\nRestart now? [y/N] "));
        console
            .read_line()
            .is_some_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn show_error(&mut self, message: &str) {
        let mut console = self.console.borrow_mut();
        console.errors_shown += 1;
        console.say(format_args!("Error: {message}\n"));
    }
}

/// Restarts the editor by running a configured shell command
pub struct ShellHost<R, W> {
    restart_command: Option<String>,
    editor_name: String,
    console: SharedConsole<R, W>,
}

impl<R: BufRead, W: Write> ShellHost<R, W> {
    pub fn new(
        restart_command: Option<String>,
        editor_name: impl Into<String>,
        console: SharedConsole<R, W>,
    ) -> Self {
        Self {
            restart_command,
            editor_name: editor_name.into(),
            console,
        }
    }
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

impl<R: BufRead, W: Write> HostControl for ShellHost<R, W> {
    fn restart(&mut self) -> Result<(), String> {
        let Some(command) = self.restart_command.as_deref() else {
            self.console.borrow_mut().say(format_args!(
                "No restart_command configured. Restart {} to load the activated themes.\n",
                self.editor_name
            ));
            return Ok(());
        };

        log::info!("Running restart command: {command}");
        let status = shell_command(command)
            .status()
            .map_err(|e| format!("could not run '{command}': {e}"))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("'{command}' exited with {status}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;
    use engine::types::ThemeId;
    use std::io::Cursor;

    type TestConsole = SharedConsole<Cursor<&'static str>, Vec<u8>>;

    fn console(input: &'static str) -> TestConsole {
        Console::shared(Cursor::new(input), Vec::new())
    }

    fn output(console: &TestConsole) -> String {
        String::from_utf8(console.borrow().output().clone()).unwrap()
    }

    fn items(ids: &[&str]) -> Vec<PickItem> {
        ids.iter()
            .map(|id| PickItem::for_theme(ThemeId::new(*id), false))
            .collect()
    }

    #[test]
    fn test_parse_selection_forms() {
        assert_eq!(parse_selection("1,3 5-7", 8), Ok(vec![0, 2, 4, 5, 6]));
        assert_eq!(parse_selection("*", 3), Ok(vec![0, 1, 2]));
        assert_eq!(parse_selection("2, 2,1", 3), Ok(vec![0, 1]));
        assert_eq!(parse_selection("3-3", 3), Ok(vec![2]));
    }

    #[test]
    fn test_parse_selection_errors() {
        assert_eq!(
            parse_selection("0", 3),
            Err(SelectionError::OutOfRange { index: 0, len: 3 })
        );
        assert_eq!(
            parse_selection("4", 3),
            Err(SelectionError::OutOfRange { index: 4, len: 3 })
        );
        assert_eq!(
            parse_selection("3-1", 3),
            Err(SelectionError::ReversedRange { start: 3, end: 1 })
        );
        assert_eq!(
            parse_selection("ocean", 3),
            Err(SelectionError::NotANumber("ocean".to_string()))
        );
    }

    #[test]
    fn test_picker_returns_selected_items() {
        let console = console("2-3\n");
        let mut picker = TerminalSelection::new(console.clone());

        let picked = assert_some!(picker.pick_many(
            &items(&["base16-ocean", "base16-mocha", "base16-eighties"]),
            &PickOptions::default()
        ));

        let ids: Vec<&str> = picked.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(ids, vec!["base16-mocha", "base16-eighties"]);
        let shown = output(&console);
        assert!(shown.starts_with("Search a theme:\n"));
        assert!(shown.contains("  1) [ ] Ocean (base16-ocean)"));
    }

    #[test]
    fn test_picker_blank_answer_cancels() {
        let mut picker = TerminalSelection::new(console("\n"));
        assert_none!(picker.pick_many(&items(&["a"]), &PickOptions::default()));
    }

    #[test]
    fn test_picker_end_of_input_cancels() {
        let mut picker = TerminalSelection::new(console(""));
        assert_none!(picker.pick_many(&items(&["a"]), &PickOptions::default()));
    }

    #[test]
    fn test_picker_reprompts_after_invalid_answer() {
        let console = console("9\n1\n");
        let mut picker = TerminalSelection::new(console.clone());

        let picked = assert_some!(picker.pick_many(&items(&["a", "b"]), &PickOptions::default()));

        assert_eq!(picked.len(), 1);
        assert!(output(&console).contains("Invalid selection: 9 is out of range (1-2)"));
    }

    #[test]
    fn test_picker_gives_up_after_repeated_invalid_answers() {
        let mut picker = TerminalSelection::new(console("x\ny\nz\n1\n"));
        assert_none!(picker.pick_many(&items(&["a"]), &PickOptions::default()));
    }

    #[test]
    fn test_picker_with_nothing_to_offer() {
        let console = console("1\n");
        let mut picker = TerminalSelection::new(console.clone());
        assert_none!(picker.pick_many(&[], &PickOptions::default()));
        assert_eq!(output(&console), "No themes to choose from.\n");
    }

    #[test]
    fn test_single_pick_rejects_many() {
        let options = PickOptions {
            can_pick_many: false,
            ..PickOptions::default()
        };
        let mut picker = TerminalSelection::new(console("*\n2\n"));
        let picked = assert_some!(picker.pick_many(&items(&["a", "b"]), &options));
        assert_eq!(picked[0].description, "b");
    }

    #[test]
    fn test_restart_prompt_answers() {
        let console = console("y\nno\n");
        let mut notifier = TerminalNotifier::new(console.clone());

        assert!(notifier.prompt_restart("Base16 theme has changed (1 Added). Please restart Helix."));
        assert!(!notifier.prompt_restart("again"));
        assert!(!notifier.prompt_restart("end of input"));
        assert!(output(&console).contains("Please restart Helix.\nRestart now? [y/N] "));
    }

    #[test]
    fn test_show_error_counts() {
        let console = console("");
        let mut notifier = TerminalNotifier::new(console.clone());
        notifier.show_error("disk full");
        assert_eq!(console.borrow().errors_shown(), 1);
        assert_eq!(output(&console), "Error: disk full\n");
    }

    #[test]
    fn test_restart_without_command_prints_reminder() {
        let console = console("");
        let mut host = ShellHost::new(None, "Helix", console.clone());
        assert_ok!(host.restart());
        assert!(output(&console).contains("Restart Helix to load the activated themes."));
    }

    #[cfg(unix)]
    #[test]
    fn test_restart_runs_shell_command() {
        let mut host = ShellHost::new(Some("true".to_string()), "Helix", console(""));
        assert_ok!(host.restart());

        let mut failing = ShellHost::new(Some("exit 3".to_string()), "Helix", console(""));
        let error = assert_err!(failing.restart());
        assert!(error.contains("exit 3"));
    }
}
