//! Interactive Command Loop
//!
//! Thin console front end over the dispatcher: maps friendly command verbs
//! onto the canonical operation vocabulary, prints results, and never holds
//! state of its own. Quoting rules are the dispatcher's (double quotes with
//! backslash escapes), so argument text passes through verbatim.

use std::io::{self, BufRead, Write};

use crate::dispatcher::{Dispatcher, QueryResult};
use crate::fs::EntryKind;

const HELP: &str = "commands:\n\
  mkdir <path>            create a directory\n\
  rmdir <path>            remove an empty directory\n\
  write <path> \"text\"     create a file or replace its content\n\
  rm <path>               remove a file\n\
  mv <from> <to>          move/rename a file or directory\n\
  cp <from> <to>          copy a file\n\
  ls [path]               list a directory\n\
  cat <path>              print a file\n\
  tree [path]             print a subtree\n\
  help                    this text\n\
  exit                    quit";

/// What one input line produced.
#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Output(String),
    Quit,
}

pub struct Shell {
    dispatcher: Dispatcher,
}

impl Shell {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Execute one input line and return what to print.
    pub fn exec_line(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            return LineOutcome::Output(String::new());
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        match verb {
            "exit" | "quit" => LineOutcome::Quit,
            "help" => LineOutcome::Output(HELP.to_string()),
            "mkdir" => self.mutate("CreateDirectory", rest, "directory created"),
            "rmdir" => self.mutate("DeleteDirectory", rest, "directory removed"),
            "write" => self.mutate("CreateOrReplaceFile", rest, "file saved"),
            "rm" => self.mutate("DeleteFile", rest, "file removed"),
            "mv" => self.mutate("Move", rest, "moved"),
            "cp" => self.mutate("Copy", rest, "file copied"),
            "ls" => {
                let path = if rest.is_empty() { "/" } else { rest };
                self.run_query(&format!("List {path}"))
            }
            "cat" => self.run_query(&format!("Read {rest}")),
            "tree" => self.run_query(format!("Tree {rest}").trim_end()),
            _ => LineOutcome::Output(format!("unknown command '{verb}', type 'help'")),
        }
    }

    /// Prompt loop over stdin/stdout until `exit` or end of input.
    pub fn run_interactive(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        writeln!(stdout, "in-memory filesystem, type 'help' for commands")?;
        let mut line = String::new();
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            match self.exec_line(&line) {
                LineOutcome::Quit => return Ok(()),
                LineOutcome::Output(out) => {
                    if !out.is_empty() {
                        writeln!(stdout, "{out}")?;
                    }
                }
            }
        }
    }

    fn mutate(&mut self, kind: &str, rest: &str, done: &str) -> LineOutcome {
        match self.dispatcher.submit(&format!("{kind} {rest}")) {
            Ok(_) => LineOutcome::Output(done.to_string()),
            Err(e) => LineOutcome::Output(format!("error: {e}")),
        }
    }

    fn run_query(&self, text: &str) -> LineOutcome {
        match self.dispatcher.query(text) {
            Ok(result) => LineOutcome::Output(format_result(result)),
            Err(e) => LineOutcome::Output(format!("error: {e}")),
        }
    }
}

fn format_result(result: QueryResult) -> String {
    match result {
        QueryResult::Listing(entries) => entries
            .iter()
            .map(|e| {
                let kind = match e.kind {
                    EntryKind::Directory => "dir",
                    EntryKind::File => "file",
                };
                format!("{kind}\t{}", e.name)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        QueryResult::Content(content) => content,
        QueryResult::Tree(entries) => entries
            .iter()
            .map(|e| {
                let suffix = match e.kind {
                    EntryKind::Directory => "/",
                    EntryKind::File => "",
                };
                format!("{}{}{suffix}", "  ".repeat(e.depth), e.name)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
