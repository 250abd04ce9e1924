//! Line-oriented interactive session exposing the tree and prune commands.
//!
//! The session remembers a selected database (`use <db>`) for the prompt.
//! Reports and prunes address databases through their own handles, so running
//! them never changes that selection.

use std::io::{BufRead, Write};

use crate::connection::AdminClient;
use crate::error::Result;
use crate::inventory::{print_index_tree, print_tree};
use crate::prune::{PruneOptions, prune_collections_with};

pub const DEFAULT_DATABASE: &str = "test";

const HELP: &str = "\
tree            print databases and collections
itree           print databases, collections and indexes
prune           drop collections matching the cache matcher
use <database>  select a database
db              show the selected database
help            show this message
exit            leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tree,
    IndexTree,
    Prune,
    Use(String),
    ShowDatabase,
    Help,
    Exit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Empty);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (head, rest.as_slice()) {
            ("tree", []) => Command::Tree,
            ("itree" | "index-tree", []) => Command::IndexTree,
            ("prune" | "prune-cache", []) => Command::Prune,
            ("use", [database]) => Command::Use((*database).to_string()),
            ("use", _) => return Err("usage: use <database>".into()),
            ("db", []) => Command::ShowDatabase,
            ("help", _) => Command::Help,
            ("exit" | "quit", []) => Command::Exit,
            _ => return Err(format!("unknown command: {}", line.trim())),
        };
        Ok(command)
    }
}

/// Whether the session keeps reading after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

pub struct Session<C: AdminClient> {
    client: C,
    label: String,
    active_database: String,
    prune: PruneOptions,
}

impl<C: AdminClient> Session<C> {
    pub fn new(client: C, label: impl Into<String>) -> Self {
        Self {
            client,
            label: label.into(),
            active_database: DEFAULT_DATABASE.to_string(),
            prune: PruneOptions::default(),
        }
    }

    /// Matcher, dry-run flag and cursor batch size used by every command.
    pub fn with_prune_options(mut self, prune: PruneOptions) -> Self {
        self.prune = prune;
        self
    }

    pub fn active_database(&self) -> &str {
        &self.active_database
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn prompt(&self) -> String {
        format!("{}:{}> ", self.label, self.active_database)
    }

    /// Run one command, writing its output to `output`.
    ///
    /// Pruned collections are written one by one as they are dropped, so a
    /// failing drop still leaves the earlier ones on record.
    pub fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> Result<Outcome> {
        match command {
            Command::Tree => print(output, &print_tree(&self.client, self.prune.batch_size)?)?,
            Command::IndexTree => {
                print(output, &print_index_tree(&self.client, self.prune.batch_size)?)?
            }
            Command::Prune => {
                let dry_run = self.prune.dry_run;
                prune_collections_with(&self.client, &self.prune, |dropped| {
                    writeln!(output, "{}", dropped.line(dry_run))?;
                    output.flush()?;
                    Ok(())
                })?;
            }
            Command::Use(database) => {
                print(output, &format!("switched to db {database}"))?;
                self.active_database = database;
            }
            Command::ShowDatabase => print(output, &self.active_database)?,
            Command::Help => print(output, HELP)?,
            Command::Exit => return Ok(Outcome::Exit),
            Command::Empty => {}
        }
        Ok(Outcome::Continue)
    }

    /// Read commands until `exit` or end of input.
    ///
    /// A failing command prints the error and the session carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        write!(output, "{}", self.prompt())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let result = match Command::parse(&line) {
                Ok(command) => self.execute(command, &mut output).map_err(|e| e.to_string()),
                Err(message) => Err(message),
            };

            match result {
                Ok(Outcome::Exit) => return Ok(()),
                Ok(Outcome::Continue) => {}
                Err(message) => {
                    log::debug!("Shell command failed: {message}");
                    writeln!(output, "error: {message}")?;
                }
            }

            write!(output, "{}", self.prompt())?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }
}

/// Write `text` as a line; empty text writes nothing.
fn print<W: Write>(output: &mut W, text: &str) -> Result<()> {
    if !text.is_empty() {
        writeln!(output, "{text}")?;
    }
    Ok(())
}
