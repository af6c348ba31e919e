//! Interactive input.
//!
//! Commands ask for everything they need through [`Prompt`], so the same
//! handlers run against a terminal or a script.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::{Confirm, Input, Password};

use crate::error::Result;

/// Source of user input.
pub trait Prompt {
    /// Read a line of visible text.
    fn input(&mut self, label: &str) -> Result<String>;

    /// Read a line without echoing it.
    fn secret(&mut self, label: &str) -> Result<String>;

    /// Ask a yes/no question. Only answers starting with `y` count as yes.
    fn confirm(&mut self, label: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal.
///
/// When stdin is not a terminal, answers are read one per line from stdin
/// instead, so input can be piped in.
#[derive(Debug, Default)]
pub struct Terminal;

impl Terminal {
    fn piped() -> bool {
        !io::stdin().is_terminal()
    }

    fn read_line(label: &str) -> Result<String> {
        eprint!("{}: ", label);
        io::stderr().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no input for {}", label.to_lowercase()),
            )
            .into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompt for Terminal {
    fn input(&mut self, label: &str) -> Result<String> {
        if Self::piped() {
            return Self::read_line(label);
        }
        Ok(Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?)
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        if Self::piped() {
            return Self::read_line(label);
        }
        Ok(Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()?)
    }

    fn confirm(&mut self, label: &str) -> Result<bool> {
        if Self::piped() {
            let answer = Self::read_line(&format!("{} [y/N]", label))?;
            return Ok(is_yes(&answer));
        }
        Ok(Confirm::new()
            .with_prompt(label)
            .default(false)
            .interact()?)
    }
}

/// Replays canned answers in order. Used by tests.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl Scripted {
    /// A script answering each question with the next item.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Labels of every question asked so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Whether every answer was consumed
    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, label: &str) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("script has no answer for {}", label),
            )
            .into()
        })
    }
}

impl Prompt for Scripted {
    fn input(&mut self, label: &str) -> Result<String> {
        self.next(label)
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        self.next(label)
    }

    fn confirm(&mut self, label: &str) -> Result<bool> {
        Ok(is_yes(&self.next(label)?))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim_start().to_lowercase().starts_with('y')
}
