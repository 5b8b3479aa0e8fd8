//! Line-based operator prompts.
//!
//! Every question is answered by exactly one line of text. An empty answer
//! means "keep the existing value" wherever a default exists. The
//! [`Prompt`] trait is passed explicitly to the form and the orchestrator,
//! so tests can swap the terminal for a [`ScriptedPrompt`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{EditorError, Result};

/// A channel to the human operator.
pub trait Prompt {
    /// Shows `question` and waits for one line of input.
    ///
    /// The answer is returned without its line terminator and with no
    /// other trimming.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InputClosed`] if input ends before a line is
    /// read, or [`EditorError::Terminal`] if the terminal fails.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Shows a one-line notice to the operator.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Terminal`] if the terminal fails.
    fn tell(&mut self, message: &str) -> Result<()>;
}

/// Asks `question` and maps an empty answer to `None`.
///
/// # Errors
///
/// Propagates any error from [`Prompt::ask`].
#[inline]
pub fn ask_optional<P: Prompt + ?Sized>(prompt: &mut P, question: &str) -> Result<Option<String>> {
    let answer = prompt.ask(question)?;
    Ok((!answer.is_empty()).then_some(answer))
}

/// Prompt bound to the process's standard input and output.
///
/// Each question locks stdout and stdin for its own duration only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Creates a terminal prompt.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    #[inline]
    fn ask(&mut self, question: &str) -> Result<String> {
        let mut output = io::stdout().lock();
        let mut input = io::stdin().lock();
        ask_line(&mut input, &mut output, question)
    }

    #[inline]
    fn tell(&mut self, message: &str) -> Result<()> {
        let mut output = io::stdout().lock();
        writeln!(output, "{message}")?;
        Ok(())
    }
}

/// Writes `question` to `output`, then reads one line from `input`.
fn ask_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(EditorError::InputClosed);
    }
    Ok(strip_line_terminator(line))
}

/// Removes one trailing `\n` or `\r\n`.
fn strip_line_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        let _newline = line.pop();
        if line.ends_with('\r') {
            let _carriage_return = line.pop();
        }
    }
    line
}

/// Prompt that replays canned answers, for tests and scripted sessions.
///
/// Questions and notices are recorded so callers can assert on what the
/// operator would have seen.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    /// Answers not yet consumed, in order.
    answers: VecDeque<String>,
    /// Every question asked so far.
    questions: Vec<String>,
    /// Every notice shown so far.
    messages: Vec<String>,
}

impl ScriptedPrompt {
    /// Creates a prompt that answers with `answers`, in order.
    #[inline]
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Returns the questions asked so far.
    #[inline]
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Returns the notices shown so far.
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns how many answers have not been consumed.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    #[inline]
    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_owned());
        self.answers.pop_front().ok_or(EditorError::InputClosed)
    }

    #[inline]
    fn tell(&mut self, message: &str) -> Result<()> {
        self.messages.push(message.to_owned());
        Ok(())
    }
}
