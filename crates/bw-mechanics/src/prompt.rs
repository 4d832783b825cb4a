//! The confirmation / choice collaborator.
//!
//! Prompts are the only points where a roll waits on the player. Nothing
//! gated by a prompt is written until it returns, and a dismissed prompt
//! (`false` / `None`) leaves the character as it was.

use std::collections::VecDeque;

/// Asks the player to confirm or choose.
pub trait Prompt {
    /// Ask a yes/no question. No answer counts as no.
    fn confirm(&mut self, title: &str, body: &str) -> bool;

    /// Ask the player to pick one of `options`. Returns the picked index, or
    /// `None` if the prompt was dismissed.
    fn choose(&mut self, title: &str, body: &str, options: &[String]) -> Option<usize>;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPrompt {
    /// `true` confirms everything and picks the first option;
    /// `false` declines and dismisses everything.
    pub accept: bool,
}

impl AutoPrompt {
    /// A prompt that always says yes.
    pub fn yes() -> Self {
        Self { accept: true }
    }

    /// A prompt that always says no.
    pub fn no() -> Self {
        Self { accept: false }
    }
}

impl Prompt for AutoPrompt {
    fn confirm(&mut self, _title: &str, _body: &str) -> bool {
        self.accept
    }

    fn choose(&mut self, _title: &str, _body: &str, options: &[String]) -> Option<usize> {
        (self.accept && !options.is_empty()).then_some(0)
    }
}

/// A scripted answer for [`ScriptedPrompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Confirm.
    Yes,
    /// Decline.
    No,
    /// Pick an option by index.
    Pick(usize),
    /// Close the prompt without answering.
    Dismiss,
}

/// Replays a fixed sequence of answers and records every question asked.
/// Runs out as [`Answer::Dismiss`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that will give `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Titles of the prompts shown so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, title: &str) -> Answer {
        self.asked.push(title.to_string());
        self.answers.pop_front().unwrap_or(Answer::Dismiss)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, title: &str, _body: &str) -> bool {
        self.next(title) == Answer::Yes
    }

    fn choose(&mut self, title: &str, _body: &str, options: &[String]) -> Option<usize> {
        match self.next(title) {
            Answer::Pick(i) if i < options.len() => Some(i),
            _ => None,
        }
    }
}
