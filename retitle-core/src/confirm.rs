//! Confirmation seam for decisions that need a human.
//!
//! The engine never prompts on its own. It hands a [`ConfirmRequest`] to
//! whatever [`ConfirmationProvider`] the caller installed: a terminal prompt,
//! a scripted queue in tests, or a blanket answer for unattended runs.

use std::collections::VecDeque;
use std::path::Path;

use retitle_model::MatchDecision;

/// A question the pipeline needs answered before touching the filesystem.
#[derive(Debug, Clone, Copy)]
pub enum ConfirmRequest<'a> {
    /// An ASK_CONFIRM item: rename `path` to `proposed_name`?
    Rename {
        path: &'a Path,
        proposed_name: &'a str,
        decision: &'a MatchDecision,
    },
    /// The rename target exists and is a different file: replace it?
    Overwrite {
        source: &'a Path,
        destination: &'a Path,
    },
}

/// Answers confirmation requests. Blocking is allowed.
pub trait ConfirmationProvider {
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool;
}

/// Declines everything; the unattended default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl ConfirmationProvider for AlwaysDecline {
    fn confirm(&mut self, _request: &ConfirmRequest<'_>) -> bool {
        false
    }
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl ConfirmationProvider for AlwaysAccept {
    fn confirm(&mut self, _request: &ConfirmRequest<'_>) -> bool {
        true
    }
}

/// Pops pre-recorded answers in order; declines once the queue runs dry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<bool>,
    asked: usize,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }

    /// How many requests were received so far.
    pub fn asked(&self) -> usize {
        self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ConfirmationProvider for ScriptedAnswers {
    fn confirm(&mut self, _request: &ConfirmRequest<'_>) -> bool {
        self.asked += 1;
        self.answers.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_drain_then_decline() {
        let mut provider = ScriptedAnswers::new([true, false]);
        let request = ConfirmRequest::Overwrite {
            source: Path::new("a.mkv"),
            destination: Path::new("b.mkv"),
        };

        assert!(provider.confirm(&request));
        assert!(!provider.confirm(&request));
        assert!(!provider.confirm(&request));
        assert_eq!(provider.asked(), 3);
        assert_eq!(provider.remaining(), 0);
    }
}
