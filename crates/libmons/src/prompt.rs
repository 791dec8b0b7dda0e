// SPDX-License-Identifier: MIT OR Apache-2.0

/// interactive decisions the resolvers hand back to the caller.
pub trait Prompter {
    /// offers `options` numbered from 1 and returns the chosen number.
    ///
    /// `0` means the user declined to pick anything.
    fn select(&self, title: &str, options: &[String]) -> usize;

    fn confirm(&self, question: &str, default: bool) -> bool;

    /// free-form answer, `None` when the user gives none.
    fn input(&self, question: &str) -> Option<String>;
}

/// answers every question without a terminal.
///
/// with `assume_yes` the first option is picked and confirmations are
/// accepted; otherwise selections abort and confirmations are declined,
/// whatever their default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended {
    pub assume_yes: bool,
}

impl Unattended {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for Unattended {
    fn select(&self, title: &str, options: &[String]) -> usize {
        let choice = usize::from(self.assume_yes && !options.is_empty());
        log::debug!(target: "prompt", "{title} -> {choice}");
        choice
    }

    fn confirm(&self, question: &str, default: bool) -> bool {
        let answer = self.assume_yes;
        log::debug!(target: "prompt", "{question} (default {default}) -> {answer}");
        answer
    }

    fn input(&self, _question: &str) -> Option<String> {
        None
    }
}
