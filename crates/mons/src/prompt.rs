// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::{self, Write};

use libmons::{Prompter, Unattended};

use crate::output::ansi;

/// asks on stdin when it is a terminal, otherwise answers like [`Unattended`].
pub struct TerminalPrompter {
    assume_yes: bool,
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            interactive: atty::is(atty::Stream::Stdin),
        }
    }

    fn fallback(&self) -> Unattended {
        Unattended::new(self.assume_yes)
    }
}

fn read_answer(prompt: &str) -> Option<String> {
    print!("{} {prompt}", ansi::bold("prompt:"));
    io::stdout().flush().ok();

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

impl Prompter for TerminalPrompter {
    fn select(&self, title: &str, options: &[String]) -> usize {
        if !self.interactive {
            return self.fallback().select(title, options);
        }

        println!("{}", ansi::bold("found:"));
        for (i, option) in options.iter().enumerate() {
            println!("  [{}] {option}", i + 1);
        }

        let choice = read_answer(&format!("{title} (0 to abort): "))
            .and_then(|answer| answer.parse::<usize>().ok())
            .unwrap_or(0);

        if choice == 0 || choice > options.len() {
            println!("aborted!");
        }
        choice
    }

    fn confirm(&self, question: &str, default: bool) -> bool {
        if self.assume_yes || !self.interactive {
            return self.fallback().confirm(question, default);
        }

        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let Some(answer) = read_answer(&format!("{question} {hint} ")) else {
            println!();
            return false;
        };

        match answer.to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        }
    }

    fn input(&self, question: &str) -> Option<String> {
        if !self.interactive {
            return self.fallback().input(question);
        }

        read_answer(&format!("{question}: ")).filter(|answer| !answer.is_empty())
    }
}
