//! The "proceed with commit?" gate after a review.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;
use tracing::{debug, warn};

/// Source of the user's answer to a yes/no question.
///
/// Implementations must never fail: an answer that cannot be read counts
/// as "no".
pub trait DecisionProvider {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Whether `answer` affirms: `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Asks on the terminal, or reads one line from piped stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalDecision;

impl DecisionProvider for TerminalDecision {
    fn confirm(&self, prompt: &str) -> bool {
        println!();
        let answer = if io::stdin().is_terminal() {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| e.to_string())
        } else {
            read_piped_answer(prompt, &mut io::stdin().lock()).map_err(|e| e.to_string())
        };

        match answer {
            Ok(answer) => {
                debug!("Decision answer: {:?}", answer);
                is_affirmative(&answer)
            }
            Err(e) => {
                warn!("Could not read an answer, treating it as no: {}", e);
                false
            }
        }
    }
}

/// Print the prompt and read a single line. End of input reads as empty.
fn read_piped_answer(prompt: &str, input: &mut impl BufRead) -> io::Result<String> {
    print!("{prompt}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// A fixed answer, for tests and scripted runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub bool);

impl DecisionProvider for FixedDecision {
    fn confirm(&self, prompt: &str) -> bool {
        debug!("{} -> {}", prompt, self.0);
        self.0
    }
}
