use std::io::{self, BufRead};

use bw_mechanics::{AutoPrompt, Prompt};
use colored::Colorize;

/// Asks on stderr and reads answers from stdin. End of input or a blank
/// line dismisses the prompt.
pub struct StdinPrompt;

impl StdinPrompt {
    fn ask(&self, title: &str, body: &str, hint: &str) -> Option<String> {
        eprint!("\n  {}\n  {body}\n  {hint} ", title.bold());

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim();
                (!answer.is_empty()).then(|| answer.to_string())
            }
        }
    }
}

impl Prompt for StdinPrompt {
    fn confirm(&mut self, title: &str, body: &str) -> bool {
        self.ask(title, body, "[y/N]")
            .is_some_and(|a| a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes"))
    }

    fn choose(&mut self, title: &str, body: &str, options: &[String]) -> Option<usize> {
        let listing: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}) {o}", i + 1))
            .collect();
        let hint = format!("{} >", listing.join("  "));
        let answer = self.ask(title, body, &hint)?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Some(n - 1),
            _ => options.iter().position(|o| o.eq_ignore_ascii_case(&answer)),
        }
    }
}

/// Pick the prompt for the command line flags.
pub fn for_flags(yes: bool, no: bool) -> Box<dyn Prompt> {
    if yes {
        Box::new(AutoPrompt::yes())
    } else if no {
        Box::new(AutoPrompt::no())
    } else {
        Box::new(StdinPrompt)
    }
}
