//! Interactive go-ahead for overlapping shifts.

use std::io::{BufRead, Write};

use engine::{Confirm, ShiftPlan};

/// Question printed before every read.
pub const PROMPT: &str = "Do you want to continue? [y/n]";

/// Asks on `output` and reads answers from `input` until one is definitive.
///
/// End of input, or a read error, counts as "no".
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> LinePrompt<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, _plan: &ShiftPlan) -> bool {
        if writeln!(self.output, "{PROMPT}").is_err() || self.output.flush().is_err() {
            return false;
        }

        let mut line = String::new();
        loop {
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {
                    if let Some(answer) = interpret(&line) {
                        return answer;
                    }
                }
            }
        }
    }
}

/// Maps a reply onto yes or no; `None` asks again.
fn interpret(line: &str) -> Option<bool> {
    match line.chars().next() {
        Some('y' | 'Y') => Some(true),
        Some('n' | 'N') => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let stats = engine::Statistics::seeded(1000, 1000);
        let analysis = engine::analyze(&stats, 1003).expect("analysis");
        let plan = analysis.plan().copied().expect("plan");
        let answer = LinePrompt::new(Cursor::new(input.as_bytes()), &mut output).confirm(&plan);
        (answer, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn yes_and_no_are_definitive() {
        assert!(ask("y\n").0);
        assert!(ask("Yes please\n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("NO\n").0);
    }

    #[test]
    fn unclear_replies_are_skipped() {
        assert!(ask("maybe\n\n\nyes\n").0);
        assert!(!ask("what\nno\ny\n").0);
    }

    #[test]
    fn leading_blanks_make_a_reply_unclear() {
        assert!(ask(" n\ny\n").0);
        assert!(!ask("\ty\nn\n").0);
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!ask("").0);
        assert!(!ask("perhaps\n").0);
    }

    #[test]
    fn question_is_printed_once() {
        let (_, output) = ask("x\nz\ny\n");
        assert_eq!(output, format!("{PROMPT}\n"));
    }
}
