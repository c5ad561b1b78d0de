//! Text rendering of a machine for debugging.
//!
//! The layout draws the previous and next states as eyes, the current state
//! as the body and the rule set as a nested `from -> event -> to: probability`
//! listing. Keys are sorted so the output is reproducible.

use super::StateMachine;
use crate::core::Token;
use std::collections::BTreeMap;
use std::fmt;

const NOODLES: &str = "        s     s        s         s
       s        s     s            s
      s        s                  s
       s                            s";

const SIGNATURE: &str = "~Touched by His Noodly Appendage~";

pub(crate) fn touched<S: Token, E: Token>(machine: &StateMachine<S, E>) -> String {
    Touched(machine).to_string()
}

struct Touched<'a, S: Token, E: Token>(&'a StateMachine<S, E>);

impl<S: Token, E: Token> fmt::Display for Touched<'_, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machine = self.0;
        let left_eye = format!("    [{}]", machine.previous_state().name());
        let right_eye = format!("[{}]", machine.next_state().map_or("None", |state| state.name()));
        let space = " ".repeat(8);

        // Offsets are in characters so non-ASCII names stay aligned.
        let left_width = left_eye.chars().count();
        let right_width = right_eye.chars().count();
        let left_stem_at = (left_width - 4) / 2 + 4;
        let right_stem_at = (right_width + left_width + space.len()) / 2;
        let body_indent = left_stem_at.saturating_sub(1);

        writeln!(f, "{left_eye}{space}{right_eye}")?;
        writeln!(
            f,
            "{}\\{}/",
            " ".repeat(left_stem_at),
            " ".repeat(right_stem_at)
        )?;
        writeln!(
            f,
            "{}((({})))",
            " ".repeat(body_indent),
            machine.current_state().name()
        )?;
        write_rules(f, machine)?;
        write!(f, "{NOODLES}\n\n{SIGNATURE}")
    }
}

fn write_rules<S: Token, E: Token>(
    f: &mut fmt::Formatter<'_>,
    machine: &StateMachine<S, E>,
) -> fmt::Result {
    let mut grouped: BTreeMap<&S, BTreeMap<&E, BTreeMap<&S, f64>>> = BTreeMap::new();
    for transition in machine.rules().iter() {
        grouped
            .entry(transition.from_state())
            .or_default()
            .entry(transition.event())
            .or_default()
            .insert(transition.to_state(), transition.probability());
    }

    for (from, events) in &grouped {
        writeln!(f, "{}", from.name())?;
        for (event, targets) in events {
            writeln!(f, "  {}", event.name())?;
            for (to, probability) in targets {
                writeln!(f, "    -> {}: {}", to.name(), probability)?;
            }
        }
    }
    Ok(())
}
