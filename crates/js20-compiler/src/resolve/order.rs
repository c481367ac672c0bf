//! Depth-first ordering of a reference graph.

use std::collections::{HashMap, HashSet};

use crate::diagnostic::CompilerError;

/// Number of distinct names the orderer visits before giving up.
pub const MAX_VISITS: usize = 500;

/// Orders `seeds` and everything they reference.
///
/// Each name is visited once and its references are visited before it is
/// appended. The finished sequence is reversed, so a name comes before the
/// names it references. Self references are ignored. A reference back to a
/// name still on the stack fails with [`CompilerError::CircularReference`].
pub fn order(seeds: &[String], references: &HashMap<String, Vec<String>>) -> Result<Vec<String>, CompilerError> {
    let mut orderer = Orderer {
        references,
        done: HashSet::new(),
        stack: Vec::new(),
        visits: 0,
        result: Vec::new(),
    };

    for seed in seeds {
        orderer.visit(seed)?;
    }

    let mut result = orderer.result;
    result.reverse();
    Ok(result)
}

struct Orderer<'a> {
    references: &'a HashMap<String, Vec<String>>,
    done: HashSet<String>,
    stack: Vec<String>,
    visits: usize,
    result: Vec<String>,
}

impl Orderer<'_> {
    fn visit(&mut self, name: &str) -> Result<(), CompilerError> {
        if self.done.contains(name) {
            return Ok(());
        }

        if let Some(position) = self.stack.iter().position(|entry| entry == name) {
            let mut cycle = self.stack[position..].to_vec();
            cycle.push(name.to_string());
            return Err(CompilerError::CircularReference { cycle });
        }

        if self.visits >= MAX_VISITS {
            return Err(CompilerError::ReferenceLimitExceeded { limit: MAX_VISITS });
        }
        self.visits += 1;

        self.stack.push(name.to_string());
        if let Some(targets) = self.references.get(name) {
            for target in targets {
                if target != name {
                    self.visit(target)?;
                }
            }
        }
        self.stack.pop();

        self.done.insert(name.to_string());
        self.result.push(name.to_string());
        Ok(())
    }
}
