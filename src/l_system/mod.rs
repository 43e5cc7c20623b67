//! The l_system module provides a Lindenmayer rewriting engine for growing
//! fractal words, ready to feed into the [`crate::turtle::Turtle`] walker.
//! Take a look at the [`crate::l_system::LSystem`] struct for more details,
//! and examples.

use std::collections::HashMap;

/// # LSystem
///
/// A Lindenmayer system: a starting word (the axiom) and a table of
/// single-character production rules. Each round of rewriting replaces every
/// character of the current word simultaneously, using the rule table as it
/// stood at the start of the round. Characters without a rule are copied
/// through unchanged, so punctuation such as `+`, `-`, `[` and `]` survives
/// rewriting and keeps its meaning for the turtle.
///
/// The system is stateful: [`LSystem::iterate`] advances the held word and
/// accumulates a total iteration count, so repeated calls continue growing
/// the same word. For a one-shot expansion from the axiom without touching
/// the held state, use [`LSystem::expand`].
///
/// # Example
///
/// ```rust
/// use fractogen::l_system::LSystem;
/// use std::collections::HashMap;
///
/// // The Fibonacci word: lengths follow 1, 2, 3, 5, 8, ...
/// let mut system = LSystem::new(
///     "A",
///     HashMap::from([('A', "AB".to_string()), ('B', "A".to_string())]),
/// );
/// system.iterate(3);
/// assert_eq!(system.word(), "ABAAB");
/// ```
#[derive(Clone, Debug)]
pub struct LSystem {
    axiom: String,
    word: String,
    rules: HashMap<char, String>,
    total_iterations: u32,
}

impl LSystem {
    /// Creates a new system from an axiom and a rule table. The held word
    /// starts out equal to the axiom with zero iterations performed.
    pub fn new(axiom: impl Into<String>, rules: HashMap<char, String>) -> Self {
        let axiom = axiom.into();
        LSystem {
            word: axiom.clone(),
            axiom,
            rules,
            total_iterations: 0,
        }
    }

    /// The starting word this system was built with.
    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    /// The current word, reflecting every rewriting round performed so far.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The production rule table.
    pub fn rules(&self) -> &HashMap<char, String> {
        &self.rules
    }

    /// How many rewriting rounds have been applied to the held word, summed
    /// across every call to [`LSystem::iterate`].
    pub fn total_iterations(&self) -> u32 {
        self.total_iterations
    }

    /// One simultaneous rewriting round. Every character is looked up in the
    /// rule table against the word as it stood on entry, so text inserted by
    /// a rule is never rescanned within the same round.
    fn rewrite(&self, word: &str) -> String {
        word.chars()
            .map(|symbol| match self.rules.get(&symbol) {
                Some(replacement) => replacement.clone(),
                None => String::from(symbol),
            })
            .collect()
    }

    /// # iterate
    ///
    /// Advances the held word by `rounds` rewriting rounds. Growth compounds
    /// across calls: `iterate(2)` followed by `iterate(1)` leaves the same
    /// word as a single `iterate(3)`.
    pub fn iterate(&mut self, rounds: u32) -> &mut Self {
        self.iterate_with(rounds, |_, _| {})
    }

    /// # iterate_with
    ///
    /// Like [`LSystem::iterate`], but invokes `observer` after each round
    /// with the freshly rewritten word and the cumulative iteration count.
    /// Useful for progress reporting on words that grow exponentially.
    pub fn iterate_with<F>(&mut self, rounds: u32, mut observer: F) -> &mut Self
    where
        F: FnMut(&str, u32),
    {
        for _ in 0..rounds {
            self.word = self.rewrite(&self.word);
            self.total_iterations += 1;
            observer(&self.word, self.total_iterations);
        }
        self
    }

    /// # expand
    ///
    /// Expands the axiom by the requested `order` of rewriting rounds and
    /// returns the resulting word, leaving the held word and iteration count
    /// untouched. Useful with [`crate::turtle::Turtle::walk_word`].
    pub fn expand(&self, order: u32) -> String {
        let mut word = self.axiom.clone();
        for _ in 0..order {
            word = self.rewrite(&word);
        }
        word
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fibonacci_system() -> LSystem {
        LSystem::new(
            "A",
            HashMap::from([('A', "AB".to_string()), ('B', "A".to_string())]),
        )
    }

    #[test]
    fn test_expand_simple() {
        let system = fibonacci_system();
        assert!(system.expand(2) == "ABA".to_string());
        assert!(system.expand(5) == "ABAABABAABAAB".to_string());
    }

    #[test]
    fn test_fibonacci_word_growth() {
        let mut system = fibonacci_system();
        let mut lengths = vec![system.word().len()];
        for _ in 0..4 {
            system.iterate(1);
            lengths.push(system.word().len());
        }
        assert_eq!(lengths, vec![1, 2, 3, 5, 8]);
        assert_eq!(system.word(), "ABAABABA");
        assert_eq!(system.expand(3), "ABAAB");
    }

    #[test]
    fn test_unruled_symbols_copy_through() {
        let system = LSystem::new("A-B", HashMap::from([('A', "AA".to_string())]));
        assert_eq!(system.expand(1), "AA-B".to_string());
    }

    #[test]
    fn test_rewriting_is_simultaneous() {
        // The B inserted by the A rule must not be rewritten again within
        // the same round.
        let system = LSystem::new(
            "AB",
            HashMap::from([('A', "AB".to_string()), ('B', "b".to_string())]),
        );
        assert_eq!(system.expand(1), "ABb".to_string());
    }

    #[test]
    fn test_iterations_accumulate_across_calls() {
        let mut system = fibonacci_system();
        system.iterate(2);
        system.iterate(1);
        assert_eq!(system.total_iterations(), 3);
        assert_eq!(system.word(), system.expand(3));
        assert_eq!(system.axiom(), "A");
    }

    #[test]
    fn test_observer_sees_every_round() {
        let mut system = fibonacci_system();
        let mut seen = Vec::new();
        system.iterate_with(3, |word, iteration| {
            seen.push((word.len(), iteration));
        });
        assert_eq!(seen, vec![(2, 1), (3, 2), (5, 3)]);
    }
}
