use std::collections::HashMap;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound on redraws when a fresh permutation collides with the
/// previous one. After that many collisions the last draw is kept.
pub const MAX_SHUFFLE_ATTEMPTS: usize = 50;

/// Which shuffled list of a question a state entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    MultipleChoice,
    MultipleAnswer,
    TrueFalse,
    MatchingItems,
    MatchingMatches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub component: Component,
    pub question: usize,
}

impl StateKey {
    pub fn new(component: Component, question: usize) -> Self {
        Self {
            component,
            question,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrangement {
    Permutation(Vec<usize>),
    Orientation(bool),
}

/// Last arrangement handed out per key, so the next one can be made to differ.
#[derive(Debug, Clone, Default)]
pub struct ShuffleState {
    last: HashMap<StateKey, Arrangement>,
}

impl ShuffleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &StateKey) -> Option<&Arrangement> {
        self.last.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }

    /// Returns a permutation of `0..items.len()` where `perm[display] = canonical`.
    ///
    /// For two or more items the result differs from the permutation last
    /// stored under `key` in at least one position, unless
    /// [`MAX_SHUFFLE_ATTEMPTS`] draws in a row all repeat it. Lists of zero or
    /// one item get the identity and leave the state alone.
    pub fn shuffle<T, R>(&mut self, items: &[T], key: StateKey, rng: &mut R) -> Vec<usize>
    where
        R: Rng + ?Sized,
    {
        let identity: Vec<usize> = (0..items.len()).collect();
        if items.len() <= 1 {
            return identity;
        }

        let previous = match self.last.get(&key) {
            Some(Arrangement::Permutation(perm)) => Some(perm.clone()),
            _ => None,
        };

        let mut attempts = 0;
        let candidate = loop {
            attempts += 1;
            let mut draw = identity.clone();
            draw.shuffle(rng);
            if previous.as_ref() != Some(&draw) {
                break draw;
            }
            if attempts >= MAX_SHUFFLE_ATTEMPTS {
                debug!(
                    "{:?}: no new permutation after {} draws, repeating {:?}",
                    key, attempts, draw
                );
                break draw;
            }
        };

        debug!("{:?}: shuffled to {:?}", key, candidate);
        self.last
            .insert(key, Arrangement::Permutation(candidate.clone()));
        candidate
    }

    /// Two-way shuffle for true/false. The first call picks at random, every
    /// later call for the same key flips the stored orientation.
    pub fn shuffle_binary_orientation<R>(&mut self, key: StateKey, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let true_first = match self.last.get(&key) {
            Some(Arrangement::Orientation(previous)) => !previous,
            _ => rng.gen_bool(0.5),
        };
        debug!("{:?}: true first = {}", key, true_first);
        self.last.insert(key, Arrangement::Orientation(true_first));
        true_first
    }

    /// Seeds the stored orientation, as if a previous render had shown it.
    pub fn set_orientation(&mut self, key: StateKey, true_first: bool) {
        self.last.insert(key, Arrangement::Orientation(true_first));
    }

    /// Seeds the stored permutation, as if a previous render had shown it.
    pub fn set_permutation(&mut self, key: StateKey, permutation: Vec<usize>) {
        self.last.insert(key, Arrangement::Permutation(permutation));
    }
}
