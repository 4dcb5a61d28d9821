//! Choosing one PDB structure among an entry's candidates

use bmrb_common::types::PdbCode;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Picks the structure used to annotate an entry
///
/// Implementations may keep state across entries (e.g. an RNG stream).
pub trait CandidateSelector: Send {
    fn select<'a>(&mut self, candidates: &'a [PdbCode]) -> Option<&'a PdbCode>;
}

/// Always the first candidate in sorted order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl CandidateSelector for FirstCandidate {
    fn select<'a>(&mut self, candidates: &'a [PdbCode]) -> Option<&'a PdbCode> {
        candidates.first()
    }
}

/// Uniform random choice; reproducible when seeded
#[derive(Debug, Clone)]
pub struct RandomCandidate {
    rng: StdRng,
}

impl RandomCandidate {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl CandidateSelector for RandomCandidate {
    fn select<'a>(&mut self, candidates: &'a [PdbCode]) -> Option<&'a PdbCode> {
        candidates.choose(&mut self.rng)
    }
}

/// Built-in selection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SelectionStrategy {
    #[default]
    First,
    Random { seed: Option<u64> },
}

impl SelectionStrategy {
    pub fn selector(self) -> Box<dyn CandidateSelector> {
        match self {
            SelectionStrategy::First => Box::new(FirstCandidate),
            SelectionStrategy::Random { seed } => Box::new(RandomCandidate::new(seed)),
        }
    }
}
