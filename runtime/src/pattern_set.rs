//! Bit set of pattern indices.
//!
//! Matchers carry the set of patterns not yet refuted on the current branch. A failing constraint
//! removes the patterns that own it; a branch is abandoned once no pattern that can still finish
//! below it remains.

use smallvec::SmallVec;

const BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatternSet {
    words: SmallVec<[u64; 2]>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// All patterns `0..count`.
    pub fn full(count: usize) -> Self {
        let mut words: SmallVec<[u64; 2]> = smallvec::smallvec![u64::MAX; count / BITS];
        if count % BITS != 0 {
            words.push((1u64 << (count % BITS)) - 1);
        }
        Self { words }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words.get(index / BITS).is_some_and(|word| word & (1 << (index % BITS)) != 0)
    }

    pub fn insert(&mut self, index: usize) {
        let word = index / BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (index % BITS);
    }

    pub fn remove(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(index / BITS) {
            *word &= !(1 << (index % BITS));
        }
    }

    pub fn remove_all(&mut self, indices: &[usize]) {
        for &index in indices {
            self.remove(index);
        }
    }

    pub fn intersects_any(&self, indices: &[usize]) -> bool {
        indices.iter().any(|&index| self.contains(index))
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..BITS).filter(move |bit| word & (1 << bit) != 0).map(move |bit| i * BITS + bit)
        })
    }
}

impl FromIterator<usize> for PatternSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}
