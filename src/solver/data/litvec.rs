use super::Lit;
use crate::util;

/// Dense storage indexed by [`Lit`]; the positive and negative literal of a
/// variable sit in adjacent slots.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct LitVec<T>(Vec<T>);

impl<T> LitVec<T> {
    pub fn new() -> Self {
        Self(Default::default())
    }

    /// Get the element stored for `l` and a `Remaining` handle for indexing
    /// into every other literal slot while `l`'s slot stays mutably borrowed.
    pub fn remaining(&mut self, l: Lit) -> (&mut T, Remaining<T>) {
        let (val, remaining) =
            util::remaining(&mut self.0, l.index()).expect("litvec is too small for lit");
        (val, Remaining(remaining))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.0.iter_mut()
    }
}

pub struct Remaining<'a, T>(util::Remaining<'a, T>);

impl<'a, T> std::ops::Index<Lit> for Remaining<'a, T> {
    type Output = T;

    fn index(&self, index: Lit) -> &Self::Output {
        self.0
            .get(index.index())
            .expect("index out of bounds or already used")
    }
}

impl<'a, T> std::ops::IndexMut<Lit> for Remaining<'a, T> {
    fn index_mut(&mut self, index: Lit) -> &mut Self::Output {
        self.0
            .get_mut(index.index())
            .expect("index out of bounds or already used")
    }
}

impl<T: Clone> LitVec<T> {
    /// Resize so that `l` (and its negation) are valid indices.
    pub fn expand(&mut self, l: Lit, val: T) {
        let len = l.index() + 1;

        if len > self.0.len() {
            self.0.resize(len, val)
        }
    }
}

impl<T> Default for LitVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<Lit> for LitVec<T> {
    type Output = T;

    fn index(&self, index: Lit) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl<T> std::ops::IndexMut<Lit> for LitVec<T> {
    fn index_mut(&mut self, index: Lit) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_index_interleaves_polarities() {
        assert_eq!(Lit::new(1).index(), 0);
        assert_eq!(Lit::new(-1).index(), 1);
        assert_eq!(Lit::new(2).index(), 2);
        assert_eq!(Lit::new(-2).index(), 3);
        assert_eq!(Lit::new(3).index(), 4);
        assert_eq!(Lit::new(-3).index(), 5);
    }

    #[test]
    fn indexing_round_trips() {
        let mut litvec: LitVec<i32> = LitVec::new();
        litvec.expand(Lit::new(4), 0);

        litvec[Lit::new(1)] = 1;
        litvec[Lit::new(-1)] = -1;
        litvec[Lit::new(3)] = 3;
        litvec[Lit::new(-3)] = -3;

        assert_eq!(litvec[Lit::new(1)], 1);
        assert_eq!(litvec[Lit::new(-1)], -1);
        assert_eq!(litvec[Lit::new(3)], 3);
        assert_eq!(litvec[Lit::new(-3)], -3);
        assert_eq!(litvec[Lit::new(2)], 0);
    }
}
