use std::num::NonZeroU32;

/// A participant's 1-indexed identity within a committee's share map.
///
/// The data model distinguishes this from the plain `usize` used to index
/// commitment vectors (which are 0-indexed): `Poly`/`Commitment` coefficient
/// `i` corresponds to the evaluation point used for participant
/// `ParticipantId(i + 1)`. Conversion between the two is always explicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(NonZeroU32);

impl ParticipantId {
    /// Constructs the id for the `n`-th participant, 1-indexed.
    pub fn new(one_indexed: u32) -> Option<Self> {
        NonZeroU32::new(one_indexed).map(Self)
    }

    pub fn one_indexed(&self) -> u32 {
        self.0.get()
    }

    /// The 0-indexed position of this participant's evaluation point within
    /// a `Commitment`'s coefficient vector.
    pub fn commitment_index(&self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// All participant ids `1..=n`, in ascending order.
    pub fn range(n: u32) -> impl Iterator<Item = Self> {
        (1..=n).map(|i| Self(NonZeroU32::new(i).expect("i >= 1")))
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "participant#{}", self.0)
    }
}
