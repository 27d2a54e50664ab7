//! Truth tables of small Boolean functions.

use std::ops;

/// Patterns of the first six variables within a single 64-bit word.
const VAR_WORDS: [u64; 6] = [
    0xaaaa_aaaa_aaaa_aaaa,
    0xcccc_cccc_cccc_cccc,
    0xf0f0_f0f0_f0f0_f0f0,
    0xff00_ff00_ff00_ff00,
    0xffff_0000_ffff_0000,
    0xffff_ffff_0000_0000,
];

/// The largest supported number of variables.
pub const MAX_VARS: usize = 24;

/// The truth table of a Boolean function over `num_vars` variables.
///
/// Bit `i` is the function value for the assignment where variable `j` is set to bit `j` of `i`,
/// so variable 0 toggles fastest. Tables over fewer than six variables use a single word whose
/// unused high bits are kept clear.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    num_vars: usize,
    words: Vec<u64>,
}

fn word_count(num_vars: usize) -> usize {
    if num_vars <= 6 {
        1
    } else {
        1 << (num_vars - 6)
    }
}

fn word_mask(num_vars: usize) -> u64 {
    if num_vars >= 6 {
        !0
    } else {
        (1u64 << (1 << num_vars)) - 1
    }
}

impl TruthTable {
    /// Returns the constant function with the given value.
    pub fn constant(value: bool, num_vars: usize) -> Self {
        assert!(num_vars <= MAX_VARS, "too many truth table variables");
        let word = if value { word_mask(num_vars) } else { 0 };
        Self {
            num_vars,
            words: vec![word; word_count(num_vars)],
        }
    }

    /// Returns the projection onto variable `var`.
    pub fn nth_var(var: usize, num_vars: usize) -> Self {
        assert!(var < num_vars, "variable {var} out of range");
        assert!(num_vars <= MAX_VARS, "too many truth table variables");
        let words = if var < 6 {
            vec![VAR_WORDS[var] & word_mask(num_vars); word_count(num_vars)]
        } else {
            (0..word_count(num_vars))
                .map(|i| if (i >> (var - 6)) & 1 != 0 { !0 } else { 0 })
                .collect()
        };
        Self { num_vars, words }
    }

    /// Returns the number of variables.
    #[inline(always)]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the underlying words, least significant first.
    #[inline(always)]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Returns the function value for the assignment with the given index.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        assert!(index < 1 << self.num_vars);
        (self.words[index >> 6] >> (index & 63)) & 1 != 0
    }

    /// Returns the number of satisfying assignments.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the complement if `invert` is `true` and a copy otherwise.
    pub fn invert_if(&self, invert: bool) -> Self {
        if invert {
            !self
        } else {
            self.clone()
        }
    }

    /// Formats the table as hex digits, most significant first.
    pub fn to_hex(&self) -> String {
        if self.num_vars >= 6 {
            self.words
                .iter()
                .rev()
                .map(|word| format!("{word:016x}"))
                .collect()
        } else {
            let digits = ((1usize << self.num_vars) / 4).max(1);
            format!("{:0digits$x}", self.words[0])
        }
    }
}

impl ops::Not for &TruthTable {
    type Output = TruthTable;

    fn not(self) -> TruthTable {
        let mask = word_mask(self.num_vars);
        TruthTable {
            num_vars: self.num_vars,
            words: self.words.iter().map(|w| !w & mask).collect(),
        }
    }
}

impl ops::BitAnd for &TruthTable {
    type Output = TruthTable;

    fn bitand(self, rhs: &TruthTable) -> TruthTable {
        assert_eq!(self.num_vars, rhs.num_vars);
        TruthTable {
            num_vars: self.num_vars,
            words: self.words.iter().zip(&rhs.words).map(|(a, b)| a & b).collect(),
        }
    }
}

impl std::fmt::Display for TruthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for TruthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TruthTable({}, 0x{})", self.num_vars, self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_tables() {
        assert_eq!(TruthTable::nth_var(0, 1).to_hex(), "2");
        assert_eq!(TruthTable::nth_var(0, 2).to_hex(), "a");
        assert_eq!(TruthTable::nth_var(1, 2).to_hex(), "c");
        assert_eq!(TruthTable::constant(true, 0).to_hex(), "1");
        assert_eq!(TruthTable::constant(false, 3).to_hex(), "00");

        let a = TruthTable::nth_var(0, 2);
        let b = TruthTable::nth_var(1, 2);
        assert_eq!((&a & &b).to_hex(), "8");
        assert_eq!((&!&a & &b).to_hex(), "4");
        assert_eq!((!&(&a & &b)).to_hex(), "7");
    }

    #[test]
    fn bit_lookup_matches_assignment() {
        let num_vars = 8;
        for var in 0..num_vars {
            let table = TruthTable::nth_var(var, num_vars);
            assert_eq!(table.count_ones(), 1 << (num_vars - 1));
            for index in 0..1 << num_vars {
                assert_eq!(table.bit(index), (index >> var) & 1 != 0);
            }
        }
    }

    #[test]
    fn wide_hex() {
        let table = TruthTable::nth_var(6, 7);
        assert_eq!(table.words(), &[0, !0]);
        assert_eq!(
            table.to_hex(),
            "ffffffffffffffff0000000000000000"
        );
        assert_eq!(table.invert_if(true).count_ones(), 64);
    }
}
