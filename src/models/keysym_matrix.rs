//! Symbol matrix of a key: every symbol it can produce, by group and level.

use serde::{Deserialize, Serialize};

use crate::error::{IndexAxis, KeyboardError};

/// Symbol id meaning "nothing defined for this group/level".
pub const NO_SYMBOL: u32 = 0;

/// How an out-of-range group is handled by [`KeysymMatrix::lookup_with`].
///
/// Levels are always clamped; groups are strict unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPolicy {
    /// A group beyond the matrix is a configuration error
    #[default]
    Strict,
    /// A group beyond the matrix falls back to the last group
    Clamp,
}

/// Row-major grid of symbol ids: `data[group * num_levels + level]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix", into = "RawMatrix")]
pub struct KeysymMatrix {
    data: Vec<u32>,
    num_groups: usize,
    num_levels: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMatrix {
    data: Vec<u32>,
    num_groups: usize,
    num_levels: usize,
}

impl KeysymMatrix {
    /// Creates a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMatrixShape` if `data.len() != num_groups * num_levels`.
    pub fn new(data: Vec<u32>, num_groups: usize, num_levels: usize) -> crate::Result<Self> {
        if num_groups.checked_mul(num_levels) != Some(data.len()) {
            return Err(KeyboardError::InvalidMatrixShape {
                num_groups,
                num_levels,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            num_groups,
            num_levels,
        })
    }

    /// Builds a matrix from one row of levels per group.
    ///
    /// Rows shorter than the longest one are padded with [`NO_SYMBOL`].
    pub fn from_groups<R, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u32]>,
    {
        let rows: Vec<R> = groups.into_iter().collect();
        let num_levels = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * num_levels);
        for row in &rows {
            let row = row.as_ref();
            data.extend_from_slice(row);
            data.resize(data.len() + num_levels - row.len(), NO_SYMBOL);
        }
        Self {
            data,
            num_groups: rows.len(),
            num_levels,
        }
    }

    /// Number of groups (rows).
    #[must_use]
    pub const fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Number of levels (columns).
    #[must_use]
    pub const fn num_levels(&self) -> usize {
        self.num_levels
    }

    /// Returns `true` if the matrix holds no symbols at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major symbol data.
    #[must_use]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Exact cell access without clamping.
    #[must_use]
    pub fn get(&self, group: usize, level: usize) -> Option<u32> {
        if group < self.num_groups && level < self.num_levels {
            self.data.get(group * self.num_levels + level).copied()
        } else {
            None
        }
    }

    /// Looks up the symbol for a group and level.
    ///
    /// A level past the last defined one resolves to the last level, which is
    /// how punctuation keys with only an unshifted symbol behave. A group past
    /// the last one is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vkeyboard::models::KeysymMatrix;
    ///
    /// let m = KeysymMatrix::new(vec![97, 65], 1, 2).unwrap();
    /// assert_eq!(m.lookup(0, 1).unwrap(), 65);
    /// assert_eq!(m.lookup(0, 5).unwrap(), 65);
    /// assert!(m.lookup(1, 0).is_err());
    /// ```
    pub fn lookup(&self, group: usize, level: usize) -> crate::Result<u32> {
        self.lookup_with(GroupPolicy::Strict, group, level)
    }

    /// Looks up a symbol with an explicit group policy.
    pub fn lookup_with(&self, policy: GroupPolicy, group: usize, level: usize) -> crate::Result<u32> {
        let group = match policy {
            GroupPolicy::Clamp if self.num_groups > 0 => group.min(self.num_groups - 1),
            _ => group,
        };
        if group >= self.num_groups {
            return Err(KeyboardError::IndexOutOfRange {
                axis: IndexAxis::Group,
                index: group,
                len: self.num_groups,
            });
        }
        if self.num_levels == 0 {
            return Err(KeyboardError::IndexOutOfRange {
                axis: IndexAxis::Level,
                index: level,
                len: 0,
            });
        }
        let level = level.min(self.num_levels - 1);
        Ok(self.data[group * self.num_levels + level])
    }

    /// Iterates over groups, each as a slice of its levels.
    pub fn groups(&self) -> impl Iterator<Item = &[u32]> {
        // chunks() rejects a zero size
        self.data.chunks(self.num_levels.max(1)).take(self.num_groups)
    }
}

impl TryFrom<RawMatrix> for KeysymMatrix {
    type Error = KeyboardError;

    fn try_from(raw: RawMatrix) -> crate::Result<Self> {
        Self::new(raw.data, raw.num_groups, raw.num_levels)
    }
}

impl From<KeysymMatrix> for RawMatrix {
    fn from(matrix: KeysymMatrix) -> Self {
        Self {
            data: matrix.data,
            num_groups: matrix.num_groups,
            num_levels: matrix.num_levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_a() -> KeysymMatrix {
        KeysymMatrix::new(vec![97, 65], 1, 2).unwrap()
    }

    #[test]
    fn test_lookup_defined_cells() {
        let m = letter_a();
        assert_eq!(m.lookup(0, 0), Ok(97));
        assert_eq!(m.lookup(0, 1), Ok(65));
    }

    #[test]
    fn test_lookup_clamps_level() {
        assert_eq!(letter_a().lookup(0, 5), Ok(65));
        let punct = KeysymMatrix::new(vec![44], 1, 1).unwrap();
        assert_eq!(punct.lookup(0, 1), Ok(44));
    }

    #[test]
    fn test_lookup_group_out_of_range() {
        assert_eq!(
            letter_a().lookup(1, 0),
            Err(KeyboardError::IndexOutOfRange {
                axis: IndexAxis::Group,
                index: 1,
                len: 1
            })
        );
    }

    #[test]
    fn test_lookup_fails_iff_group_out_of_range() {
        let m = KeysymMatrix::new((1..=6).collect(), 3, 2).unwrap();
        for group in 0..5 {
            for level in 0..5 {
                assert_eq!(m.lookup(group, level).is_err(), group >= 3);
            }
        }
    }

    #[test]
    fn test_lookup_clamp_policy() {
        let m = KeysymMatrix::new(vec![97, 65, 1092, 1060], 2, 2).unwrap();
        assert_eq!(m.lookup_with(GroupPolicy::Clamp, 7, 1), Ok(1060));
        assert!(m.lookup_with(GroupPolicy::Strict, 7, 1).is_err());
    }

    #[test]
    fn test_lookup_empty_matrix() {
        let m = KeysymMatrix::default();
        assert!(m.is_empty());
        assert!(m.lookup(0, 0).is_err());
        assert!(m.lookup_with(GroupPolicy::Clamp, 0, 0).is_err());

        let no_levels = KeysymMatrix::new(Vec::new(), 2, 0).unwrap();
        assert!(matches!(
            no_levels.lookup(0, 0),
            Err(KeyboardError::IndexOutOfRange {
                axis: IndexAxis::Level,
                ..
            })
        ));
    }

    #[test]
    fn test_no_symbol_is_not_an_error() {
        let m = KeysymMatrix::new(vec![49, NO_SYMBOL], 1, 2).unwrap();
        assert_eq!(m.lookup(0, 1), Ok(NO_SYMBOL));
    }

    #[test]
    fn test_new_rejects_bad_shape() {
        assert_eq!(
            KeysymMatrix::new(vec![1, 2, 3], 2, 2),
            Err(KeyboardError::InvalidMatrixShape {
                num_groups: 2,
                num_levels: 2,
                len: 3
            })
        );
    }

    #[test]
    fn test_from_groups_pads_short_rows() {
        let m = KeysymMatrix::from_groups([vec![97, 65], vec![1092]]);
        assert_eq!(m.num_groups(), 2);
        assert_eq!(m.num_levels(), 2);
        assert_eq!(m.get(1, 1), Some(NO_SYMBOL));
        assert_eq!(m.get(2, 0), None);
        let rows: Vec<&[u32]> = m.groups().collect();
        assert_eq!(rows, vec![&[97, 65][..], &[1092, NO_SYMBOL][..]]);
    }
}
