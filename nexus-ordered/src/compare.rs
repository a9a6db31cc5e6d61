//! Canonical comparators for integers and fixed-width strings.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Compare;

/// Three-way comparison of signed integers through saturating subtraction.
///
/// `a - b` is computed with saturation, so the sign of the difference is
/// always right even where plain subtraction would overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ints;

macro_rules! impl_ints {
    ($($ty:ty),*) => {
        $(
            impl Compare<$ty> for Ints {
                #[inline]
                fn compare(&self, a: &$ty, b: &$ty) -> Ordering {
                    a.saturating_sub(*b).signum().cmp(&0)
                }
            }
        )*
    };
}

impl_ints!(i8, i16, i32, i64, i128, isize);

/// Compares two signed integers; same as [`Ints`].
///
/// ```
/// use core::cmp::Ordering;
/// use nexus_ordered::compare::compare_ints;
///
/// assert_eq!(compare_ints(&i64::MIN, &1), Ordering::Less);
/// assert_eq!(compare_ints(&7, &7), Ordering::Equal);
/// ```
#[inline]
pub fn compare_ints<T>(a: &T, b: &T) -> Ordering
where
    Ints: Compare<T>,
{
    Ints.compare(a, b)
}

/// A string stored in exactly `N` bytes, NUL-padded.
///
/// The logical contents end at the first NUL byte or at `N` bytes,
/// whichever comes first. Ordering is lexicographic over those contents.
///
/// ```
/// use nexus_ordered::compare::FixedStr;
///
/// let a: FixedStr<8> = FixedStr::new("apple");
/// let b: FixedStr<8> = FixedStr::new("applesauce"); // truncated to 8 bytes
///
/// assert_eq!(b.as_str(), Some("applesau"));
/// assert!(a < b);
/// ```
#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    /// Copies `s` in, truncating at the last char boundary that fits.
    pub fn new(s: &str) -> Self {
        let mut end = s.len().min(N);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; N];
        bytes[..end].copy_from_slice(&s.as_bytes()[..end]);
        Self { bytes }
    }

    /// Wraps raw bytes as stored.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// The logical contents, up to the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.bytes.iter().position(|&b| b == 0).unwrap_or(N);
        &self.bytes[..end]
    }

    /// The contents as `&str`, if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// The full `N`-byte buffer.
    pub const fn raw(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self { bytes: [0; N] }
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "FixedStr({s:?})"),
            None => write!(f, "FixedStr({:?})", self.as_bytes()),
        }
    }
}

// Bytes past the terminator are padding and take no part in equality.
impl<const N: usize> PartialEq for FixedStr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Eq for FixedStr<N> {}

impl<const N: usize> Hash for FixedStr<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl<const N: usize> Ord for FixedStr<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_fixed_str(&self.bytes, &other.bytes)
    }
}

impl<const N: usize> PartialOrd for FixedStr<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares NUL-terminated byte strings of width `N`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedStrs;

impl<const N: usize> Compare<[u8; N]> for FixedStrs {
    #[inline]
    fn compare(&self, a: &[u8; N], b: &[u8; N]) -> Ordering {
        compare_fixed_str(a, b)
    }
}

impl<const N: usize> Compare<FixedStr<N>> for FixedStrs {
    #[inline]
    fn compare(&self, a: &FixedStr<N>, b: &FixedStr<N>) -> Ordering {
        compare_fixed_str(&a.bytes, &b.bytes)
    }
}

/// Lexicographic comparison of two `N`-byte buffers, stopping at the first
/// NUL in either one (`strncmp` with width `N`).
pub fn compare_fixed_str<const N: usize>(a: &[u8; N], b: &[u8; N]) -> Ordering {
    for (&x, &y) in a.iter().zip(b.iter()) {
        match x.cmp(&y) {
            Ordering::Equal if x == 0 => return Ordering::Equal,
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_three_way() {
        assert_eq!(Ints.compare(&-5i32, &3), Ordering::Less);
        assert_eq!(Ints.compare(&3i32, &-5), Ordering::Greater);
        assert_eq!(Ints.compare(&0i8, &0), Ordering::Equal);
    }

    #[test]
    fn ints_survive_overflowing_difference() {
        assert_eq!(Ints.compare(&i32::MAX, &i32::MIN), Ordering::Greater);
        assert_eq!(Ints.compare(&i32::MIN, &i32::MAX), Ordering::Less);
        assert_eq!(compare_ints(&i64::MIN, &i64::MAX), Ordering::Less);
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        let a = *b"ab\0zzzzz";
        let b = *b"ab\0aaaaa";
        assert_eq!(compare_fixed_str(&a, &b), Ordering::Equal);

        let c = *b"abc\0\0\0\0\0";
        assert_eq!(compare_fixed_str(&a, &c), Ordering::Less);
        assert_eq!(FixedStrs.compare(&c, &a), Ordering::Greater);
    }

    #[test]
    fn fixed_str_full_width_has_no_terminator() {
        let a = *b"abcd";
        let b = *b"abce";
        assert_eq!(compare_fixed_str(&a, &b), Ordering::Less);
        assert_eq!(compare_fixed_str(&a, &a), Ordering::Equal);
    }

    #[test]
    fn fixed_str_truncates_on_char_boundary() {
        let s: FixedStr<4> = FixedStr::new("aé€");
        // 'a' (1) + 'é' (2) fits, '€' (3) does not.
        assert_eq!(s.as_str(), Some("aé"));
        assert_eq!(s.raw()[3], 0);
    }

    #[test]
    fn fixed_str_padding_is_ignored() {
        let a = FixedStr::from_bytes(*b"ab\0zz");
        let b = FixedStr::from_bytes(*b"ab\0\0\0");
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a, FixedStr::new("ab"));
    }

    #[test]
    fn fixed_str_ordering() {
        let mut words: Vec<FixedStr<6>> = ["pear", "apple", "fig", "apricot"]
            .into_iter()
            .map(FixedStr::new)
            .collect();
        words.sort();
        let words: Vec<_> = words.iter().map(|w| w.as_str().unwrap()).collect();
        assert_eq!(words, ["apple", "aprico", "fig", "pear"]);
    }
}
