//! Structural keys and the keyed materialization they index.
//!
//! `all_with_keys` turns a collection into a [`KeyedArray`]: an
//! insertion-ordered map whose keys are [`ArrayKey`]s. Each pair's key is
//! converted through [`StructuralKey`]:
//!
//! | Key | Structural key |
//! |-----|----------------|
//! | integers | `Int` (values beyond `i64` are rejected) |
//! | `bool` | `Int(0)` / `Int(1)` |
//! | `None`, `()`, JSON `null` | `Str("")` |
//! | canonical decimal integer strings (`"8"`, `"-3"`) | `Int` |
//! | any other string or `char` | `Str` |
//! | finite floats | `Int`, truncated toward zero |
//! | non-finite floats, lists, maps | [`CollectionError::IllegalKey`] |
//!
//! Writing a key that is already present replaces the value in place: the
//! entry keeps its original position and the later value wins.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{CollectionError, Result};

/// A key usable in a [`KeyedArray`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    /// An integer key.
    Int(i64),
    /// A string key that does not look like a canonical integer.
    Str(String),
}

impl ArrayKey {
    /// Converts a string key, turning canonical decimal integers into `Int`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::ArrayKey;
    ///
    /// assert_eq!(ArrayKey::from_string_key("42"), ArrayKey::Int(42));
    /// assert_eq!(ArrayKey::from_string_key("042"), ArrayKey::Str("042".to_string()));
    /// assert_eq!(ArrayKey::from_string_key("-0"), ArrayKey::Str("-0".to_string()));
    /// ```
    pub fn from_string_key(key: &str) -> Self {
        if is_canonical_integer(key)
            && let Ok(integer) = key.parse::<i64>()
        {
            return Self::Int(integer);
        }
        Self::Str(key.to_owned())
    }
}

fn is_canonical_integer(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == key.len(),
        [first, rest @ ..] => {
            first.is_ascii_digit() && *first != b'0' && rest.iter().all(u8::is_ascii_digit)
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(integer) => write!(formatter, "{integer}"),
            Self::Str(string) => write!(formatter, "{string:?}"),
        }
    }
}

impl From<&str> for ArrayKey {
    fn from(key: &str) -> Self {
        Self::from_string_key(key)
    }
}

impl From<String> for ArrayKey {
    fn from(key: String) -> Self {
        Self::from_string_key(&key)
    }
}

impl From<i32> for ArrayKey {
    fn from(key: i32) -> Self {
        Self::Int(i64::from(key))
    }
}

impl From<i64> for ArrayKey {
    fn from(key: i64) -> Self {
        Self::Int(key)
    }
}

macro_rules! impl_from_unsigned_for_array_key {
    ($($type:ty),* $(,)?) => {
        $(
            impl From<$type> for ArrayKey {
                /// Values past `i64::MAX` keep their decimal digits as a string key.
                fn from(key: $type) -> Self {
                    i64::try_from(key).map_or_else(|_| Self::Str(key.to_string()), Self::Int)
                }
            }
        )*
    };
}

impl_from_unsigned_for_array_key!(u64, usize);

impl From<bool> for ArrayKey {
    fn from(key: bool) -> Self {
        Self::Int(i64::from(key))
    }
}

/// Keys that can index a keyed materialization.
///
/// Conversion is fallible because some keys have no structural form; the
/// error names the offending type instead of silently dropping the pair.
pub trait StructuralKey {
    /// Converts the key into its structural form.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IllegalKey`] when the key is a composite or
    /// otherwise cannot index an array.
    fn to_array_key(&self) -> Result<ArrayKey>;
}

impl StructuralKey for ArrayKey {
    fn to_array_key(&self) -> Result<ArrayKey> {
        Ok(self.clone())
    }
}

macro_rules! impl_structural_key_lossless {
    ($($type:ty),* $(,)?) => {
        $(
            impl StructuralKey for $type {
                #[inline]
                fn to_array_key(&self) -> Result<ArrayKey> {
                    Ok(ArrayKey::Int(i64::from(*self)))
                }
            }
        )*
    };
}

impl_structural_key_lossless!(i8, i16, i32, i64, u8, u16, u32, bool);

macro_rules! impl_structural_key_bounded {
    ($($type:ty),* $(,)?) => {
        $(
            impl StructuralKey for $type {
                fn to_array_key(&self) -> Result<ArrayKey> {
                    i64::try_from(*self)
                        .map(ArrayKey::Int)
                        .map_err(|_| CollectionError::IllegalKey {
                            type_name: stringify!($type),
                        })
                }
            }
        )*
    };
}

impl_structural_key_bounded!(i128, isize, u64, u128, usize);

impl StructuralKey for f64 {
    #[allow(clippy::cast_possible_truncation)]
    fn to_array_key(&self) -> Result<ArrayKey> {
        let truncated = self.trunc();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if self.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
            Ok(ArrayKey::Int(truncated as i64))
        } else {
            Err(CollectionError::IllegalKey { type_name: "f64" })
        }
    }
}

impl StructuralKey for f32 {
    fn to_array_key(&self) -> Result<ArrayKey> {
        f64::from(*self)
            .to_array_key()
            .map_err(|_| CollectionError::IllegalKey { type_name: "f32" })
    }
}

impl StructuralKey for str {
    fn to_array_key(&self) -> Result<ArrayKey> {
        Ok(ArrayKey::from_string_key(self))
    }
}

impl StructuralKey for String {
    fn to_array_key(&self) -> Result<ArrayKey> {
        Ok(ArrayKey::from_string_key(self))
    }
}

impl StructuralKey for char {
    fn to_array_key(&self) -> Result<ArrayKey> {
        let mut buffer = [0; 4];
        Ok(ArrayKey::from_string_key(self.encode_utf8(&mut buffer)))
    }
}

impl StructuralKey for () {
    fn to_array_key(&self) -> Result<ArrayKey> {
        Ok(ArrayKey::Str(String::new()))
    }
}

impl<T: StructuralKey> StructuralKey for Option<T> {
    fn to_array_key(&self) -> Result<ArrayKey> {
        self.as_ref()
            .map_or_else(|| Ok(ArrayKey::Str(String::new())), StructuralKey::to_array_key)
    }
}

impl<T: StructuralKey + ?Sized> StructuralKey for &T {
    fn to_array_key(&self) -> Result<ArrayKey> {
        (**self).to_array_key()
    }
}

impl<T> StructuralKey for Vec<T> {
    fn to_array_key(&self) -> Result<ArrayKey> {
        Err(CollectionError::IllegalKey { type_name: "array" })
    }
}

#[cfg(feature = "json")]
impl StructuralKey for serde_json::Value {
    fn to_array_key(&self) -> Result<ArrayKey> {
        use serde_json::Value;

        match self {
            Value::Null => Ok(ArrayKey::Str(String::new())),
            Value::Bool(flag) => flag.to_array_key(),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Ok(ArrayKey::Int(integer))
                } else if let Some(unsigned) = number.as_u64() {
                    unsigned.to_array_key()
                } else {
                    number
                        .as_f64()
                        .ok_or(CollectionError::IllegalKey { type_name: "number" })?
                        .to_array_key()
                }
            }
            Value::String(string) => Ok(ArrayKey::from_string_key(string)),
            Value::Array(_) => Err(CollectionError::IllegalKey { type_name: "array" }),
            Value::Object(_) => Err(CollectionError::IllegalKey { type_name: "object" }),
        }
    }
}

/// An insertion-ordered map from [`ArrayKey`] to values.
///
/// # Examples
///
/// ```rust
/// use lazy_collection::{ArrayKey, KeyedArray};
///
/// let mut array = KeyedArray::new();
/// array.insert("a", 1);
/// array.insert("b", 2);
/// array.insert("a", 3);
///
/// assert_eq!(array.len(), 2);
/// assert_eq!(array.get("a"), Some(&3));
/// assert_eq!(array.keys().next(), Some(&ArrayKey::Str("a".to_string())));
/// ```
#[derive(Clone)]
pub struct KeyedArray<V> {
    entries: Vec<(ArrayKey, V)>,
    positions: FxHashMap<ArrayKey, usize>,
}

impl<V> KeyedArray<V> {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    /// Writes `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<ArrayKey>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(&position) = self.positions.get(&key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Looks a value up by key.
    pub fn get(&self, key: impl Into<ArrayKey>) -> Option<&V> {
        self.positions
            .get(&key.into())
            .map(|&position| &self.entries[position].1)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: impl Into<ArrayKey>) -> bool {
        self.positions.contains_key(&key.into())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Consumes the array, returning its entries in order.
    pub fn into_entries(self) -> Vec<(ArrayKey, V)> {
        self.entries
    }
}

impl<V> Default for KeyedArray<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for KeyedArray<V> {
    /// Order-sensitive: two arrays are equal when they hold the same entries
    /// in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for KeyedArray<V> {}

impl<V: fmt::Debug> fmt::Debug for KeyedArray<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<ArrayKey>, V> FromIterator<(K, V)> for KeyedArray<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut array = Self::new();
        for (key, value) in iter {
            array.insert(key, value);
        }
        array
    }
}

impl<V> IntoIterator for KeyedArray<V> {
    type Item = (ArrayKey, V);
    type IntoIter = std::vec::IntoIter<(ArrayKey, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Builds a [`KeyedArray`] from `key => value` entries.
///
/// Keys go through `Into<ArrayKey>`, so string and integer literals mix
/// freely. Repeated keys follow the last-wins rule.
///
/// # Examples
///
/// ```rust
/// use lazy_collection::keyed;
///
/// let array = keyed! { "a" => 1, 2 => 2, "a" => 3 };
/// assert_eq!(array.len(), 2);
/// assert_eq!(array.get("a"), Some(&3));
/// ```
#[macro_export]
macro_rules! keyed {
    () => {
        $crate::KeyedArray::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut array = $crate::KeyedArray::new();
        $(
            array.insert($crate::ArrayKey::from($key), $value);
        )+
        array
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", ArrayKey::Int(0))]
    #[case("17", ArrayKey::Int(17))]
    #[case("-17", ArrayKey::Int(-17))]
    #[case("", ArrayKey::Str(String::new()))]
    #[case("-", ArrayKey::Str("-".to_string()))]
    #[case("007", ArrayKey::Str("007".to_string()))]
    #[case("1.5", ArrayKey::Str("1.5".to_string()))]
    #[case(" 1", ArrayKey::Str(" 1".to_string()))]
    #[case("99999999999999999999", ArrayKey::Str("99999999999999999999".to_string()))]
    fn test_string_keys(#[case] key: &str, #[case] expected: ArrayKey) {
        assert_eq!(key.to_array_key().unwrap(), expected);
    }

    #[rstest]
    #[case(ArrayKey::from(3_usize), ArrayKey::Int(3))]
    #[case(ArrayKey::from(3_u64), ArrayKey::Int(3))]
    #[case(ArrayKey::from(u64::MAX), ArrayKey::Str(u64::MAX.to_string()))]
    fn test_unsigned_conversions(#[case] key: ArrayKey, #[case] expected: ArrayKey) {
        assert_eq!(key, expected);
    }

    #[rstest]
    fn test_scalar_keys() {
        assert_eq!(true.to_array_key().unwrap(), ArrayKey::Int(1));
        assert_eq!(false.to_array_key().unwrap(), ArrayKey::Int(0));
        assert_eq!(None::<i32>.to_array_key().unwrap(), ArrayKey::Str(String::new()));
        assert_eq!(Some(4_u8).to_array_key().unwrap(), ArrayKey::Int(4));
        assert_eq!('7'.to_array_key().unwrap(), ArrayKey::Int(7));
        assert_eq!((-2.9_f64).to_array_key().unwrap(), ArrayKey::Int(-2));
        assert_eq!(3_usize.to_array_key().unwrap(), ArrayKey::Int(3));
    }

    #[rstest]
    fn test_illegal_keys() {
        assert_eq!(
            f64::NAN.to_array_key(),
            Err(CollectionError::IllegalKey { type_name: "f64" })
        );
        assert_eq!(
            u64::MAX.to_array_key(),
            Err(CollectionError::IllegalKey { type_name: "u64" })
        );
        assert_eq!(
            vec![1, 2].to_array_key(),
            Err(CollectionError::IllegalKey { type_name: "array" })
        );
    }

    #[cfg(feature = "json")]
    #[rstest]
    fn test_json_keys() {
        use serde_json::json;

        assert_eq!(json!(null).to_array_key().unwrap(), ArrayKey::Str(String::new()));
        assert_eq!(json!(true).to_array_key().unwrap(), ArrayKey::Int(1));
        assert_eq!(json!(5).to_array_key().unwrap(), ArrayKey::Int(5));
        assert_eq!(json!(5.7).to_array_key().unwrap(), ArrayKey::Int(5));
        assert_eq!(json!("a").to_array_key().unwrap(), ArrayKey::Str("a".to_string()));
        assert_eq!(
            json!({}).to_array_key(),
            Err(CollectionError::IllegalKey { type_name: "object" })
        );
    }

    #[rstest]
    fn test_insert_overwrites_in_place() {
        let mut array = KeyedArray::new();
        assert_eq!(array.insert("a", 1), None);
        assert_eq!(array.insert("b", 2), None);
        assert_eq!(array.insert("a", 3), Some(1));

        assert_eq!(
            array.into_entries(),
            vec![(ArrayKey::from("a"), 3), (ArrayKey::from("b"), 2)]
        );
    }

    #[rstest]
    fn test_numeric_string_and_integer_share_a_slot() {
        let array = keyed! { 1 => "int", "1" => "string" };

        assert_eq!(array.len(), 1);
        assert_eq!(array.get(1), Some(&"string"));
        assert!(array.contains_key("1"));
    }

    #[rstest]
    fn test_equality_is_order_sensitive() {
        let forward = keyed! { "a" => 1, "b" => 2 };
        let backward = keyed! { "b" => 2, "a" => 1 };

        assert_ne!(forward, backward);
        assert_eq!(forward, KeyedArray::from_iter([("a", 1), ("b", 2)]));
    }

    #[rstest]
    fn test_debug_prints_as_map() {
        let array = keyed! { "a" => 1, 2 => 2 };
        assert_eq!(format!("{array:?}"), r#"{Str("a"): 1, Int(2): 2}"#);
    }
}
