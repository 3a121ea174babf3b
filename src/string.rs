use alloc::string::String;
#[allow(unused_imports)]
use core::{
    borrow::Borrow,
    cmp,
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str,
    str::FromStr,
};

#[allow(unused_imports)]
use crate::{
    error::{FromUtf8Error, TryReserveError},
    growth,
    growth::CutResult,
    vec::SharedVec,
};

/// An implicitly shared, copy-on-write UTF-8 string.
///
/// It shares the storage model of [`SharedVec<u8>`]: clones are cheap and the first
/// mutation of a shared string copies it. Indices are byte offsets, and every operation
/// taking one panics if it does not lie on a char boundary.
///
/// ```rust
/// use shared_array::SharedString;
///
/// let mut s = SharedString::from("world");
/// let t = s.clone();
/// s.prepend("hello ");
/// assert_eq!(s, "hello world");
/// assert_eq!(t, "world");
/// ```
pub struct SharedString(SharedVec<u8>);

impl SharedString {
    pub const fn new() -> Self {
        Self(SharedVec::new())
    }

    /// Creates a string viewing static data, copied on first mutation.
    pub fn from_static(s: &'static str) -> Self {
        Self(SharedVec::from_static(s.as_bytes()))
    }

    #[cfg(feature = "oom-handling")]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(SharedVec::with_capacity(capacity))
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        SharedVec::try_with_capacity(capacity).map(Self)
    }

    pub fn try_from_str(s: &str) -> Result<Self, TryReserveError> {
        SharedVec::try_from_slice(s.as_bytes()).map(Self)
    }

    pub fn from_utf8(bytes: SharedVec<u8>) -> Result<Self, FromUtf8Error<SharedVec<u8>>> {
        match str::from_utf8(&bytes) {
            Ok(_) => Ok(Self(bytes)),
            Err(error) => Err(FromUtf8Error { bytes, error }),
        }
    }

    /// # Safety
    ///
    /// Bytes must be valid UTF-8.
    pub const unsafe fn from_utf8_unchecked(bytes: SharedVec<u8>) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        unsafe { str::from_utf8_unchecked(self.0.as_slice()) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    #[inline]
    pub fn as_shared_bytes(&self) -> &SharedVec<u8> {
        &self.0
    }

    #[inline]
    pub fn into_bytes(self) -> SharedVec<u8> {
        self.0
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.0.is_shared()
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        self.0.is_detached()
    }

    #[inline]
    pub fn is_shared_with(&self, other: &Self) -> bool {
        self.0.is_shared_with(&other.0)
    }

    #[inline]
    pub fn is_capacity_reserved(&self) -> bool {
        self.0.is_capacity_reserved()
    }

    /// See [`SharedVec::clear`].
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Detaches the string and returns a mutable view of it.
    #[cfg(feature = "oom-handling")]
    pub fn make_mut(&mut self) -> &mut str {
        unsafe { str::from_utf8_unchecked_mut(self.0.make_mut()) }
    }

    #[cfg(feature = "oom-handling")]
    pub fn detach(&mut self) {
        self.0.detach();
    }

    pub fn try_detach(&mut self) -> Result<(), TryReserveError> {
        self.0.try_detach()
    }

    /// See [`SharedVec::reserve`].
    #[cfg(feature = "oom-handling")]
    pub fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.0.try_reserve(additional)
    }

    /// See [`SharedVec::squeeze`].
    #[cfg(feature = "oom-handling")]
    pub fn squeeze(&mut self) {
        self.0.squeeze();
    }

    pub fn try_squeeze(&mut self) -> Result<(), TryReserveError> {
        self.0.try_squeeze()
    }

    #[cfg(feature = "oom-handling")]
    pub fn push(&mut self, ch: char) {
        self.push_str(ch.encode_utf8(&mut [0; 4]));
    }

    #[cfg(feature = "oom-handling")]
    pub fn push_str(&mut self, s: &str) {
        self.0.extend_from_slice(s.as_bytes());
    }

    pub fn try_push_str(&mut self, s: &str) -> Result<(), TryReserveError> {
        self.0.try_extend_from_slice(s.as_bytes())
    }

    /// Inserts `s` at the beginning, using the free space before the first byte.
    #[cfg(feature = "oom-handling")]
    pub fn prepend(&mut self, s: &str) {
        self.0.insert_from_slice(0, s.as_bytes());
    }

    #[cfg(feature = "oom-handling")]
    pub fn insert(&mut self, index: usize, ch: char) {
        self.insert_str(index, ch.encode_utf8(&mut [0; 4]));
    }

    #[cfg(feature = "oom-handling")]
    pub fn insert_str(&mut self, index: usize, s: &str) {
        check_char_boundary(self, index);
        self.0.insert_from_slice(index, s.as_bytes());
    }

    #[cfg(feature = "oom-handling")]
    pub fn pop(&mut self) -> Option<char> {
        let ch = self.chars().next_back()?;
        self.0.truncate(self.len() - ch.len_utf8());
        Some(ch)
    }

    /// Removes and returns the char at byte `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not on a char boundary, or is the length of the string.
    #[cfg(feature = "oom-handling")]
    pub fn remove(&mut self, index: usize) -> char {
        check_char_boundary(self, index);
        let ch = match self[index..].chars().next() {
            Some(ch) => ch,
            None => panic!("cannot remove a char from the end of a string"),
        };
        let ch_len = ch.len_utf8();
        if index == 0 {
            self.0.advance(ch_len);
        } else {
            let len = self.len();
            self.0.make_mut().copy_within(index + ch_len.., index);
            self.0.truncate(len - ch_len);
        }
        ch
    }

    #[cfg(feature = "oom-handling")]
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len() {
            check_char_boundary(self, new_len);
            self.0.truncate(new_len);
        }
    }

    /// Removes the first `count` bytes.
    #[cfg(feature = "oom-handling")]
    pub fn advance(&mut self, count: usize) {
        check_char_boundary(self, count);
        self.0.advance(count);
    }

    /// Returns the `length` bytes starting at `position`, see [`SharedVec::mid`].
    ///
    /// # Panics
    ///
    /// Panics if the normalized range does not lie on char boundaries.
    #[cfg(feature = "oom-handling")]
    pub fn mid(&self, position: isize, length: isize) -> Self {
        let original_length = isize::try_from(self.len()).unwrap_or(isize::MAX);
        if let (CutResult::Subset, position, length) =
            growth::mid(original_length, position, length)
        {
            check_char_boundary(self, position as usize);
            check_char_boundary(self, (position + length) as usize);
        }
        Self(self.0.mid(position, length))
    }
}

#[cold]
fn panic_not_a_char_boundary(index: usize) -> ! {
    panic!("byte index {index} is not a char boundary")
}

pub(crate) fn check_char_boundary(s: &str, index: usize) {
    if !s.is_char_boundary(index) {
        panic_not_a_char_boundary(index);
    }
}

impl Clone for SharedString {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl Default for SharedString {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        self
    }
}

impl AsRef<[u8]> for SharedString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Borrow<str> for SharedString {
    fn borrow(&self) -> &str {
        self
    }
}

impl Hash for SharedString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl PartialEq for SharedString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SharedString {}

impl PartialOrd for SharedString {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SharedString {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialEq<str> for SharedString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<'a> PartialEq<&'a str> for SharedString {
    fn eq(&self, other: &&'a str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<String> for SharedString {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<SharedString> for str {
    fn eq(&self, other: &SharedString) -> bool {
        self == other.as_str()
    }
}

impl<'a> PartialEq<SharedString> for &'a str {
    fn eq(&self, other: &SharedString) -> bool {
        *self == other.as_str()
    }
}

impl PartialEq<SharedString> for String {
    fn eq(&self, other: &SharedString) -> bool {
        self == other.as_str()
    }
}

#[cfg(feature = "oom-handling")]
impl<'a> From<&'a str> for SharedString {
    fn from(value: &'a str) -> Self {
        Self(SharedVec::from_slice(value.as_bytes()))
    }
}

#[cfg(feature = "oom-handling")]
impl From<String> for SharedString {
    fn from(value: String) -> Self {
        Self(SharedVec::from(value.into_bytes()))
    }
}

#[cfg(feature = "oom-handling")]
impl FromStr for SharedString {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl TryFrom<SharedVec<u8>> for SharedString {
    type Error = FromUtf8Error<SharedVec<u8>>;

    fn try_from(value: SharedVec<u8>) -> Result<Self, Self::Error> {
        Self::from_utf8(value)
    }
}

impl From<SharedString> for SharedVec<u8> {
    fn from(value: SharedString) -> Self {
        value.into_bytes()
    }
}

impl From<SharedString> for String {
    fn from(value: SharedString) -> Self {
        unsafe { String::from_utf8_unchecked(value.into_bytes().into_vec()) }
    }
}

#[cfg(feature = "oom-handling")]
impl Extend<char> for SharedString {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        for ch in iter {
            self.push(ch);
        }
    }
}

#[cfg(feature = "oom-handling")]
impl<'a> Extend<&'a str> for SharedString {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for s in iter {
            self.push_str(s);
        }
    }
}

#[cfg(feature = "oom-handling")]
impl FromIterator<char> for SharedString {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl fmt::Write for SharedString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_push_str(s).map_err(|_| fmt::Error)
    }
}
