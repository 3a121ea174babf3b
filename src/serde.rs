use alloc::{string::String, vec::Vec};
use core::{cmp, fmt, marker::PhantomData};

use serde::{
    de,
    de::{Error, Unexpected},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{macros::is, utils::try_transmute_slice, SharedString, SharedVec};

const MAX_DESERIALIZE_SIZE_HINT: usize = 1 << 12;

impl<T: Serialize + 'static> Serialize for SharedVec<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match try_transmute_slice::<T, u8>(self) {
            Some(bytes) => serializer.serialize_bytes(bytes),
            None => self.as_slice().serialize(serializer),
        }
    }
}

impl Serialize for SharedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self)
    }
}

struct SharedVecVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de> + Clone + 'static> de::Visitor<'de> for SharedVecVisitor<T> {
    type Value = SharedVec<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: Error,
    {
        match try_transmute_slice::<u8, T>(v) {
            Some(slice) => Ok(SharedVec::from_slice(slice)),
            None => Err(E::invalid_type(Unexpected::Bytes(v), &self)),
        }
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
    where
        E: Error,
    {
        self.visit_bytes(&v)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let capacity = cmp::min(seq.size_hint().unwrap_or(0), MAX_DESERIALIZE_SIZE_HINT);
        let mut vec = SharedVec::with_capacity(capacity);
        while let Some(item) = seq.next_element()? {
            vec.push(item);
        }
        Ok(vec)
    }
}

impl<'de, T: Deserialize<'de> + Clone + 'static> Deserialize<'de> for SharedVec<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let visitor = SharedVecVisitor(PhantomData);
        if is!(T, u8) {
            deserializer.deserialize_byte_buf(visitor)
        } else {
            deserializer.deserialize_seq(visitor)
        }
    }
}

struct SharedStringVisitor;

impl<'de> de::Visitor<'de> for SharedStringVisitor {
    type Value = SharedString;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v.into())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v.into())
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: Error,
    {
        match core::str::from_utf8(v) {
            Ok(s) => Ok(s.into()),
            Err(_) => Err(E::invalid_value(Unexpected::Bytes(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for SharedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_string(SharedStringVisitor)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::{String, ToString};

    use crate::{SharedString, SharedVec};

    #[test]
    fn bytes_round_trip() {
        let bytes = SharedVec::from_slice(b"abc");
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(json, "[97,98,99]");
        let back: SharedVec<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bytes);
    }

    #[test]
    fn bytes_from_string() {
        let bytes: SharedVec<u8> = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(bytes, *b"abc");
        let err = serde_json::from_str::<SharedVec<u16>>(r#""abc""#).unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn sequence() {
        let vec: SharedVec<String> = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(vec, ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn string() {
        let s: SharedString = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(s, "hello");
        assert_eq!(serde_json::to_string(&s).unwrap(), r#""hello""#);
    }
}
