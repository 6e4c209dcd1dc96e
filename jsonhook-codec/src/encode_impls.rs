//! Structural [`Encode`] impls for std types

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::encode::{Encode, Encoder};
use crate::error::Result;
use crate::hook::EncodeHook;

impl Encode for bool {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_bool(*self)
    }
}

macro_rules! encode_signed {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
                enc.write_i64(i64::from(*self))
            }
        }
    )*};
}

macro_rules! encode_unsigned {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
                enc.write_u64(u64::from(*self))
            }
        }
    )*};
}

encode_signed!(i8, i16, i32, i64);
encode_unsigned!(u8, u16, u32, u64);

impl Encode for isize {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_i64(*self as i64)
    }
}

impl Encode for usize {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_u64(*self as u64)
    }
}

impl Encode for i128 {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_i128(*self)
    }
}

impl Encode for u128 {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_u128(*self)
    }
}

impl Encode for f32 {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_f32(*self)
    }
}

impl Encode for f64 {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_f64(*self)
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_str(self)
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_str(self)
    }
}

impl Encode for char {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let mut utf8 = [0u8; 4];
        enc.write_str(self.encode_utf8(&mut utf8))
    }
}

impl Encode for () {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_null()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        match self {
            Some(value) => enc.encode_value(value),
            None => enc.write_null(),
        }
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        (**self).encode(enc)
    }

    fn encode_hook(&self) -> Option<EncodeHook<'_>> {
        (**self).encode_hook()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        (**self).encode(enc)
    }

    fn encode_hook(&self) -> Option<EncodeHook<'_>> {
        (**self).encode_hook()
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let mut arr = enc.array()?;
        for item in self {
            arr.element(item)?;
        }
        arr.end()
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        self.as_slice().encode(enc)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        self.as_slice().encode(enc)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let mut obj = enc.object()?;
        for (key, value) in self {
            obj.field(key, value)?;
        }
        obj.end()
    }
}

impl<T: Encode, S: BuildHasher> Encode for HashMap<String, T, S> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        // Sorted so output does not depend on hash order
        let mut entries: Vec<(&String, &T)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut obj = enc.object()?;
        for (key, value) in entries {
            obj.field(key, value)?;
        }
        obj.end()
    }
}

impl Encode for serde_json::Value {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        use serde_json::Value;

        match self {
            Value::Null => enc.write_null(),
            Value::Bool(b) => enc.write_bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    enc.write_i64(i)
                } else if let Some(u) = n.as_u64() {
                    enc.write_u64(u)
                } else {
                    match n.as_f64() {
                        Some(f) => enc.write_f64(f),
                        None => Err(enc.unsupported(&n.to_string())),
                    }
                }
            }
            Value::String(s) => enc.write_str(s),
            Value::Array(items) => items.as_slice().encode(enc),
            Value::Object(map) => {
                let mut obj = enc.object()?;
                for (key, value) in map {
                    obj.field(key, value)?;
                }
                obj.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::encode::encode;
    use std::collections::{BTreeMap, HashMap};

    fn text<T: crate::Encode + ?Sized>(value: &T) -> String {
        String::from_utf8(encode(value).unwrap()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(text(&true), "true");
        assert_eq!(text(&-7i8), "-7");
        assert_eq!(text(&u64::MAX), "18446744073709551615");
        assert_eq!(text(&i128::MIN), "-170141183460469231731687303715884105728");
        assert_eq!(text(&2.5f64), "2.5");
        assert_eq!(text(&'x'), "\"x\"");
        assert_eq!(text("a<b"), "\"a\\u003cb\"");
        assert_eq!(text(&()), "null");
    }

    #[test]
    fn test_containers() {
        assert_eq!(text(&vec![Some(1), None]), "[1,null]");
        assert_eq!(text(&[1u8, 2, 3]), "[1,2,3]");
        assert_eq!(text(&Box::new("s")), "\"s\"");
        assert_eq!(text(&Vec::<u32>::new()), "[]");

        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 1);
        assert_eq!(text(&map), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_hash_map_keys_sorted() {
        let map: HashMap<String, u32> = (0..20).map(|i| (format!("k{:02}", i), i)).collect();
        let out = text(&map);
        let expected: Vec<String> = (0..20).map(|i| format!("\"k{:02}\":{}", i, i)).collect();
        assert_eq!(out, format!("{{{}}}", expected.join(",")));
    }

    #[test]
    fn test_serde_json_value() {
        let value = serde_json::json!({"z": [1, -2, 0.5, "s", null, true], "a": {}});
        assert_eq!(text(&value), serde_json::to_string(&value).unwrap());
    }

    #[test]
    fn test_serde_json_float_numbers() {
        let value: serde_json::Value = serde_json::from_str("[1e300, -0.25, 1.5e-7]").unwrap();
        assert_eq!(text(&value), "[1e+300,-0.25,1.5e-7]");
    }
}
