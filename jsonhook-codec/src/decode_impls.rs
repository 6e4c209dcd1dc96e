//! Structural [`Decode`] impls for std types
//!
//! `null` leaves scalars untouched, sets `Option` to `None` and empties
//! sequences and maps.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::decode::{Decode, Decoder};
use crate::error::Result;
use crate::hook::DecodeHook;

impl Decode for bool {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if !dec.take_null() {
            *self = dec.read_bool()?;
        }
        Ok(())
    }
}

macro_rules! decode_integer {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
                if dec.take_null() {
                    return Ok(());
                }
                let literal = dec.read_number()?;
                match literal.parse::<$ty>() {
                    Ok(value) => {
                        *self = value;
                        Ok(())
                    }
                    Err(_) => Err(dec.type_error(format!("number {}", literal))),
                }
            }
        }
    )*};
}

decode_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! decode_float {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
                if dec.take_null() {
                    return Ok(());
                }
                let literal = dec.read_number()?;
                match literal.parse::<$ty>() {
                    Ok(value) if value.is_finite() => {
                        *self = value;
                        Ok(())
                    }
                    _ => Err(dec.type_error(format!("number {}", literal))),
                }
            }
        }
    )*};
}

decode_float!(f32, f64);

impl Decode for String {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if !dec.take_null() {
            *self = dec.read_string()?.into_owned();
        }
        Ok(())
    }
}

impl Decode for char {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if dec.take_null() {
            return Ok(());
        }
        let text = dec.read_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => {
                *self = ch;
                Ok(())
            }
            _ => Err(dec.type_error(format!("string {:?}", text))),
        }
    }
}

impl Decode for () {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        dec.skip()
    }
}

impl<T: Decode + Default> Decode for Option<T> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if dec.take_null() {
            *self = None;
            return Ok(());
        }
        dec.decode_value(self.get_or_insert_with(T::default))
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        (**self).decode(dec)
    }

    fn decode_hook(&mut self) -> Option<DecodeHook<'_>> {
        (**self).decode_hook()
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if dec.take_null() {
            self.clear();
            return Ok(());
        }

        // Existing elements are decoded into in place, as with any target
        let mut len = 0;
        dec.array(|index, dec| {
            if index == self.len() {
                self.push(T::default());
            }
            len = index + 1;
            dec.decode_value(&mut self[index])
        })?;
        self.truncate(len);
        Ok(())
    }
}

impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if dec.take_null() {
            return Ok(());
        }

        // Extra elements are dropped and missing ones reset
        let mut len = 0;
        dec.array(|index, dec| {
            len = index + 1;
            match self.get_mut(index) {
                Some(slot) => dec.decode_value(slot),
                None => dec.skip(),
            }
        })?;
        for slot in self.iter_mut().skip(len) {
            *slot = T::default();
        }
        Ok(())
    }
}

impl<T: Decode + Default> Decode for BTreeMap<String, T> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if dec.take_null() {
            self.clear();
            return Ok(());
        }
        dec.object(|key, dec| {
            let mut value = T::default();
            dec.decode_value(&mut value)?;
            self.insert(key.to_owned(), value);
            Ok(true)
        })
    }
}

impl<T: Decode + Default, S: BuildHasher> Decode for HashMap<String, T, S> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        if dec.take_null() {
            self.clear();
            return Ok(());
        }
        dec.object(|key, dec| {
            let mut value = T::default();
            dec.decode_value(&mut value)?;
            self.insert(key.to_owned(), value);
            Ok(true)
        })
    }
}

impl Decode for serde_json::Value {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let raw = dec.raw_value()?;
        *self = serde_json::from_slice(raw)?;
        Ok(())
    }
}
