//! Values bind one field of a loaded struct to its string form.
//!
//! A [`Value`] holds a mutable reference into the struct it was created
//! from: setting it writes the field in place, rendering it reads the field.
//! Most values are built from a [`Primitive`] codec wrapped in one of the
//! adapters below.

mod csv;
mod duration;
mod hex;
mod net;
mod primitive;

pub use self::net::{IpMask, IpNet};

use crate::ValueError;

/// A field that can be set from, and rendered to, a command-line string.
pub trait Value {
    /// Replaces the field with the parsed `s`.
    fn set(&mut self, s: &str) -> Result<(), ValueError>;

    /// Renders the current field. Must not fail, it is also how defaults
    /// are shown in usage text.
    fn render(&self) -> String;

    fn type_name(&self) -> Option<String> {
        None
    }

    /// The value a flag takes when given without an argument, e.g. `--verbose`.
    fn implicit(&self) -> Option<String> {
        None
    }
}

impl<V: Value + ?Sized> Value for &mut V {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        (**self).set(s)
    }
    fn render(&self) -> String {
        (**self).render()
    }
    fn type_name(&self) -> Option<String> {
        (**self).type_name()
    }
    fn implicit(&self) -> Option<String> {
        (**self).implicit()
    }
}

/// Codec of a plain field type, usable on its own, in a `Vec` or in an `Option`.
pub trait Primitive: Sized {
    const TYPE_NAME: &'static str;

    fn parse(s: &str) -> Result<Self, ValueError>;

    fn render(&self) -> String;

    fn implicit() -> Option<&'static str> {
        None
    }

    /// Splits a list argument into element strings. An empty argument is an
    /// empty list.
    fn split(s: &str) -> Result<Vec<String>, ValueError> {
        if s.is_empty() {
            return Ok(Vec::new());
        }
        Ok(s.split(',').map(String::from).collect())
    }

    fn join(items: &[String]) -> String {
        items.join(",")
    }
}

pub(crate) struct Scalar<'a, T>(pub(crate) &'a mut T);

impl<T: Primitive> Value for Scalar<'_, T> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        *self.0 = T::parse(s)?;
        Ok(())
    }
    fn render(&self) -> String {
        T::render(self.0)
    }
    fn type_name(&self) -> Option<String> {
        Some(T::TYPE_NAME.to_string())
    }
    fn implicit(&self) -> Option<String> {
        T::implicit().map(String::from)
    }
}

/// `Vec<T>`; every `set` replaces the whole list.
pub(crate) struct List<'a, T>(pub(crate) &'a mut Vec<T>);

impl<T: Primitive> Value for List<'_, T> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        let items = T::split(s)?.iter().map(|it| T::parse(it)).collect::<Result<Vec<_>, _>>()?;
        *self.0 = items;
        Ok(())
    }
    fn render(&self) -> String {
        let items = self.0.iter().map(T::render).collect::<Vec<_>>();
        T::join(&items)
    }
    fn type_name(&self) -> Option<String> {
        Some(format!("{}Slice", T::TYPE_NAME))
    }
}

/// `Option<T>` stays `None` until the flag is supplied.
pub(crate) struct Optional<'a, T>(pub(crate) &'a mut Option<T>);

impl<T: Primitive> Value for Optional<'_, T> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        *self.0 = Some(T::parse(s)?);
        Ok(())
    }
    fn render(&self) -> String {
        self.0.as_ref().map(T::render).unwrap_or_default()
    }
    fn type_name(&self) -> Option<String> {
        Some(T::TYPE_NAME.to_string())
    }
    fn implicit(&self) -> Option<String> {
        T::implicit().map(String::from)
    }
}

/// `Vec<u8>` as a single hex blob.
pub(crate) struct HexBytes<'a>(pub(crate) &'a mut Vec<u8>);

impl Value for HexBytes<'_> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        *self.0 = hex::decode(s)?;
        Ok(())
    }
    fn render(&self) -> String {
        hex::encode(self.0)
    }
    fn type_name(&self) -> Option<String> {
        Some("bytes".to_string())
    }
}

pub(crate) struct FixedBytes<'a, const N: usize>(pub(crate) &'a mut [u8; N]);

impl<const N: usize> Value for FixedBytes<'_, N> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != N {
            return Err(ValueError::Length { expected: N, actual: bytes.len() });
        }
        self.0.copy_from_slice(&bytes);
        Ok(())
    }
    fn render(&self) -> String {
        hex::encode(&self.0[..])
    }
    fn type_name(&self) -> Option<String> {
        Some(format!("bytes{N}"))
    }
}

/// Comma separated list of fixed-length hex blobs.
pub(crate) struct FixedBytesList<'a, const N: usize>(pub(crate) &'a mut Vec<[u8; N]>);

impl<const N: usize> Value for FixedBytesList<'_, N> {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        let s = s.trim();
        let mut items = Vec::new();
        if !s.is_empty() {
            for (index, elem) in s.split(',').enumerate() {
                let bytes = hex::decode(elem)?;
                if bytes.len() != N {
                    return Err(ValueError::ElementLength { index, expected: N, actual: bytes.len() });
                }
                let mut item = [0u8; N];
                item.copy_from_slice(&bytes);
                items.push(item);
            }
        }
        *self.0 = items;
        Ok(())
    }
    fn render(&self) -> String {
        self.0.iter().map(|it| hex::encode(&it[..])).collect::<Vec<_>>().join(",")
    }
    fn type_name(&self) -> Option<String> {
        Some(format!("bytes{N}Slice"))
    }
}
