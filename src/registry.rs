//! Maps field types to the [`Value`] adapters that bind them.

use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    time::Duration,
};

use crate::value::{
    FixedBytes, FixedBytesList, HexBytes, IpMask, IpNet, List, Optional, Primitive, Scalar, Value,
};

/// Turns a type-erased field into a value bound to it, or `None` if the
/// field is not of the type the binder was registered for.
pub type Binder = for<'a> fn(&'a mut dyn Any) -> Option<Box<dyn Value + 'a>>;

/// The set of field types commands may declare as flags or arguments.
///
/// [`Registry::default`] knows all integer and float types, `bool`,
/// `String`, `Duration`, IP addresses, [`IpNet`], [`IpMask`], byte strings
/// and fixed-size byte arrays, along with `Vec` and `Option` of the plain
/// types. Later registrations for the same type replace earlier ones.
pub struct Registry {
    binders: HashMap<TypeId, (Binder, &'static str)>,
}

impl Registry {
    /// A registry that supports no types at all.
    pub fn empty() -> Registry {
        Registry { binders: HashMap::new() }
    }

    pub fn register<T: Any>(&mut self, binder: Binder) -> &mut Registry {
        self.binders.insert(TypeId::of::<T>(), (binder, type_name::<T>()));
        self
    }

    /// Registers `T`, `Vec<T>` and `Option<T>`.
    pub fn register_primitive<T: Primitive + Any>(&mut self) -> &mut Registry {
        self.register::<T>(bind_scalar::<T>)
            .register::<Vec<T>>(bind_list::<T>)
            .register::<Option<T>>(bind_optional::<T>)
    }

    /// Registers a type that is its own [`Value`].
    pub fn register_value<T: Value + Any>(&mut self) -> &mut Registry {
        self.register::<T>(bind_value::<T>)
    }

    /// Registers `[u8; N]` and `Vec<[u8; N]>` as hex strings.
    pub fn register_fixed_bytes<const N: usize>(&mut self) -> &mut Registry {
        self.register::<[u8; N]>(bind_fixed::<N>).register::<Vec<[u8; N]>>(bind_fixed_list::<N>)
    }

    pub fn supports<T: Any>(&self) -> bool {
        self.binders.contains_key(&TypeId::of::<T>())
    }

    pub fn bind<'a, T: Any>(&self, field: &'a mut T) -> Option<Box<dyn Value + 'a>> {
        let (binder, _) = self.binders.get(&TypeId::of::<T>())?;
        binder(field)
    }
}

impl Default for Registry {
    fn default() -> Registry {
        let mut res = Registry::empty();
        res.register_primitive::<i8>()
            .register_primitive::<i16>()
            .register_primitive::<i32>()
            .register_primitive::<i64>()
            .register_primitive::<isize>()
            .register_primitive::<u8>()
            .register_primitive::<u16>()
            .register_primitive::<u32>()
            .register_primitive::<u64>()
            .register_primitive::<usize>()
            .register_primitive::<f32>()
            .register_primitive::<f64>()
            .register_primitive::<bool>()
            .register_primitive::<String>()
            .register_primitive::<Duration>()
            .register_primitive::<IpAddr>()
            .register_primitive::<Ipv4Addr>()
            .register_primitive::<Ipv6Addr>()
            .register_primitive::<IpNet>()
            .register_primitive::<IpMask>()
            .register::<Vec<u8>>(bind_hex);
        macro_rules! fixed_bytes {
            ($($n:literal)*) => {$( res.register_fixed_bytes::<$n>(); )*};
        }
        fixed_bytes!(
             1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16
            17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
            33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48
            49 50 51 52 53 54 55 56 57 58 59 60 61 62 63 64
        );
        res
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types = self.binders.values().map(|(_, name)| *name).collect::<Vec<_>>();
        types.sort_unstable();
        f.debug_struct("Registry").field("types", &types).finish()
    }
}

fn bind_scalar<T: Primitive + Any>(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<T>()?;
    Some(Box::new(Scalar(field)))
}

fn bind_list<T: Primitive + Any>(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<Vec<T>>()?;
    Some(Box::new(List(field)))
}

fn bind_optional<T: Primitive + Any>(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<Option<T>>()?;
    Some(Box::new(Optional(field)))
}

fn bind_value<T: Value + Any>(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<T>()?;
    Some(Box::new(field))
}

fn bind_hex(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<Vec<u8>>()?;
    Some(Box::new(HexBytes(field)))
}

fn bind_fixed<const N: usize>(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<[u8; N]>()?;
    Some(Box::new(FixedBytes(field)))
}

fn bind_fixed_list<const N: usize>(field: &mut dyn Any) -> Option<Box<dyn Value + '_>> {
    let field = field.downcast_mut::<Vec<[u8; N]>>()?;
    Some(Box::new(FixedBytesList(field)))
}
