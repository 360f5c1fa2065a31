// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Fixed-capacity inline names.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

use crate::error::Error;

/// A UTF-8 name stored inline in `MAX` bytes.
///
/// Only names strictly shorter than `MAX` bytes can be stored; anything longer is a
/// [`Error::NameTooLong`] rather than being truncated.  Because storage is inline the
/// type is `Copy`, which keeps descriptor lists allocation-free beyond the list itself.
#[derive(Clone, Copy)]
pub struct BoundedName<const MAX: usize> {
    len: usize,
    bytes: [u8; MAX],
}

impl<const MAX: usize> BoundedName<MAX> {
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.len() >= MAX {
            return Err(Error::NameTooLong {
                name: name.to_string(),
                max: MAX,
            });
        }
        let mut bytes = [0; MAX];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self {
            len: name.len(),
            bytes,
        })
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: the bytes were copied from a `&str` in `new` and are never mutated.
        unsafe { std::str::from_utf8_unchecked(&self.bytes[..self.len]) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const MAX: usize> PartialEq for BoundedName<MAX> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<const MAX: usize> Eq for BoundedName<MAX> {}

impl<const MAX: usize> PartialEq<str> for BoundedName<MAX> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const MAX: usize> PartialEq<&str> for BoundedName<MAX> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

//byte-wise, like strcmp
impl<const MAX: usize> Ord for BoundedName<MAX> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().as_bytes().cmp(other.as_str().as_bytes())
    }
}

impl<const MAX: usize> PartialOrd for BoundedName<MAX> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const MAX: usize> Hash for BoundedName<MAX> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl<const MAX: usize> Debug for BoundedName<MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self.as_str(), f)
    }
}

impl<const MAX: usize> Display for BoundedName<MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const MAX: usize> TryFrom<&str> for BoundedName<MAX> {
    type Error = Error;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
