//! Typed generational handles
//!
//! Settings records never hold a pointer to a collider or wind source. They
//! hold a `Handle<T>` into the host's storage. Deleting the target bumps the
//! slot's generation, so every handle that still points at it becomes stale
//! and resolves to nothing.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A typed handle to a value of type `T` stored in a [`HandleMap`]
#[repr(transparent)]
pub struct Handle<T> {
    /// Lower 24 bits: index, Upper 8 bits: generation
    bits: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Maximum index value (24 bits)
    pub const MAX_INDEX: u32 = (1 << 24) - 1;

    /// Create a new handle from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u8) -> Self {
        debug_assert!(index <= Self::MAX_INDEX);
        Self {
            bits: (generation as u32) << 24 | index,
            _marker: PhantomData,
        }
    }

    /// Get the index portion
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits & Self::MAX_INDEX
    }

    /// Get the generation portion
    #[inline]
    pub const fn generation(&self) -> u8 {
        (self.bits >> 24) as u8
    }

    /// Convert to raw bits for serialization
    #[inline]
    pub const fn to_bits(&self) -> u32 {
        self.bits
    }

    /// Create from raw bits
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _marker: PhantomData,
        }
    }

    /// Reinterpret as a handle to a different type
    ///
    /// Hosts use this to expose handles to their private storage under the
    /// public marker types ([`crate::SceneObject`], [`crate::Collection`]).
    #[inline]
    pub const fn cast<U>(self) -> Handle<U> {
        Handle {
            bits: self.bits,
            _marker: PhantomData,
        }
    }
}

// Manual trait implementations to avoid T bounds
impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = std::any::type_name::<T>();
        let short = ty.rsplit("::").next().unwrap_or(ty);
        write!(f, "Handle<{}>({}v{})", short, self.index(), self.generation())
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for Handle<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Handle<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = <u32 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from_bits(bits))
    }
}

/// Error returned when the 24-bit index space is used up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleExhausted;

impl fmt::Display for HandleExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle index space exhausted")
    }
}

impl std::error::Error for HandleExhausted {}

/// Allocates handles with generation tracking
#[derive(Debug, Clone)]
pub struct HandleAllocator<T> {
    /// Generations for each slot
    generations: Vec<u8>,
    /// Free list of available indices
    free_list: Vec<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleAllocator<T> {
    /// Create an empty allocator
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_list: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Allocate a new handle, reusing freed slots first
    pub fn allocate(&mut self) -> Result<Handle<T>, HandleExhausted> {
        if let Some(index) = self.free_list.pop() {
            let gen = self.generations[index as usize];
            return Ok(Handle::new(index, gen));
        }

        let index = self.generations.len() as u32;
        if index > Handle::<T>::MAX_INDEX {
            return Err(HandleExhausted);
        }
        self.generations.push(0);
        Ok(Handle::new(index, 0))
    }

    /// Free a handle, making its index available for reuse
    pub fn free(&mut self, handle: Handle<T>) -> bool {
        if !self.is_valid(handle) {
            return false;
        }

        let gen = &mut self.generations[handle.index() as usize];
        *gen = gen.wrapping_add(1);
        self.free_list.push(handle.index());
        true
    }

    /// Check if a handle still refers to a live slot
    pub fn is_valid(&self, handle: Handle<T>) -> bool {
        let index = handle.index() as usize;
        match self.generations.get(index) {
            Some(gen) => *gen == handle.generation() && !self.free_list.contains(&handle.index()),
            None => false,
        }
    }

    /// Get the number of allocated handles
    pub fn len(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    /// Check if no handles are allocated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage addressed by generational handles, iterated in slot order
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        from = "RawHandleMap<T>",
        into = "RawHandleMap<T>",
        bound(serialize = "T: Clone + serde::Serialize", deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct HandleMap<T> {
    allocator: HandleAllocator<T>,
    values: Vec<Option<T>>,
}

impl<T> HandleMap<T> {
    /// Create a new handle map
    pub fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            values: Vec::new(),
        }
    }

    /// Insert a value and get a handle to it
    pub fn insert(&mut self, value: T) -> Result<Handle<T>, HandleExhausted> {
        let handle = self.allocator.allocate()?;
        let index = handle.index() as usize;

        if index >= self.values.len() {
            self.values.resize_with(index + 1, || None);
        }
        self.values[index] = Some(value);
        Ok(handle)
    }

    /// Remove a value by its handle
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        if !self.allocator.free(handle) {
            return None;
        }
        self.values[handle.index() as usize].take()
    }

    /// Get a reference to a value by its handle
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if !self.allocator.is_valid(handle) {
            return None;
        }
        self.values.get(handle.index() as usize)?.as_ref()
    }

    /// Get a mutable reference to a value by its handle
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if !self.allocator.is_valid(handle) {
            return None;
        }
        self.values.get_mut(handle.index() as usize)?.as_mut()
    }

    /// Check if a handle is valid
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.allocator.is_valid(handle)
    }

    /// Get the number of values
    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }

    /// Iterate over all valid handles and values
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let gens = &self.allocator.generations;
        self.values.iter().enumerate().filter_map(move |(i, opt)| {
            opt.as_ref().map(|v| (Handle::new(i as u32, gens[i]), v))
        })
    }

    /// Iterate over all valid handles and mutable values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        let gens = &self.allocator.generations;
        self.values.iter_mut().enumerate().filter_map(move |(i, opt)| {
            opt.as_mut().map(|v| (Handle::new(i as u32, gens[i]), v))
        })
    }
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk shape of a [`HandleMap`]: generations and slots, free list rebuilt on load
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawHandleMap<T> {
    generations: Vec<u8>,
    values: Vec<Option<T>>,
}

#[cfg(feature = "serde")]
impl<T> From<RawHandleMap<T>> for HandleMap<T> {
    fn from(raw: RawHandleMap<T>) -> Self {
        let mut values = raw.values;
        let mut generations = raw.generations;
        generations.resize(values.len().max(generations.len()), 0);
        values.resize_with(generations.len(), || None);

        let free_list = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i as u32)
            .collect();

        Self {
            allocator: HandleAllocator {
                generations,
                free_list,
                _marker: PhantomData,
            },
            values,
        }
    }
}

#[cfg(feature = "serde")]
impl<T> From<HandleMap<T>> for RawHandleMap<T> {
    fn from(map: HandleMap<T>) -> Self {
        Self {
            generations: map.allocator.generations,
            values: map.values,
        }
    }
}
