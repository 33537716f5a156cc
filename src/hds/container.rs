// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Slot container with a stable, reorderable sequence
//!
//! Elements live in a `Vec` of slots that never moves an element once it is
//! placed. A removed slot stays empty until the next [`clear`], so a handle
//! to a removed element can never name a newer one: reading it panics. On
//! top of the slots runs an intrusive doubly linked list that defines the
//! iteration order; it can be rearranged in O(1) per element without
//! touching slot indices.
//!
//! [`clear`]: InPlaceList::clear

use std::collections::TryReserveError;
use std::mem;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug, Clone)]
pub(crate) struct InPlaceList<T> {
    slots: Vec<Slot<T>>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl<T> Default for InPlaceList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InPlaceList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Make room for `capacity` slots in total, empty slots of removed
    /// elements included. Does nothing if the capacity is already large
    /// enough. Slots never move, so handles stay valid either way.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        let additional = capacity.saturating_sub(self.slots.len());
        self.slots.try_reserve(additional)
    }

    /// Make room for `additional` more insertions
    pub fn reserve_additional(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.slots.try_reserve(additional)
    }

    /// Bytes occupied by live elements
    pub fn bytes(&self) -> usize {
        self.len * mem::size_of::<Slot<T>>()
    }

    /// Bytes held by the slot buffer
    pub fn bytes_reserved(&self) -> usize {
        self.slots.capacity() * mem::size_of::<Slot<T>>()
    }

    /// Insert at the back of the sequence and return the slot index
    pub fn insert(&mut self, value: T) -> usize {
        debug_assert!(self.slots.len() < u32::MAX as usize);
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            value: Some(value),
            prev: None,
            next: None,
        });
        self.link_back(index);
        self.len += 1;
        index as usize
    }

    /// Remove the element in `index`. The slot stays empty until
    /// [`clear`](Self::clear).
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.value.take()?;
        self.unlink(index as u32);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .map(|slot| slot.value.is_some())
            .unwrap_or(false)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.value.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.value.as_mut()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Move an element to the back of the sequence
    pub fn move_to_back(&mut self, index: usize) {
        debug_assert!(self.contains(index));
        let index = index as u32;
        if self.tail == Some(index) {
            return;
        }
        self.unlink(index);
        self.link_back(index);
    }

    /// Slot indices in sequence order
    pub fn indices(&self) -> Indices<'_, T> {
        Indices {
            list: self,
            cursor: self.head,
        }
    }

    /// Slot indices in sequence order starting at `index`
    pub fn indices_from(&self, index: Option<usize>) -> Indices<'_, T> {
        Indices {
            list: self,
            cursor: index.map(|i| i as u32),
        }
    }

    /// `(index, &value)` in sequence order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.indices().map(move |i| (i, &self[i]))
    }

    fn link_back(&mut self, index: u32) {
        let old_tail = self.tail;
        {
            let slot = &mut self.slots[index as usize];
            slot.prev = old_tail;
            slot.next = None;
        }
        match old_tail {
            Some(tail) => self.slots[tail as usize].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    fn unlink(&mut self, index: u32) {
        let (prev, next) = {
            let slot = &self.slots[index as usize];
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }
        let slot = &mut self.slots[index as usize];
        slot.prev = None;
        slot.next = None;
    }
}

impl<T> Index<usize> for InPlaceList<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("stale handle: slot {index} holds no element"),
        }
    }
}

impl<T> IndexMut<usize> for InPlaceList<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("stale handle: slot {index} holds no element"),
        }
    }
}

/// Slot indices in sequence order
#[derive(Clone)]
pub(crate) struct Indices<'a, T> {
    list: &'a InPlaceList<T>,
    cursor: Option<u32>,
}

impl<T> Iterator for Indices<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.list.slots[current as usize].next;
        Some(current as usize)
    }
}
