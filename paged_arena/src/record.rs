use std::iter::FusedIterator;

/// A view of a single record stored in a [`PagedArena`][crate::PagedArena].
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    address: usize,
    words: &'a [u32],
    extra: usize,
}

impl<'a> Record<'a> {
    #[inline]
    pub(crate) fn at(data: &'a [u32], address: usize, extra: usize) -> Self {
        let len = data[address] as usize;
        Self {
            address,
            words: &data[address..address + 1 + extra + len],
            extra,
        }
    }

    /// Returns the arena address of the record.
    #[inline(always)]
    pub fn address(&self) -> usize {
        self.address
    }

    /// Returns the number of elements of the stored set.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.words[0] as usize
    }

    /// Returns `true` if the stored set is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the elements of the stored set.
    #[inline(always)]
    pub fn elements(&self) -> &'a [u32] {
        &self.words[1 + self.extra..]
    }

    /// Returns all extra payload words of the record.
    #[inline(always)]
    pub fn extras(&self) -> &'a [u32] {
        &self.words[1..1 + self.extra]
    }

    /// Returns the extra payload word with the given index.
    #[inline(always)]
    pub fn extra(&self, index: usize) -> u32 {
        self.extras()[index]
    }

    /// Returns the number of arena words occupied by the record.
    #[inline(always)]
    pub(crate) fn word_len(&self) -> usize {
        self.words.len()
    }
}

/// Iterator over the records of a single slot.
///
/// Cloning the iterator restarts from the clone's current position, iteration never mutates the
/// arena.
#[derive(Clone, Debug)]
pub struct Records<'a> {
    data: &'a [u32],
    extra: usize,
    address: usize,
    remaining: usize,
}

impl<'a> Records<'a> {
    pub(crate) fn new(data: &'a [u32], extra: usize, address: usize, remaining: usize) -> Self {
        Self {
            data,
            extra,
            address,
            remaining,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = Record::at(self.data, self.address, self.extra);
        self.address += record.word_len();
        self.remaining -= 1;
        Some(record)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Records<'_> {}

impl FusedIterator for Records<'_> {}
