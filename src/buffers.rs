//! Round-robin buffer pools backing each simulation field.
//!
//! A field that is read and written within the same frame keeps at least two
//! physical grids so a pass never writes the grid it is reading. Resizes are
//! recorded and applied lazily, the next time a buffer is handed out for
//! writing.

use crate::grid::Grid;

/// Opaque reference to one physical buffer of a [`MultiBuffer`].
///
/// Handles stay valid across frames but may point at stale contents once the
/// rotation has come back around to their slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(usize);

impl BufferHandle {
    pub fn slot(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot<const C: usize> {
    grid: Grid<C>,
    needs_resize: bool,
}

#[derive(Debug, Clone)]
pub struct MultiBuffer<const C: usize> {
    label: &'static str,
    width: usize,
    height: usize,
    slots: Vec<Slot<C>>,
    index: usize,
    current: Option<usize>,
    // Zeroed stand-in read before anything has been committed since creation,
    // reset or resize.
    blank: Grid<C>,
}

impl<const C: usize> MultiBuffer<C> {
    pub fn new(label: &'static str, width: usize, height: usize, count: usize) -> Self {
        let blank = Grid::new(width, height);
        let (width, height) = blank.resolution();
        let slots = (0..count.max(1))
            .map(|_| Slot {
                grid: Grid::new(width, height),
                needs_resize: false,
            })
            .collect();

        Self {
            label,
            width,
            height,
            slots,
            index: 0,
            current: None,
            blank,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn buffer_count(&self) -> usize {
        self.slots.len()
    }

    /// Resolution the field will have once its buffers are next written.
    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Records a new resolution and marks every buffer dirty. No storage is
    /// touched until the buffer is next acquired for writing; the field reads
    /// as all-zero until then.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.blank = Grid::new(width, height);
        (self.width, self.height) = self.blank.resolution();
        for slot in &mut self.slots {
            slot.needs_resize = true;
        }
        self.current = None;
        log::trace!(
            "{}: resize to {}x{} deferred over {} buffers",
            self.label,
            self.width,
            self.height,
            self.slots.len()
        );
    }

    /// Forgets the committed contents so the field reads as all-zero again.
    /// Storage is kept.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Selects the next buffer in rotation, applying any pending resize.
    ///
    /// The returned buffer becomes readable only after [`commit`](Self::commit).
    pub fn acquire_for_write(&mut self) -> BufferHandle {
        let slot_index = self.index;
        self.index = (self.index + 1) % self.slots.len();

        let slot = &mut self.slots[slot_index];
        if slot.needs_resize {
            slot.grid.reallocate(self.width, self.height);
            slot.needs_resize = false;
            log::trace!("{}: reallocated buffer {}", self.label, slot_index);
        }

        BufferHandle(slot_index)
    }

    /// Publishes a written buffer as the field's current contents.
    pub fn commit(&mut self, handle: BufferHandle) {
        self.current = Some(handle.0);
    }

    pub fn current_handle(&self) -> Option<BufferHandle> {
        self.current.map(BufferHandle)
    }

    pub fn current(&self) -> &Grid<C> {
        match self.current {
            Some(slot) => &self.slots[slot].grid,
            None => &self.blank,
        }
    }

    pub fn get(&self, handle: BufferHandle) -> &Grid<C> {
        &self.slots[handle.0].grid
    }

    pub fn get_mut(&mut self, handle: BufferHandle) -> &mut Grid<C> {
        &mut self.slots[handle.0].grid
    }

    /// Borrows the current contents alongside the buffer acquired for writing.
    ///
    /// Panics if `write` is the buffer currently exposed for reading, which
    /// can only happen for single-buffer fields or when acquired buffers are
    /// left uncommitted.
    pub fn split_for_write(&mut self, write: BufferHandle) -> (&Grid<C>, &mut Grid<C>) {
        let Some(read) = self.current else {
            return (&self.blank, &mut self.slots[write.0].grid);
        };
        assert_ne!(
            read, write.0,
            "{}: buffer {} is both read and written",
            self.label, read
        );

        if read < write.0 {
            let (low, high) = self.slots.split_at_mut(write.0);
            (&low[read].grid, &mut high[0].grid)
        } else {
            let (low, high) = self.slots.split_at_mut(read);
            (&high[0].grid, &mut low[write.0].grid)
        }
    }

    /// Writes the next buffer from scratch and publishes it.
    pub fn write<F>(&mut self, pass: F)
    where
        F: FnOnce(&mut Grid<C>),
    {
        let handle = self.acquire_for_write();
        pass(&mut self.slots[handle.0].grid);
        self.commit(handle);
    }

    /// Runs a pass that reads the field's current contents and writes the
    /// next buffer in rotation, then publishes the result.
    pub fn rotate_write<F>(&mut self, pass: F)
    where
        F: FnOnce(&Grid<C>, &mut Grid<C>),
    {
        let handle = self.acquire_for_write();
        let (read, write) = self.split_for_write(handle);
        pass(read, write);
        self.commit(handle);
    }
}
