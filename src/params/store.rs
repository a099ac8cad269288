use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{ParamId, PARAM_COUNT, PARAM_INFOS};

/*
Lock-free Parameter Store
=========================

Parameters are written by a control thread (host automation, UI, preset
loading) and read by the render thread. Locks are off the table on the render
side, so each parameter is a single AtomicU32 holding the f32's bits:

  - a store writes all 32 bits at once, so a reader never sees half a value
  - writers clamp before storing, so a stored value is always in range
  - the render thread copies the whole table into a ParamSnapshot at the
    start of each block and reads only the snapshot from then on

The one slot written by the render thread (`CurCutoff`) is never written by
the control side, which keeps every slot single-writer.
*/

pub struct ParamStore {
    values: [AtomicU32; PARAM_COUNT],
}

impl ParamStore {
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| AtomicU32::new(PARAM_INFOS[i].default.to_bits())),
        }
    }

    /// Clamp and store a value. Returns what was stored. Non-finite values and
    /// writes to read-only parameters leave the current value in place.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        if id.is_read_only() || !value.is_finite() {
            return self.get(id);
        }
        let clamped = id.info().clamp(value);
        self.values[id.index()].store(clamped.to_bits(), Ordering::Release);
        clamped
    }

    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Acquire))
    }

    /// Index-addressed write. An unknown index is ignored.
    pub fn set_parameter(&self, index: usize, value: f32) {
        if let Some(id) = ParamId::from_index(index) {
            self.set(id, value);
        }
    }

    /// Index-addressed read. An unknown index reads as 0.
    pub fn get_parameter(&self, index: usize) -> f32 {
        ParamId::from_index(index).map_or(0.0, |id| self.get(id))
    }

    /// Write from a 0..1 host automation value.
    pub fn set_normalized(&self, id: ParamId, normalized: f32) {
        if normalized.is_finite() {
            self.set(id, id.info().denormalize(normalized));
        }
    }

    pub fn normalized(&self, id: ParamId) -> f32 {
        id.info().normalize(self.get(id))
    }

    /// Display text: the value with two decimals.
    pub fn parameter_text(&self, index: usize) -> String {
        format!("{:.2}", self.get_parameter(index))
    }

    /// Restore every writable parameter to its default. Monitor slots are
    /// left to the engine.
    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL.into_iter().filter(|id| !id.is_read_only()) {
            self.values[id.index()].store(id.info().default.to_bits(), Ordering::Release);
        }
    }

    /// Copy every value into a plain array for one render block.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            values: std::array::from_fn(|i| f32::from_bits(self.values[i].load(Ordering::Acquire))),
        }
    }

    /// Engine-side write for monitor parameters.
    pub(crate) fn publish(&self, id: ParamId, value: f32) {
        if value.is_finite() {
            self.values[id.index()].store(id.info().clamp(value).to_bits(), Ordering::Release);
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One block's worth of parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    values: [f32; PARAM_COUNT],
}

impl ParamSnapshot {
    pub fn defaults() -> Self {
        Self {
            values: std::array::from_fn(|i| PARAM_INFOS[i].default),
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.values[id.index()]
    }

    pub fn values(&self) -> &[f32; PARAM_COUNT] {
        &self.values
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Index<ParamId> for ParamSnapshot {
    type Output = f32;

    fn index(&self, id: ParamId) -> &f32 {
        &self.values[id.index()]
    }
}
