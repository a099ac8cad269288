//! Binary persistence of the parameter table.
//!
//! Layout (little-endian):
//!
//! ```text
//! offset  size  field
//! 0       4     magic  b"WOLP"
//! 4       2     version (1)
//! 6       2     count
//! 8       4·n   f32 values in ParamId order
//! ```

use super::{ParamId, ParamStore, PARAM_COUNT};
use crate::error::{WolpError, WolpResult};

const MAGIC: &[u8; 4] = b"WOLP";
const VERSION: u16 = 1;
const HEADER_LEN: usize = 8;

impl ParamStore {
    /// Serialize every parameter into an opaque block.
    pub fn save_state(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + PARAM_COUNT * 4);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&(PARAM_COUNT as u16).to_le_bytes());
        for id in ParamId::ALL {
            bytes.extend_from_slice(&self.get(id).to_le_bytes());
        }
        bytes
    }

    /// Restore parameters from a block written by [`ParamStore::save_state`].
    ///
    /// The block is validated before anything is written, so a rejected block
    /// leaves the store untouched. Values for parameters this build doesn't
    /// know are skipped; parameters missing from the block keep their current
    /// value. Returns the number of parameters restored.
    pub fn load_state(&self, bytes: &[u8]) -> WolpResult<usize> {
        if bytes.len() < HEADER_LEN {
            return Err(WolpError::StateTooShort { len: bytes.len() });
        }
        if &bytes[0..4] != MAGIC {
            return Err(WolpError::BadMagic);
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(WolpError::UnsupportedVersion { version });
        }

        let count = u16::from_le_bytes([bytes[6], bytes[7]]) as usize;
        let expected = HEADER_LEN + count * 4;
        if bytes.len() < expected {
            return Err(WolpError::Truncated {
                expected,
                found: bytes.len(),
            });
        }

        let mut restored = 0;
        for (index, chunk) in bytes[HEADER_LEN..expected].chunks_exact(4).enumerate() {
            let Some(id) = ParamId::from_index(index) else {
                break;
            };
            if id.is_read_only() {
                continue;
            }
            let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            self.set(id, value);
            restored += 1;
        }

        log::info!("restored {restored} of {count} parameters from saved state");
        Ok(restored)
    }
}
