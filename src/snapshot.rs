//! Snapshot codec.
//!
//! A snapshot is the whole graph serialized with bincode, followed by a
//! 4-byte magic and a CRC32 footer:
//!
//! ```text
//! [bincode payload][magic "SWH1"][CRC32 big-endian]
//! ```
//!
//! The payload covers the configuration, `m_l`, the current max level, the
//! entry point, the distance tag, the vector arena, and every node record.
//! The level RNG is not persisted; loading re-seeds it from entropy. Load
//! verifies the CRC before decoding and re-checks every graph invariant
//! after.

use crate::error::{IndexError, Result};
use crate::hnsw::graph::HnswGraph;
use std::io;

/// Trailing magic distinguishing a checksummed snapshot.
const SNAPSHOT_MAGIC: &[u8; 4] = b"SWH1";

/// Serialize the graph to `writer`.
pub fn save<W: io::Write>(graph: &HnswGraph, mut writer: W) -> Result<()> {
    let payload =
        bincode::serialize(graph).map_err(|e| IndexError::Snapshot(e.to_string()))?;
    let crc = crc32fast::hash(&payload);

    writer.write_all(&payload)?;
    writer.write_all(SNAPSHOT_MAGIC)?;
    writer.write_all(&crc.to_be_bytes())?;
    writer.flush()?;

    tracing::info!(
        "saved snapshot: {} nodes, {} bytes, CRC32={:#010x}",
        graph.len(),
        payload.len(),
        crc
    );
    Ok(())
}

/// Deserialize a graph from `reader`, verifying integrity and invariants.
pub fn load<R: io::Read>(mut reader: R) -> Result<HnswGraph> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;

    if raw.len() < 8 {
        return Err(IndexError::Snapshot("snapshot too short".to_string()));
    }
    let (payload, trailer) = raw.split_at(raw.len() - 8);
    if &trailer[..4] != SNAPSHOT_MAGIC {
        return Err(IndexError::Snapshot("missing snapshot magic".to_string()));
    }

    let stored_crc = u32::from_be_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);
    let computed_crc = crc32fast::hash(payload);
    if stored_crc != computed_crc {
        return Err(IndexError::Snapshot(format!(
            "CRC32 mismatch: stored {stored_crc:#010x}, computed {computed_crc:#010x}"
        )));
    }

    let graph: HnswGraph =
        bincode::deserialize(payload).map_err(|e| IndexError::Snapshot(e.to_string()))?;
    graph.validate().map_err(IndexError::Snapshot)?;

    tracing::info!("loaded snapshot: {} nodes, dim {}", graph.len(), graph.config.dim);
    Ok(graph)
}
