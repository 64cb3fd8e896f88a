//! Error types for the three failure kinds the renderer can surface:
//! worker-thread spawn failure, image allocation failure, and output I/O
//! failure. Everything inside the hot render path remains `assert!`-based —
//! these types only cover the boundary the driver sees.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker thread could not be spawned: {0}")]
    OsResourceFailure(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("thread pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("failed to allocate {bytes} byte image buffer")]
    OutOfMemory { bytes: usize },

    #[error("failed to write output file {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
