//! One-time background load phase.
//!
//! Bulk array decoding happens off the render thread. The engine polls
//! [`DataLoader::poll`] once per frame; until it reports `Ready`, the
//! attribute resolver is never invoked. Dropping the loader abandons an
//! in-flight load without touching any render state.

use std::sync::mpsc;
use std::thread;

use super::source::{ArraySource, DataError};
use super::store::ProbeData;

/// Load phase state as observed by the render loop.
#[derive(Debug)]
pub enum LoadState {
    /// The background thread is still fetching/reshaping.
    Loading,
    /// The store is built; the resolver may run.
    Ready(Box<ProbeData>),
    /// A required dataset failed — visualization unavailable.
    Failed(DataError),
}

/// Handle to the background load thread.
pub struct DataLoader {
    rx: mpsc::Receiver<Result<ProbeData, DataError>>,
    _handle: thread::JoinHandle<()>,
}

impl DataLoader {
    /// Spawn the load thread over the given source.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the thread cannot be spawned.
    pub fn spawn<S>(source: S) -> std::io::Result<Self>
    where
        S: ArraySource + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("cerebra-data-loader".to_owned())
            .spawn(move || {
                let result = ProbeData::load(&source);
                if let Err(ref e) = result {
                    log::error!("data load failed: {e}");
                }
                // The engine may have been torn down already; that is fine.
                let _ = tx.send(result);
            })?;
        Ok(Self {
            rx,
            _handle: handle,
        })
    }

    /// Non-blocking check for completion. Returns `None` while still
    /// loading; afterwards yields the terminal state exactly once.
    pub fn poll(&self) -> Option<Result<ProbeData, DataError>> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::{Dataset, RawArray};

    struct TinySource;

    impl ArraySource for TinySource {
        fn fetch(
            &self,
            dataset: Dataset,
        ) -> Result<Option<RawArray>, DataError> {
            Ok(match dataset {
                Dataset::Positions => Some(RawArray {
                    data: vec![0.0; 6],
                    shape: vec![2, 3],
                }),
                Dataset::AggregateLfp => Some(RawArray {
                    data: vec![0.0; 8],
                    shape: vec![2, 4],
                }),
                _ => None,
            })
        }
    }

    struct BrokenSource;

    impl ArraySource for BrokenSource {
        fn fetch(
            &self,
            dataset: Dataset,
        ) -> Result<Option<RawArray>, DataError> {
            Err(DataError::Decode {
                dataset: dataset.name(),
                reason: "corrupt header".to_owned(),
            })
        }
    }

    #[test]
    fn delivers_store_once() {
        let loader = DataLoader::spawn(TinySource).unwrap();
        // Block in the test only; the engine polls non-blockingly.
        let result = loader.rx.recv().unwrap();
        assert_eq!(result.unwrap().probe_count(), 2);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn surfaces_decode_failures() {
        let loader = DataLoader::spawn(BrokenSource).unwrap();
        let result = loader.rx.recv().unwrap();
        assert!(matches!(result, Err(DataError::Decode { .. })));
    }
}
