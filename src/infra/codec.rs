use crate::domain::{EncodedName, ResolvedPath, first_existing};
use crate::infra::PathMappingStore;
use std::path::Path;

/// Directory existence check used while decoding.
pub trait DirProbe {
    fn is_dir(&self, path: &str) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl DirProbe for FsProbe {
    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }
}

/// Resolves encoded folder names to real paths, memoising verified hits.
#[derive(Clone, Debug)]
pub struct PathCodec<P = FsProbe> {
    store: PathMappingStore,
    probe: P,
}

impl PathCodec<FsProbe> {
    pub fn new(store: PathMappingStore) -> Self {
        Self::with_probe(store, FsProbe)
    }
}

impl<P: DirProbe> PathCodec<P> {
    pub fn with_probe(store: PathMappingStore, probe: P) -> Self {
        Self { store, probe }
    }

    pub fn decode(&self, name: &str) -> Option<ResolvedPath> {
        if let Some(path) = self.store.get(name) {
            return Some(ResolvedPath::mapped(path));
        }

        let Some(encoded) = EncodedName::parse(name) else {
            tracing::debug!(name, "folder name is not drive-encoded");
            return None;
        };

        let naive = encoded.naive_candidate();
        let candidates = std::iter::once(naive.clone()).chain(encoded.segmentation_candidates());
        match first_existing(candidates, |candidate| self.probe.is_dir(candidate)) {
            Some(path) => {
                self.store.put(name, &path);
                Some(ResolvedPath::verified(path))
            }
            None => {
                tracing::debug!(name, guess = %naive, "no decode candidate exists on disk");
                Some(ResolvedPath::guessed(naive))
            }
        }
    }
}
