//! # Snapshot File
//!
//! Load/save of the full binary catalog image (`data.mdb`).
//!
//! ## Load Path
//!
//! The file is memory-mapped and decoded in place. A missing file is an
//! empty database, not an error. Bad magic, an unknown version, or a
//! truncated record aborts the load. If the on-disk version is older than
//! current, the caller re-saves immediately after installing the catalog so
//! the file upgrades in place.
//!
//! ## Save Path
//!
//! Saves rewrite the whole file through create/truncate — deliberately no
//! temp-file-plus-rename: a crash mid-write can leave a torn snapshot, and
//! WAL replay is the authoritative recovery path. A mutex serializes
//! concurrent writers so two statements cannot interleave their writes.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use eyre::{bail, ensure, Result, WrapErr};
use memmap2::Mmap;
use parking_lot::Mutex;
use zerocopy::{FromBytes, IntoBytes};

use super::codec::{self, FileHeader, Reader, CURRENT_VERSION, FILE_HEADER_SIZE, MAGIC};
use crate::schema::Catalog;

/// Handle to the snapshot file.
#[derive(Debug)]
pub struct Snapshot {
    path: PathBuf,
    write_lock: Mutex<()>,
    max_row_count: u64,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>, max_row_count: u64) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            max_row_count,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the catalog image, returning the on-disk format version along
    /// with it. `None` means no snapshot exists yet.
    pub fn load(&self) -> Result<Option<(Catalog, u8)>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .wrap_err_with(|| format!("failed to open snapshot {}", self.path.display()))
            }
        };

        let mmap = unsafe { Mmap::map(&file) }
            .wrap_err_with(|| format!("failed to map snapshot {}", self.path.display()))?;
        let bytes: &[u8] = &mmap;

        ensure!(
            bytes.len() >= FILE_HEADER_SIZE,
            "invalid snapshot file: truncated header"
        );
        let header = FileHeader::read_from_bytes(&bytes[..FILE_HEADER_SIZE])
            .map_err(|_| eyre::eyre!("invalid snapshot file: truncated header"))?;
        ensure!(header.magic == MAGIC, "invalid snapshot file: bad magic");
        if header.version == 0 || header.version > CURRENT_VERSION {
            bail!("unsupported snapshot version {}", header.version);
        }

        let mut reader = Reader::new(&bytes[FILE_HEADER_SIZE..]);
        let mut catalog = Catalog::new();
        while !reader.is_empty() {
            let table = codec::decode_table(&mut reader, header.version, self.max_row_count)?;
            catalog.install(table);
        }

        tracing::debug!(
            tables = catalog.len(),
            version = header.version,
            "loaded snapshot"
        );
        Ok(Some((catalog, header.version)))
    }

    /// Rewrites the snapshot with the current catalog in the current format
    /// version. Tables are written in sorted name order.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let _guard = self.write_lock.lock();

        let file = File::create(&self.path)
            .wrap_err_with(|| format!("failed to create snapshot {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        writer.write_all(FileHeader::current().as_bytes())?;
        for name in catalog.sorted_names() {
            let table = catalog.get(&name).expect("catalog names are current");
            codec::encode_table(&mut writer, &table.read())?;
        }
        writer
            .flush()
            .wrap_err_with(|| format!("failed to write snapshot {}", self.path.display()))?;

        Ok(())
    }
}
