// crates/countries-core/src/source/common_io.rs
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Opens a file, buffers it, and wraps `.gz` paths in a Gzip decoder.
/// Returns a generic Reader so the caller doesn't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let reader = BufReader::new(File::open(path)?);

    #[cfg(feature = "compact")]
    {
        if is_gzip_path(path) {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}

/// Hands a buffered (and, for `.gz`, compressing) writer to `body`, then
/// moves the result over `path`. The data goes to a temporary sibling first,
/// so a failed write leaves any previous file at `path` untouched.
pub fn write_stream<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_into(&mut tmp, path, body)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn write_into<F>(file: &mut NamedTempFile, path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let mut writer = BufWriter::new(file);

    #[cfg(feature = "compact")]
    {
        if is_gzip_path(path) {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            body(&mut encoder)?;
            encoder.finish()?.flush()?;
            return Ok(());
        }
    }
    #[cfg(not(feature = "compact"))]
    let _ = path;

    body(&mut writer)?;
    writer.flush()?;
    Ok(())
}
