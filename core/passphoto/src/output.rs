use std::io::Write;
use std::path::Path;

use tempfile::Builder;

use crate::error::PassphotoError;

/// Write `data` to `path` without ever leaving a partial file behind.
///
/// The bytes go to a temporary file in the destination directory, which is
/// then renamed over `path`. A previous file at `path` stays untouched if any
/// step fails; the temporary file is removed on drop.
///
/// A replaced file keeps its permissions; a new one gets the same
/// umask-derived mode as `std::fs::write`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), PassphotoError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let encode_err =
        |e: std::io::Error| PassphotoError::EncodeError(format!("{}: {e}", path.display()));

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Subject to the umask, like any other newly created file.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir).map_err(encode_err)?;
    if let Ok(existing) = std::fs::metadata(path) {
        if existing.is_file() {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(encode_err)?;
        }
    }
    tmp.write_all(data).map_err(encode_err)?;
    tmp.as_file().sync_all().map_err(encode_err)?;
    tmp.persist(path).map_err(|e| encode_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "output written");
    Ok(())
}
