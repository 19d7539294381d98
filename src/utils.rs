use std::fs;
use std::path::Path;

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files.
pub(crate) fn is_writable_probe(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(format!(".settle_move_probe_{}.tmp", std::process::id()));
    match fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
    {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writable_probe_ok_in_tempdir() {
        let td = tempdir().unwrap();
        is_writable_probe(td.path()).expect("tempdir should be writable");
        // The probe file must not be left behind.
        let leftovers: Vec<_> = fs::read_dir(td.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "probe file leaked: {leftovers:?}");
    }

    #[cfg(unix)]
    #[test]
    fn writable_probe_fails_on_readonly_dir() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let dir = td.path().join("ro");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o500)).unwrap();
        let res = is_writable_probe(&dir);
        // Restore so the tempdir can be cleaned up.
        let _ = fs::set_permissions(&dir, fs::Permissions::from_mode(0o700));
        assert!(res.is_err());
    }
}
