use std::path::Path;

use crate::collection::OvertureMapsCollectionError;

/// "mkdir -p" for an output directory. fails if the path exists as a regular file.
pub fn create_dirs<P>(path: P) -> Result<(), OvertureMapsCollectionError>
where
    P: AsRef<Path>,
{
    let dirpath = path.as_ref();
    if dirpath.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dirpath).map_err(|e| {
        OvertureMapsCollectionError::InvalidUserInput(format!(
            "cannot create output directory '{}': {e}",
            dirpath.display()
        ))
    })
}
