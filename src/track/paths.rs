//! Path composition for data and mapping files. Pure string work, nothing is
//! looked up on disk.

/// Compression suffixes stripped from document archives.
pub const COMPRESSION_SUFFIXES: [&str; 4] = [".bz2", ".gz", ".zip", ".zst"];

/// `{root}/{file}`, without doubling a trailing slash on `root`.
pub fn join(root: &str, file: &str) -> String {
    if root.is_empty() {
        return file.to_string();
    }
    format!("{}/{}", root.trim_end_matches('/'), file)
}

/// Remove one recognized compression suffix, if any. Suffixes match
/// regardless of ASCII case.
///
/// documents-main.json.bz2  =>  documents-main.json
pub fn strip_compression_suffix(file: &str) -> &str {
    COMPRESSION_SUFFIXES
        .iter()
        .find_map(|suffix| {
            let stem_len = file.len().checked_sub(suffix.len())?;
            let tail = file.get(stem_len..)?;
            tail.eq_ignore_ascii_case(suffix).then(|| &file[..stem_len])
        })
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file)
}
