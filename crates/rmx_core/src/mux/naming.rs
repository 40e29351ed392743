//! Output file naming.

use std::path::{Path, PathBuf};

/// Proposed output path: `suffix` inserted before the input's extension.
///
/// `/media/movie.mkv` with `_remux` becomes `/media/movie_remux.mkv`; a name
/// without an extension gets the suffix appended.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_suffix_before_extension() {
        assert_eq!(
            output_path_for(Path::new("/media/movie.mkv"), "_remux"),
            PathBuf::from("/media/movie_remux.mkv")
        );
    }

    #[test]
    fn only_last_extension_is_kept_after_suffix() {
        assert_eq!(
            output_path_for(Path::new("show.s01e01.mp4"), ".clean"),
            PathBuf::from("show.s01e01.clean.mp4")
        );
    }

    #[test]
    fn no_extension_appends_suffix() {
        assert_eq!(
            output_path_for(Path::new("/tmp/capture"), "_remux"),
            PathBuf::from("/tmp/capture_remux")
        );
        assert_eq!(
            output_path_for(Path::new(".hidden"), "_remux"),
            PathBuf::from(".hidden_remux")
        );
    }
}
