use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::AppResult;

/// Recursive copy; `src` may be a file or a directory.
pub fn copy_dir(src: &Path, dest: &Path) -> AppResult<()> {
    let meta = fs::metadata(src)?;
    if !meta.is_dir() {
        fs::copy(src, dest)?;
        return Ok(());
    }

    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        copy_dir(&entry.path(), &dest.join(entry.file_name()))?;
    }

    Ok(())
}

/// Zips `dir` into an anonymous temp file, rewound for reading.
/// Entry names are rooted at the directory's own name.
pub fn zip_dir(dir: &Path) -> AppResult<File> {
    if !dir.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "not a directory").into());
    }

    let base = dir.parent().unwrap_or(Path::new(""));
    let mut zip = zip::ZipWriter::new(tempfile::tempfile()?);
    let file_options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let dir_options = FileOptions::default().unix_permissions(0o755);

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(base) else {
            continue;
        };
        let name = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, dir_options)?;
        } else {
            zip.start_file(name, file_options)?;
            let mut source = File::open(path)?;
            io::copy(&mut source, &mut zip)?;
        }
    }

    let mut file = zip.finish()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_nested_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("a/b")).expect("mkdir");
        fs::write(src.join("a/b/save.dat"), b"payload").expect("write");
        fs::write(src.join("top.txt"), b"top").expect("write");

        let dest = dir.path().join("dest");
        copy_dir(&src, &dest).expect("copy");

        assert_eq!(fs::read(dest.join("a/b/save.dat")).expect("read"), b"payload");
        assert_eq!(fs::read(dest.join("top.txt")).expect("read"), b"top");
    }

    #[test]
    fn zip_of_missing_dir_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = zip_dir(&dir.path().join("nope")).expect_err("missing");
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn zip_keeps_directories_traversable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = dir.path().join("p");
        fs::create_dir_all(profile.join("AutoSave-0")).expect("mkdir");
        fs::write(profile.join("AutoSave-0/sav.dat"), b"payload").expect("write");

        let mut archive = zip::ZipArchive::new(zip_dir(&profile).expect("zip")).expect("open");
        let mut modes = Vec::new();
        for idx in 0..archive.len() {
            let entry = archive.by_index(idx).expect("entry");
            let mode = entry.unix_mode().expect("unix mode") & 0o777;
            modes.push((entry.name().to_string(), entry.is_dir(), mode));
        }

        assert_eq!(
            modes,
            vec![
                ("p/".to_string(), true, 0o755),
                ("p/AutoSave-0/".to_string(), true, 0o755),
                ("p/AutoSave-0/sav.dat".to_string(), false, 0o644),
            ]
        );

        let mut contents = Vec::new();
        io::Read::read_to_end(
            &mut archive.by_name("p/AutoSave-0/sav.dat").expect("entry"),
            &mut contents,
        )
        .expect("read");
        assert_eq!(contents, b"payload");
    }
}
