//! Write delimited text files

use std::{
    ffi::OsString,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use context_error::{BoxedError, Context, CreateError};
use itertools::Itertools;

use crate::error::DigestError;

/// Write a CSV file with the given header. It ensures the correct amount of columns on each line
/// by filling missing columns with empty space and dropping superfluous ones, and auto wraps any
/// separator containing values and headers in double quotes ("). It also replaces any double
/// quotes (") in wrapped fields in single quotes (').
/// # Errors
/// If the `Write` implementation errors.
pub fn write_csv(
    mut f: impl Write,
    header: &[&str],
    rows: impl IntoIterator<Item = impl IntoIterator<Item = String>>,
    separator: char,
) -> Result<(), std::io::Error> {
    let escape = |value: String| {
        if value.contains(separator) {
            format!("\"{}\"", value.replace('\"', "\'"))
        } else {
            value
        }
    };
    let separator = separator.to_string();
    writeln!(
        f,
        "{}",
        header.iter().map(|h| escape((*h).to_string())).join(&separator)
    )?;
    for row in rows {
        writeln!(
            f,
            "{}",
            row.into_iter()
                .map(escape)
                .chain(std::iter::repeat(String::new()))
                .take(header.len())
                .join(&separator)
        )?;
    }
    Ok(())
}

/// Write a file by first writing to a sibling file with a `.partial` suffix and only moving it to
/// the final location when all writing succeeded. On failure the partial file is removed, so the
/// final path is either untouched or complete.
/// # Errors
/// A [`DigestError::OutputNotWritable`] error if the file could not be created, written, or moved.
pub fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<(), std::io::Error>,
) -> Result<(), BoxedError<'static, DigestError>> {
    let partial = partial_path(path);
    let error = |short: &'static str, e: std::io::Error| {
        BoxedError::new(
            DigestError::OutputNotWritable,
            short,
            e.to_string(),
            Context::none().source(path.to_string_lossy()).to_owned(),
        )
    };
    let file = File::create(&partial).map_err(|e| error("Output file could not be made", e))?;
    let mut writer = BufWriter::new(file);
    let result = write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| error("Output file could not be written", e))
        .and_then(|()| {
            drop(writer);
            std::fs::rename(&partial, path)
                .map_err(|e| error("Output file could not be moved into place", e))
        });
    if result.is_err() && partial.exists() {
        if let Err(e) = std::fs::remove_file(&partial) {
            tracing::warn!("Could not remove partial output file {}: {e}", partial.display());
        }
    }
    result
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use context_error::FullErrorContent;

    use super::*;

    #[test]
    fn quoting_and_padding() {
        let mut out = Vec::new();
        write_csv(
            &mut out,
            &["a", "b,c", "d"],
            vec![
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
                vec!["x,\"y\"".to_string()],
                vec![
                    "4".to_string(),
                    "5".to_string(),
                    "6".to_string(),
                    "7".to_string(),
                ],
            ],
            ',',
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a,\"b,c\",d\n1,2,3\n\"x,'y'\",,\n4,5,6\n"
        );
    }

    #[test]
    fn partial_files_are_cleaned_up() {
        let directory = std::env::temp_dir().join(format!("mzdigest-csv-{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        let path = directory.join("out.csv");

        write_file(&path, |w| writeln!(w, "complete")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "complete\n");

        let error = write_file(&path, |w| {
            writeln!(w, "half")?;
            Err(std::io::Error::other("interrupted"))
        })
        .unwrap_err();
        assert_eq!(error.get_kind(), DigestError::OutputNotWritable);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "complete\n");
        assert!(!partial_path(&path).exists());

        std::fs::remove_dir_all(&directory).unwrap();
    }

    #[test]
    fn unwritable_location() {
        let path = Path::new("this/directory/does/not/exist/out.csv");
        let error = write_file(path, |w| writeln!(w, "x")).unwrap_err();
        assert_eq!(error.get_kind(), DigestError::OutputNotWritable);
    }
}
