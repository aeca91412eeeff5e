//! Input discovery and output path inference
//!
//! A directory input is walked for `.ts` and `.tsx` sources, declaration
//! files excluded, and mirrored below the output directory. A single file
//! goes to the named output file, into an existing output directory, or
//! next to itself.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One file to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl SourceFile {
    /// Whether the source holds JSX
    pub fn is_jsx(&self) -> bool {
        extension_of(&self.input).eq_ignore_ascii_case("tsx")
    }
}

/// Resolve the files to translate, creating output directories on the way
pub fn collect_sources(input: &Path, output: Option<&Path>) -> Result<Vec<SourceFile>> {
    let metadata = fs::metadata(input).with_context(|| format!("Cannot read input '{}'", input.display()))?;

    if metadata.is_dir() {
        let Some(output) = output.filter(|o| !o.as_os_str().is_empty()) else {
            bail!("No output directory given. This is required if the input is a directory.");
        };
        return collect_directory(input, output);
    }

    tracing::trace!(input = %input.display(), "input is a single file");
    let target = match output {
        Some(output) if output.is_dir() => output_name(input, Some(output))?,
        Some(output) => {
            output_name(input, None)?;
            output.to_path_buf()
        }
        None => output_name(input, None)?,
    };
    create_parent(&target)?;

    Ok(vec![SourceFile {
        input: input.to_path_buf(),
        output: target,
    }])
}

fn collect_directory(input: &Path, output: &Path) -> Result<Vec<SourceFile>> {
    tracing::trace!(input = %input.display(), "input is a directory");
    fs::create_dir_all(output).with_context(|| format!("Cannot create '{}'", output.display()))?;

    let mut sources = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Cannot walk '{}'", input.display()))?;
        if !entry.file_type().is_file() || !is_translatable(entry.path()) {
            continue;
        }

        let path = entry.into_path();
        let relative = path
            .parent()
            .and_then(|dir| dir.strip_prefix(input).ok())
            .unwrap_or_else(|| Path::new(""));
        let out_dir = output.join(relative);
        fs::create_dir_all(&out_dir).with_context(|| format!("Cannot create '{}'", out_dir.display()))?;

        let target = output_name(&path, Some(&out_dir))?;
        sources.push(SourceFile {
            input: path,
            output: target,
        });
    }

    tracing::debug!(count = sources.len(), "sources found");
    Ok(sources)
}

/// `.ts` and `.tsx` files, but not `.d.ts` declarations
fn is_translatable(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    (name.ends_with(".ts") && !name.ends_with(".d.ts")) || name.ends_with(".tsx")
}

/// The JavaScript path for a TypeScript source, in `dir` or next to it
pub fn output_name(input: &Path, dir: Option<&Path>) -> Result<PathBuf> {
    let extension = match extension_of(input) {
        "ts" => "js",
        "tsx" => "jsx",
        other => bail!(
            "Unsupported file extension, '.{}', for '{}'",
            other,
            input.display()
        ),
    };
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let dir = dir.or_else(|| input.parent()).unwrap_or_else(|| Path::new(""));

    let output = dir.join(format!("{}.{}", stem, extension));
    tracing::trace!(output = %output.display(), "inferred output file path");
    Ok(output)
}

/// The path of an error snapshot written instead of the output
pub fn error_snapshot_path(source: &SourceFile, which: &str) -> PathBuf {
    let stem = source.input.file_stem().unwrap_or_default().to_string_lossy();
    let dir = source.output.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}-ERROR-{}.{}", stem, which, extension_of(&source.input)))
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default()
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).with_context(|| format!("Cannot create '{}'", dir.display()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};\n").unwrap();
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name(Path::new("src/a.ts"), None).unwrap(), PathBuf::from("src/a.js"));
        assert_eq!(
            output_name(Path::new("src/view.tsx"), Some(Path::new("out"))).unwrap(),
            PathBuf::from("out/view.jsx")
        );
        assert_eq!(
            output_name(Path::new("a.config.ts"), None).unwrap(),
            PathBuf::from("a.config.js")
        );
        assert!(output_name(Path::new("src/a.js"), None).is_err());
    }

    #[test]
    fn test_directory_is_mirrored() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("src");
        touch(&input.join("index.ts"));
        touch(&input.join("nested/deep/view.tsx"));
        touch(&input.join("nested/types.d.ts"));
        touch(&input.join("nested/plain.js"));

        let output = tmp.path().join("dist");
        let sources = collect_sources(&input, Some(&output)).unwrap();

        assert_eq!(
            sources.iter().map(|s| s.output.clone()).collect::<Vec<_>>(),
            vec![output.join("index.js"), output.join("nested/deep/view.jsx")]
        );
        assert!(output.join("nested/deep").is_dir());
        assert!(sources[1].is_jsx());
        assert!(!sources[0].is_jsx());
    }

    #[test]
    fn test_directory_requires_output() {
        let tmp = TempDir::new().unwrap();
        let error = collect_sources(tmp.path(), None).unwrap_err();
        assert!(error.to_string().contains("No output directory given"));
    }

    #[test]
    fn test_single_file_targets() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("a.ts");
        touch(&input);

        let beside = collect_sources(&input, None).unwrap();
        assert_eq!(beside[0].output, tmp.path().join("a.js"));

        let out_dir = tmp.path().join("out");
        fs::create_dir(&out_dir).unwrap();
        let into_dir = collect_sources(&input, Some(&out_dir)).unwrap();
        assert_eq!(into_dir[0].output, out_dir.join("a.js"));

        let named = tmp.path().join("lib/renamed.js");
        let into_file = collect_sources(&input, Some(&named)).unwrap();
        assert_eq!(into_file[0].output, named);
        assert!(tmp.path().join("lib").is_dir());
    }

    #[test]
    fn test_error_snapshot_path() {
        let source = SourceFile {
            input: PathBuf::from("src/view.tsx"),
            output: PathBuf::from("dist/view.jsx"),
        };
        assert_eq!(
            error_snapshot_path(&source, "oldText"),
            PathBuf::from("dist/view-ERROR-oldText.tsx")
        );
    }
}
