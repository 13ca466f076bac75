//! Expansion of directory arguments into test identifiers.
//!
//! A directory named on the command line stands for every `.in` file
//! beneath it. The expansion is sorted so execution order is deterministic.

use std::path::Path;

use walkdir::WalkDir;

/// Expand each argument: directories become their discovered `.in` files,
/// anything else is taken verbatim as a test identifier.
pub fn expand_tests(args: &[String]) -> Vec<String> {
    let mut tests = Vec::new();
    for arg in args {
        let path = Path::new(arg);
        if path.is_dir() {
            tests.extend(discover_input_files(path));
        } else {
            tests.push(arg.clone());
        }
    }
    tests
}

/// Recursively find all `.in` files under `root`, sorted.
fn discover_input_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "in")
        })
        .map(|entry| entry.path().display().to_string())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn plain_identifiers_pass_through() {
        let args = vec!["suite/a.in".to_string(), "suite/b.in".to_string()];
        assert_eq!(expand_tests(&args), args);
    }

    #[test]
    fn directories_expand_to_sorted_input_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.in"), "").unwrap();
        fs::write(dir.path().join("a.in"), "").unwrap();
        fs::write(dir.path().join("nested/c.in"), "").unwrap();
        fs::write(dir.path().join("ignored.std"), "").unwrap();

        let expanded = expand_tests(&[dir.path().display().to_string()]);
        let names: Vec<String> = expanded
            .iter()
            .map(|t| {
                Path::new(t)
                    .strip_prefix(dir.path())
                    .unwrap()
                    .display()
                    .to_string()
            })
            .collect();
        assert_eq!(names, vec!["a.in", "b.in", "nested/c.in"]);
    }
}
