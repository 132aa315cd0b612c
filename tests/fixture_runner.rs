use pseudocode::interpreter::parse_and_run;
use std::fs;
use std::path::Path;

/// Each directory under `tests/fixtures` holds `program.pseudo`,
/// `expected.txt` and optionally `input.txt` (one INPUT value per line).
#[test]
fn run_fixtures() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let mut entries: Vec<_> = fs::read_dir(&fixtures_dir)
        .expect("Failed to read fixtures directory")
        .map(|entry| entry.expect("Failed to read entry").path())
        .filter(|path| path.join("program.pseudo").exists())
        .collect();
    entries.sort();

    let failures: Vec<String> = entries
        .iter()
        .filter_map(|dir| run_case(dir).err())
        .collect();

    eprintln!("Fixture run complete. Processed {} programs.", entries.len());
    assert!(!entries.is_empty(), "no fixtures found in {}", fixtures_dir.display());
    assert!(failures.is_empty(), "fixture failures:\n{}", failures.join("\n"));
}

fn run_case(dir: &Path) -> Result<(), String> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let program = fs::read_to_string(dir.join("program.pseudo")).map_err(|e| format!("{}: {}", name, e))?;
    let expected = fs::read_to_string(dir.join("expected.txt")).map_err(|e| format!("{}: {}", name, e))?;
    let input = fs::read_to_string(dir.join("input.txt")).unwrap_or_default();
    let inputs: Vec<&str> = input.lines().collect();

    let output = parse_and_run(&program, &inputs).map_err(|e| format!("{}: {}", name, e))?;
    let expected: Vec<&str> = expected.lines().collect();

    if output == expected {
        Ok(())
    } else {
        Err(format!(
            "{}: expected {:?}, got {:?}",
            name, expected, output
        ))
    }
}
