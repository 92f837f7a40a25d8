//! Candidate input from files or stdin.

use std::fs;
use std::io::{self, IsTerminal, Read};

/// Read from stdin if piped (not a terminal).
///
/// Returns `None` if stdin is a terminal.
pub fn read_stdin() -> Result<Option<String>, String> {
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(Some(buffer))
}

/// Read candidate text from `path`, or from piped stdin when `path` is
/// `None` or `-`.
pub fn read_candidates(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(p) if p != "-" => {
            fs::read_to_string(p).map_err(|e| format!("failed to read {}: {}", p, e))
        }
        _ => read_stdin()?.ok_or_else(|| {
            "no candidates: pass a FILE or pipe candidates on stdin".to_string()
        }),
    }
}

/// Split input into candidate lines, dropping blank ones.
pub fn candidate_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_lines_skips_blank() {
        let lines = candidate_lines("alpha\n\n  \nbeta\r\ngamma delta\n");
        assert_eq!(lines, vec!["alpha", "beta", "gamma delta"]);
    }

    #[test]
    fn test_candidate_lines_keeps_inner_whitespace() {
        assert_eq!(candidate_lines("  padded  "), vec!["  padded  "]);
    }

    #[test]
    fn test_read_candidates_from_file() {
        let path = std::env::temp_dir().join(format!("fzrank-input-{}.txt", std::process::id()));
        fs::write(&path, "one\ntwo\n").unwrap();
        let content = read_candidates(path.to_str()).unwrap();
        assert_eq!(candidate_lines(&content), vec!["one", "two"]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_candidates_missing_file() {
        let err = read_candidates(Some("/nonexistent/fzrank/input.txt")).unwrap_err();
        assert!(err.starts_with("failed to read"));
    }
}
