//! Lint: bracket-key text (`[X]`) must always be clickable.
//!
//! Every `[X]`-style hint shown by `src/cliqueur/render.rs` is also a button on
//! touch screens, so it has to go through `ClickableList::push_clickable()`.
//! A plain `cl.push(Line::from(" [M] ..."))` draws the hint but registers no
//! click target, and the button silently does nothing on mobile.

use std::fs;
use std::path::Path;

/// Check if a string contains a bracket-key pattern like `[M]`, `[O]`, `[1]`.
fn contains_bracket_key(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    for i in 0..bytes.len() - 2 {
        if bytes[i] == b'[' && bytes[i + 2] == b']' {
            let ch = bytes[i + 1];
            if ch.is_ascii_alphanumeric() || b"-=!~|\\".contains(&ch) {
                return true;
            }
        }
    }
    false
}

/// Scan source for `push(` calls (non-clickable) containing bracket-key patterns.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();

    for (line_num_0, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("//") {
            continue;
        }
        if !contains_bracket_key(line) {
            continue;
        }

        let has_push = line.contains(".push(");
        let has_clickable = line.contains("push_clickable(");
        if has_push && !has_clickable {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

fn render_sources() -> Vec<(String, String)> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/cliqueur");
    let mut sources = Vec::new();
    visit_render_files(&dir, &mut sources);
    sources
}

fn visit_render_files(dir: &Path, sources: &mut Vec<(String, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_render_files(&path, sources);
        } else if path.file_name().map(|n| n == "render.rs").unwrap_or(false) {
            if let Ok(source) = fs::read_to_string(&path) {
                sources.push((path.display().to_string(), source));
            }
        }
    }
}

#[test]
fn render_files_are_found() {
    assert!(!render_sources().is_empty());
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let mut msg = String::new();
    for (file, source) in render_sources() {
        for (line_num, line) in find_bracket_key_in_push(&source) {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
    }

    if !msg.is_empty() {
        panic!(
            "Found bracket-key text [X] in non-clickable cl.push() calls.\n\
             Use push_clickable() with an action from cliqueur::actions.\n\n{}",
            msg
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [M] Acheter multiplicateur"));"#;
        let violations = find_bracket_key_in_push(source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].0, 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [O] Oui"), CONFIRM_RESTART);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn allows_format_placeholders() {
        let source = r#"lines.push(Line::from(format!("[{}] {}", key, label)));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [R] Recommencer"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[M]"));
        assert!(contains_bracket_key("[a]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[-]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[OK]"));
        assert!(!contains_bracket_key("abc"));
    }
}
