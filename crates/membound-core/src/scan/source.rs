//! Source file checks and C lexical masking.

use std::path::Path;

use super::ScanError;

pub const VALID_EXTENSIONS: &[&str] = &["c", "cpp"];

/// Accepts existing regular files ending in `.c` or `.cpp`.
pub fn validate_input_file(path: &Path) -> Result<(), ScanError> {
    if !path.is_file() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !VALID_EXTENSIONS.contains(&ext) {
        return Err(ScanError::InvalidExtension {
            path: path.to_path_buf(),
            extension: if ext.is_empty() {
                String::new()
            } else {
                format!(".{ext}")
            },
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
}

/// Replaces comments with spaces, and with `blank_literals` also the
/// contents of string and character literals. Newlines are always kept, so
/// line and column numbers of the result match the input.
pub fn mask_source(src: &str, blank_literals: bool) -> String {
    let mut out = String::with_capacity(src.len());
    let mut state = State::Code;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '"' => {
                    out.push(c);
                    state = State::Str;
                }
                '\'' => {
                    out.push(c);
                    state = State::Char;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Str | State::Char => {
                let close = if state == State::Str { '"' } else { '\'' };
                if c == '\\' {
                    let escaped = chars.next();
                    push_literal(&mut out, c, blank_literals);
                    if let Some(e) = escaped {
                        push_literal(&mut out, e, blank_literals);
                    }
                } else if c == close {
                    out.push(c);
                    state = State::Code;
                } else if c == '\n' {
                    // Unterminated literal; resynchronise on the next line.
                    out.push('\n');
                    state = State::Code;
                } else {
                    push_literal(&mut out, c, blank_literals);
                }
            }
        }
    }
    out
}

fn push_literal(out: &mut String, c: char, blank: bool) {
    if c == '\n' {
        out.push('\n');
    } else if blank {
        out.push(' ');
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn comments_are_blanked_and_lines_kept() {
        let src = "gets(buf); // gets() again\n/* strcpy(a, b);\n */ x = 1;";
        let masked = mask_source(src, false);
        assert_eq!(masked.lines().count(), 3);
        assert_eq!(masked.matches("gets").count(), 1);
        assert!(!masked.contains("strcpy"));
        assert!(masked.ends_with("x = 1;"));
    }

    #[test]
    fn literals_survive_unless_blanked() {
        let src = r#"printf("ptr \"freed\"", *ptr);"#;
        assert_eq!(mask_source(src, false), src);
        let blanked = mask_source(src, true);
        assert_eq!(blanked.matches("ptr").count(), 1);
        assert_eq!(blanked.len(), src.len());
    }

    #[test]
    fn comment_marker_inside_string_is_not_a_comment() {
        let src = "puts(\"http://x\"); gets(b);";
        assert!(mask_source(src, false).contains("gets(b)"));
    }

    #[test]
    fn char_literal_quote() {
        let src = "c = '\"'; gets(b);";
        assert!(mask_source(src, true).contains("gets(b)"));
    }

    #[test]
    fn validate_checks_existence_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let c_file = dir.path().join("a.c");
        let py_file = dir.path().join("a.py");
        fs::write(&c_file, "int main(){}").unwrap();
        fs::write(&py_file, "pass").unwrap();

        assert!(validate_input_file(&c_file).is_ok());
        assert!(matches!(
            validate_input_file(&py_file),
            Err(ScanError::InvalidExtension { ref extension, .. }) if extension == ".py"
        ));
        assert!(matches!(
            validate_input_file(&dir.path().join("missing.c")),
            Err(ScanError::NotFound(_))
        ));
        assert!(matches!(
            validate_input_file(dir.path()),
            Err(ScanError::NotFound(_))
        ));
    }
}
