use regex::Regex;

/// One `allowed_origins` entry, compiled when the policy is built
///
/// Entries without glob metacharacters compare literally; the others are
/// `fnmatch`-style globs without flags, so `*` and `?` also match `/`.
#[derive(Debug, Clone)]
pub struct OriginPattern {
    pattern: String,
    matcher: Option<Regex>,
}

impl OriginPattern {
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let matcher = if pattern.contains(['*', '?', '[', '\\']) {
            glob_to_regex(&pattern)
        } else {
            None
        };
        Self { pattern, matcher }
    }

    /// The pattern as configured
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.matcher {
            Some(re) => re.is_match(candidate),
            None => self.pattern == candidate,
        }
    }
}

impl PartialEq for OriginPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for OriginPattern {}

/// Translate a shell glob into an anchored regex
///
/// `None` when the pattern has an unterminated bracket class or the result does
/// not compile; the pattern then compares literally.
fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&regex::escape(&escaped.to_string())),
                None => out.push_str(r"\\"),
            },
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    out.push('^');
                }
                // a leading ']' is literal
                if chars.peek() == Some(&']') {
                    chars.next();
                    out.push_str(r"\]");
                }
                let mut closed = false;
                for class_char in chars.by_ref() {
                    match class_char {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '\\' | '[' | '&' | '~' => {
                            out.push('\\');
                            out.push(class_char);
                        }
                        other => out.push(other),
                    }
                }
                if !closed {
                    return None;
                }
                out.push(']');
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    Regex::new(&out).ok()
}
