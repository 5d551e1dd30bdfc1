//! Track location normalization and prefix rewriting

/// Substitution of a leading location prefix
///
/// Both prefixes are stored with forward-slash separators. Matching is
/// literal and case sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRewrite {
    original: String,
    replacement: String,
}

impl PrefixRewrite {
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        let original: String = original.into();
        let replacement: String = replacement.into();
        Self {
            original: normalize_location(&original, None),
            replacement: normalize_separators(&replacement),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Apply to an already normalized location
    fn apply(&self, location: &str) -> Option<String> {
        location
            .strip_prefix(self.original.as_str())
            .map(|rest| format!("{}{}", self.replacement, rest))
    }
}

/// Turn a recorded track location into a plain forward-slash path
///
/// Strips a `file://` scheme (and the `localhost` host iTunes writes),
/// percent-decodes URIs, converts `\` to `/`, then applies `rewrite`
/// when the location starts with its original prefix. Never fails: an
/// undecodable or non-matching location comes back normalized but
/// otherwise untouched.
pub fn normalize_location(location: &str, rewrite: Option<&PrefixRewrite>) -> String {
    let path = match strip_file_scheme(location) {
        Some(rest) => {
            let decoded = urlencoding::decode(rest)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| rest.to_string());
            strip_drive_slash(&decoded).to_string()
        }
        None => location.to_string(),
    };

    let path = normalize_separators(&path);

    match rewrite.and_then(|r| r.apply(&path)) {
        Some(rewritten) => rewritten,
        None => path,
    }
}

fn strip_file_scheme(location: &str) -> Option<&str> {
    let rest = location.strip_prefix("file://")?;
    Some(rest.strip_prefix("localhost").unwrap_or(rest))
}

/// `/C:/Music` -> `C:/Music`
fn strip_drive_slash(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        &path[1..]
    } else {
        path
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Make a playlist name usable as a file or directory name
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match sanitized.trim() {
        "" | "." | ".." => "_".to_string(),
        _ => sanitized,
    }
}
