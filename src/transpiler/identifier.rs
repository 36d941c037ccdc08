//! Identifier policy: quoting, alias splitting and name shortening.
//!
//! Everything here is pure. A generated constraint name must be derivable
//! again, byte for byte, by a later `drop constraint` compiled on its own.

/// Quote an identifier Oracle style: upper-cased, wrapped in double quotes,
/// embedded quotes doubled.
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.to_uppercase().replace('"', "\"\""))
}

/// Inverse of [`quote`] (without the case fold).
pub fn unquote(identifier: &str) -> String {
    let trimmed = identifier.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => trimmed.to_string(),
    }
}

/// Split `name as alias` (any case) into its parts.
pub fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    let at = lower.find(" as ")?;
    let base = value[..at].trim();
    let alias = value[at + 4..].trim();
    if base.is_empty() || alias.is_empty() {
        return None;
    }
    Some((base, alias))
}

/// Generated object name: `{prefix}{table}_{columns}_{suffix}`, lower-cased,
/// with `-` and `.` folded to `_`, shortened to `max_length`.
pub fn object_name(prefix: &str, table: &str, columns: &[String], suffix: &str, max_length: usize) -> String {
    let mut name = format!("{}{}", prefix, table);
    for column in columns {
        name.push('_');
        name.push_str(column);
    }
    name.push('_');
    name.push_str(suffix);
    let name = name.to_lowercase().replace(['-', '.'], "_");
    truncate(&name, max_length)
}

/// Shorten `name` to at most `max_length` bytes.
///
/// Each round takes one character off every `_` segment longer than two
/// characters. When no segment can shrink further the name is cut hard.
/// Collisions are not detected.
pub fn truncate(name: &str, max_length: usize) -> String {
    let mut current = name.to_string();
    while current.len() > max_length {
        let mut shrunk = false;
        let parts: Vec<String> = current
            .split('_')
            .map(|part| {
                let count = part.chars().count();
                if count > 2 {
                    shrunk = true;
                    part.chars().take(count - 1).collect()
                } else {
                    part.to_string()
                }
            })
            .collect();
        current = parts.join("_");
        if !shrunk {
            break;
        }
    }
    if current.len() > max_length {
        let mut end = max_length;
        while !current.is_char_boundary(end) {
            end -= 1;
        }
        current.truncate(end);
    }
    current
}
