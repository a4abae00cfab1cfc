/// Count the SQL parameter placeholders in `sql`.
///
/// Recognizes `?` / `?N`, `$N`, `:name`, and `@name` markers, skipping
/// anything inside single/double-quoted literals, `--` line comments,
/// nested `/* */` block comments, and dollar-quoted blocks. Postgres
/// `::type` casts are not counted. Counting is by occurrence: a marker
/// appearing twice consumes two positions.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    } else if let Some(digits_end) = scan_digits(bytes, idx + 1) {
                        count += 1;
                        idx = digits_end - 1;
                    }
                }
                b'?' => {
                    count += 1;
                    if let Some(digits_end) = scan_digits(bytes, idx + 1) {
                        idx = digits_end - 1;
                    }
                }
                b':' => {
                    if bytes.get(idx + 1) == Some(&b':') {
                        // type cast, skip both colons
                        idx += 1;
                    } else if let Some(name_end) = scan_name(bytes, idx + 1) {
                        count += 1;
                        idx = name_end - 1;
                    }
                }
                b'@' => {
                    if bytes.get(idx + 1) == Some(&b'@') {
                        // server variable, not a parameter
                        idx += 1;
                    } else if let Some(name_end) = scan_name(bytes, idx + 1) {
                        count += 1;
                        idx = name_end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len();
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    count
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start { None } else { Some(idx) }
}

fn scan_name(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
        idx += 1;
    }
    if idx == start { None } else { Some(idx) }
}

fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphabetic() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'$' {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..=end].starts_with(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_named_placeholders() {
        assert_eq!(count_placeholders("INSERT INTO t VALUES(:x, :y)"), 2);
    }

    #[test]
    fn counts_anonymous_and_numbered() {
        assert_eq!(count_placeholders("select ? where a = ?2 and b = $1"), 3);
    }

    #[test]
    fn skips_literals_and_comments() {
        let sql = "select ':x', $1 -- :y\n/* ?3 */ from t where a = :a";
        assert_eq!(count_placeholders(sql), 2);
    }

    #[test]
    fn skips_casts_and_dollar_quotes() {
        assert_eq!(count_placeholders("select a::int from t where b = :b"), 1);
        assert_eq!(count_placeholders("$fn$ select :x $fn$ where a = ?"), 1);
        // markers right after a closing tag are back in normal counting
        assert_eq!(count_placeholders("$tag$ :skip $tag$ || :kept"), 1);
    }

    #[test]
    fn zero_for_plain_sql() {
        assert_eq!(count_placeholders("CREATE TABLE t (data INTEGER)"), 0);
    }
}
