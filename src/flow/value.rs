#[derive(Copy, Clone, PartialEq, Eq)]
enum Enclosing {
    None,
    Parentheses,
    Braces,
}

/// The value assigned to a variable on `line`, scanning from `from` (the last
/// byte of the variable's occurrence). `None` means the occurrence only reads
/// the variable. Constructor-style `(...)` and `{...}` initializers only count
/// on the declaration line.
pub fn assigned_value(line: &str, from: usize, is_declaration: bool) -> Option<String> {
    let bytes = line.as_bytes();
    let value = |start: usize, end: usize| line.get(start..end).unwrap_or("").to_owned();
    let mut is_initializing = false;
    let mut enclosing = Enclosing::None;
    let mut depth = 0isize;
    let mut value_start = 0;
    for index in from..bytes.len() {
        let byte = bytes[index];
        if byte.is_ascii_whitespace() {
            continue;
        }
        if !is_initializing {
            match byte {
                b'=' if bytes.get(index + 1) == Some(&b'=') => return None,
                b'=' => {}
                b'(' if is_declaration => {
                    enclosing = Enclosing::Parentheses;
                    depth = 1;
                }
                b'{' if is_declaration => {
                    enclosing = Enclosing::Braces;
                    depth = 1;
                }
                _ => return None,
            }
            is_initializing = true;
            value_start = index + 1;
            continue;
        }
        match (byte, enclosing) {
            (b'{', Enclosing::None | Enclosing::Braces) => {
                if depth == 0 {
                    value_start = index + 1;
                    enclosing = Enclosing::Braces;
                }
                depth += 1;
            }
            (b'}', Enclosing::None | Enclosing::Braces) => {
                depth -= 1;
                if depth == 0 {
                    return Some(value(value_start, index));
                }
            }
            (b'(', Enclosing::None | Enclosing::Parentheses) => {
                if depth == 0 {
                    value_start = index + 1;
                    enclosing = Enclosing::Parentheses;
                }
                depth += 1;
            }
            (b')', Enclosing::None | Enclosing::Parentheses) => {
                depth -= 1;
                if depth == 0 {
                    return Some(value(value_start, index));
                }
            }
            (_, Enclosing::None) => {
                return Some(value(value_start, line.find(';').unwrap_or(line.len())));
            }
            _ => {}
        }
    }
    None
}

/// Empty and `NULL` values are invalid, and so is `0` for a pointer.
pub fn is_valid_value(value: &str, is_pointer: bool) -> bool {
    match value.trim() {
        "" | "NULL" => false,
        "0" => !is_pointer,
        _ => true,
    }
}
