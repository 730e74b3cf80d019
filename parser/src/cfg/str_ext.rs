pub trait TrimValueQuotes {
    /// Strip one pair of surrounding double quotes, if present.
    fn trim_value_quotes(&self) -> Option<&str>;
}

impl TrimValueQuotes for str {
    fn trim_value_quotes(&self) -> Option<&str> {
        if self.len() < 2 {
            return None;
        }
        self.strip_prefix('"')?.strip_suffix('"')
    }
}

/// Expand the escapes a configuration value may contain into the bytes to inject.
///
/// `\\ \e \n \r \t \b \s \" \xNN` are recognized anywhere. A value that is exactly `^X` is the
/// control character for `X`.
pub fn unescape(s: &str) -> Result<Vec<u8>, String> {
    if let Some(c) = s.strip_prefix('^').filter(|rest| rest.len() == 1) {
        return control_char(c.as_bytes()[0])
            .map(|b| vec![b])
            .ok_or_else(|| format!("`^{c}` is not a control character"));
    }
    let mut out = Vec::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let b = match chars.next() {
            Some('\\') => b'\\',
            Some('e') | Some('E') => 0x1b,
            Some('n') => b'\n',
            Some('r') => b'\r',
            Some('t') => b'\t',
            Some('b') => 0x08,
            Some('s') => b' ',
            Some('"') => b'"',
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                if digits.len() != 2 {
                    return Err("`\\x` needs two hex digits".into());
                }
                u8::from_str_radix(&digits, 16)
                    .map_err(|_| format!("`\\x{digits}` is not a hex byte"))?
            }
            Some(other) => return Err(format!("unknown escape `\\{other}`")),
            None => return Err("value ends with a lone `\\`".into()),
        };
        out.push(b);
    }
    Ok(out)
}

fn control_char(c: u8) -> Option<u8> {
    match c {
        b'?' => Some(0x7f),
        b'@'..=b'_' => Some(c - b'@'),
        b'a'..=b'z' => Some(c - b'a' + 1),
        _ => None,
    }
}
