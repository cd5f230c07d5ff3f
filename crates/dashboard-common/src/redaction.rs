const REDACTED: &str = "[REDACTED]";
const BEARER_PREFIX: &str = "bearer ";

// Matched case-insensitively. `key=` also covers `api_key=` and `apikey=`.
const SENSITIVE_PREFIXES: [&str; 10] = [
    "key=",
    "key:",
    "token=",
    "token:",
    "secret=",
    "secret:",
    "password=",
    "password:",
    "authorization=",
    "authorization:",
];

/// Masks the value following any credential-looking prefix, plus bearer tokens.
pub fn redact_sensitive(input: &str) -> String {
    let masked = SENSITIVE_PREFIXES
        .iter()
        .fold(input.to_string(), |acc, prefix| mask_after(&acc, prefix));
    mask_after(&masked, BEARER_PREFIX)
}

/// Replaces every literal occurrence of a known secret. No pattern matching.
pub fn mask_secret(input: &str, secret: Option<&str>) -> String {
    match secret.map(str::trim).filter(|value| !value.is_empty()) {
        Some(secret) => input.replace(secret, REDACTED),
        None => input.to_string(),
    }
}

fn mask_after(input: &str, prefix: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `input`.
    let lower = input.to_ascii_lowercase();
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find(prefix) {
        let mut value_start = skip_whitespace(input, cursor + found + prefix.len());
        if prefix != BEARER_PREFIX && lower[value_start..].starts_with(BEARER_PREFIX) {
            value_start += BEARER_PREFIX.len();
        }
        if input[value_start..].starts_with(REDACTED) {
            let masked_end = value_start + REDACTED.len();
            output.push_str(&input[cursor..masked_end]);
            cursor = masked_end;
            continue;
        }
        let value_end = find_value_end(input, value_start);

        output.push_str(&input[cursor..value_start]);
        if value_start < value_end {
            output.push_str(REDACTED);
        }
        cursor = value_end;
    }

    output.push_str(&input[cursor..]);
    output
}

fn skip_whitespace(input: &str, mut index: usize) -> usize {
    let bytes = input.as_bytes();
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    index
}

fn find_value_end(input: &str, mut index: usize) -> usize {
    let bytes = input.as_bytes();
    while index < bytes.len() {
        let byte = bytes[index];
        if byte.is_ascii_whitespace()
            || matches!(byte, b'&' | b',' | b';' | b')' | b']' | b'}' | b'"' | b'\'')
        {
            break;
        }
        index += 1;
    }
    index
}
