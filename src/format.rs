/// Integer parse the way a browser reads a slider value: optional sign, then
/// the leading digits. Trailing junk is dropped, no digits is `None`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

pub fn parse_or(raw: Option<String>, default: i64) -> i64 {
    raw.as_deref().and_then(parse_int).unwrap_or(default)
}

pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn currency(value: i64) -> String {
    format!("${}", thousands(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_signed_integers() {
        assert_eq!(parse_int("50"), Some(50));
        assert_eq!(parse_int("  7"), Some(7));
        assert_eq!(parse_int("-12"), Some(-12));
        assert_eq!(parse_int("+3"), Some(3));
    }

    #[test]
    fn stops_at_first_non_digit() {
        assert_eq!(parse_int("12.7"), Some(12));
        assert_eq!(parse_int("1e3"), Some(1));
        assert_eq!(parse_int("30%"), Some(30));
    }

    #[test]
    fn rejects_values_without_digits() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999999"), None);
    }

    #[test]
    fn falls_back_when_missing_or_unparsable() {
        assert_eq!(parse_or(None, 50), 50);
        assert_eq!(parse_or(Some(String::new()), 20), 20);
        assert_eq!(parse_or(Some("n/a".into()), 25), 25);
        assert_eq!(parse_or(Some("40".into()), 25), 40);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(52_000), "52,000");
        assert_eq!(thousands(2_400_000), "2,400,000");
        assert_eq!(thousands(-1234), "-1,234");
    }

    #[test]
    fn currency_has_leading_dollar() {
        assert_eq!(currency(200_000), "$200,000");
        assert_eq!(currency(312_000), "$312,000");
        assert_eq!(currency(-1234), "$-1,234");
    }
}
