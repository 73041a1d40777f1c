//! Lenient numeric conversion of option arguments.
//!
//! Malformed text converts to zero rather than failing. Only the longest
//! well-formed prefix is read, and trailing garbage is ignored.

/// Integer with base detection: `0x`/`0X` is hexadecimal, a leading `0` is
/// octal, anything else decimal. Out-of-range values saturate.
pub fn parse_integer(text: &str) -> i64 {
    let (negative, digits) = split_sign(text.trim_start());
    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()))
    {
        (16, hex)
    } else if digits.starts_with('0') {
        (8, digits)
    } else {
        (10, digits)
    };
    accumulate(digits, radix, negative)
}

/// Base-10 integer, as used for the numeric verbosity suffix.
pub fn parse_decimal(text: &str) -> i64 {
    let (negative, digits) = split_sign(text.trim_start());
    accumulate(digits, 10, negative)
}

/// Decimal float (`1.5`, `-2e3`, `.5`, `inf`, `nan`).
pub fn parse_float(text: &str) -> f32 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = &text[end..];
    for word in ["infinity", "inf", "nan"] {
        if rest
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
        {
            return text[..end + word.len()].parse::<f32>().unwrap_or(0.0);
        }
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f32>().unwrap_or(0.0)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn accumulate(digits: &str, radix: u32, negative: bool) -> i64 {
    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        let d = i64::from(d);
        value = match value
            .checked_mul(i64::from(radix))
            .and_then(|v| if negative { v.checked_sub(d) } else { v.checked_add(d) })
        {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    value
}
