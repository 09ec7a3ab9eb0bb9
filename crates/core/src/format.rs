use crate::render::Culture;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(x) => x,
        }
    }
}

/// Applies a numeric format string. Unsupported formats fall back to the
/// default rendering.
pub(crate) fn format_number(n: Number, format: Option<&str>, culture: &Culture) -> String {
    match format {
        Some(f) => standard(n, f, culture)
            .or_else(|| custom(n, f, culture))
            .unwrap_or_else(|| default(n, culture)),
        None => default(n, culture),
    }
}

fn default(n: Number, culture: &Culture) -> String {
    match n {
        Number::Int(i) => i.to_string(),
        Number::Float(x) if x.is_finite() => localize(&x.to_string(), culture),
        Number::Float(x) => x.to_string(),
    }
}

fn standard(n: Number, format: &str, culture: &Culture) -> Option<String> {
    let mut chars = format.chars();
    let kind = chars.next()?;
    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else if digits.len() <= 2 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse::<usize>().ok()
    } else {
        return None;
    };

    if let Number::Float(x) = n {
        if !x.is_finite() {
            return Some(x.to_string());
        }
    }

    match (kind, n) {
        ('D' | 'd', Number::Int(i)) => {
            let width = precision.unwrap_or(0);
            let sign = if i < 0 { "-" } else { "" };
            Some(format!("{sign}{:0width$}", i.unsigned_abs()))
        }
        ('X' | 'x', Number::Int(i)) => {
            let width = precision.unwrap_or(0);
            // Negative values render as their 64-bit two's complement.
            let bits = if i < 0 { i as i64 as u64 as u128 } else { i as u128 };
            Some(if kind == 'X' {
                format!("{bits:0width$X}")
            } else {
                format!("{bits:0width$x}")
            })
        }
        ('F' | 'f', _) => Some(fixed(n.as_f64(), precision.unwrap_or(2), false, culture)),
        ('N' | 'n', _) => Some(fixed(n.as_f64(), precision.unwrap_or(2), true, culture)),
        ('P' | 'p', _) => Some(format!(
            "{} %",
            fixed(n.as_f64() * 100.0, precision.unwrap_or(2), true, culture)
        )),
        ('E' | 'e', _) => Some(scientific(
            n.as_f64(),
            precision.unwrap_or(6),
            kind == 'E',
            culture,
        )),
        ('G' | 'g', _) => Some(default(n, culture)),
        _ => None,
    }
}

fn fixed(x: f64, decimals: usize, grouped: bool, culture: &Culture) -> String {
    let text = round_half_away(x.abs(), decimals);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    assemble(is_negative(x, &text), int_part, frac_part, grouped, culture)
}

fn scientific(x: f64, decimals: usize, upper: bool, culture: &Culture) -> String {
    let text = format!("{:.decimals$e}", x);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!(
        "{}{marker}{sign}{:03}",
        localize(mantissa, culture),
        exponent.unsigned_abs()
    )
}

// Custom patterns built from `0`, `#`, `,` and `.`, e.g. `000`, `#,##0.00`, `0.##`.
fn custom(n: Number, format: &str, culture: &Culture) -> Option<String> {
    if !format.chars().all(|c| matches!(c, '0' | '#' | ',' | '.'))
        || !format.contains(['0', '#'])
        || format.matches('.').count() > 1
    {
        return None;
    }

    let (int_pattern, frac_pattern) = format.split_once('.').unwrap_or((format, ""));
    let min_int = int_pattern.matches('0').count();
    let grouped = int_pattern.trim_end_matches(',').contains(',');
    let max_frac = frac_pattern.matches(['0', '#']).count();
    let min_frac = frac_pattern.trim_end_matches('#').matches('0').count();

    let x = n.as_f64();
    let text = round_half_away(x.abs(), max_frac);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let int_digits = int_part.trim_start_matches('0');
    let int_digits = if int_digits.len() < min_int {
        format!("{int_digits:0>min_int$}")
    } else {
        int_digits.to_string()
    };

    Some(assemble(
        is_negative(x, &text),
        &int_digits,
        &frac,
        grouped,
        culture,
    ))
}

// `{:.N}` breaks exact ties toward even; midpoints round up here instead.
fn round_half_away(v: f64, decimals: usize) -> String {
    let text = format!("{v:.decimals$}");
    // 1100 places hold the full expansion of any finite f64.
    let exact = format!("{v:.1100}");
    let Some((int_part, frac)) = exact.split_once('.') else {
        return text;
    };
    let Some(tail) = frac.get(decimals..) else {
        return text;
    };
    let tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !tie {
        return text;
    }
    let truncated = if decimals == 0 {
        int_part.to_string()
    } else {
        format!("{int_part}.{}", &frac[..decimals])
    };
    increment_last_digit(&truncated)
}

fn increment_last_digit(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

fn assemble(
    negative: bool,
    int_part: &str,
    frac_part: &str,
    grouped: bool,
    culture: &Culture,
) -> String {
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if grouped {
        out.push_str(&group(int_part, culture.group_separator));
    } else {
        out.push_str(int_part);
    }
    if !frac_part.is_empty() {
        out.push(culture.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

// Negative zero after rounding renders without a sign.
fn is_negative(x: f64, rendered_abs: &str) -> bool {
    x < 0.0 && rendered_abs.chars().any(|c| matches!(c, '1'..='9'))
}

fn group(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

fn localize(text: &str, culture: &Culture) -> String {
    if culture.decimal_separator == '.' {
        text.to_string()
    } else {
        text.replace('.', &culture.decimal_separator.to_string())
    }
}
