use std::fmt;

/// Significant digits needed to round-trip any `f64` through decimal text.
const SIGNIFICANT_DIGITS: usize = 17;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Number(f64),
    String(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "null",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "null"),
            Self::Number(n) => write_number(f, *n),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// Renders `n` the way `printf("%.17g")` does.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return write!(f, "nan");
    }
    if n.is_infinite() {
        return write!(f, "{}", if n < 0.0 { "-inf" } else { "inf" });
    }
    if n == 0.0 {
        return write!(f, "{}", if n.is_sign_negative() { "-0" } else { "0" });
    }

    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let Some((mantissa, exp)) = sci
        .split_once('e')
        .and_then(|(m, e)| Some((m, e.parse::<i32>().ok()?)))
    else {
        return write!(f, "{n}");
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let precision = (SIGNIFICANT_DIGITS as i32 - 1 - exp) as usize;
        write!(f, "{}", trim_fraction(&format!("{n:.precision$}")))
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(n: f64) -> String {
        Value::Number(n).to_string()
    }

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(render(3.0), "3");
        assert_eq!(render(-50.0), "-50");
        assert_eq!(render(100.0), "100");
    }

    #[test]
    fn fractions_use_seventeen_digits() {
        assert_eq!(render(0.1), "0.10000000000000001");
        assert_eq!(render(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(render(1.0 / 3.0), "0.33333333333333331");
        assert_eq!(render(2.5), "2.5");
    }

    #[test]
    fn large_and_small_switch_to_exponent() {
        assert_eq!(render(1e20), "1e+20");
        assert_eq!(render(0.00001), "1.0000000000000001e-05");
        assert_eq!(render(0.0001), "0.0001");
    }

    #[test]
    fn non_finite() {
        assert_eq!(render(1.0 / 0.0), "inf");
        assert_eq!(render(-1.0 / 0.0), "-inf");
        assert_eq!(render(f64::NAN), "nan");
    }

    #[test]
    fn names_render_verbatim() {
        let v = Value::from("answer".to_string());
        assert_eq!(v.to_string(), "answer");
        assert_eq!(v.type_name(), "string");
        assert_eq!(v.as_number(), None);
    }
}
