//! String to scalar conversions

use std::num::ParseFloatError;
use std::str::FromStr;
use types::{CastError, CastFailure, Complex, PrimitiveKind, Value};

/// Cast `text` to a scalar of the given kind.
///
/// Numbers use base-10 parsing with the target width's range checked; no
/// coercion happens across kinds (`"1.5"` is not an integer).
pub fn cast_scalar(text: &str, kind: PrimitiveKind) -> Result<Value, CastError> {
    let fail = |source: CastFailure| CastError::new(text, kind, source);

    let value = match kind {
        PrimitiveKind::String => Value::String(text.to_string()),
        PrimitiveKind::Bool => Value::Bool(parse_bool(text).ok_or_else(|| fail(CastFailure::InvalidBool))?),
        PrimitiveKind::I8 => Value::I8(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::I16 => Value::I16(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::I32 => Value::I32(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::I64 => Value::I64(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::Isize => Value::Isize(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::U8 => Value::U8(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::U16 => Value::U16(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::U32 => Value::U32(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::U64 => Value::U64(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::Usize => Value::Usize(text.parse().map_err(|e| fail(CastFailure::Int(e)))?),
        PrimitiveKind::F32 => Value::F32(text.parse().map_err(|e| fail(CastFailure::Float(e)))?),
        PrimitiveKind::F64 => Value::F64(text.parse().map_err(|e| fail(CastFailure::Float(e)))?),
        PrimitiveKind::Complex64 => Value::Complex64(parse_complex(text).map_err(fail)?),
        PrimitiveKind::Complex128 => Value::Complex128(parse_complex(text).map_err(fail)?),
        PrimitiveKind::Duration => Value::Duration(
            humantime::parse_duration(text).map_err(|e| fail(CastFailure::Duration(e)))?,
        ),
    };
    Ok(value)
}

/// Split `text` on `delimiter`, trim each part and cast it.
///
/// The first failing element aborts the whole list. Blank text yields an
/// empty list; an empty delimiter keeps the text as a single element.
pub fn cast_list(text: &str, kind: PrimitiveKind, delimiter: &str) -> Result<Vec<Value>, CastError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    if delimiter.is_empty() {
        return Ok(vec![cast_scalar(text.trim(), kind)?]);
    }
    text.split(delimiter)
        .map(|part| cast_scalar(part.trim(), kind))
        .collect()
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Accepts `re`, `imi`, `re+imi` and `re-imi`, optionally in parentheses
fn parse_complex<F>(text: &str) -> Result<Complex<F>, CastFailure>
where
    F: FromStr<Err = ParseFloatError> + Default,
{
    let mut s = text.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        s = inner.trim();
    }
    if s.is_empty() {
        return Err(CastFailure::InvalidComplex);
    }

    let Some(body) = s.strip_suffix('i') else {
        return Ok(Complex::new(s.parse()?, F::default()));
    };

    // the sign separating both parts, skipping exponent signs like 1e+3
    let split = body
        .char_indices()
        .rev()
        .find(|&(i, c)| {
            (c == '+' || c == '-') && i > 0 && !matches!(body[..i].chars().last(), Some('e' | 'E'))
        })
        .map(|(i, _)| i);

    let (re, im) = match split {
        Some(i) => (&body[..i], &body[i..]),
        None => ("", body),
    };
    let re = if re.is_empty() { F::default() } else { re.parse()? };
    let im = match im {
        "" | "+" => "1".parse()?,
        "-" => "-1".parse()?,
        other => other.parse()?,
    };
    Ok(Complex::new(re, im))
}
