//! Scalar value model shared by the type cast library and the binder

use std::fmt;
use std::time::Duration;

/// Target type of a scalar conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    /// Complex number made of two `f32` parts
    Complex64,
    /// Complex number made of two `f64` parts
    Complex128,
    String,
    /// Human readable duration such as `1h 30m`
    Duration,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Isize => "isize",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::Usize => "usize",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Complex64 => "complex64",
            PrimitiveKind::Complex128 => "complex128",
            PrimitiveKind::String => "string",
            PrimitiveKind::Duration => "duration",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complex number with real and imaginary parts of type `F`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<F> {
    pub re: F,
    pub im: F,
}

impl<F> Complex<F> {
    pub fn new(re: F, im: F) -> Self {
        Self { re, im }
    }
}

/// 64-bit complex number (two `f32` parts)
pub type Complex64 = Complex<f32>;

/// 128-bit complex number (two `f64` parts)
pub type Complex128 = Complex<f64>;

/// A typed scalar produced by casting a string
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Complex64(Complex64),
    Complex128(Complex128),
    String(String),
    Duration(Duration),
}

impl Value {
    /// The kind this value was cast to
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::I8(_) => PrimitiveKind::I8,
            Value::I16(_) => PrimitiveKind::I16,
            Value::I32(_) => PrimitiveKind::I32,
            Value::I64(_) => PrimitiveKind::I64,
            Value::Isize(_) => PrimitiveKind::Isize,
            Value::U8(_) => PrimitiveKind::U8,
            Value::U16(_) => PrimitiveKind::U16,
            Value::U32(_) => PrimitiveKind::U32,
            Value::U64(_) => PrimitiveKind::U64,
            Value::Usize(_) => PrimitiveKind::Usize,
            Value::F32(_) => PrimitiveKind::F32,
            Value::F64(_) => PrimitiveKind::F64,
            Value::Complex64(_) => PrimitiveKind::Complex64,
            Value::Complex128(_) => PrimitiveKind::Complex128,
            Value::String(_) => PrimitiveKind::String,
            Value::Duration(_) => PrimitiveKind::Duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_reports_its_kind() {
        assert_eq!(Value::U16(8080).kind(), PrimitiveKind::U16);
        assert_eq!(Value::String("x".into()).kind(), PrimitiveKind::String);
        assert_eq!(
            Value::Complex128(Complex::new(1.0, 2.0)).kind(),
            PrimitiveKind::Complex128
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PrimitiveKind::Complex64.to_string(), "complex64");
        assert_eq!(PrimitiveKind::Usize.to_string(), "usize");
    }
}
