/// Runtime element type tag of a tensor.
///
/// The discriminant is stable and doubles as the dtype code exposed across the
/// C ABI.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::FromRepr,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TensorType {
    Bool,
    #[strum(serialize = "uint8")]
    #[serde(rename = "uint8")]
    UInt8,
    Int8,
    Int16,
    Int32,
    Int64,
    #[strum(serialize = "uint16")]
    #[serde(rename = "uint16")]
    UInt16,
    #[strum(serialize = "uint32")]
    #[serde(rename = "uint32")]
    UInt32,
    #[strum(serialize = "uint64")]
    #[serde(rename = "uint64")]
    UInt64,
    Float16,
    #[strum(serialize = "bfloat16")]
    #[serde(rename = "bfloat16")]
    BFloat16,
    Float32,
    Float64,
    Complex32,
    Complex64,
    Complex128,
    #[strum(serialize = "qint8")]
    #[serde(rename = "qint8")]
    QInt8,
    #[strum(serialize = "quint8")]
    #[serde(rename = "quint8")]
    QUInt8,
    #[strum(serialize = "qint32")]
    #[serde(rename = "qint32")]
    QInt32,
    #[strum(serialize = "float8_e5m2")]
    #[serde(rename = "float8_e5m2")]
    Float8E5M2,
    #[strum(serialize = "float8_e4m3fn")]
    #[serde(rename = "float8_e4m3fn")]
    Float8E4M3Fn,
}

impl TensorType {
    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        use TensorType::*;

        match self {
            Bool | UInt8 | Int8 | QInt8 | QUInt8 | Float8E5M2 | Float8E4M3Fn => 1,
            Int16 | UInt16 | Float16 | BFloat16 => 2,
            Int32 | UInt32 | Float32 | Complex32 | QInt32 => 4,
            Int64 | UInt64 | Float64 | Complex64 => 8,
            Complex128 => 16,
        }
    }

    pub fn is_floating_point(&self) -> bool {
        use TensorType::*;
        matches!(
            self,
            Float16 | BFloat16 | Float32 | Float64 | Float8E5M2 | Float8E4M3Fn
        )
    }

    pub fn is_complex(&self) -> bool {
        use TensorType::*;
        matches!(self, Complex32 | Complex64 | Complex128)
    }

    pub fn is_integral(&self, include_bool: bool) -> bool {
        use TensorType::*;
        match self {
            Bool => include_bool,
            UInt8 | Int8 | Int16 | Int32 | Int64 | UInt16 | UInt32 | UInt64 => true,
            _ => false,
        }
    }

    pub fn is_quantized(&self) -> bool {
        use TensorType::*;
        matches!(self, QInt8 | QUInt8 | QInt32)
    }

    /// Whether a single element of this type can be read into a [`Scalar`](crate::Scalar).
    ///
    /// Half-precision complex, quantized and float8 tensors can be stored but
    /// have no scalar representation.
    pub fn is_scalar_supported(&self) -> bool {
        use TensorType::*;
        self.is_integral(true)
            || matches!(
                self,
                Float16 | BFloat16 | Float32 | Float64 | Complex64 | Complex128
            )
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> crate::Result<Self> {
        Self::from_repr(code).ok_or_else(|| crate::Error::Parse(format!("dtype code {}", code)))
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::TensorType;

    #[test]
    fn test_parse_display() {
        for dtype in TensorType::iter() {
            let parsed = TensorType::from_str(&dtype.to_string()).unwrap();
            assert_eq!(dtype, parsed);
        }
        assert_eq!(TensorType::BFloat16.to_string(), "bfloat16");
        assert_eq!(TensorType::Float8E4M3Fn.to_string(), "float8_e4m3fn");
    }

    #[test]
    fn test_codes() {
        assert_eq!(TensorType::Bool.code(), 0);
        assert_eq!(TensorType::from_code(11).unwrap(), TensorType::Float32);
        assert!(TensorType::from_code(200).is_err());
    }

    #[test]
    fn test_supported() {
        let unsupported = TensorType::iter()
            .filter(|t| !t.is_scalar_supported())
            .collect::<Vec<_>>();
        assert_eq!(
            unsupported,
            vec![
                TensorType::Complex32,
                TensorType::QInt8,
                TensorType::QUInt8,
                TensorType::QInt32,
                TensorType::Float8E5M2,
                TensorType::Float8E4M3Fn,
            ]
        );
        assert_eq!(TensorType::Complex128.element_size(), 16);
    }
}
