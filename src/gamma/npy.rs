//! Minimal reader for NumPy `.npy` arrays of numbers

use super::GammaError;

const MAGIC: &[u8] = b"\x93NUMPY";

/// Decoded array: shape plus values in C order
pub(super) struct NpyArray {
    pub(super) shape: Vec<usize>,
    pub(super) values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Signed,
    Unsigned,
    Float,
}

#[derive(Debug, Clone, Copy)]
struct Dtype {
    order: ByteOrder,
    kind: Kind,
    size: usize,
}

pub(super) fn is_npy(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

pub(super) fn parse(bytes: &[u8]) -> Result<NpyArray, GammaError> {
    let rest = bytes.strip_prefix(MAGIC).ok_or(GammaError::BadMagic)?;
    let [major, minor, rest @ ..] = rest else {
        return Err(GammaError::Truncated);
    };

    let (header_len, rest) = match major {
        1 => {
            let [lo, hi, rest @ ..] = rest else {
                return Err(GammaError::Truncated);
            };
            (usize::from(u16::from_le_bytes([*lo, *hi])), rest)
        }
        2 | 3 => {
            let [a, b, c, d, rest @ ..] = rest else {
                return Err(GammaError::Truncated);
            };
            let len = u32::from_le_bytes([*a, *b, *c, *d]);
            (usize::try_from(len).map_err(|_| GammaError::Truncated)?, rest)
        }
        _ => return Err(GammaError::UnsupportedVersion(*major, *minor)),
    };

    if rest.len() < header_len {
        return Err(GammaError::Truncated);
    }
    let (header, data) = rest.split_at(header_len);
    let header = core::str::from_utf8(header).map_err(|_| GammaError::Header("not utf-8"))?;

    let descr = quoted(dict_value(header, "descr").ok_or(GammaError::Header("missing descr"))?)
        .ok_or(GammaError::Header("descr is not a string"))?;
    let dtype = parse_dtype(descr)?;

    let fortran = dict_value(header, "fortran_order")
        .ok_or(GammaError::Header("missing fortran_order"))?;
    let shape = dict_value(header, "shape").ok_or(GammaError::Header("missing shape"))?;
    let shape = parse_shape(shape)?;
    if fortran.starts_with("True") && shape.len() > 1 {
        return Err(GammaError::FortranOrder);
    }

    let count: usize = shape.iter().product();
    let needed = count.checked_mul(dtype.size).ok_or(GammaError::Truncated)?;
    if data.len() < needed {
        return Err(GammaError::Truncated);
    }

    let values = data[..needed]
        .chunks_exact(dtype.size)
        .map(|chunk| read_value(chunk, dtype))
        .collect();

    Ok(NpyArray { shape, values })
}

/// Returns the text following `'key':` in a header dict
fn dict_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let needle_single = format!("'{key}':");
    let needle_double = format!("\"{key}\":");
    let (start, needle_len) = header
        .find(&needle_single)
        .map(|i| (i, needle_single.len()))
        .or_else(|| header.find(&needle_double).map(|i| (i, needle_double.len())))?;
    Some(header[start + needle_len..].trim_start())
}

fn quoted(value: &str) -> Option<&str> {
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = &value[1..];
    inner.find(quote).map(|end| &inner[..end])
}

fn parse_shape(value: &str) -> Result<Vec<usize>, GammaError> {
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.find(')').map(|end| &v[..end]))
        .ok_or(GammaError::Header("shape is not a tuple"))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.trim_end_matches('L')
                .parse()
                .map_err(|_| GammaError::Header("bad shape dimension"))
        })
        .collect()
}

fn parse_dtype(descr: &str) -> Result<Dtype, GammaError> {
    let unsupported = || GammaError::UnsupportedDtype(descr.to_owned());

    let mut chars = descr.chars();
    let order = match chars.next().ok_or_else(unsupported)? {
        '<' | '|' => ByteOrder::Little,
        '>' => ByteOrder::Big,
        '=' if cfg!(target_endian = "big") => ByteOrder::Big,
        '=' => ByteOrder::Little,
        _ => return Err(unsupported()),
    };
    let kind = match chars.next().ok_or_else(unsupported)? {
        'i' => Kind::Signed,
        'u' => Kind::Unsigned,
        'f' => Kind::Float,
        _ => return Err(unsupported()),
    };
    let size: usize = chars.as_str().parse().map_err(|_| unsupported())?;

    match (kind, size) {
        (Kind::Signed | Kind::Unsigned, 1 | 2 | 4 | 8) | (Kind::Float, 4 | 8) => {
            Ok(Dtype { order, kind, size })
        }
        _ => Err(unsupported()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn read_value(chunk: &[u8], dtype: Dtype) -> f64 {
    let mut buf = [0u8; 8];
    buf[..dtype.size].copy_from_slice(chunk);
    if dtype.order == ByteOrder::Big {
        buf[..dtype.size].reverse();
    }

    match (dtype.kind, dtype.size) {
        (Kind::Float, 4) => f64::from(f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
        (Kind::Float, _) => f64::from_le_bytes(buf),
        (Kind::Unsigned, _) => u64::from_le_bytes(buf) as f64,
        (Kind::Signed, size) => {
            // sign-extend from the element width
            let shift = 64 - size * 8;
            ((i64::from_le_bytes(buf) << shift) >> shift) as f64
        }
    }
}
