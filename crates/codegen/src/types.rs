//! ABI type mapping
//!
//! Maps primitive ABI type tags to language-neutral semantic types. Renderers decide how
//! a semantic type is spelled in their target language.

/// Language-neutral type of a parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Arbitrary-precision integer (widths above 32 bits)
    BigInt,
    /// Native numeric type (8 to 32 bits)
    Number,
    /// `0x`-prefixed 20-byte hex address
    Address,
    Bool,
    /// `0x`-prefixed hex byte string (`bytes`, `bytesN`)
    Hex,
    String,
    /// Ordered sequence of the element type, for both `T[]` and `T[N]`
    Sequence(Box<SemanticType>),
    /// Fallback for tags outside the table (tuples, function pointers, typos)
    Untyped,
}

/// Largest integer width still represented by the native numeric type
const NATIVE_INT_MAX_BITS: u16 = 32;

/// Map an ABI type tag such as `uint256`, `bool[]` or `bytes32[3]`.
///
/// Never fails: unknown tags map to [`SemanticType::Untyped`].
pub fn map_abi_type(tag: &str) -> SemanticType {
    let tag = tag.trim();

    if let Some(base) = strip_array_suffix(tag) {
        return match map_abi_type(base) {
            // A malformed base such as `[]` alone stays untyped rather than a sequence
            SemanticType::Untyped if base.is_empty() => SemanticType::Untyped,
            element => SemanticType::Sequence(Box::new(element)),
        };
    }

    match tag {
        "address" => SemanticType::Address,
        "bool" => SemanticType::Bool,
        "string" => SemanticType::String,
        "bytes" => SemanticType::Hex,
        _ => {
            if let Some(size) = tag.strip_prefix("bytes") {
                return match decimal_width(size) {
                    Some(1..=32) => SemanticType::Hex,
                    _ => SemanticType::Untyped,
                };
            }
            let width = tag
                .strip_prefix("uint")
                .or_else(|| tag.strip_prefix("int"));
            match width.and_then(parse_int_width) {
                Some(bits) if bits <= NATIVE_INT_MAX_BITS => SemanticType::Number,
                Some(_) => SemanticType::BigInt,
                None => SemanticType::Untyped,
            }
        }
    }
}

/// Returns the element tag when `tag` ends in `[]` or `[N]`
fn strip_array_suffix(tag: &str) -> Option<&str> {
    let inner = tag.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let size = &inner[open + 1..];
    if size.is_empty() || size.bytes().all(|b| b.is_ascii_digit()) {
        Some(&inner[..open])
    } else {
        None
    }
}

/// `uint`/`int` without a width are aliases for 256 bits
fn parse_int_width(width: &str) -> Option<u16> {
    if width.is_empty() {
        return Some(256);
    }
    let bits = decimal_width(width)?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

/// Width written as plain decimal digits, without sign or leading zero
fn decimal_width(digits: &str) -> Option<u16> {
    let canonical = !digits.is_empty()
        && !digits.starts_with('0')
        && digits.bytes().all(|b| b.is_ascii_digit());
    if canonical {
        digits.parse().ok()
    } else {
        None
    }
}
