//! Formal type parameters from generic `Signature` attributes.
//!
//! Only the parameter names are extracted; bounds are skipped structurally.

use smol_str::SmolStr;

use crate::error::ClassParseError;

/// Names of the formal type parameters of a class or method signature.
///
/// `<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;` yields `[K, V]`.
/// Signatures without a leading `<` have no type parameters.
pub fn formal_type_parameters(signature: &str) -> Result<Vec<SmolStr>, ClassParseError> {
    let bytes = signature.as_bytes();
    if bytes.first() != Some(&b'<') {
        return Ok(Vec::new());
    }

    let malformed = || ClassParseError::InvalidSignature(signature.to_string());
    let mut params = Vec::new();
    let mut pos = 1;
    loop {
        match bytes.get(pos) {
            Some(b'>') => return Ok(params),
            None => return Err(malformed()),
            Some(_) => {}
        }

        let start = pos;
        while bytes.get(pos).is_some_and(|&b| b != b':') {
            pos += 1;
        }
        if pos == start || pos >= bytes.len() {
            return Err(malformed());
        }
        params.push(SmolStr::new(&signature[start..pos]));

        // Class bound (may be empty) followed by interface bounds, each after ':'
        while bytes.get(pos) == Some(&b':') {
            pos += 1;
            if matches!(bytes.get(pos), Some(b'L' | b'T' | b'[')) {
                pos = skip_field_signature(bytes, pos).ok_or_else(malformed)?;
            }
        }
    }
}

/// Position just past the field type signature starting at `pos`.
fn skip_field_signature(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while bytes.get(pos) == Some(&b'[') {
        pos += 1;
    }
    match bytes.get(pos)? {
        b'L' => {
            let mut depth = 0usize;
            pos += 1;
            loop {
                match bytes.get(pos)? {
                    b'<' => depth += 1,
                    b'>' => depth = depth.checked_sub(1)?,
                    b';' if depth == 0 => return Some(pos + 1),
                    _ => {}
                }
                pos += 1;
            }
        }
        b'T' => {
            let end = bytes[pos..].iter().position(|&b| b == b';')?;
            Some(pos + end + 1)
        }
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' => Some(pos + 1),
        _ => None,
    }
}
