//! Byte cursor, constant pool and class header.

use crate::error::ClassParseError;

/// Magic number opening every class file.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// Big-endian cursor over class-file bytes.
pub struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    pub fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        let value = *self.data.get(self.pos).ok_or(ClassParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        let end = self.pos.checked_add(len).ok_or(ClassParseError::UnexpectedEof)?;
        let slice = self.data.get(self.pos..end).ok_or(ClassParseError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    MalformedUtf8,
    Class { name_index: u16 },
    Other,
    Unusable,
}

/// The constant pool, keeping only what declaration decoding reads.
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable); // index 0 unused

        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    // Modified UTF-8: NUL as `C0 80`, supplementary characters as
                    // surrogate pairs. Bad entries only fail when read.
                    match cesu8::from_java_cesu8(bytes) {
                        Ok(value) => Constant::Utf8(value.into_owned()),
                        Err(_) => Constant::MalformedUtf8,
                    }
                }
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                // Integer, Float
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // Long and Double take two slots
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    index += 1;
                    Constant::Unusable
                }
                // String, MethodType, Module, Package
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                // Field/Method/InterfaceMethod refs, NameAndType, Dynamic, InvokeDynamic
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // MethodHandle
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };
            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            Constant::MalformedUtf8 => Err(ClassParseError::InvalidUtf8 { index }),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    /// Binary name referenced by a `CONSTANT_Class` entry.
    pub fn class_name(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    /// Like [`class_name`](Self::class_name), treating index 0 as absent.
    pub fn optional_class_name(&self, index: u16) -> Result<Option<&str>, ClassParseError> {
        if index == 0 {
            return Ok(None);
        }
        self.class_name(index).map(Some)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

/// Version and constant pool of a class file.
pub struct ClassPrelude {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
}

impl ClassPrelude {
    /// Read magic, version and constant pool.
    pub fn read(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        reader.expect_magic()?;
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let constant_pool = ConstantPool::parse(reader)?;
        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
        })
    }
}

/// Read only the self-declared binary name (`this_class`) of a class file.
pub fn declared_class_name(bytes: &[u8]) -> Result<String, ClassParseError> {
    let mut reader = ClassReader::new(bytes);
    let prelude = ClassPrelude::read(&mut reader)?;
    let _access_flags = reader.read_u2()?;
    let this_class = reader.read_u2()?;
    Ok(prelude.constant_pool.class_name(this_class)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Magic, version 52.0, pool [Utf8 "a/B", Class #1], flags, this_class = #2.
    fn header_bytes(name: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&52u16.to_be_bytes());
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.push(1);
        bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(7);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&0x0021u16.to_be_bytes());
        bytes.extend_from_slice(&2u16.to_be_bytes());
        bytes
    }

    #[test]
    fn test_declared_class_name() {
        let bytes = header_bytes("a/B");
        assert_eq!(declared_class_name(&bytes).unwrap(), "a/B");
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = header_bytes("a/B");
        bytes[0] = 0;
        assert!(matches!(
            declared_class_name(&bytes),
            Err(ClassParseError::InvalidMagic)
        ));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = header_bytes("a/B");
        assert!(matches!(
            declared_class_name(&bytes[..12]),
            Err(ClassParseError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_long_constant_takes_two_slots() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4u16.to_be_bytes()); // count: #1 long (2 slots), #3 utf8
        bytes.push(5);
        bytes.extend_from_slice(&7u64.to_be_bytes());
        bytes.push(1);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.push(b'x');

        let mut reader = ClassReader::new(&bytes);
        let pool = ConstantPool::parse(&mut reader).unwrap();
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.utf8(3).unwrap(), "x");
        assert!(pool.utf8(2).is_err());
        assert_eq!(reader.remaining(), 0);
    }

    fn utf8_pool(entries: &[&[u8]]) -> Vec<u8> {
        let mut bytes = ((entries.len() + 1) as u16).to_be_bytes().to_vec();
        for entry in entries {
            bytes.push(1);
            bytes.extend_from_slice(&(entry.len() as u16).to_be_bytes());
            bytes.extend_from_slice(entry);
        }
        bytes
    }

    #[test]
    fn test_modified_utf8_constants() {
        // "a\0b", then U+1F600 as a surrogate pair
        let bytes = utf8_pool(&[&[b'a', 0xC0, 0x80, b'b'], &[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]]);
        let pool = ConstantPool::parse(&mut ClassReader::new(&bytes)).unwrap();
        assert_eq!(pool.utf8(1).unwrap(), "a\0b");
        assert_eq!(pool.utf8(2).unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_malformed_utf8_fails_only_when_read() {
        let bytes = utf8_pool(&[&[0xFF, 0xFE], b"ok"]);
        let pool = ConstantPool::parse(&mut ClassReader::new(&bytes)).unwrap();
        assert_eq!(pool.utf8(2).unwrap(), "ok");
        assert!(matches!(pool.utf8(1), Err(ClassParseError::InvalidUtf8 { index: 1 })));
    }

    #[test]
    fn test_unsupported_constant_tag() {
        let bytes = [0u8, 2, 42];
        let mut reader = ClassReader::new(&bytes);
        assert!(matches!(
            ConstantPool::parse(&mut reader),
            Err(ClassParseError::UnsupportedConstant { tag: 42 })
        ));
    }

    #[test]
    fn test_optional_class_name_zero_index() {
        let bytes = header_bytes("a/B");
        let mut reader = ClassReader::new(&bytes);
        let prelude = ClassPrelude::read(&mut reader).unwrap();
        assert_eq!(prelude.major_version, 52);
        assert_eq!(prelude.constant_pool.optional_class_name(0).unwrap(), None);
        assert_eq!(prelude.constant_pool.optional_class_name(2).unwrap(), Some("a/B"));
    }
}
