//! Declaration decoding: class-file bytes into a type symbol.

use bitflags::bitflags;
use smol_str::SmolStr;

use crate::base::{ACC_SUPER, Flags};
use crate::error::ClassParseError;
use crate::hir::{Member, MemberKind, SymbolEngine, TypeId, TypeParameter, TypeRef};
use super::reader::{ClassPrelude, ClassReader, ConstantPool};
use super::signature::formal_type_parameters;

bitflags! {
    /// Parts of a class file a decoder is told to leave alone.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ParsingOptions: u8 {
        /// Method bodies.
        const SKIP_CODE = 0b001;
        /// Stack-map frames.
        const SKIP_FRAMES = 0b010;
        /// Source file, line number and local variable tables.
        const SKIP_DEBUG = 0b100;

        const SKIP_ALL = Self::SKIP_CODE.bits() | Self::SKIP_FRAMES.bits() | Self::SKIP_DEBUG.bits();
    }
}

/// Populates a type symbol from its class file.
///
/// Implementations write members, supertype, interfaces and type parameters
/// into `target`, and may request other types from `engine` along the way.
pub trait BinaryDecoder: Send + Sync {
    fn decode(
        &self,
        engine: &mut SymbolEngine,
        target: TypeId,
        bytes: &[u8],
        options: ParsingOptions,
    ) -> Result<(), ClassParseError>;
}

/// Decoder that reads declarations only.
///
/// Method bodies, and with them stack-map frames and most debug tables, are
/// skipped by length without being parsed.
#[derive(Clone, Copy, Debug)]
pub struct DeclarationDecoder {
    newest_supported_major: u16,
}

impl DeclarationDecoder {
    pub const fn new(newest_supported_major: u16) -> Self {
        Self {
            newest_supported_major,
        }
    }
}

#[derive(Clone, Copy)]
enum MemberSort {
    Field,
    Method,
}

struct InnerClassEntry<'p> {
    inner: &'p str,
    outer: Option<&'p str>,
    simple_name: Option<&'p str>,
    flags: u32,
}

#[derive(Default)]
struct ClassAttributes<'p> {
    signature: Option<&'p str>,
    source_file: Option<&'p str>,
    deprecated: bool,
    inner_classes: Vec<InnerClassEntry<'p>>,
}

impl BinaryDecoder for DeclarationDecoder {
    fn decode(
        &self,
        engine: &mut SymbolEngine,
        target: TypeId,
        bytes: &[u8],
        options: ParsingOptions,
    ) -> Result<(), ClassParseError> {
        let mut reader = ClassReader::new(bytes);
        let prelude = ClassPrelude::read(&mut reader)?;
        if prelude.major_version > self.newest_supported_major {
            return Err(ClassParseError::UnsupportedVersion {
                major: prelude.major_version,
                minor: prelude.minor_version,
            });
        }
        let pool = &prelude.constant_pool;

        let access_flags = u32::from(reader.read_u2()?);
        let this_class = pool.class_name(reader.read_u2()?)?;
        let super_class = pool.optional_class_name(reader.read_u2()?)?;
        let interfaces_count = reader.read_u2()?;
        let mut interfaces = Vec::with_capacity(interfaces_count as usize);
        for _ in 0..interfaces_count {
            interfaces.push(pool.class_name(reader.read_u2()?)?);
        }

        let fields = read_members(&mut reader, pool, MemberSort::Field)?;
        let methods = read_members(&mut reader, pool, MemberSort::Method)?;
        let attributes = read_class_attributes(&mut reader, pool)?;

        let type_parameters = match attributes.signature {
            Some(signature) => formal_type_parameters(signature)?,
            None => Vec::new(),
        };

        let mut raw_flags = access_flags & !ACC_SUPER;
        let mut nested = Vec::new();
        for entry in &attributes.inner_classes {
            if entry.inner == this_class {
                // The InnerClasses entry carries the source-level modifiers
                raw_flags = entry.flags;
            } else if entry.outer == Some(this_class) {
                let Some(simple_name) = entry.simple_name else {
                    continue;
                };
                let id = engine.get_or_create(Some(target), entry.inner, Flags::from_bits_retain(entry.flags));
                if !Flags::is_synthetic(entry.flags) {
                    nested.push(Member {
                        name: SmolStr::new(simple_name),
                        kind: MemberKind::NestedType(id),
                        flags: Flags::filter_bytecode(entry.flags),
                    });
                }
            }
        }
        if attributes.deprecated {
            raw_flags |= Flags::DEPRECATED.bits();
        }

        let supertype = super_class.map(|name| TypeRef::Class(engine.get_type(name)));
        let interfaces: Vec<TypeRef> = interfaces
            .into_iter()
            .map(|name| TypeRef::Class(engine.get_or_create(None, name, Flags::INTERFACE)))
            .collect();

        let ty = engine.type_symbol_mut(target);
        ty.flags = Flags::filter_bytecode(raw_flags);
        ty.supertype = supertype;
        ty.interfaces = interfaces;
        ty.type_parameters = type_parameters
            .into_iter()
            .map(|name| TypeParameter { name })
            .collect();
        for member in fields.into_iter().chain(methods).chain(nested) {
            ty.members.add(member);
        }
        if !options.contains(ParsingOptions::SKIP_DEBUG) {
            ty.source_file = attributes.source_file.map(SmolStr::new);
        }
        Ok(())
    }
}

fn read_members(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
    sort: MemberSort,
) -> Result<Vec<Member>, ClassParseError> {
    let count = reader.read_u2()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = u32::from(reader.read_u2()?);
        let name = pool.utf8(reader.read_u2()?)?;
        let descriptor = pool.utf8(reader.read_u2()?)?;

        let mut deprecated = false;
        let attributes_count = reader.read_u2()?;
        for _ in 0..attributes_count {
            let attribute_name = pool.utf8(reader.read_u2()?)?;
            let length = reader.read_u4()? as usize;
            // Code (with its frames and debug tables) is skipped whole
            if attribute_name == "Deprecated" {
                deprecated = true;
            }
            reader.skip(length)?;
        }

        if Flags::is_synthetic(access_flags) || name == "<clinit>" {
            continue;
        }
        let mut raw = access_flags;
        if deprecated {
            raw |= Flags::DEPRECATED.bits();
        }
        let descriptor = SmolStr::new(descriptor);
        members.push(Member {
            name: SmolStr::new(name),
            kind: match sort {
                MemberSort::Field => MemberKind::Field { descriptor },
                MemberSort::Method => MemberKind::Method { descriptor },
            },
            flags: Flags::filter_bytecode(raw),
        });
    }
    Ok(members)
}

fn read_class_attributes<'p>(
    reader: &mut ClassReader<'_>,
    pool: &'p ConstantPool,
) -> Result<ClassAttributes<'p>, ClassParseError> {
    let mut attributes = ClassAttributes::default();
    let count = reader.read_u2()?;
    for _ in 0..count {
        let name = pool.utf8(reader.read_u2()?)?;
        let length = reader.read_u4()? as usize;
        let mut body = ClassReader::new(reader.read_slice(length)?);
        match name {
            "Signature" => attributes.signature = Some(pool.utf8(body.read_u2()?)?),
            "SourceFile" => attributes.source_file = Some(pool.utf8(body.read_u2()?)?),
            "Deprecated" => attributes.deprecated = true,
            "InnerClasses" => {
                let classes = body.read_u2()?;
                for _ in 0..classes {
                    let inner = pool.class_name(body.read_u2()?)?;
                    let outer = pool.optional_class_name(body.read_u2()?)?;
                    let name_index = body.read_u2()?;
                    let simple_name = if name_index == 0 {
                        None
                    } else {
                        Some(pool.utf8(name_index)?)
                    };
                    let flags = u32::from(body.read_u2()?);
                    attributes.inner_classes.push(InnerClassEntry {
                        inner,
                        outer,
                        simple_name,
                        flags,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(attributes)
}
