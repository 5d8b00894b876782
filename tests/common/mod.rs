//! Shared fixtures: a minimal class-file writer and engine helpers.

#![allow(dead_code)]

use std::collections::HashMap;

use classpath_symbols::{InMemoryClasspath, SymbolEngine};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    next: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Pool {
    fn new() -> Self {
        Self {
            next: 1,
            ..Self::default()
        }
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8.get(value) {
            return index;
        }
        let index = self.next;
        self.next += 1;
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(&index) = self.classes.get(name) {
            return index;
        }
        let name_index = self.utf8(name);
        let index = self.next;
        self.next += 1;
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.classes.insert(name.to_string(), index);
        index
    }

    /// A Utf8 entry written byte for byte, bypassing the dedup table.
    fn raw_utf8(&mut self, bytes: &[u8]) -> u16 {
        let index = self.next;
        self.next += 1;
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(bytes);
        index
    }

    fn long(&mut self, value: i64) -> u16 {
        let index = self.next;
        self.next += 2;
        self.bytes.push(5);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        index
    }
}

struct MemberSpec {
    access: u16,
    name: String,
    descriptor: String,
    deprecated: bool,
}

struct InnerClassSpec {
    inner: String,
    outer: Option<String>,
    simple_name: Option<String>,
    access: u16,
}

/// Writes just enough of a class file for declaration decoding.
pub struct ClassFileBuilder {
    major: u16,
    access: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<MemberSpec>,
    methods: Vec<MemberSpec>,
    signature: Option<String>,
    source_file: Option<String>,
    deprecated: bool,
    inner_classes: Vec<InnerClassSpec>,
    long_constant: bool,
    raw_constants: Vec<Vec<u8>>,
}

impl ClassFileBuilder {
    /// A public class `name` (binary form) extending `java/lang/Object`.
    pub fn new(name: &str) -> Self {
        Self {
            major: 52,
            access: ACC_PUBLIC | ACC_SUPER,
            this_class: name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            signature: None,
            source_file: None,
            deprecated: false,
            inner_classes: Vec::new(),
            long_constant: false,
            raw_constants: Vec::new(),
        }
    }

    pub fn major(mut self, major: u16) -> Self {
        self.major = major;
        self
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn super_class(mut self, name: Option<&str>) -> Self {
        self.super_class = name.map(str::to_string);
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn field(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.fields.push(MemberSpec {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            deprecated: false,
        });
        self
    }

    pub fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push(MemberSpec {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            deprecated: false,
        });
        self
    }

    pub fn deprecated_method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push(MemberSpec {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            deprecated: true,
        });
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn source_file(mut self, file: &str) -> Self {
        self.source_file = Some(file.to_string());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn inner_class(mut self, inner: &str, outer: Option<&str>, simple_name: Option<&str>, access: u16) -> Self {
        self.inner_classes.push(InnerClassSpec {
            inner: inner.to_string(),
            outer: outer.map(str::to_string),
            simple_name: simple_name.map(str::to_string),
            access,
        });
        self
    }

    /// Put a two-slot `long` constant in the pool.
    pub fn with_long_constant(mut self) -> Self {
        self.long_constant = true;
        self
    }

    /// Put an unreferenced Utf8 constant with exactly these bytes in the pool.
    pub fn raw_utf8_constant(mut self, bytes: &[u8]) -> Self {
        self.raw_constants.push(bytes.to_vec());
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = Pool::new();
        let mut body = Vec::new();

        if self.long_constant {
            pool.long(42);
        }
        for constant in &self.raw_constants {
            pool.raw_utf8(constant);
        }

        let this_index = pool.class(&self.this_class);
        let super_index = self.super_class.as_deref().map_or(0, |name| pool.class(name));
        body.extend_from_slice(&self.access.to_be_bytes());
        body.extend_from_slice(&this_index.to_be_bytes());
        body.extend_from_slice(&super_index.to_be_bytes());

        body.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            let index = pool.class(interface);
            body.extend_from_slice(&index.to_be_bytes());
        }

        body.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for field in &self.fields {
            write_member(&mut pool, &mut body, field, false);
        }
        body.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for method in &self.methods {
            write_member(&mut pool, &mut body, method, true);
        }

        let mut attributes: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some(signature) = &self.signature {
            let value = pool.utf8(signature);
            attributes.push((pool.utf8("Signature"), value.to_be_bytes().to_vec()));
        }
        if let Some(file) = &self.source_file {
            let value = pool.utf8(file);
            attributes.push((pool.utf8("SourceFile"), value.to_be_bytes().to_vec()));
        }
        if self.deprecated {
            attributes.push((pool.utf8("Deprecated"), Vec::new()));
        }
        if !self.inner_classes.is_empty() {
            let mut data = (self.inner_classes.len() as u16).to_be_bytes().to_vec();
            for entry in &self.inner_classes {
                let inner = pool.class(&entry.inner);
                let outer = entry.outer.as_deref().map_or(0, |name| pool.class(name));
                let simple = entry.simple_name.as_deref().map_or(0, |name| pool.utf8(name));
                data.extend_from_slice(&inner.to_be_bytes());
                data.extend_from_slice(&outer.to_be_bytes());
                data.extend_from_slice(&simple.to_be_bytes());
                data.extend_from_slice(&entry.access.to_be_bytes());
            }
            attributes.push((pool.utf8("InnerClasses"), data));
        }
        write_attributes(&mut body, &attributes);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&self.major.to_be_bytes());
        bytes.extend_from_slice(&pool.next.to_be_bytes());
        bytes.extend_from_slice(&pool.bytes);
        bytes.extend_from_slice(&body);
        bytes
    }
}

fn write_member(pool: &mut Pool, body: &mut Vec<u8>, member: &MemberSpec, with_code: bool) {
    body.extend_from_slice(&member.access.to_be_bytes());
    body.extend_from_slice(&pool.utf8(&member.name).to_be_bytes());
    body.extend_from_slice(&pool.utf8(&member.descriptor).to_be_bytes());

    let mut attributes: Vec<(u16, Vec<u8>)> = Vec::new();
    if with_code {
        // max_stack, max_locals, code_length=1, `return`, no handlers, no attributes
        let code = vec![0, 1, 0, 1, 0, 0, 0, 1, 0xB1, 0, 0, 0, 0];
        attributes.push((pool.utf8("Code"), code));
    }
    if member.deprecated {
        attributes.push((pool.utf8("Deprecated"), Vec::new()));
    }
    write_attributes(body, &attributes);
}

fn write_attributes(body: &mut Vec<u8>, attributes: &[(u16, Vec<u8>)]) {
    body.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for (name, data) in attributes {
        body.extend_from_slice(&name.to_be_bytes());
        body.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
    }
}

/// A plain class file declaring `name`.
pub fn class_bytes(name: &str) -> Vec<u8> {
    ClassFileBuilder::new(name).build()
}

/// An in-memory classpath holding a plain class for each name.
pub fn classpath_of(names: &[&str]) -> InMemoryClasspath {
    let mut source = InMemoryClasspath::new();
    for name in names {
        source.insert(name, class_bytes(name));
    }
    source
}

pub fn engine_of(names: &[&str]) -> SymbolEngine {
    SymbolEngine::new(classpath_of(names))
}

/// Route engine logs to the test harness; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
