//! Conversions between the name forms used for JVM types.
//!
//! - **flat name**: `java.util.Map$Entry` (cache key form)
//! - **binary name**: `java/util/Map$Entry` (byte-source form)
//! - **short name**: `Map$Entry` (everything after the last `.`)

/// Separator between a package and its members in flat names.
pub const PACKAGE_SEPARATOR: char = '.';

/// Separator between an enclosing type and a nested type.
pub const NESTING_SEPARATOR: char = '$';

/// Simple name of the synthetic class carrying package-level metadata.
pub const PACKAGE_INFO: &str = "package-info";

/// Suffix of class resources on a classpath.
pub const CLASS_SUFFIX: &str = ".class";

/// Convert a binary (or already flat) name to flat form.
pub fn flat_name(name: &str) -> String {
    name.replace('/', ".")
}

/// Convert a flat name to binary form.
pub fn binary_name(flat: &str) -> String {
    flat.replace('.', "/")
}

/// Resource path of a class on a classpath: `java/lang/String.class`.
pub fn resource_name(flat: &str) -> String {
    let mut resource = binary_name(flat);
    resource.push_str(CLASS_SUFFIX);
    resource
}

/// The part of a flat name after the last `.`.
pub fn short_name(flat: &str) -> &str {
    match flat.rfind(PACKAGE_SEPARATOR) {
        Some(idx) => &flat[idx + 1..],
        None => flat,
    }
}

/// The part of a flat name before the last `.`, empty for the default package.
pub fn package_part(flat: &str) -> &str {
    match flat.rfind(PACKAGE_SEPARATOR) {
        Some(idx) => &flat[..idx],
        None => "",
    }
}

/// Join a package and a short name, omitting the separator for the default package.
pub fn full_name(package: &str, short: &str) -> String {
    if package.is_empty() {
        short.to_string()
    } else {
        format!("{package}{PACKAGE_SEPARATOR}{short}")
    }
}

/// Candidate enclosing short name: everything before the last `$`.
///
/// Returns an empty string when the short name carries no nesting separator.
pub fn enclosing_class_name(short: &str) -> &str {
    match short.rfind(NESTING_SEPARATOR) {
        Some(idx) => &short[..idx],
        None => "",
    }
}

/// Name of a nested type relative to its enclosing type, from flat names.
///
/// `inner_class_name("a.Outer", "a.Outer$Inner") == Some("Inner")`. `None` when
/// `nested` does not start with the enclosing name followed by `$`.
pub fn inner_class_name<'a>(enclosing: &str, nested: &'a str) -> Option<&'a str> {
    nested
        .strip_prefix(enclosing)
        .and_then(|rest| rest.strip_prefix(NESTING_SEPARATOR))
}

/// Whether a flat name denotes package-level metadata.
pub fn is_package_info(flat: &str) -> bool {
    flat.ends_with(PACKAGE_INFO)
}

/// Flat name of the package-info class of a package.
pub fn package_info_name(package: &str) -> String {
    full_name(package, PACKAGE_INFO)
}
