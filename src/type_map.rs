//! Identifier normalization and JSON-type → proto-type mapping.
//!
//! # Type Mapping Table
//!
//! | JSON Schema type | Proto type | Notes |
//! |------------------|-----------|-------|
//! | `integer` | `int32` | Signed 32-bit |
//! | `number` | `double` | 64-bit float |
//! | `boolean` | `bool` | |
//! | `string` | `string` | UTF-8 |
//! | `null` | `optional google.protobuf.Any` | |
//! | `"String"` | `string` | Legacy pre-normalized spelling |
//! | absent | empty | Typeless leaf |
//! | Anything else | verbatim | May produce invalid proto3; intentional |
//!
//! Name conversions operate byte-at-a-time over the identifier alphabet
//! (ASCII); only the first byte is case-shifted by the camel and Pascal
//! conversions, matching how field and message names are actually written.

use crate::schema::SchemaType;

/// Map a schema `type` to a proto3 scalar type string.
///
/// Unrecognized type strings pass through verbatim, except the literal
/// `"String"`, which is remapped to `"string"`. An absent type maps to the
/// empty string.
pub fn json_type_to_proto(type_name: Option<&SchemaType>) -> String {
    let Some(type_name) = type_name else {
        return String::new();
    };
    match type_name {
        SchemaType::Integer => "int32".to_string(),
        SchemaType::Number => "double".to_string(),
        SchemaType::Boolean => "bool".to_string(),
        SchemaType::Null => "optional google.protobuf.Any".to_string(),
        SchemaType::Other(s) if s == "String" => "string".to_string(),
        other => other.as_str().to_string(),
    }
}

/// Replace every identifier-hostile character (`#`, space, `-`, `/`, `.`)
/// with `_`.
pub fn sanitize(s: &str) -> String {
    s.replace(['#', ' ', '-', '/', '.'], "_")
}

/// Sanitize and lowercase the first byte. The remainder is untouched.
///
/// - `"HelloWorld"` → `"helloWorld"`
/// - `"green-blue"` → `"green_blue"`
pub fn to_camel_case(s: &str) -> String {
    let mut out = sanitize(s).into_bytes();
    if let Some(first) = out.first_mut() {
        first.make_ascii_lowercase();
    }
    // Sanitization never produces non-UTF-8 bytes.
    String::from_utf8(out).unwrap_or_default()
}

/// Sanitize and uppercase the first byte. The remainder is untouched.
///
/// Names containing `.` are returned unchanged so that qualified proto
/// names (`google.protobuf.Any`) survive.
pub fn to_pascal_case(s: &str) -> String {
    if s.contains('.') {
        return s.to_string();
    }
    let mut out = sanitize(s).into_bytes();
    if let Some(first) = out.first_mut() {
        first.make_ascii_uppercase();
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Convert to snake_case, reporting whether conversion changed anything.
///
/// The `changed` flag decides whether a field gets a `json_name` option:
/// a name that was already plain lowercase needs none. Scanning the
/// sanitized input byte by byte:
///
/// - `_` passes through and counts as a change (sanitization or an
///   existing separator produced it);
/// - an uppercase letter is lowered, with a `_` inserted before it unless
///   it starts the name;
/// - a digit run gets a `_` inserted before its first digit (unless at the
///   start) and after its last.
pub fn to_snake_case(s: &str) -> (String, bool) {
    let sanitized = sanitize(s);
    let mut out = String::with_capacity(sanitized.len() + 4);
    let mut changed = false;
    let mut prev_digit = false;

    for (index, byte) in sanitized.bytes().enumerate() {
        if byte == b'_' {
            changed = true;
            out.push('_');
            continue;
        }
        if byte.is_ascii_uppercase() {
            if index != 0 {
                out.push('_');
                changed = true;
            }
            out.push(byte.to_ascii_lowercase() as char);
            continue;
        }
        if byte.is_ascii_digit() {
            if !prev_digit {
                if index != 0 {
                    out.push('_');
                    changed = true;
                }
                prev_digit = true;
            }
            out.push(byte as char);
            continue;
        }
        if prev_digit {
            out.push('_');
            changed = true;
            prev_digit = false;
        }
        out.push(byte as char);
    }

    (out, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_type_mapping() {
        let t = |s: &str| json_type_to_proto(Some(&SchemaType::from(s.to_string())));
        assert_eq!(t("integer"), "int32");
        assert_eq!(t("number"), "double");
        assert_eq!(t("boolean"), "bool");
        assert_eq!(t("string"), "string");
        assert_eq!(t("null"), "optional google.protobuf.Any");
    }

    #[test]
    fn legacy_string_spelling_is_remapped() {
        assert_eq!(
            json_type_to_proto(Some(&SchemaType::Other("String".to_string()))),
            "string"
        );
    }

    #[test]
    fn unknown_type_passes_through_verbatim() {
        assert_eq!(
            json_type_to_proto(Some(&SchemaType::Other("date-time".to_string()))),
            "date-time"
        );
    }

    #[test]
    fn absent_type_maps_to_empty() {
        assert_eq!(json_type_to_proto(None), "");
    }

    #[test]
    fn sanitize_replaces_identifier_hostile_characters() {
        assert_eq!(sanitize("a#b c-d/e.f"), "a_b_c_d_e_f");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn camel_case_lowers_first_byte_only() {
        assert_eq!(to_camel_case("HelloWorld"), "helloWorld");
        assert_eq!(to_camel_case("already"), "already");
        assert_eq!(to_camel_case("green-blue"), "green_blue");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn pascal_case_uppers_first_byte_only() {
        assert_eq!(to_pascal_case("helloWorld"), "HelloWorld");
        assert_eq!(to_pascal_case("val_bar"), "Val_bar");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn pascal_case_preserves_qualified_names() {
        assert_eq!(to_pascal_case("google.protobuf.Any"), "google.protobuf.Any");
    }

    #[test]
    fn snake_case_lowercase_name_is_unchanged() {
        assert_eq!(to_snake_case("a"), ("a".to_string(), false));
        assert_eq!(to_snake_case("plain"), ("plain".to_string(), false));
    }

    #[test]
    fn snake_case_camel_boundary() {
        assert_eq!(to_snake_case("helloWorld"), ("hello_world".to_string(), true));
        assert_eq!(to_snake_case("ageYears"), ("age_years".to_string(), true));
    }

    #[test]
    fn snake_case_leading_uppercase_inserts_no_separator() {
        assert_eq!(to_snake_case("ABC"), ("a_b_c".to_string(), true));
        assert_eq!(to_snake_case("Abc"), ("abc".to_string(), false));
    }

    #[test]
    fn snake_case_digit_boundaries() {
        assert_eq!(to_snake_case("a1"), ("a_1".to_string(), true));
        assert_eq!(to_snake_case("a12"), ("a_12".to_string(), true));
        assert_eq!(to_snake_case("a1b"), ("a_1_b".to_string(), true));
        assert_eq!(to_snake_case("1a"), ("1_a".to_string(), true));
    }

    #[test]
    fn snake_case_existing_underscore_counts_as_changed() {
        assert_eq!(to_snake_case("name_string"), ("name_string".to_string(), true));
    }

    #[test]
    fn snake_case_empty() {
        assert_eq!(to_snake_case(""), ("".to_string(), false));
    }
}
