//! Data-type categories and their compatibility.
//!
//! Leaf comparison is pruned to pairs whose declared types could hold the
//! same kind of value. Declared types are grouped into coarse families;
//! two categories are compatible when both were observed in the schemas
//! being compared and they fall into the same family.

use std::collections::BTreeSet;

/// Coarse family of a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeFamily {
    Numeric,
    Text,
    Temporal,
    Boolean,
    Binary,
    /// Anything not recognised. Only compatible with the identical category.
    Other,
}

impl TypeFamily {
    /// Classifies a declared type such as `"int"`, `"nvarchar(255)"` or
    /// `"datetime2"`.
    pub fn of(category: &str) -> Self {
        match base_type(category).as_str() {
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2"
            | "int4" | "int8" | "long" | "short" | "byte" | "unsigned_long" | "serial"
            | "bigserial" | "float" | "float4" | "float8" | "double" | "double precision"
            | "real" | "decimal" | "numeric" | "number" | "money" | "smallmoney"
            | "half_float" | "scaled_float" => Self::Numeric,
            "char" | "nchar" | "varchar" | "nvarchar" | "varchar2" | "nvarchar2" | "text"
            | "ntext" | "tinytext" | "mediumtext" | "longtext" | "string" | "keyword"
            | "clob" | "citext" | "sysname" | "enum" | "uuid" | "uniqueidentifier" => {
                Self::Text
            }
            "date" | "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" | "time"
            | "timestamp" | "timestamptz" | "interval" | "year" => Self::Temporal,
            "bit" | "bool" | "boolean" => Self::Boolean,
            "binary" | "varbinary" | "image" | "blob" | "longblob" | "bytea" => Self::Binary,
            _ => Self::Other,
        }
    }
}

/// Lowercases a declared type and strips length/precision arguments and
/// modifiers: `"NVARCHAR(50)"` becomes `"nvarchar"`, `"int unsigned"` becomes
/// `"int"`.
fn base_type(category: &str) -> String {
    let lowered = category.trim().to_ascii_lowercase();
    let without_args = lowered.split('(').next().unwrap_or_default().trim();
    match without_args.strip_suffix(" unsigned") {
        Some(stripped) => stripped.trim().to_string(),
        None => without_args.to_string(),
    }
}

/// The distinct leaf categories observed across both trees of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    categories: BTreeSet<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str) {
        self.categories.insert(base_type(category));
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(&base_type(category))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// True when a leaf of category `left` may be compared with a leaf of
    /// category `right`.
    pub fn compatible(&self, left: &str, right: &str) -> bool {
        if !self.contains(left) || !self.contains(right) {
            return false;
        }
        match (TypeFamily::of(left), TypeFamily::of(right)) {
            (TypeFamily::Other, TypeFamily::Other) => base_type(left) == base_type(right),
            (a, b) => a == b,
        }
    }
}

impl<'a> FromIterator<&'a str> for CategorySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for category in iter {
            set.insert(category);
        }
        set
    }
}
