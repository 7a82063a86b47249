//! JVM types as seen by the source backends.
//!
//! The type-inference engine resolves every node to one of these. Backends
//! only need enough structure to render a type name, pick a default value,
//! and find the element type of an array.

use std::fmt;

/// Qualified name of the platform root object type.
pub const OBJECT: &str = "java.lang.Object";

/// A resolved JVM type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JvmType {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Class or interface, by qualified name (`java.util.List`, `a.b.Outer$Inner`).
    Reference(String),
    /// Array of the component type.
    Array(Box<JvmType>),
}

impl JvmType {
    /// The root object type.
    pub fn object() -> Self {
        JvmType::Reference(OBJECT.to_string())
    }

    /// `java.lang.String`.
    pub fn string() -> Self {
        JvmType::Reference("java.lang.String".to_string())
    }

    /// A class or interface type by name. Slashes are accepted as package
    /// separators.
    pub fn reference(name: impl Into<String>) -> Self {
        JvmType::Reference(name.into().replace('/', "."))
    }

    /// An array whose elements are `self`.
    #[must_use]
    pub fn array_of(self) -> Self {
        JvmType::Array(Box::new(self))
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, JvmType::Void)
    }

    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, JvmType::Boolean)
    }

    /// Primitive value types, `boolean` included, `void` excluded.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            JvmType::Boolean
                | JvmType::Byte
                | JvmType::Char
                | JvmType::Short
                | JvmType::Int
                | JvmType::Long
                | JvmType::Float
                | JvmType::Double
        )
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, JvmType::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JvmType::Reference(name) if name == OBJECT)
    }

    /// Element type for arrays; `None` for everything else.
    pub fn component_type(&self) -> Option<&JvmType> {
        match self {
            JvmType::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Type name as it appears in Java source.
    ///
    /// Nested-class separators (`$`) become `.`; the root object type is
    /// written unqualified since `java.lang` is always in scope.
    pub fn to_source(&self) -> String {
        match self {
            JvmType::Void => "void".to_string(),
            JvmType::Boolean => "boolean".to_string(),
            JvmType::Byte => "byte".to_string(),
            JvmType::Char => "char".to_string(),
            JvmType::Short => "short".to_string(),
            JvmType::Int => "int".to_string(),
            JvmType::Long => "long".to_string(),
            JvmType::Float => "float".to_string(),
            JvmType::Double => "double".to_string(),
            JvmType::Reference(name) if name == OBJECT => "Object".to_string(),
            JvmType::Reference(name) => name.replace('$', "."),
            JvmType::Array(component) => format!("{}[]", component.to_source()),
        }
    }

    /// Literal a freshly declared local of this type starts with.
    ///
    /// Java rejects reads of possibly-unassigned locals, so every local the
    /// backend declares gets one of these.
    pub fn default_value(&self) -> &'static str {
        match self {
            JvmType::Boolean => "false",
            JvmType::Byte
            | JvmType::Char
            | JvmType::Short
            | JvmType::Int
            | JvmType::Long
            | JvmType::Float
            | JvmType::Double => "0",
            JvmType::Void | JvmType::Reference(_) | JvmType::Array(_) => "null",
        }
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

#[cfg(test)]
mod tests;
