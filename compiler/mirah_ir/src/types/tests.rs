use super::*;

#[test]
fn primitive_names() {
    assert_eq!(JvmType::Int.to_source(), "int");
    assert_eq!(JvmType::Boolean.to_source(), "boolean");
    assert_eq!(JvmType::Void.to_source(), "void");
}

#[test]
fn root_object_is_unqualified() {
    assert_eq!(JvmType::object().to_source(), "Object");
    assert!(JvmType::object().is_object());
}

#[test]
fn nested_class_and_array_rendering() {
    let inner = JvmType::reference("a/b/Outer$Inner");
    assert_eq!(inner.to_source(), "a.b.Outer.Inner");
    assert_eq!(JvmType::Int.array_of().array_of().to_source(), "int[][]");
}

#[test]
fn default_values() {
    assert_eq!(JvmType::Boolean.default_value(), "false");
    assert_eq!(JvmType::Long.default_value(), "0");
    assert_eq!(JvmType::Char.default_value(), "0");
    assert_eq!(JvmType::string().default_value(), "null");
    assert_eq!(JvmType::Int.array_of().default_value(), "null");
}

#[test]
fn component_type_only_for_arrays() {
    let strings = JvmType::string().array_of();
    assert_eq!(strings.component_type(), Some(&JvmType::string()));
    assert_eq!(JvmType::reference("java.util.List").component_type(), None);
}
