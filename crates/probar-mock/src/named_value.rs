//! Named, typed parameter and return values.
//!
//! A [`NamedValue`] pairs a parameter name with a [`MockValue`]. The value is
//! a closed set of built-in kinds plus an opaque object kind whose equality
//! and formatting come from a [`ComparatorRegistry`].
//!
//! Typed getters are permissive: asking for a different kind than the one
//! stored reinterprets numbers and yields the zero/empty value otherwise.
//! Callers are expected to check [`NamedValue::type_name`] first.

use crate::comparator::ComparatorRegistry;
use crate::diagnostics;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

/// Tolerance used when comparing `double` values
pub const DOUBLE_TOLERANCE: f64 = 0.005;

/// Type tag of `i32` values
pub const INT: &str = "int";
/// Type tag of `u32` values
pub const UNSIGNED_INT: &str = "unsigned int";
/// Type tag of `i64` values
pub const LONG_INT: &str = "long int";
/// Type tag of `u64` values
pub const UNSIGNED_LONG_INT: &str = "unsigned long int";
/// Type tag of `f64` values
pub const DOUBLE: &str = "double";
/// Type tag of string values
pub const STRING: &str = "const char*";
/// Type tag of mutable pointers
pub const POINTER: &str = "void*";
/// Type tag of const pointers (and of output parameters)
pub const CONST_POINTER: &str = "const void*";
/// Type tag of memory buffers
pub const MEMORY_BUFFER: &str = "const unsigned char*";

/// Opaque object handle with a caller-supplied type tag
#[derive(Clone)]
pub struct ObjectValue {
    type_name: String,
    handle: Rc<dyn Any>,
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type_name", &self.type_name)
            .field("address", &diagnostics::format_address(self.address()))
            .finish()
    }
}

impl ObjectValue {
    /// Wrap `handle` under `type_name`
    #[must_use]
    pub fn new(type_name: &str, handle: Rc<dyn Any>) -> Self {
        Self {
            type_name: type_name.to_string(),
            handle,
        }
    }

    /// Caller-supplied type tag
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Shared handle to the object
    #[must_use]
    pub fn handle(&self) -> &Rc<dyn Any> {
        &self.handle
    }

    /// Address of the referenced object
    #[must_use]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.handle).cast::<()>() as usize
    }

    /// Whether both handles point at the same object
    #[must_use]
    pub fn same_object(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

/// A typed parameter or return value
#[derive(Debug, Clone)]
pub enum MockValue {
    /// `int`
    Int(i32),
    /// `unsigned int`
    UnsignedInt(u32),
    /// `long int`
    LongInt(i64),
    /// `unsigned long int`
    UnsignedLongInt(u64),
    /// `double`
    Double(f64),
    /// `const char*`
    String(String),
    /// `void*`, stored as an address
    Pointer(usize),
    /// `const void*`, stored as an address
    ConstPointer(usize),
    /// `const unsigned char*` with its contents
    MemoryBuffer(Vec<u8>),
    /// Opaque object compared through a comparator
    Object(ObjectValue),
}

impl MockValue {
    /// Type tag of the active kind
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Int(_) => INT,
            Self::UnsignedInt(_) => UNSIGNED_INT,
            Self::LongInt(_) => LONG_INT,
            Self::UnsignedLongInt(_) => UNSIGNED_LONG_INT,
            Self::Double(_) => DOUBLE,
            Self::String(_) => STRING,
            Self::Pointer(_) => POINTER,
            Self::ConstPointer(_) => CONST_POINTER,
            Self::MemoryBuffer(_) => MEMORY_BUFFER,
            Self::Object(object) => object.type_name(),
        }
    }

    /// A `void*` value
    #[must_use]
    pub fn pointer<T: ?Sized>(pointer: *mut T) -> Self {
        Self::Pointer(pointer.cast::<()>() as usize)
    }

    /// A `const void*` value
    #[must_use]
    pub fn const_pointer<T: ?Sized>(pointer: *const T) -> Self {
        Self::ConstPointer(pointer.cast::<()>() as usize)
    }

    /// A memory buffer holding a copy of `bytes`
    #[must_use]
    pub fn memory_buffer(bytes: &[u8]) -> Self {
        Self::MemoryBuffer(bytes.to_vec())
    }

    /// An opaque object tagged with `type_name`
    #[must_use]
    pub fn object(type_name: &str, handle: Rc<dyn Any>) -> Self {
        Self::Object(ObjectValue::new(type_name, handle))
    }
}

impl From<i32> for MockValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for MockValue {
    fn from(value: u32) -> Self {
        Self::UnsignedInt(value)
    }
}

impl From<i64> for MockValue {
    fn from(value: i64) -> Self {
        Self::LongInt(value)
    }
}

impl From<u64> for MockValue {
    fn from(value: u64) -> Self {
        Self::UnsignedLongInt(value)
    }
}

impl From<f64> for MockValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for MockValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MockValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&[u8]> for MockValue {
    fn from(value: &[u8]) -> Self {
        Self::memory_buffer(value)
    }
}

impl<T: ?Sized> From<*mut T> for MockValue {
    fn from(value: *mut T) -> Self {
        Self::pointer(value)
    }
}

impl<T: ?Sized> From<*const T> for MockValue {
    fn from(value: *const T) -> Self {
        Self::const_pointer(value)
    }
}

/// Outcome of comparing two values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Values are equal
    Equal,
    /// Same kind, different values
    NotEqual,
    /// Different kinds (or different object type tags)
    TypeMismatch,
    /// Objects of a type nobody installed a comparator for
    NoComparator {
        /// The object type tag
        type_name: String,
    },
}

impl Comparison {
    /// Whether the comparison found the values equal
    #[must_use]
    pub const fn is_equal(&self) -> bool {
        matches!(self, Self::Equal)
    }

    fn from_bool(equal: bool) -> Self {
        if equal {
            Self::Equal
        } else {
            Self::NotEqual
        }
    }
}

/// A named, typed value
#[derive(Debug, Clone)]
pub struct NamedValue {
    name: String,
    value: MockValue,
}

impl NamedValue {
    /// Create a value named `name`
    #[must_use]
    pub fn new(name: &str, value: impl Into<MockValue>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }

    /// Create an opaque object value named `name`
    #[must_use]
    pub fn object(name: &str, type_name: &str, handle: Rc<dyn Any>) -> Self {
        Self::new(name, MockValue::object(type_name, handle))
    }

    /// Parameter name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the value
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The stored value
    #[must_use]
    pub fn value(&self) -> &MockValue {
        &self.value
    }

    /// Type tag of the stored value
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.value.type_name()
    }

    /// Replace the stored value; the type tag follows
    pub fn set_value(&mut self, value: impl Into<MockValue>) {
        self.value = value.into();
    }

    /// Store an opaque object tagged with `type_name`
    pub fn set_object(&mut self, type_name: &str, handle: Rc<dyn Any>) {
        self.value = MockValue::object(type_name, handle);
    }

    /// Stored value as `int`
    #[must_use]
    pub fn int_value(&self) -> i32 {
        match &self.value {
            MockValue::Int(v) => *v,
            MockValue::UnsignedInt(v) => *v as i32,
            MockValue::LongInt(v) => *v as i32,
            MockValue::UnsignedLongInt(v) => *v as i32,
            MockValue::Double(v) => *v as i32,
            _ => 0,
        }
    }

    /// Stored value as `unsigned int`
    #[must_use]
    pub fn unsigned_int_value(&self) -> u32 {
        match &self.value {
            MockValue::Int(v) => *v as u32,
            MockValue::UnsignedInt(v) => *v,
            MockValue::LongInt(v) => *v as u32,
            MockValue::UnsignedLongInt(v) => *v as u32,
            MockValue::Double(v) => *v as u32,
            _ => 0,
        }
    }

    /// Stored value as `long int`
    #[must_use]
    pub fn long_int_value(&self) -> i64 {
        match &self.value {
            MockValue::Int(v) => i64::from(*v),
            MockValue::UnsignedInt(v) => i64::from(*v),
            MockValue::LongInt(v) => *v,
            MockValue::UnsignedLongInt(v) => *v as i64,
            MockValue::Double(v) => *v as i64,
            _ => 0,
        }
    }

    /// Stored value as `unsigned long int`
    #[must_use]
    pub fn unsigned_long_int_value(&self) -> u64 {
        match &self.value {
            MockValue::Int(v) => *v as u64,
            MockValue::UnsignedInt(v) => u64::from(*v),
            MockValue::LongInt(v) => *v as u64,
            MockValue::UnsignedLongInt(v) => *v,
            MockValue::Double(v) => *v as u64,
            _ => 0,
        }
    }

    /// Stored value as `double`
    #[must_use]
    pub fn double_value(&self) -> f64 {
        match &self.value {
            MockValue::Int(v) => f64::from(*v),
            MockValue::UnsignedInt(v) => f64::from(*v),
            MockValue::LongInt(v) => *v as f64,
            MockValue::UnsignedLongInt(v) => *v as f64,
            MockValue::Double(v) => *v,
            _ => 0.0,
        }
    }

    /// Stored string, empty for other kinds
    #[must_use]
    pub fn string_value(&self) -> &str {
        match &self.value {
            MockValue::String(s) => s,
            _ => "",
        }
    }

    /// Stored address for `void*` (and any other address-like kind)
    #[must_use]
    pub fn pointer_value(&self) -> usize {
        match &self.value {
            MockValue::Pointer(address) | MockValue::ConstPointer(address) => *address,
            MockValue::Object(object) => object.address(),
            _ => 0,
        }
    }

    /// Stored address for `const void*`
    #[must_use]
    pub fn const_pointer_value(&self) -> usize {
        self.pointer_value()
    }

    /// Stored memory buffer, empty for other kinds
    #[must_use]
    pub fn memory_buffer(&self) -> &[u8] {
        match &self.value {
            MockValue::MemoryBuffer(bytes) => bytes,
            _ => &[],
        }
    }

    /// Stored object, if this is an object value
    #[must_use]
    pub fn object_value(&self) -> Option<&ObjectValue> {
        match &self.value {
            MockValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Native-endian bytes of the value, where it has a byte representation
    #[must_use]
    pub fn as_bytes(&self) -> Option<Cow<'_, [u8]>> {
        let bytes = match &self.value {
            MockValue::Int(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            MockValue::UnsignedInt(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            MockValue::LongInt(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            MockValue::UnsignedLongInt(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            MockValue::Double(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            MockValue::String(s) => Cow::Borrowed(s.as_bytes()),
            MockValue::MemoryBuffer(bytes) => Cow::Borrowed(bytes.as_slice()),
            MockValue::Pointer(_) | MockValue::ConstPointer(_) | MockValue::Object(_) => {
                return None
            }
        };
        Some(bytes)
    }

    /// Compare values (names are not compared)
    ///
    /// Objects are compared through `comparators`, or through the current
    /// registry when none is given.
    #[must_use]
    pub fn compare(&self, other: &Self, comparators: Option<&ComparatorRegistry>) -> Comparison {
        match (&self.value, &other.value) {
            (MockValue::Int(a), MockValue::Int(b)) => Comparison::from_bool(a == b),
            (MockValue::UnsignedInt(a), MockValue::UnsignedInt(b)) => Comparison::from_bool(a == b),
            (MockValue::LongInt(a), MockValue::LongInt(b)) => Comparison::from_bool(a == b),
            (MockValue::UnsignedLongInt(a), MockValue::UnsignedLongInt(b)) => {
                Comparison::from_bool(a == b)
            }
            (MockValue::Double(a), MockValue::Double(b)) => {
                Comparison::from_bool((a - b).abs() <= DOUBLE_TOLERANCE)
            }
            (MockValue::String(a), MockValue::String(b)) => Comparison::from_bool(a == b),
            (MockValue::Pointer(a), MockValue::Pointer(b))
            | (MockValue::ConstPointer(a), MockValue::ConstPointer(b)) => {
                Comparison::from_bool(a == b)
            }
            (MockValue::MemoryBuffer(a), MockValue::MemoryBuffer(b)) => {
                Comparison::from_bool(a == b)
            }
            (MockValue::Object(a), MockValue::Object(b)) => {
                if a.type_name() != b.type_name() {
                    return Comparison::TypeMismatch;
                }
                let comparator = ComparatorRegistry::resolve(comparators)
                    .and_then(|registry| registry.comparator_for_type(a.type_name()));
                match comparator {
                    Some(comparator) => {
                        Comparison::from_bool(comparator.is_equal(&*a.handle, &*b.handle))
                    }
                    None => {
                        tracing::debug!(type_name = a.type_name(), "no comparator for object type");
                        Comparison::NoComparator {
                            type_name: a.type_name().to_string(),
                        }
                    }
                }
            }
            _ => Comparison::TypeMismatch,
        }
    }

    /// Whether the values are equal, using the current registry for objects
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.compare(other, None).is_equal()
    }

    /// Render the value, using the current registry for objects
    #[must_use]
    pub fn value_to_string(&self) -> String {
        self.value_to_string_with(None)
    }

    /// Render the value, using `comparators` (or the current registry) for objects
    #[must_use]
    pub fn value_to_string_with(&self, comparators: Option<&ComparatorRegistry>) -> String {
        match &self.value {
            MockValue::Int(v) => v.to_string(),
            MockValue::UnsignedInt(v) => diagnostics::format_unsigned_int(*v),
            MockValue::LongInt(v) => v.to_string(),
            MockValue::UnsignedLongInt(v) => diagnostics::format_unsigned_long_int(*v),
            MockValue::Double(v) => v.to_string(),
            MockValue::String(s) => s.clone(),
            MockValue::Pointer(address) | MockValue::ConstPointer(address) => {
                diagnostics::format_address(*address)
            }
            MockValue::MemoryBuffer(bytes) => diagnostics::format_memory_buffer(bytes),
            MockValue::Object(object) => ComparatorRegistry::resolve(comparators)
                .and_then(|registry| registry.comparator_for_type(object.type_name()))
                .map_or_else(
                    || diagnostics::no_comparator_message(object.type_name()),
                    |comparator| comparator.value_to_string(&*object.handle),
                ),
        }
    }

    /// Render as `<type> <name>: <value>`
    #[must_use]
    pub fn describe_with(&self, comparators: Option<&ComparatorRegistry>) -> String {
        diagnostics::format_parameter(
            self.type_name(),
            &self.name,
            &self.value_to_string_with(comparators),
        )
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe_with(None))
    }
}
