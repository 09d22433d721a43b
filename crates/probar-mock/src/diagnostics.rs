//! Diagnostic rendering for values, calls and expectation lists.
//!
//! Everything here produces plain strings for failure messages; nothing
//! decides whether a test fails.

/// Indentation used for call lines inside a failure message
pub const CALL_LIST_INDENT: &str = "\t\t";

/// Marker for an empty call list
pub const NO_CALLS: &str = "<none>";

/// Rendered value of an output parameter in an expectation
pub const OUTPUT_MARKER: &str = "output";

/// Render an address as `0x` followed by lowercase hex
#[must_use]
pub fn format_address(address: usize) -> String {
    format!("{address:#x}")
}

/// Address of a borrowed object, as used for object identity
#[must_use]
pub fn address_of<T: ?Sized>(object: &T) -> usize {
    (object as *const T).cast::<()>() as usize
}

/// `unsigned int` values: right-aligned decimal plus 8-digit hex
#[must_use]
pub fn format_unsigned_int(value: u32) -> String {
    format!("{value:>10} (0x{value:08x})")
}

/// `unsigned long int` values: decimal plus unpadded hex
#[must_use]
pub fn format_unsigned_long_int(value: u64) -> String {
    format!("{value} (0x{value:x})")
}

/// Memory buffers: size and space-separated hex bytes
#[must_use]
pub fn format_memory_buffer(bytes: &[u8]) -> String {
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("Size = {} | HexContents = {}", bytes.len(), hex.join(" "))
}

/// Sentinel text for an object type without a comparator
#[must_use]
pub fn no_comparator_message(type_name: &str) -> String {
    format!("No comparator found for type: \"{type_name}\"")
}

/// One parameter inside a call description: `<type> <name>: <value>`
#[must_use]
pub fn format_parameter(type_name: &str, name: &str, value: &str) -> String {
    format!("{type_name} {name}: <{value}>")
}

/// The parts of a call that make up its one-line description
#[derive(Debug, Clone, Default)]
pub struct CallDescription<'a> {
    /// Object the call is bound to
    pub object: Option<usize>,
    /// Function name
    pub name: &'a str,
    /// Declared call order
    pub expected_order: Option<u32>,
    /// Already rendered parameters, in declaration order
    pub parameters: Vec<String>,
    /// Whether undeclared parameters are accepted
    pub ignore_other_parameters: bool,
}

impl CallDescription<'_> {
    /// Render as `<object>::<name> -> <order><parameters>`
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(object) = self.object {
            out.push_str(&format!("(object address: {})::", format_address(object)));
        }
        out.push_str(self.name);
        out.push_str(" -> ");
        if let Some(order) = self.expected_order {
            out.push_str(&format!("expected call order: <{order}> -> "));
        }

        if self.parameters.is_empty() {
            out.push_str(if self.ignore_other_parameters {
                "all parameters ignored"
            } else {
                "no parameters"
            });
        } else {
            out.push_str(&self.parameters.join(", "));
            if self.ignore_other_parameters {
                out.push_str(", other parameters are ignored");
            }
        }
        out
    }
}

/// Render call lines one per line, each indented; `<none>` when empty
#[must_use]
pub fn format_call_list<I, S>(calls: I, indent: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = calls
        .into_iter()
        .map(|call| format!("{indent}{}", call.as_ref()))
        .collect();
    if lines.is_empty() {
        format!("{indent}{NO_CALLS}")
    } else {
        lines.join("\n")
    }
}
