//! Text formatting of reverse call results
//!
//! Results are compared as strings by the host, so the layout here is
//! fixed: arrays and vectors as `{a, b, c}`, struct-like results as fields
//! joined by `|`.

use std::fmt::Display;

use xcall_sdk::{Matrix4x4, Pointer};

/// `v` with exactly `digits` decimals
pub fn fixed<T: Display>(v: T, digits: usize) -> String {
    format!("{:.*}", digits, v)
}

/// `v` with at most three decimals, trailing zeros and dot removed
pub fn trimmed(v: f32) -> String {
    let text = fixed(v, 3);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// `{a, b, c}`
pub fn braced<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let parts: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("{{{}}}", parts.join(", "))
}

/// `'text'`
pub fn quoted(text: &str) -> String {
    format!("'{}'", text)
}

/// Pointer as `0x` followed by lowercase hex
pub fn hex(ptr: Pointer) -> String {
    ptr.to_string()
}

/// Vector components with one decimal, braced
pub fn vector(components: &[f32]) -> String {
    braced(components.iter().map(|c| fixed(c, 1)))
}

/// Matrix as braced rows
pub fn matrix(m: &Matrix4x4) -> String {
    braced((0..4).map(|r| vector(&m.row(r).to_array())))
}

/// Fields joined by `|`
pub fn fields(parts: &[String]) -> String {
    parts.join("|")
}
