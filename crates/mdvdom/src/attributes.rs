//! Attribute mapper: property vs. attribute placement.
//!
//! Every field an element is built with goes through [`classify`], which
//! decides whether the field is dropped, which name it is stored under, and
//! whether a backend should set it as a DOM property or an HTML attribute.

use crate::property;
use crate::tree::AttributeValue;

/// Where a backend should apply a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Set as a DOM property (`element.className = ...`).
    Property,
    /// Set as an HTML attribute (`element.setAttribute(...)`).
    Attribute,
}

/// Outcome of classifying one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    pub placement: Placement,
    pub name: String,
    pub value: AttributeValue,
}

/// Classify a raw field.
///
/// Returns `None` when the field must be omitted: a null value, a falsy value
/// for a boolean field, or `false` for an overloaded boolean field.
///
/// # Examples
///
/// ```
/// use mdvdom::{AttributeValue, Placement, classify};
///
/// let download = classify("download", Some(&AttributeValue::Bool(true))).unwrap();
/// assert_eq!(download.placement, Placement::Property);
/// assert_eq!(download.value, AttributeValue::Bool(true));
///
/// assert!(classify("download", Some(&AttributeValue::Bool(false))).is_none());
/// assert!(classify("async", Some(&AttributeValue::Bool(false))).is_none());
/// ```
#[must_use]
pub fn classify(name: &str, value: Option<&AttributeValue>) -> Option<Classified> {
    let value = value?;
    let info = property::find(name);

    if let Some(info) = info {
        let omit = (info.boolean() && !value.is_truthy())
            || (info.overloaded_boolean() && *value == AttributeValue::Bool(false));
        if omit {
            return None;
        }
    }

    let Some(info) = info else {
        return Some(Classified {
            placement: Placement::Attribute,
            name: kebab_case(name),
            value: value.clone(),
        });
    };

    let value = if info.boolean() {
        AttributeValue::Bool(true)
    } else {
        value.clone()
    };
    let placement = if info.must_use_attribute() {
        Placement::Attribute
    } else {
        Placement::Property
    };

    Some(Classified {
        placement,
        name: info.name.to_owned(),
        value,
    })
}

/// Convert a field name to kebab case (`dataLineNumber` -> `data-line-number`).
///
/// Underscores, spaces and existing dashes all become single dashes.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
