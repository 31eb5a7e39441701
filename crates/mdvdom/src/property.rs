//! Static property information for HTML fields.
//!
//! Each entry records the DOM property name, the HTML attribute name, and how
//! the field behaves: whether it must be set as an attribute, and whether it
//! is boolean or overloaded boolean (`true`, `false` or a string, like
//! `download`).

use std::collections::HashMap;
use std::sync::LazyLock;

const MUST_USE_ATTRIBUTE: u8 = 1;
const BOOLEAN: u8 = 1 << 1;
const OVERLOADED_BOOLEAN: u8 = 1 << 2;

/// Behavior of one known HTML field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    /// DOM property name (`className`).
    pub name: &'static str,
    /// HTML attribute name (`class`).
    pub attribute_name: String,
    flags: u8,
}

impl PropertyInfo {
    fn new(name: &'static str, attribute_name: String, flags: u8) -> Self {
        Self {
            name,
            attribute_name,
            flags,
        }
    }

    /// Field must be set with `setAttribute`, never as a DOM property.
    #[must_use]
    pub fn must_use_attribute(&self) -> bool {
        self.flags & MUST_USE_ATTRIBUTE != 0
    }

    /// Field is present or absent; any truthy value means present.
    #[must_use]
    pub fn boolean(&self) -> bool {
        self.flags & BOOLEAN != 0
    }

    /// Field accepts `true`, `false` or a string; `false` means absent.
    #[must_use]
    pub fn overloaded_boolean(&self) -> bool {
        self.flags & OVERLOADED_BOOLEAN != 0
    }
}

// Names that differ between DOM property and HTML attribute.
const RENAMED: &[(&str, &str, u8)] = &[
    ("acceptCharset", "accept-charset", 0),
    ("className", "class", 0),
    ("htmlFor", "for", 0),
    ("httpEquiv", "http-equiv", 0),
];

// Names that are the same in both, modulo case (`tabIndex` vs `tabindex`).
const KNOWN: &[(&str, u8)] = &[
    ("accept", 0),
    ("accessKey", 0),
    ("action", 0),
    ("allowFullScreen", MUST_USE_ATTRIBUTE | BOOLEAN),
    ("allowTransparency", MUST_USE_ATTRIBUTE),
    ("alt", 0),
    ("async", BOOLEAN),
    ("autoComplete", 0),
    ("autoPlay", BOOLEAN),
    ("capture", MUST_USE_ATTRIBUTE | BOOLEAN),
    ("cellPadding", 0),
    ("cellSpacing", 0),
    ("charSet", MUST_USE_ATTRIBUTE),
    ("checked", BOOLEAN),
    ("classID", MUST_USE_ATTRIBUTE),
    ("cols", MUST_USE_ATTRIBUTE),
    ("colSpan", 0),
    ("content", 0),
    ("contentEditable", 0),
    ("contextMenu", MUST_USE_ATTRIBUTE),
    ("controls", BOOLEAN),
    ("coords", 0),
    ("crossOrigin", 0),
    ("data", 0),
    ("dateTime", MUST_USE_ATTRIBUTE),
    ("default", BOOLEAN),
    ("defer", BOOLEAN),
    ("dir", 0),
    ("disabled", MUST_USE_ATTRIBUTE | BOOLEAN),
    ("download", OVERLOADED_BOOLEAN),
    ("draggable", 0),
    ("encType", 0),
    ("form", MUST_USE_ATTRIBUTE),
    ("formAction", MUST_USE_ATTRIBUTE),
    ("formEncType", MUST_USE_ATTRIBUTE),
    ("formMethod", MUST_USE_ATTRIBUTE),
    ("formNoValidate", BOOLEAN),
    ("formTarget", MUST_USE_ATTRIBUTE),
    ("frameBorder", MUST_USE_ATTRIBUTE),
    ("headers", 0),
    ("height", MUST_USE_ATTRIBUTE),
    ("hidden", MUST_USE_ATTRIBUTE | BOOLEAN),
    ("high", 0),
    ("href", 0),
    ("hrefLang", 0),
    ("icon", 0),
    ("id", 0),
    ("inputMode", MUST_USE_ATTRIBUTE),
    ("is", MUST_USE_ATTRIBUTE),
    ("label", 0),
    ("lang", 0),
    ("list", MUST_USE_ATTRIBUTE),
    ("loop", BOOLEAN),
    ("low", 0),
    ("manifest", MUST_USE_ATTRIBUTE),
    ("marginHeight", 0),
    ("marginWidth", 0),
    ("max", 0),
    ("maxLength", MUST_USE_ATTRIBUTE),
    ("media", MUST_USE_ATTRIBUTE),
    ("mediaGroup", 0),
    ("method", 0),
    ("min", 0),
    ("minLength", MUST_USE_ATTRIBUTE),
    ("multiple", BOOLEAN),
    ("muted", BOOLEAN),
    ("name", 0),
    ("noValidate", BOOLEAN),
    ("open", BOOLEAN),
    ("optimum", 0),
    ("pattern", 0),
    ("placeholder", 0),
    ("poster", 0),
    ("preload", 0),
    ("radioGroup", 0),
    ("readOnly", BOOLEAN),
    ("rel", 0),
    ("required", BOOLEAN),
    ("reversed", BOOLEAN),
    ("role", MUST_USE_ATTRIBUTE),
    ("rows", MUST_USE_ATTRIBUTE),
    ("rowSpan", 0),
    ("sandbox", 0),
    ("scope", 0),
    ("scoped", BOOLEAN),
    ("scrolling", 0),
    ("seamless", MUST_USE_ATTRIBUTE | BOOLEAN),
    ("selected", BOOLEAN),
    ("shape", 0),
    ("size", MUST_USE_ATTRIBUTE),
    ("sizes", MUST_USE_ATTRIBUTE),
    ("span", 0),
    ("spellCheck", 0),
    ("src", 0),
    ("srcDoc", 0),
    ("srcSet", MUST_USE_ATTRIBUTE),
    ("start", 0),
    ("step", 0),
    ("style", 0),
    ("tabIndex", 0),
    ("target", 0),
    ("title", 0),
    ("type", 0),
    ("useMap", 0),
    ("value", 0),
    ("width", MUST_USE_ATTRIBUTE),
    ("wmode", MUST_USE_ATTRIBUTE),
    // Non-standard
    ("autoCapitalize", 0),
    ("autoCorrect", 0),
    ("itemProp", MUST_USE_ATTRIBUTE),
    ("itemScope", MUST_USE_ATTRIBUTE | BOOLEAN),
    ("itemType", MUST_USE_ATTRIBUTE),
    ("itemID", MUST_USE_ATTRIBUTE),
    ("itemRef", MUST_USE_ATTRIBUTE),
    ("property", 0),
    ("unselectable", MUST_USE_ATTRIBUTE),
    // Inline-only in Markdown output
    ("align", 0),
];

/// Lookup keyed by lower-cased DOM name and lower-cased attribute name.
static TABLE: LazyLock<HashMap<String, PropertyInfo>> = LazyLock::new(|| {
    let renamed = RENAMED
        .iter()
        .map(|&(name, attribute, flags)| PropertyInfo::new(name, attribute.to_owned(), flags));
    let known = KNOWN
        .iter()
        .map(|&(name, flags)| PropertyInfo::new(name, name.to_ascii_lowercase(), flags));

    let mut table = HashMap::new();
    for info in renamed.chain(known) {
        table.insert(info.name.to_ascii_lowercase(), info.clone());
        table.insert(info.attribute_name.clone(), info);
    }
    table
});

/// Look up property information by DOM name or attribute name.
///
/// Matching is case-insensitive, so `className`, `classname` and `class`
/// all resolve to the same entry.
#[must_use]
pub fn find(name: &str) -> Option<&'static PropertyInfo> {
    TABLE.get(&name.to_ascii_lowercase())
}

/// HTML attribute name for a DOM property or attribute name.
///
/// Unknown names are returned unchanged.
#[must_use]
pub fn attribute_name(name: &str) -> &str {
    find(name).map_or(name, |info| info.attribute_name.as_str())
}
