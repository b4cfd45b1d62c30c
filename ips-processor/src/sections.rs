//! The renderer-agnostic shape of a processed crash report.
//!
//! [`build`][crate::build] turns a report into an ordered list of
//! [`Section`]s. Renderers only ever look at these: whether a section is
//! present, how a frame's address and label were computed and which
//! registers are shown have all been decided already.

use serde::Serialize;

/// A 64-bit address, displayed (and serialized) as zero-padded hex.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Address(pub u64);

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_string()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Which part of the report a [`Section`] holds. Sections always come out of
/// the builder in the order these are declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ProcessInfo,
    ExceptionInfo,
    ApplicationSpecificInfo,
    LastExceptionBacktrace,
    Threads,
    BinaryImages,
    ExternalModificationSummary,
    VmRegionSummary,
    FilteredLog,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::ProcessInfo => "Process Information",
            SectionKind::ExceptionInfo => "Exception Information",
            SectionKind::ApplicationSpecificInfo => "Application Specific Information",
            SectionKind::LastExceptionBacktrace => "Last Exception Backtrace",
            SectionKind::Threads => "Threads",
            SectionKind::BinaryImages => "Binary Images",
            SectionKind::ExternalModificationSummary => "External Modification Summary",
            SectionKind::VmRegionSummary => "VM Region Summary",
            SectionKind::FilteredLog => "Filtered Log",
        }
    }

    /// Whether renderers should start with this section folded away.
    pub fn collapsed_by_default(&self) -> bool {
        matches!(
            self,
            SectionKind::BinaryImages
                | SectionKind::ExternalModificationSummary
                | SectionKind::VmRegionSummary
                | SectionKind::FilteredLog
        )
    }
}

/// A titled part of a crash report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub collapsed: bool,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Section {
        Section {
            kind,
            title: String::from(kind.title()),
            collapsed: kind.collapsed_by_default(),
            items: Vec::new(),
        }
    }

    pub fn with_items(kind: SectionKind, items: Vec<Item>) -> Section {
        Section {
            items,
            ..Section::new(kind)
        }
    }

    /// All the fields directly in this section.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.items.iter().filter_map(|item| match item {
            Item::Field(field) => Some(field),
            _ => None,
        })
    }

    /// The value of the first field labelled `label`.
    pub fn field(&self, label: &str) -> Option<&FieldValue> {
        self.fields().find(|f| f.label == label).map(|f| &f.value)
    }
}

/// One entry of a [`Section`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Field(Field),
    /// Verbatim text, possibly spanning several lines.
    Text { text: String },
    Frame(FrameRow),
    Thread(ThreadBlock),
    Image(ImageRow),
    Group(Group),
}

/// A labelled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<FieldValue>) -> Field {
        Field {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(String::from(s))
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// A resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRow {
    /// Position of the frame in its backtrace, innermost first.
    pub index: usize,
    /// Name of the image the frame is in, `Unknown` if there is none.
    pub image_name: String,
    /// Absolute address of the frame's instruction.
    pub address: Address,
    /// The symbol (or a `base + offset` expression standing in for one).
    pub label: String,
    /// `file:line`, when the report has source info for the frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A thread with its backtrace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadBlock {
    pub header: ThreadHeader,
    pub collapsed: bool,
    pub frames: Vec<FrameRow>,
    /// Register state, only for the thread that crashed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registers: Option<RegisterBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadHeader {
    /// Position of the thread in the report.
    pub index: usize,
    /// The thread's id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    pub crashed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// e.g. `ARM Thread State (64-bit)`.
    pub title: String,
    pub rows: Vec<RegisterRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterWidth {
    Bits32,
    Bits64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRow {
    /// Name of the register in the report.
    pub name: String,
    /// Name to display, usually the same as `name`.
    pub label: String,
    pub value: Address,
    pub width: RegisterWidth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Symbol the value points into, e.g. `abort + 180`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// A loaded binary image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRow {
    pub start: Address,
    /// Last address of the image (inclusive).
    pub end: Address,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A titled run of items nested inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub title: String,
    pub collapsed: bool,
    pub items: Vec<Item>,
}
