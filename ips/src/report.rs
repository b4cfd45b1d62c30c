//! The records of an `.ips` crash report.
//!
//! An `.ips` file is two JSON documents separated by a newline: a small
//! [`Metadata`] header and the [`Report`] payload. Nearly everything in the
//! payload is optional; which fields show up depends on the OS release, the
//! kind of crash and the architecture of the crashed process.
//!
//! Every object record keeps keys it doesn't know about in a flattened
//! `extra` map. Known keys whose value doesn't fit the field's type, and
//! explicit `null`s, are kept there as well, so serializing a decoded record
//! yields the object it was decoded from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::lenient::lenient_records;

pub use crate::thread_state::{Register, RegisterSet, ThreadState};

/// The `bug_type` of a crash report. Other values denote other kinds of
/// diagnostic reports (hangs, jetsam events, panics...) which share the
/// container but not the payload schema.
pub const CRASH_BUG_TYPE: &str = "309";

/// The first line of an `.ips` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Metadata {
    /// The kind of report; only [`CRASH_BUG_TYPE`] is understood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bug_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the report was written, e.g. `2023-04-02 10:12:51.00 +0200`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Human readable OS version, e.g. `macOS 13.3 (22E252)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// `true` if this header announces a crash report.
    pub fn is_crash_report(&self) -> bool {
        self.bug_type.as_deref() == Some(CRASH_BUG_TYPE)
    }
}

/// A flag that is written either as a JSON boolean or as `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match *self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

/// The payload of an `.ips` crash report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct Report {
    // Process identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_info: Option<BundleInfo>,
    #[serde(rename = "userID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(rename = "codeSigningID", default, skip_serializing_if = "Option::is_none")]
    pub code_signing_id: Option<String>,
    #[serde(
        rename = "codeSigningTeamID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub code_signing_team_id: Option<String>,

    // Related processes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_proc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_pid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coalition_name: Option<String>,
    #[serde(rename = "coalitionID", default, skip_serializing_if = "Option::is_none")]
    pub coalition_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_proc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_pid: Option<i64>,

    // System identity
    /// e.g. `ARM-64` or `X86-64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_type: Option<String>,
    /// Hardware model, e.g. `MacBookPro18,3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<OsVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_beta: Option<Flag>,
    /// Whether the process ran under Rosetta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_mode: Option<Flag>,
    /// System Integrity Protection status, e.g. `enabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sip: Option<String>,

    // Timing and identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_launch: Option<String>,
    /// Seconds since boot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_reporter_key: Option<String>,
    #[serde(rename = "sleepWakeUUID", default, skip_serializing_if = "Option::is_none")]
    pub sleep_wake_uuid: Option<String>,

    // The crash itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<Exception>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<Termination>,
    /// Index into `threads` of the thread that crashed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faulting_thread: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<Thread>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_images: Option<Vec<Image>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exception_backtrace: Option<Vec<Frame>>,

    // Diagnostics
    /// Application Specific Information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asi: Option<IndexMap<String, AsiValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_mods: Option<ExtMods>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_region_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_log: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// A payload that isn't a JSON object, kept as-is. Every other field is
    /// empty when this is set.
    #[serde(skip)]
    pub verbatim: Option<Value>,
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.verbatim {
            Some(ref payload) => payload.serialize(serializer),
            None => Report::serialize(self, serializer),
        }
    }
}

lenient_records!(@deserialize Report);

impl Report {
    /// Type a parsed payload. This never fails: see [`Report::verbatim`] and
    /// [`Report::extra`].
    pub fn from_json(payload: Value) -> Report {
        match payload {
            Value::Object(fields) => crate::lenient::from_map(fields),
            other => Report {
                verbatim: Some(other),
                ..Report::default()
            },
        }
    }

    pub fn threads(&self) -> &[Thread] {
        self.threads.as_deref().unwrap_or_default()
    }

    pub fn used_images(&self) -> &[Image] {
        self.used_images.as_deref().unwrap_or_default()
    }

    pub fn last_exception_backtrace(&self) -> &[Frame] {
        self.last_exception_backtrace.as_deref().unwrap_or_default()
    }

    pub fn filtered_log(&self) -> &[String] {
        self.filtered_log.as_deref().unwrap_or_default()
    }

    /// The thread `faultingThread` points at, if both exist.
    pub fn faulting_thread(&self) -> Option<&Thread> {
        self.faulting_thread
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.threads().get(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct BundleInfo {
    #[serde(rename = "CFBundleIdentifier", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(
        rename = "CFBundleShortVersionString",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub short_version: Option<String>,
    #[serde(rename = "CFBundleVersion", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct OsVersion {
    /// e.g. `macOS 13.3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The mach exception (and the signal it was translated to).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Exception {
    /// e.g. `EXC_BAD_ACCESS`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
    /// e.g. `SIGSEGV`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Who terminated the process, and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct Termination {
    /// e.g. `SIGNAL` or `CODESIGNING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_proc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_pid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A binary image loaded into the process.
///
/// Images with a `size` of 0 are placeholders: frames may still point at
/// them, but they don't describe a real mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// e.g. `arm64e` or `x86_64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "CFBundleIdentifier", default, skip_serializing_if = "Option::is_none")]
    pub bundle_identifier: Option<String>,
    #[serde(
        rename = "CFBundleShortVersionString",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle_short_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    /// `false` for zero-sized placeholder entries.
    pub fn is_mapped(&self) -> bool {
        self.size.unwrap_or(0) != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The dispatch queue the thread was servicing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_state: Option<ThreadState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Thread {
    pub fn frames(&self) -> &[Frame] {
        self.frames.as_deref().unwrap_or_default()
    }

    pub fn triggered(&self) -> bool {
        self.triggered.unwrap_or(false)
    }
}

/// One entry of a backtrace, relative to an image in `usedImages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Offset of the instruction from the start of `symbol`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_location: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Frame {
    /// The image `imageIndex` refers to, if it is in range.
    pub fn image<'a>(&self, images: &'a [Image]) -> Option<&'a Image> {
        self.image_index
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| images.get(index))
    }
}

/// A value of the Application Specific Information map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AsiValue {
    String(String),
    List(Vec<String>),
    Other(Value),
}

/// Counts of calls that modified this process (or were made by it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct ExtMods {
    /// Calls made by other processes targeting this process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeted: Option<CallCounts>,
    /// Calls made by this process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<CallCounts>,
    /// Calls made by all processes on this machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<CallCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct CallCounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_for_pid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_create: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_set_state: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

lenient_records!(
    Metadata,
    BundleInfo,
    OsVersion,
    Exception,
    Termination,
    Image,
    Thread,
    Frame,
    ExtMods,
    CallCounts,
);

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_lookup() {
        let report: Report = serde_json::from_value(json!({
            "usedImages": [
                { "base": 4096, "size": 256, "name": "A" },
                { "base": 0, "size": 0, "source": "A" },
            ],
        }))
        .unwrap();
        let images = report.used_images();
        let frame = |index| Frame {
            image_index: Some(index),
            ..Frame::default()
        };

        assert_eq!(frame(0).image(images).unwrap().name.as_deref(), Some("A"));
        assert!(frame(0).image(images).unwrap().is_mapped());
        assert!(!frame(1).image(images).unwrap().is_mapped());
        assert_eq!(frame(2).image(images), None);
        assert_eq!(frame(-1).image(images), None);
        assert_eq!(Frame::default().image(images), None);
    }

    #[test]
    fn test_faulting_thread() {
        let report: Report = serde_json::from_value(json!({
            "faultingThread": 1,
            "threads": [
                { "id": 100 },
                { "id": 101, "triggered": true, "queue": "com.apple.main-thread" },
            ],
        }))
        .unwrap();

        let thread = report.faulting_thread().unwrap();
        assert_eq!(thread.id, Some(101));
        assert!(thread.triggered());
        assert!(!report.threads()[0].triggered());
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let report = Report::default();
        assert!(report.threads().is_empty());
        assert!(report.used_images().is_empty());
        assert!(report.last_exception_backtrace().is_empty());
        assert!(report.filtered_log().is_empty());
        assert_eq!(report.faulting_thread(), None);
    }

    #[test]
    fn test_asi_values() {
        let report: Report = serde_json::from_value(json!({
            "asi": {
                "libsystem_c.dylib": ["abort() called"],
                "CoreFoundation": "*** Terminating app",
                "weird": 7,
            },
        }))
        .unwrap();

        let asi = report.asi.unwrap();
        let keys: Vec<_> = asi.keys().map(String::as_str).collect();
        assert_eq!(keys, ["libsystem_c.dylib", "CoreFoundation", "weird"]);
        assert_eq!(
            asi["libsystem_c.dylib"],
            AsiValue::List(vec![String::from("abort() called")])
        );
        assert_eq!(
            asi["CoreFoundation"],
            AsiValue::String(String::from("*** Terminating app"))
        );
        assert_eq!(asi["weird"], AsiValue::Other(json!(7)));
    }

    #[test]
    fn test_flags() {
        let report: Report = serde_json::from_value(json!({
            "developerMode": 1,
            "isBeta": false,
        }))
        .unwrap();
        assert!(report.developer_mode.unwrap().is_set());
        assert!(!report.is_beta.unwrap().is_set());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let value = json!({
            "procName": "Finder",
            "storeInfo": { "deviceIdentifierForVendor": "F00" },
            "bundleInfo": { "CFBundleIdentifier": "com.apple.finder", "DTAppStoreToolsBuild": "14E221" },
        });
        let report: Report = serde_json::from_value(value.clone()).unwrap();
        assert!(report.extra.contains_key("storeInfo"));
        assert_eq!(serde_json::to_value(&report).unwrap(), value);
    }

    #[test]
    fn test_mistyped_fields_are_kept() {
        let value = json!({
            "procName": "Widget",
            "pid": "abc",
            "uptime": -3,
            "threads": [{ "id": 1 }, 5],
        });
        let report: Report = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(report.proc_name.as_deref(), Some("Widget"));
        assert_eq!(report.pid, None);
        assert_eq!(report.uptime, None);
        assert!(report.threads().is_empty());
        assert_eq!(report.extra.get("pid"), Some(&json!("abc")));
        assert_eq!(report.extra.get("threads"), Some(&json!([{ "id": 1 }, 5])));
        assert_eq!(serde_json::to_value(&report).unwrap(), value);
    }

    #[test]
    fn test_nested_mistyped_fields() {
        let value = json!({
            "exception": { "type": 5, "signal": "SIGSEGV" },
            "threads": [{
                "id": 1,
                "triggered": "yes",
                "frames": [{ "imageIndex": 0, "imageOffset": "0x10" }],
            }],
        });
        let report: Report = serde_json::from_value(value.clone()).unwrap();

        let exception = report.exception.as_ref().unwrap();
        assert_eq!(exception.exception_type, None);
        assert_eq!(exception.signal.as_deref(), Some("SIGSEGV"));
        assert_eq!(exception.extra.get("type"), Some(&json!(5)));

        let thread = &report.threads()[0];
        assert!(!thread.triggered());
        assert_eq!(thread.frames()[0].image_index, Some(0));
        assert_eq!(thread.frames()[0].image_offset, None);
        assert_eq!(serde_json::to_value(&report).unwrap(), value);
    }

    #[test]
    fn test_explicit_nulls_survive() {
        let value = json!({
            "procName": null,
            "bundleInfo": { "CFBundleIdentifier": null },
            "usedImages": [{ "base": 4096, "name": null }],
            "somethingNew": null,
        });
        let report: Report = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(report.proc_name, None);
        assert_eq!(report.extra.get("procName"), Some(&Value::Null));
        assert_eq!(report.used_images()[0].base, Some(4096));
        assert_eq!(serde_json::to_value(&report).unwrap(), value);
    }

    #[test]
    fn test_non_object_payload() {
        let report = Report::from_json(json!([]));
        assert_eq!(report.verbatim, Some(json!([])));
        assert!(report.threads().is_empty());
        assert_eq!(serde_json::to_value(&report).unwrap(), json!([]));

        let report = Report::from_json(json!({ "pid": 1 }));
        assert_eq!(report.verbatim, None);
        assert_eq!(report.pid, Some(1));
    }

    #[test]
    fn test_metadata_mistyped_fields() {
        let value = json!({ "bug_type": "309", "timestamp": 1_680_423_171, "name": "Widget" });
        let metadata: Metadata = serde_json::from_value(value.clone()).unwrap();
        assert!(metadata.is_crash_report());
        assert_eq!(metadata.timestamp, None);
        assert_eq!(metadata.name.as_deref(), Some("Widget"));
        assert_eq!(metadata.extra.get("timestamp"), Some(&json!(1_680_423_171)));
        assert_eq!(serde_json::to_value(&metadata).unwrap(), value);
    }
}
