// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use ips::{AsiValue, CallCounts, Metadata, Report, Thread};
use tracing::debug;

use crate::registers::register_block;
use crate::sections::*;
use crate::symbols::resolve_frames;

/// Build the sections of a crash report, in reading order.
///
/// Process, exception, thread and binary image sections are always
/// present; the others only when the report has something to put in them.
/// This never fails: anything missing from the report is simply left out.
///
/// # Examples
///
/// ```
/// use ips_processor::SectionKind;
///
/// let raw = "{\"bug_type\":\"309\"}\n{\"procName\":\"Finder\",\"pid\":421}";
/// let (metadata, report) = ips::decode(raw).unwrap();
/// let sections = ips_processor::build(&report, &metadata);
///
/// let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         SectionKind::ProcessInfo,
///         SectionKind::ExceptionInfo,
///         SectionKind::Threads,
///         SectionKind::BinaryImages,
///     ]
/// );
/// ```
pub fn build(report: &Report, metadata: &Metadata) -> Vec<Section> {
    let mut sections = vec![process_info(report, metadata), exception_info(report)];
    sections.extend(application_specific_info(report));
    sections.extend(last_exception_backtrace(report));
    sections.push(threads(report));
    sections.push(binary_images(report));
    sections.extend(external_modifications(report));
    sections.extend(vm_region_summary(report));
    sections.extend(filtered_log(report));
    sections
}

/// `name [pid]`, or whichever half is known.
fn name_and_pid(name: Option<&str>, pid: Option<i64>) -> Option<String> {
    match (name, pid) {
        (Some(name), Some(pid)) => Some(format!("{name} [{pid}]")),
        (Some(name), None) => Some(String::from(name)),
        (None, Some(pid)) => Some(format!("??? [{pid}]")),
        (None, None) => None,
    }
}

/// Accumulates the fields of a section, skipping absent values.
#[derive(Default)]
struct Fields(Vec<Item>);

impl Fields {
    fn text(&mut self, label: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.0
                .push(Item::Field(Field::new(label, FieldValue::Text(value.into()))));
        }
    }

    fn integer(&mut self, label: &str, value: Option<i64>) {
        if let Some(value) = value {
            self.0.push(Item::Field(Field::new(label, value)));
        }
    }
}

fn process_info(report: &Report, metadata: &Metadata) -> Section {
    let mut fields = Fields::default();
    let bundle = report.bundle_info.as_ref();

    fields.text(
        "Process",
        name_and_pid(report.proc_name.as_deref(), report.pid),
    );
    fields.text("Path", report.proc_path.as_deref());
    fields.text("Identifier", bundle.and_then(|b| b.identifier.as_deref()));
    let version = bundle.and_then(|b| match (&b.short_version, &b.version) {
        (Some(short), Some(long)) => Some(format!("{short} ({long})")),
        (Some(v), None) | (None, Some(v)) => Some(v.clone()),
        (None, None) => None,
    });
    fields.text("Version", version);
    let code_type = report.cpu_type.as_ref().map(|cpu| match report.translated {
        Some(true) => format!("{cpu} (Translated)"),
        Some(false) => format!("{cpu} (Native)"),
        None => cpu.clone(),
    });
    fields.text("Code Type", code_type);
    fields.text("Role", report.proc_role.as_deref());
    fields.text(
        "Parent Process",
        name_and_pid(report.parent_proc.as_deref(), report.parent_pid),
    );
    fields.text(
        "Coalition",
        name_and_pid(report.coalition_name.as_deref(), report.coalition_id),
    );
    fields.text(
        "Responsible Process",
        name_and_pid(report.responsible_proc.as_deref(), report.responsible_pid),
    );
    fields.integer("User ID", report.user_id);
    fields.text("Code Signing ID", report.code_signing_id.as_deref());
    fields.text(
        "Team ID",
        report.code_signing_team_id.as_deref().filter(|t| !t.is_empty()),
    );

    fields.text(
        "Date/Time",
        report
            .capture_time
            .as_deref()
            .or(metadata.timestamp.as_deref()),
    );
    fields.text("Launch Time", report.proc_launch.as_deref());
    fields.text("Hardware Model", report.model_code.as_deref());
    let os_version = report
        .os_version
        .as_ref()
        .and_then(|os| match (&os.train, &os.build) {
            (Some(train), Some(build)) => Some(format!("{train} ({build})")),
            (Some(v), None) | (None, Some(v)) => Some(v.clone()),
            (None, None) => None,
        })
        .or_else(|| metadata.os_version.clone());
    fields.text("OS Version", os_version);
    fields.text(
        "Release Type",
        report
            .os_version
            .as_ref()
            .and_then(|os| os.release_type.as_deref()),
    );
    fields.text(
        "Beta",
        report.is_beta.filter(|b| b.is_set()).map(|_| "YES"),
    );
    fields.text(
        "Incident Identifier",
        report
            .incident
            .as_deref()
            .or(metadata.incident_id.as_deref()),
    );
    fields.text("Crash Reporter Key", report.crash_reporter_key.as_deref());
    fields.text("Sleep/Wake UUID", report.sleep_wake_uuid.as_deref());
    fields.text(
        "Time Awake Since Boot",
        report.uptime.map(|secs| format!("{secs} seconds")),
    );
    fields.text("System Integrity Protection", report.sip.as_deref());
    fields.text(
        "Developer Mode",
        report
            .developer_mode
            .map(|mode| if mode.is_set() { "Enabled" } else { "Disabled" }),
    );

    Section::with_items(SectionKind::ProcessInfo, fields.0)
}

fn exception_info(report: &Report) -> Section {
    let mut fields = Fields::default();

    if let Some(index) = report.faulting_thread {
        let queue = report.faulting_thread().and_then(|t| t.queue.as_deref());
        match queue {
            Some(queue) => fields.text(
                "Crashed Thread",
                Some(format!("{index}  Dispatch queue: {queue}")),
            ),
            None => fields.integer("Crashed Thread", i64::try_from(index).ok()),
        }
    }

    if let Some(ref exception) = report.exception {
        let kind = match (&exception.exception_type, &exception.signal) {
            (Some(kind), Some(signal)) => Some(format!("{kind} ({signal})")),
            (Some(v), None) | (None, Some(v)) => Some(v.clone()),
            (None, None) => None,
        };
        fields.text("Exception Type", kind);
        fields.text("Exception Subtype", exception.subtype.as_deref());
        fields.text("Exception Message", exception.message.as_deref());
        fields.text("Exception Codes", exception.codes.as_deref());
    }

    if let Some(ref termination) = report.termination {
        let mut reason = Vec::new();
        if let Some(ref namespace) = termination.namespace {
            reason.push(format!("Namespace {namespace},"));
        }
        if let Some(code) = termination.code {
            reason.push(format!("Code {code}"));
        }
        if let Some(ref indicator) = termination.indicator {
            reason.push(indicator.clone());
        }
        if !reason.is_empty() {
            let reason = reason.join(" ");
            fields.text(
                "Termination Reason",
                Some(reason.strip_suffix(',').unwrap_or(&reason)),
            );
        }
        fields.text(
            "Terminating Process",
            name_and_pid(termination.by_proc.as_deref(), termination.by_pid),
        );
        if let Some(ref reasons) = termination.reasons {
            for detail in reasons {
                fields.text("Termination Details", Some(detail.as_str()));
            }
        }
    }

    fields.text("VM Region Info", report.vm_region_info.as_deref());

    Section::with_items(SectionKind::ExceptionInfo, fields.0)
}

fn application_specific_info(report: &Report) -> Option<Section> {
    let asi = report.asi.as_ref()?;
    let mut fields = Fields::default();
    for (key, value) in asi {
        match value {
            AsiValue::String(s) => fields.text(key, Some(s.as_str())),
            AsiValue::List(lines) => {
                for line in lines {
                    fields.text(key, Some(line.as_str()));
                }
            }
            AsiValue::Other(other) => fields.text(key, Some(other.to_string())),
        }
    }
    Some(Section::with_items(
        SectionKind::ApplicationSpecificInfo,
        fields.0,
    ))
}

fn last_exception_backtrace(report: &Report) -> Option<Section> {
    let frames = report.last_exception_backtrace();
    if frames.is_empty() {
        return None;
    }
    let items = resolve_frames(frames, report.used_images())
        .into_iter()
        .map(Item::Frame)
        .collect();
    Some(Section::with_items(SectionKind::LastExceptionBacktrace, items))
}

fn thread_block(report: &Report, index: usize, thread: &Thread) -> ThreadBlock {
    let crashed = thread.triggered();
    let registers = match thread.thread_state {
        Some(ref state) if crashed && report.faulting_thread.is_some() => {
            Some(register_block(state))
        }
        _ => None,
    };
    ThreadBlock {
        header: ThreadHeader {
            index,
            id: thread.id,
            name: thread.name.clone(),
            queue: thread.queue.clone(),
            crashed,
        },
        collapsed: !crashed,
        frames: resolve_frames(thread.frames(), report.used_images()),
        registers,
    }
}

fn threads(report: &Report) -> Section {
    let items = report
        .threads()
        .iter()
        .enumerate()
        .map(|(i, thread)| Item::Thread(thread_block(report, i, thread)))
        .collect();
    Section::with_items(SectionKind::Threads, items)
}

fn binary_images(report: &Report) -> Section {
    let mut items = Vec::new();
    for (i, image) in report.used_images().iter().enumerate() {
        if !image.is_mapped() {
            debug!("skipping placeholder image {i}");
            continue;
        }
        let start = image.base.unwrap_or(0);
        let size = image.size.unwrap_or(0);
        items.push(Item::Image(ImageRow {
            start: Address(start),
            end: Address(start.wrapping_add(size).wrapping_sub(1)),
            name: image.name.clone().unwrap_or_else(|| String::from("???")),
            version: image.bundle_short_version.clone(),
            arch: image.arch.clone(),
            uuid: image.uuid.clone(),
            path: image.path.clone(),
        }));
    }
    Section::with_items(SectionKind::BinaryImages, items)
}

fn call_counts(title: &str, counts: &CallCounts) -> Item {
    let mut fields = Fields::default();
    fields.integer("task_for_pid", counts.task_for_pid);
    fields.integer("thread_create", counts.thread_create);
    fields.integer("thread_set_state", counts.thread_set_state);
    Item::Group(Group {
        title: String::from(title),
        collapsed: false,
        items: fields.0,
    })
}

fn external_modifications(report: &Report) -> Option<Section> {
    let ext_mods = report.ext_mods.as_ref()?;
    let groups = [
        (
            "Calls made by other processes targeting this process",
            &ext_mods.targeted,
        ),
        ("Calls made by this process", &ext_mods.caller),
        ("Calls made by all processes on this machine", &ext_mods.system),
    ];
    let items = groups
        .into_iter()
        .filter_map(|(title, counts)| counts.as_ref().map(|c| call_counts(title, c)))
        .collect();
    Some(Section::with_items(
        SectionKind::ExternalModificationSummary,
        items,
    ))
}

fn vm_region_summary(report: &Report) -> Option<Section> {
    let summary = report.vm_summary.as_ref()?;
    Some(Section::with_items(
        SectionKind::VmRegionSummary,
        vec![Item::Text {
            text: summary.clone(),
        }],
    ))
}

fn filtered_log(report: &Report) -> Option<Section> {
    let log = report.filtered_log();
    if log.is_empty() {
        return None;
    }
    Some(Section::with_items(
        SectionKind::FilteredLog,
        vec![Item::Text {
            text: log.join("\n"),
        }],
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    fn kinds(sections: &[Section]) -> Vec<SectionKind> {
        sections.iter().map(|s| s.kind).collect()
    }

    fn value(section: &Section, label: &str) -> Option<String> {
        section.field(label).map(ToString::to_string)
    }

    #[test]
    fn test_empty_report() {
        let sections = build(&Report::default(), &Metadata::default());
        assert_eq!(
            kinds(&sections),
            [
                SectionKind::ProcessInfo,
                SectionKind::ExceptionInfo,
                SectionKind::Threads,
                SectionKind::BinaryImages,
            ]
        );
        assert!(sections.iter().all(|s| s.items.is_empty()));
    }

    #[test]
    fn test_all_sections_in_order() {
        let r = report(json!({
            "asi": { "libsystem_c.dylib": ["abort() called"] },
            "lastExceptionBacktrace": [{ "imageIndex": 0, "imageOffset": 4 }],
            "extMods": { "caller": { "task_for_pid": 1 } },
            "vmSummary": "summary",
            "filteredLog": ["a", "b"],
        }));
        let sections = build(&r, &Metadata::default());
        assert_eq!(
            kinds(&sections),
            [
                SectionKind::ProcessInfo,
                SectionKind::ExceptionInfo,
                SectionKind::ApplicationSpecificInfo,
                SectionKind::LastExceptionBacktrace,
                SectionKind::Threads,
                SectionKind::BinaryImages,
                SectionKind::ExternalModificationSummary,
                SectionKind::VmRegionSummary,
                SectionKind::FilteredLog,
            ]
        );
        assert_eq!(sections[8].items, [Item::Text { text: String::from("a\nb") }]);
        assert_eq!(sections[2].title, "Application Specific Information");
        assert!(sections[5].collapsed);
        assert!(!sections[0].collapsed);
    }

    #[test]
    fn test_empty_lists_omit_sections() {
        let r = report(json!({ "lastExceptionBacktrace": [], "filteredLog": [] }));
        let sections = build(&r, &Metadata::default());
        assert_eq!(sections.len(), 4);
    }

    #[test]
    fn test_process_info_fields() {
        let r = report(json!({
            "procName": "Widget",
            "pid": 912,
            "bundleInfo": { "CFBundleShortVersionString": "2.4.1", "CFBundleVersion": "241" },
            "cpuType": "X86-64",
            "translated": true,
            "parentProc": "launchd",
            "parentPid": 1,
            "uptime": 5000,
            "developerMode": 0,
            "codeSigningTeamID": "",
        }));
        let metadata: Metadata = serde_json::from_value(json!({
            "bug_type": "309",
            "timestamp": "2022-11-20 08:01:02.00 -0800",
            "os_version": "macOS 12.6 (21G115)",
        }))
        .unwrap();
        let section = &build(&r, &metadata)[0];

        assert_eq!(value(section, "Process").as_deref(), Some("Widget [912]"));
        assert_eq!(value(section, "Version").as_deref(), Some("2.4.1 (241)"));
        assert_eq!(value(section, "Code Type").as_deref(), Some("X86-64 (Translated)"));
        assert_eq!(value(section, "Parent Process").as_deref(), Some("launchd [1]"));
        assert_eq!(value(section, "Time Awake Since Boot").as_deref(), Some("5000 seconds"));
        assert_eq!(value(section, "Developer Mode").as_deref(), Some("Disabled"));
        assert_eq!(value(section, "Date/Time").as_deref(), Some("2022-11-20 08:01:02.00 -0800"));
        assert_eq!(value(section, "OS Version").as_deref(), Some("macOS 12.6 (21G115)"));
        assert_eq!(value(section, "Team ID"), None);
        assert_eq!(value(section, "Path"), None);
    }

    #[test]
    fn test_exception_info_fields() {
        let r = report(json!({
            "faultingThread": 0,
            "threads": [{ "triggered": true, "queue": "com.apple.main-thread" }],
            "exception": { "type": "EXC_BAD_ACCESS", "signal": "SIGSEGV", "subtype": "KERN_INVALID_ADDRESS at 0x10" },
            "termination": { "namespace": "SIGNAL", "code": 11, "indicator": "Segmentation fault: 11", "byProc": "exc handler", "byPid": 912 },
            "vmRegionInfo": "0x10 is not in any region.",
        }));
        let section = &build(&r, &Metadata::default())[1];

        assert_eq!(
            value(section, "Crashed Thread").as_deref(),
            Some("0  Dispatch queue: com.apple.main-thread")
        );
        assert_eq!(value(section, "Exception Type").as_deref(), Some("EXC_BAD_ACCESS (SIGSEGV)"));
        assert_eq!(
            value(section, "Exception Subtype").as_deref(),
            Some("KERN_INVALID_ADDRESS at 0x10")
        );
        assert_eq!(
            value(section, "Termination Reason").as_deref(),
            Some("Namespace SIGNAL, Code 11 Segmentation fault: 11")
        );
        assert_eq!(value(section, "Terminating Process").as_deref(), Some("exc handler [912]"));
        assert_eq!(
            value(section, "VM Region Info").as_deref(),
            Some("0x10 is not in any region.")
        );
    }

    #[test]
    fn test_crashed_thread_without_queue() {
        let r = report(json!({ "faultingThread": 3 }));
        let section = &build(&r, &Metadata::default())[1];
        assert_eq!(section.field("Crashed Thread"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn test_termination_namespace_only() {
        let r = report(json!({ "termination": { "namespace": "CODESIGNING" } }));
        let section = &build(&r, &Metadata::default())[1];
        assert_eq!(
            value(section, "Termination Reason").as_deref(),
            Some("Namespace CODESIGNING")
        );
    }

    #[test]
    fn test_asi_expansion() {
        let r = report(json!({
            "asi": {
                "libsystem_c.dylib": ["abort() called", "second line"],
                "CoreFoundation": "*** Terminating app",
            },
        }));
        let section = &build(&r, &Metadata::default())[2];
        let fields: Vec<_> = section
            .fields()
            .map(|f| (f.label.as_str(), f.value.to_string()))
            .collect();
        assert_eq!(
            fields,
            [
                ("libsystem_c.dylib", String::from("abort() called")),
                ("libsystem_c.dylib", String::from("second line")),
                ("CoreFoundation", String::from("*** Terminating app")),
            ]
        );
    }

    #[test]
    fn test_registers_only_for_triggered_thread() {
        let state = json!({ "flavor": "ARM_THREAD_STATE64", "pc": { "value": 1 } });
        let r = report(json!({
            "faultingThread": 1,
            "threads": [
                { "threadState": state.clone() },
                { "triggered": true, "threadState": state },
            ],
        }));
        let sections = build(&r, &Metadata::default());
        let blocks: Vec<_> = sections[2]
            .items
            .iter()
            .map(|item| match item {
                Item::Thread(block) => block,
                other => panic!("unexpected item {other:?}"),
            })
            .collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].registers.is_none());
        assert!(blocks[0].collapsed);
        assert!(!blocks[0].header.crashed);
        let registers = blocks[1].registers.as_ref().unwrap();
        assert_eq!(registers.rows.len(), 1);
        assert!(blocks[1].header.crashed);
        assert!(!blocks[1].collapsed);
    }

    #[test]
    fn test_no_registers_without_faulting_thread() {
        let r = report(json!({
            "threads": [{ "triggered": true, "threadState": { "flavor": "x86_THREAD_STATE", "rip": { "value": 1 } } }],
        }));
        let sections = build(&r, &Metadata::default());
        match sections[2].items[0] {
            Item::Thread(ref block) => {
                assert!(block.header.crashed);
                assert!(block.registers.is_none());
            }
            ref other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_images_skipped() {
        let r = report(json!({
            "usedImages": [
                { "base": 4096, "size": 256, "name": "A", "uuid": "12345678-9abc-def0-1234-56789abcdef0" },
                { "base": 8192, "size": 0, "name": "Placeholder", "path": "/usr/lib/dyld" },
                { "base": 0, "source": "A" },
            ],
        }));
        let section = &build(&r, &Metadata::default())[3];
        assert_eq!(section.kind, SectionKind::BinaryImages);
        assert_eq!(section.items.len(), 1);
        match section.items[0] {
            Item::Image(ref image) => {
                assert_eq!(image.name, "A");
                assert_eq!(image.start, Address(0x1000));
                assert_eq!(image.end, Address(0x10ff));
                assert_eq!(
                    image.uuid.as_deref(),
                    Some("12345678-9abc-def0-1234-56789abcdef0")
                );
            }
            ref other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_ext_mods_groups() {
        let r = report(json!({
            "extMods": {
                "system": { "task_for_pid": 14, "thread_create": 0 },
                "targeted": { "thread_set_state": 2 },
                "warnings": 0,
            },
        }));
        let sections = build(&r, &Metadata::default());
        let section = sections.last().unwrap();
        assert_eq!(section.kind, SectionKind::ExternalModificationSummary);
        let groups: Vec<_> = section
            .items
            .iter()
            .map(|item| match item {
                Item::Group(group) => group,
                other => panic!("unexpected item {other:?}"),
            })
            .collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].title,
            "Calls made by other processes targeting this process"
        );
        assert_eq!(
            groups[0].items,
            [Item::Field(Field::new("thread_set_state", 2i64))]
        );
        assert_eq!(groups[1].title, "Calls made by all processes on this machine");
        assert_eq!(
            groups[1].items,
            [
                Item::Field(Field::new("task_for_pid", 14i64)),
                Item::Field(Field::new("thread_create", 0i64)),
            ]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let r = report(json!({
            "procName": "Widget",
            "faultingThread": 0,
            "threads": [{ "triggered": true, "frames": [{ "imageIndex": 0, "imageOffset": 1 }] }],
            "usedImages": [{ "base": 4096, "size": 16, "name": "Widget" }],
            "asi": { "a": "b" },
        }));
        let metadata = Metadata::default();
        assert_eq!(build(&r, &metadata), build(&r, &metadata));
    }
}
