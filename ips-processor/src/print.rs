//! Reference renderers for [`Section`]s.
//!
//! These only look at sections, never at the report they came from.

use std::io::{self, Write};

use crate::sections::*;

/// Width of the label column in the process and exception sections.
const LABEL_WIDTH: usize = 22;
const REGISTERS_PER_LINE: usize = 4;

/// Knobs for [`print_sections`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Print image UUIDs without hyphens.
    pub compact_uuids: bool,
    /// Only print the process and exception summaries and the crashed thread.
    pub brief: bool,
}

fn is_header(kind: SectionKind) -> bool {
    matches!(kind, SectionKind::ProcessInfo | SectionKind::ExceptionInfo)
}

/// Write a human-readable rendition of `sections` to `f`.
pub fn print_sections<T: Write>(
    sections: &[Section],
    f: &mut T,
    options: &TextOptions,
) -> io::Result<()> {
    let mut first = true;
    for section in sections {
        if options.brief && !is_header(section.kind) && section.kind != SectionKind::Threads {
            continue;
        }
        if !first {
            writeln!(f)?;
        }
        first = false;

        if is_header(section.kind) {
            for field in section.fields() {
                writeln!(
                    f,
                    "{:<width$} {}",
                    format!("{}:", field.label),
                    field.value,
                    width = LABEL_WIDTH
                )?;
            }
            continue;
        }

        writeln!(f, "{}:", section.title)?;
        if section.kind == SectionKind::Threads {
            print_threads(&section.items, f, options)?;
        } else {
            for item in &section.items {
                print_item(item, f, options, "")?;
            }
        }
    }
    Ok(())
}

/// Write `sections` as JSON.
pub fn print_sections_json<T: Write>(
    sections: &[Section],
    f: &mut T,
    pretty: bool,
) -> Result<(), serde_json::Error> {
    if pretty {
        serde_json::to_writer_pretty(f, sections)
    } else {
        serde_json::to_writer(f, sections)
    }
}

fn print_threads<T: Write>(items: &[Item], f: &mut T, options: &TextOptions) -> io::Result<()> {
    let mut first = true;
    for item in items {
        match item {
            Item::Thread(block) => {
                if options.brief && !block.header.crashed {
                    continue;
                }
                if !first {
                    writeln!(f)?;
                }
                first = false;
                print_thread(block, f)?;
            }
            other => print_item(other, f, options, "")?,
        }
    }
    Ok(())
}

fn print_item<T: Write>(
    item: &Item,
    f: &mut T,
    options: &TextOptions,
    indent: &str,
) -> io::Result<()> {
    match item {
        Item::Field(field) => writeln!(f, "{indent}{}: {}", field.label, field.value),
        Item::Text { text } => {
            for line in text.trim_end_matches('\n').lines() {
                writeln!(f, "{indent}{line}")?;
            }
            Ok(())
        }
        Item::Frame(row) => print_frame(row, f),
        Item::Thread(block) => print_thread(block, f),
        Item::Image(row) => print_image(row, f, options),
        Item::Group(group) => {
            writeln!(f, "{indent}{}:", group.title)?;
            let nested = format!("{indent}  ");
            for item in &group.items {
                print_item(item, f, options, &nested)?;
            }
            Ok(())
        }
    }
}

fn print_frame<T: Write>(row: &FrameRow, f: &mut T) -> io::Result<()> {
    write!(
        f,
        "{:<4}{:<30} {:#18x} {}",
        row.index, row.image_name, row.address.0, row.label
    )?;
    if let Some(ref source) = row.source {
        write!(f, " ({source})")?;
    }
    writeln!(f)
}

fn print_thread<T: Write>(block: &ThreadBlock, f: &mut T) -> io::Result<()> {
    let header = &block.header;
    write!(f, "Thread {}", header.index)?;
    if header.crashed {
        write!(f, " Crashed")?;
    }
    write!(f, "::")?;
    if let Some(ref name) = header.name {
        write!(f, " {name}")?;
    }
    if let Some(ref queue) = header.queue {
        write!(f, "  Dispatch queue: {queue}")?;
    }
    writeln!(f)?;

    for row in &block.frames {
        print_frame(row, f)?;
    }

    if let Some(ref registers) = block.registers {
        writeln!(f)?;
        writeln!(
            f,
            "Thread {} crashed with {}:",
            header.index, registers.title
        )?;
        for line in registers.rows.chunks(REGISTERS_PER_LINE) {
            let line: Vec<String> = line.iter().map(register).collect();
            writeln!(f, "{}", line.join("  "))?;
        }
    }
    Ok(())
}

fn register(row: &RegisterRow) -> String {
    let mut out = match row.width {
        RegisterWidth::Bits32 => format!("{:>6}: {:#010x}", row.label, row.value.0),
        RegisterWidth::Bits64 => format!("{:>6}: {:#018x}", row.label, row.value.0),
    };
    if let Some(ref description) = row.description {
        out.push(' ');
        out.push_str(description);
    }
    if let Some(ref symbol) = row.symbol {
        out.push(' ');
        out.push_str(symbol);
    }
    out
}

fn print_image<T: Write>(row: &ImageRow, f: &mut T, options: &TextOptions) -> io::Result<()> {
    write!(f, "{:#18x} - {:#18x} {}", row.start.0, row.end.0, row.name)?;
    if let Some(ref version) = row.version {
        write!(f, " ({version})")?;
    }
    if let Some(ref arch) = row.arch {
        write!(f, " {arch}")?;
    }
    if let Some(ref uuid) = row.uuid {
        if options.compact_uuids {
            write!(f, " <{}>", uuid.replace('-', ""))?;
        } else {
            write!(f, " <{uuid}>")?;
        }
    }
    if let Some(ref path) = row.path {
        write!(f, " {path}")?;
    }
    writeln!(f)
}
