//! Register layouts, by thread state flavor.
//!
//! A layout fixes which registers are shown and in what order. Banked
//! registers (`x0`, `x1`, ...) come first, in bank order, followed by the
//! named ones. Registers missing from the report are skipped, never shown
//! as zero.

use ips::{RegisterSet, ThreadState, ARM_THREAD_STATE64, X86_THREAD_STATE};
use tracing::debug;

use crate::sections::{Address, RegisterBlock, RegisterRow, RegisterWidth};

/// Title of a register block whose flavor has no layout.
pub const GENERIC_TITLE: &str = "Register State";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSpec {
    /// Key of the register in the report.
    pub name: &'static str,
    /// How the register is displayed.
    pub label: &'static str,
    pub width: RegisterWidth,
}

const fn reg(name: &'static str) -> RegisterSpec {
    RegisterSpec {
        name,
        label: name,
        width: RegisterWidth::Bits64,
    }
}

const fn reg32(name: &'static str) -> RegisterSpec {
    RegisterSpec {
        name,
        label: name,
        width: RegisterWidth::Bits32,
    }
}

const fn renamed(name: &'static str, label: &'static str) -> RegisterSpec {
    RegisterSpec {
        name,
        label,
        width: RegisterWidth::Bits64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterLayout {
    pub flavor: &'static str,
    pub title: &'static str,
    /// Arrays of registers named `<bank><index>`.
    pub banks: &'static [&'static str],
    pub registers: &'static [RegisterSpec],
}

static ARM64_REGS: [RegisterSpec; 7] = [
    reg("fp"),
    reg("lr"),
    reg("sp"),
    reg("pc"),
    reg32("cpsr"),
    reg("far"),
    reg32("esr"),
];

static X86_64_REGS: [RegisterSpec; 19] = [
    reg("rax"),
    reg("rbx"),
    reg("rcx"),
    reg("rdx"),
    reg("rdi"),
    reg("rsi"),
    reg("rbp"),
    reg("rsp"),
    reg("r8"),
    reg("r9"),
    reg("r10"),
    reg("r11"),
    reg("r12"),
    reg("r13"),
    reg("r14"),
    reg("r15"),
    reg("rip"),
    renamed("rflags", "rfl"),
    reg("cr2"),
];

pub static LAYOUTS: [RegisterLayout; 2] = [
    RegisterLayout {
        flavor: ARM_THREAD_STATE64,
        title: "ARM Thread State (64-bit)",
        banks: &["x"],
        registers: &ARM64_REGS,
    },
    RegisterLayout {
        flavor: X86_THREAD_STATE,
        title: "X86 Thread State (64-bit)",
        banks: &[],
        registers: &X86_64_REGS,
    },
];

/// The layout for a `threadState` flavor, if we know it.
pub fn layout_for_flavor(flavor: &str) -> Option<&'static RegisterLayout> {
    LAYOUTS.iter().find(|layout| layout.flavor == flavor)
}

impl RegisterLayout {
    /// Pick the registers of this layout out of `regs`, in layout order.
    pub fn rows(&self, regs: &RegisterSet) -> Vec<RegisterRow> {
        let mut rows = Vec::new();
        for bank in self.banks {
            for (i, reg) in regs.bank(bank).iter().enumerate() {
                let name = format!("{bank}{i}");
                rows.push(RegisterRow {
                    label: name.clone(),
                    name,
                    value: Address(reg.value),
                    width: RegisterWidth::Bits64,
                    description: reg.description.clone(),
                    symbol: register_symbol(reg),
                });
            }
        }
        for spec in self.registers {
            if let Some(reg) = regs.named.get(spec.name) {
                rows.push(RegisterRow {
                    name: String::from(spec.name),
                    label: String::from(spec.label),
                    value: Address(reg.value),
                    width: spec.width,
                    description: reg.description.clone(),
                    symbol: register_symbol(reg),
                });
            }
        }
        rows
    }
}

fn register_symbol(reg: &ips::Register) -> Option<String> {
    let symbol = reg.symbol.as_ref()?;
    Some(match reg.symbol_location {
        Some(location) => format!("{symbol} + {location}"),
        None => symbol.clone(),
    })
}

/// Lay out a thread's register state for display.
///
/// Flavors without a layout produce an empty block with a generic title.
pub fn register_block(state: &ThreadState) -> RegisterBlock {
    let flavor = state.flavor().map(String::from);
    let layout = state.flavor().and_then(layout_for_flavor);
    match (layout, state.registers()) {
        (Some(layout), Some(regs)) => RegisterBlock {
            flavor,
            title: String::from(layout.title),
            rows: layout.rows(regs),
        },
        _ => {
            debug!("no register layout for flavor {flavor:?}");
            RegisterBlock {
                flavor,
                title: String::from(GENERIC_TITLE),
                rows: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn state(value: serde_json::Value) -> ThreadState {
        serde_json::from_value(value).unwrap()
    }

    fn labels(block: &RegisterBlock) -> Vec<&str> {
        block.rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_arm64_presence_filtered() {
        let block = register_block(&state(json!({
            "flavor": "ARM_THREAD_STATE64",
            "pc": { "value": 4112 },
            "sp": { "value": 4096 },
        })));
        assert_eq!(block.title, "ARM Thread State (64-bit)");
        assert_eq!(labels(&block), ["sp", "pc"]);
        assert_eq!(block.rows[0].value, Address(4096));
        assert_eq!(block.rows[1].value, Address(4112));
    }

    #[test]
    fn test_arm64_full_order() {
        let block = register_block(&state(json!({
            "flavor": "ARM_THREAD_STATE64",
            "esr": { "value": 1_442_840_704, "description": "(Syscall)" },
            "far": { "value": 0 },
            "cpsr": { "value": 1_073_741_824 },
            "pc": { "value": 3 },
            "sp": { "value": 2 },
            "lr": { "value": 1, "symbol": "abort", "symbolLocation": 180 },
            "fp": { "value": 0 },
            "x": [{ "value": 10 }, { "value": 11 }],
        })));
        assert_eq!(
            labels(&block),
            ["x0", "x1", "fp", "lr", "sp", "pc", "cpsr", "far", "esr"]
        );
        let esr = block.rows.last().unwrap();
        assert_eq!(esr.width, RegisterWidth::Bits32);
        assert_eq!(esr.description.as_deref(), Some("(Syscall)"));
        assert_eq!(block.rows[3].symbol.as_deref(), Some("abort + 180"));
        assert_eq!(block.rows[6].width, RegisterWidth::Bits32);
        assert_eq!(block.rows[0].width, RegisterWidth::Bits64);
    }

    #[test]
    fn test_zero_registers_are_kept() {
        let block = register_block(&state(json!({
            "flavor": "ARM_THREAD_STATE64",
            "x": [{ "value": 0 }],
            "far": { "value": 0 },
        })));
        assert_eq!(labels(&block), ["x0", "far"]);
        assert!(block.rows.iter().all(|r| r.value == Address(0)));
    }

    #[test]
    fn test_x86_rflags_label() {
        let block = register_block(&state(json!({
            "flavor": "x86_THREAD_STATE",
            "rflags": { "value": 582 },
            "rip": { "value": 4_294_971_904u64 },
            "rax": { "value": 0 },
            "r8": { "value": 8 },
        })));
        assert_eq!(block.title, "X86 Thread State (64-bit)");
        assert_eq!(labels(&block), ["rax", "r8", "rip", "rfl"]);
        assert_eq!(block.rows[3].name, "rflags");
    }

    #[test]
    fn test_unknown_flavor() {
        let block = register_block(&state(json!({
            "flavor": "PPC_THREAD_STATE",
            "srr0": { "value": 4 },
        })));
        assert_eq!(block.title, GENERIC_TITLE);
        assert!(block.rows.is_empty());
        assert_eq!(block.flavor.as_deref(), Some("PPC_THREAD_STATE"));
    }
}
