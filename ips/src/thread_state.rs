//! Register state of a thread.
//!
//! `threadState` is keyed by its `flavor`. The registers themselves are
//! objects with a `value` (and sometimes a `description` or `symbol`),
//! either directly under the register's name (`"pc": {"value": ...}`) or
//! collected in an array, like ARM's general purpose registers
//! (`"x": [{"value": ...}, ...]`).

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::lenient::lenient_records;

pub const ARM_THREAD_STATE64: &str = "ARM_THREAD_STATE64";
pub const X86_THREAD_STATE: &str = "x86_THREAD_STATE";

/// A single register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Register {
    #[serde(default)]
    pub value: u64,
    /// Decoded meaning of the value, e.g. `(Data Abort) byte read Translation fault` for `esr`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_location: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

lenient_records!(Register);

impl Register {
    fn from_json(value: &Value) -> Option<Register> {
        // Only objects carrying a numeric `value` are registers.
        value.get("value")?.as_u64()?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// The registers of one `threadState`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSet {
    /// Arrays of registers, by key. `x` holds `x0`, `x1`, ...
    pub banks: BTreeMap<String, Vec<Register>>,
    /// Registers stored under their own name.
    pub named: BTreeMap<String, Register>,
    /// Everything in the state that isn't a register.
    pub extra: Map<String, Value>,
}

impl RegisterSet {
    /// Look up a register by name. Banked registers are addressed as
    /// `<bank><index>`, so `x3` is the fourth entry of the `x` bank.
    pub fn get(&self, name: &str) -> Option<&Register> {
        if let Some(reg) = self.named.get(name) {
            return Some(reg);
        }
        self.banks.iter().find_map(|(bank, regs)| {
            let index = name.strip_prefix(bank.as_str())?.parse::<usize>().ok()?;
            regs.get(index)
        })
    }

    pub fn bank(&self, name: &str) -> &[Register] {
        self.banks.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.values().all(Vec::is_empty) && self.named.is_empty()
    }

    fn from_json(fields: Map<String, Value>) -> RegisterSet {
        let mut set = RegisterSet::default();
        for (key, value) in fields {
            match value {
                Value::Array(ref entries) if !entries.is_empty() => {
                    let regs: Option<Vec<Register>> =
                        entries.iter().map(Register::from_json).collect();
                    match regs {
                        Some(regs) => {
                            set.banks.insert(key, regs);
                        }
                        None => {
                            debug!("threadState: `{key}` is not a register bank, keeping it as-is");
                            set.extra.insert(key, value);
                        }
                    }
                }
                Value::Object(_) => match Register::from_json(&value) {
                    Some(reg) => {
                        set.named.insert(key, reg);
                    }
                    None => {
                        set.extra.insert(key, value);
                    }
                },
                _ => {
                    set.extra.insert(key, value);
                }
            }
        }
        set
    }
}

/// The register state of a thread, by flavor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub enum ThreadState {
    /// `ARM_THREAD_STATE64`
    Arm64(RegisterSet),
    /// `x86_THREAD_STATE`
    X86_64(RegisterSet),
    /// A flavor we have no register layout for. A `flavor` that isn't a
    /// string stays in `extra`.
    Unknown {
        flavor: Option<String>,
        extra: Map<String, Value>,
    },
}

impl ThreadState {
    /// The `flavor` string this state was tagged with.
    pub fn flavor(&self) -> Option<&str> {
        match self {
            ThreadState::Arm64(_) => Some(ARM_THREAD_STATE64),
            ThreadState::X86_64(_) => Some(X86_THREAD_STATE),
            ThreadState::Unknown { flavor, .. } => flavor.as_deref(),
        }
    }

    /// The registers, for flavors we understand.
    pub fn registers(&self) -> Option<&RegisterSet> {
        match self {
            ThreadState::Arm64(regs) | ThreadState::X86_64(regs) => Some(regs),
            ThreadState::Unknown { .. } => None,
        }
    }
}

impl From<Map<String, Value>> for ThreadState {
    fn from(mut fields: Map<String, Value>) -> Self {
        let flavor = match fields.get("flavor") {
            Some(Value::String(flavor)) => Some(flavor.clone()),
            _ => None,
        };
        if flavor.is_some() {
            fields.remove("flavor");
        }
        match flavor.as_deref() {
            Some(ARM_THREAD_STATE64) => ThreadState::Arm64(RegisterSet::from_json(fields)),
            Some(X86_THREAD_STATE) => ThreadState::X86_64(RegisterSet::from_json(fields)),
            _ => {
                debug!("unknown threadState flavor {flavor:?}");
                ThreadState::Unknown {
                    flavor,
                    extra: fields,
                }
            }
        }
    }
}

impl Serialize for ThreadState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(flavor) = self.flavor() {
            map.serialize_entry("flavor", flavor)?;
        }
        match self {
            ThreadState::Arm64(regs) | ThreadState::X86_64(regs) => {
                for (key, bank) in &regs.banks {
                    map.serialize_entry(key, bank)?;
                }
                for (key, reg) in &regs.named {
                    map.serialize_entry(key, reg)?;
                }
                for (key, value) in &regs.extra {
                    map.serialize_entry(key, value)?;
                }
            }
            ThreadState::Unknown { extra, .. } => {
                for (key, value) in extra {
                    map.serialize_entry(key, value)?;
                }
            }
        }
        map.end()
    }
}
