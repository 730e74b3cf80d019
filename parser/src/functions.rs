//! The active-function registry: functions that action tables can invoke, together with the
//! argument each binding was configured with.

use thiserror::Error;

/// Number of bindings a configuration may hold.
pub const MAX_ACTIVE_FUNCTIONS: usize = 128;

/// Position of a binding in the [`FunctionRegistry`]. Stable for the lifetime of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FnIndex(pub u8);

/// The built-in functions a binding can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FnKind {
    /// Switch to the virtual console whose number is the argument.
    Console,
    /// Run the argument as a shell command.
    Exec,
}

impl FnKind {
    pub fn name(self) -> &'static str {
        match self {
            FnKind::Console => "Console",
            FnKind::Exec => "Exec",
        }
    }

    /// Case-insensitive lookup of a function name as written in the configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        [FnKind::Console, FnKind::Exec]
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// A function together with the argument string it will be called with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFn {
    pub kind: FnKind,
    pub arg: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("active function registry is full ({MAX_ACTIVE_FUNCTIONS} bindings)")]
pub struct CapacityExceeded;

/// Append-only list of bound functions. Bindings are added while loading the configuration and
/// are never removed.
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    bindings: Vec<BoundFn>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: FnKind,
        arg: impl Into<String>,
    ) -> Result<FnIndex, CapacityExceeded> {
        if self.bindings.len() >= MAX_ACTIVE_FUNCTIONS {
            return Err(CapacityExceeded);
        }
        let idx = FnIndex(self.bindings.len() as u8);
        self.bindings.push(BoundFn {
            kind,
            arg: arg.into(),
        });
        Ok(idx)
    }

    pub fn get(&self, idx: FnIndex) -> Option<&BoundFn> {
        self.bindings.get(usize::from(idx.0))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_positions() {
        let mut reg = FunctionRegistry::new();
        let a = reg.register(FnKind::Console, "2").unwrap();
        let b = reg.register(FnKind::Exec, "date").unwrap();
        assert_eq!(a, FnIndex(0));
        assert_eq!(b, FnIndex(1));
        assert_eq!(reg.get(b).unwrap().arg, "date");
        assert_eq!(reg.get(FnIndex(2)), None);
    }

    #[test]
    fn registry_rejects_past_capacity() {
        let mut reg = FunctionRegistry::new();
        for i in 0..MAX_ACTIVE_FUNCTIONS {
            reg.register(FnKind::Console, i.to_string()).unwrap();
        }
        assert_eq!(reg.register(FnKind::Exec, "true"), Err(CapacityExceeded));
        assert_eq!(reg.len(), MAX_ACTIVE_FUNCTIONS);
    }

    #[test]
    fn function_names_ignore_case() {
        assert_eq!(FnKind::from_name("console"), Some(FnKind::Console));
        assert_eq!(FnKind::from_name("EXEC"), Some(FnKind::Exec));
        assert_eq!(FnKind::from_name("Execute"), None);
    }
}
