//! Per-modifier action tables and the two ways of picking one: by the modifier bits of a device
//! message, and by a modifier keyword in the configuration.

use bitflags::bitflags;

use crate::action::Action;

/// Number of slots in a table; one per possible chord code.
pub const TABLE_LEN: usize = 256;

const SELECTOR_COUNT: usize = 7;

bitflags! {
    /// Modifier bits carried in a device message alongside the chord code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModBits: u32 {
        const SHIFT = 0x0100;
        const NUMERIC = 0x0200;
        const FUNCTION = 0x0400;
        const CONTROL = 0x0800;
        const ALT = 0x1000;
    }
}

/// The modifier combinations that have a table of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModSelector {
    None,
    Shift,
    Numeric,
    Function,
    Control,
    Alt,
    CtrlShift,
}

impl ModSelector {
    pub const ALL: [ModSelector; SELECTOR_COUNT] = [
        ModSelector::None,
        ModSelector::Shift,
        ModSelector::Numeric,
        ModSelector::Function,
        ModSelector::Control,
        ModSelector::Alt,
        ModSelector::CtrlShift,
    ];

    pub fn bits(self) -> ModBits {
        match self {
            ModSelector::None => ModBits::empty(),
            ModSelector::Shift => ModBits::SHIFT,
            ModSelector::Numeric => ModBits::NUMERIC,
            ModSelector::Function => ModBits::FUNCTION,
            ModSelector::Control => ModBits::CONTROL,
            ModSelector::Alt => ModBits::ALT,
            ModSelector::CtrlShift => ModBits::CONTROL.union(ModBits::SHIFT),
        }
    }

    /// Exact match of a modifier set. Control+Shift does not fall back to Control, and a
    /// combination with no table of its own yields `None`.
    pub fn from_bits(bits: ModBits) -> Option<Self> {
        Self::ALL.into_iter().find(|sel| sel.bits() == bits)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Canonical modifier keywords in match priority order.
const MOD_KEYWORDS: &[(&str, ModSelector)] = &[
    ("", ModSelector::None),
    ("Shift", ModSelector::Shift),
    ("Numeric", ModSelector::Numeric),
    ("Function", ModSelector::Function),
    ("Control", ModSelector::Control),
    ("Ctrl", ModSelector::Control),
    ("Alt", ModSelector::Alt),
    ("Meta", ModSelector::Alt),
    ("Ctrl+Shift", ModSelector::CtrlShift),
    ("Shift+Ctrl", ModSelector::CtrlShift),
];

/// Resolve a modifier keyword from the configuration.
///
/// `keyword` may be any case-insensitive prefix of a canonical name, so `sh` is Shift and `c` is
/// Control; the first canonical name it abbreviates wins. The empty keyword is the no-modifier
/// table. Anything else resolves to nothing.
pub fn resolve_modifier_keyword(keyword: &str) -> Option<ModSelector> {
    if keyword.is_empty() {
        return Some(ModSelector::None);
    }
    MOD_KEYWORDS
        .iter()
        .find(|(name, _)| {
            name.get(..keyword.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
        })
        .map(|(_, sel)| *sel)
}

/// 256 action slots indexed by chord code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTable {
    slots: Box<[Option<Action>; TABLE_LEN]>,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            slots: Box::new(std::array::from_fn(|_| None)),
        }
    }
}

impl ActionTable {
    pub fn get(&self, code: u8) -> Option<&Action> {
        self.slots[usize::from(code)].as_ref()
    }

    /// Store `action` for `code`, returning whatever the slot held before.
    pub fn set(&mut self, code: u8, action: Action) -> Option<Action> {
        self.slots[usize::from(code)].replace(action)
    }

    /// Number of populated slots.
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// One [`ActionTable`] per [`ModSelector`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTables {
    tables: [ActionTable; SELECTOR_COUNT],
}

impl ActionTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, sel: ModSelector) -> &ActionTable {
        &self.tables[sel.index()]
    }

    pub fn table_mut(&mut self, sel: ModSelector) -> &mut ActionTable {
        &mut self.tables[sel.index()]
    }

    /// Table for the modifier bits of a device message; bits that are not modifiers are ignored.
    pub fn table_for_bits(&self, bits: u32) -> Option<&ActionTable> {
        ModSelector::from_bits(ModBits::from_bits_truncate(bits)).map(|sel| self.table(sel))
    }

    /// Table named by a configuration modifier keyword, see [`resolve_modifier_keyword`].
    pub fn table_for_keyword(&self, keyword: &str) -> Option<&ActionTable> {
        resolve_modifier_keyword(keyword).map(|sel| self.table(sel))
    }

    pub fn table_for_keyword_mut(&mut self, keyword: &str) -> Option<&mut ActionTable> {
        resolve_modifier_keyword(keyword).map(|sel| self.table_mut(sel))
    }
}
