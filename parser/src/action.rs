//! The action bound to a chord code in an action table.

use crate::functions::FnIndex;

/// What a populated table slot does when its chord fires.
///
/// The variant is decided once, when the configuration is loaded, and is never re-interpreted
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Inject a single raw byte into the console.
    Literal(u8),
    /// Inject a sequence of bytes in order.
    Text(Box<[u8]>),
    /// Call the function bound at this index of the active-function registry.
    Invoke(FnIndex),
}

impl Action {
    /// Build a byte action, using `Literal` for a single byte and `Text` for anything longer.
    ///
    /// Returns `None` for an empty byte string.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        match bytes.len() {
            0 => None,
            1 => Some(Action::Literal(bytes[0])),
            _ => Some(Action::Text(bytes.into_boxed_slice())),
        }
    }

    /// The bytes this action injects, if it injects any.
    #[cfg(test)]
    pub(crate) fn bytes(&self) -> Option<&[u8]> {
        match self {
            Action::Literal(b) => Some(std::slice::from_ref(b)),
            Action::Text(s) => Some(s),
            Action::Invoke(_) => None,
        }
    }
}

#[test]
fn from_bytes_picks_variant_by_length() {
    assert_eq!(Action::from_bytes(vec![]), None);
    assert_eq!(Action::from_bytes(vec![b'a']), Some(Action::Literal(b'a')));
    assert_eq!(
        Action::from_bytes(b"ab".to_vec()),
        Some(Action::Text(b"ab".to_vec().into_boxed_slice()))
    );
}

#[test]
fn literal_exposes_single_byte() {
    assert_eq!(Action::Literal(0x1b).bytes(), Some(&[0x1b][..]));
    assert_eq!(Action::Invoke(FnIndex(0)).bytes(), None);
}
