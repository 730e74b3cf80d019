//! Named special keys and the escape sequences a Linux console expects for them.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap as HashMap;

/// Names are matched ignoring ASCII case. Several names may share a sequence.
const SPECIAL_KEYS: &[(&str, &[u8])] = &[
    ("F1", b"\x1b[[A"),
    ("F2", b"\x1b[[B"),
    ("F3", b"\x1b[[C"),
    ("F4", b"\x1b[[D"),
    ("F5", b"\x1b[[E"),
    ("F6", b"\x1b[17~"),
    ("F7", b"\x1b[18~"),
    ("F8", b"\x1b[19~"),
    ("F9", b"\x1b[20~"),
    ("F10", b"\x1b[21~"),
    ("F11", b"\x1b[23~"),
    ("F12", b"\x1b[24~"),
    ("F13", b"\x1b[25~"),
    ("F14", b"\x1b[26~"),
    ("F15", b"\x1b[28~"),
    ("F16", b"\x1b[29~"),
    ("F17", b"\x1b[31~"),
    ("F18", b"\x1b[32~"),
    ("F19", b"\x1b[33~"),
    ("F20", b"\x1b[34~"),
    ("Up", b"\x1b[A"),
    ("Down", b"\x1b[B"),
    ("Right", b"\x1b[C"),
    ("Left", b"\x1b[D"),
    ("Find", b"\x1b[1~"),
    ("Home", b"\x1b[1~"),
    ("Insert", b"\x1b[2~"),
    ("Remove", b"\x1b[3~"),
    ("Delete", b"\x1b[3~"),
    ("Select", b"\x1b[4~"),
    ("End", b"\x1b[4~"),
    ("Prior", b"\x1b[5~"),
    ("PgUp", b"\x1b[5~"),
    ("PageUp", b"\x1b[5~"),
    ("Next", b"\x1b[6~"),
    ("PgDn", b"\x1b[6~"),
    ("PageDown", b"\x1b[6~"),
    ("Macro", b"\x1b[M"),
    ("Pause", b"\x1b[P"),
    ("Esc", b"\x1b"),
    ("Escape", b"\x1b"),
    ("Tab", b"\t"),
    ("Enter", b"\r"),
    ("Return", b"\r"),
    ("Backspace", b"\x7f"),
    ("Space", b" "),
];

static ESCAPES_BY_NAME: Lazy<HashMap<String, &'static [u8]>> = Lazy::new(|| {
    SPECIAL_KEYS
        .iter()
        .map(|(name, seq)| (name.to_ascii_lowercase(), *seq))
        .collect()
});

/// The byte sequence for a named special key, e.g. `"F1"` or `"up"`.
pub fn str_to_escape(s: &str) -> Option<&'static [u8]> {
    ESCAPES_BY_NAME.get(&s.to_ascii_lowercase()).copied()
}

#[cfg(test)]
fn special_key_names() -> impl Iterator<Item = &'static str> {
    SPECIAL_KEYS.iter().map(|(name, _)| *name)
}

#[test]
fn special_keys_ignore_case() {
    assert_eq!(str_to_escape("up"), Some(&b"\x1b[A"[..]));
    assert_eq!(str_to_escape("UP"), str_to_escape("Up"));
    assert_eq!(str_to_escape("f20"), Some(&b"\x1b[34~"[..]));
    assert_eq!(str_to_escape("F21"), None);
    assert_eq!(str_to_escape("prior"), Some(&b"\x1b[5~"[..]));
    assert_eq!(str_to_escape("PRIOR"), str_to_escape("PgUp"));
}

#[test]
fn editing_keys_use_console_sequences() {
    for (name, seq) in [
        ("Find", &b"\x1b[1~"[..]),
        ("Insert", &b"\x1b[2~"[..]),
        ("Remove", &b"\x1b[3~"[..]),
        ("Select", &b"\x1b[4~"[..]),
        ("Prior", &b"\x1b[5~"[..]),
        ("Next", &b"\x1b[6~"[..]),
        ("Macro", &b"\x1b[M"[..]),
        ("Pause", &b"\x1b[P"[..]),
    ] {
        assert_eq!(str_to_escape(name), Some(seq), "{name}");
    }
    assert_eq!(str_to_escape("Home"), str_to_escape("Find"));
    assert_eq!(str_to_escape("Delete"), str_to_escape("Remove"));
    assert_eq!(str_to_escape("End"), str_to_escape("Select"));
    assert_eq!(str_to_escape("PageDown"), str_to_escape("Next"));
}

#[test]
fn every_listed_name_resolves() {
    for name in special_key_names() {
        assert!(str_to_escape(name).is_some(), "{name} did not resolve");
    }
}
