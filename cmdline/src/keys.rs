//! Key-name to key-code translation for `Key` options.

/// Turns a key name such as `Ctrl-Alt-Left` into the integer the store keeps.
pub trait KeyTranslator {
    fn key_code(&self, name: &str) -> i64;
}

impl<F> KeyTranslator for F
where
    F: Fn(&str) -> i64,
{
    fn key_code(&self, name: &str) -> i64 {
        self(name)
    }
}

pub const MODIFIER_ALT: i64 = 0x0100_0000;
pub const MODIFIER_SHIFT: i64 = 0x0200_0000;
pub const MODIFIER_CTRL: i64 = 0x0400_0000;
pub const MODIFIER_META: i64 = 0x0800_0000;
pub const MODIFIER_COMMAND: i64 = 0x1000_0000;

/// Code for a name that could not be translated.
pub const KEY_UNSET: i64 = 0;

const MODIFIERS: &[(&str, i64)] = &[
    ("Alt-", MODIFIER_ALT),
    ("Shift-", MODIFIER_SHIFT),
    ("Ctrl-", MODIFIER_CTRL),
    ("Meta-", MODIFIER_META),
    ("Command-", MODIFIER_COMMAND),
];

const NAMED_KEYS: &[(&str, i64)] = &[
    ("Backspace", 0x08),
    ("Tab", 0x09),
    ("Enter", 0x0d),
    ("Esc", 0x1b),
    ("Space", 0x20),
    ("Left", 0x0021_0000),
    ("Right", 0x0022_0000),
    ("Up", 0x0023_0000),
    ("Down", 0x0024_0000),
    ("Home", 0x0025_0000),
    ("End", 0x0026_0000),
    ("Page Up", 0x0027_0000),
    ("Page Down", 0x0028_0000),
    ("Insert", 0x0029_0000),
    ("Delete", 0x002a_0000),
    ("Menu", 0x002b_0000),
];

const FUNCTION_KEY_BASE: i64 = 0x0030_0000;

/// Default translator: any number of `Alt-`, `Shift-`, `Ctrl-`, `Meta-`,
/// `Command-` prefixes followed by a named key, `F1`..`F12`, or a single
/// character. Matching is case-insensitive except for the single character.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardKeys;

impl KeyTranslator for StandardKeys {
    fn key_code(&self, name: &str) -> i64 {
        let mut rest = name;
        let mut modifiers: i64 = 0;

        'strip: loop {
            for (prefix, bit) in MODIFIERS {
                if let Some(head) = rest.get(..prefix.len()) {
                    // "Ctrl--" is Ctrl plus the '-' key
                    if head.eq_ignore_ascii_case(prefix) && rest.len() > prefix.len() {
                        modifiers |= *bit;
                        rest = &rest[prefix.len()..];
                        continue 'strip;
                    }
                }
            }
            break;
        }

        match base_code(rest) {
            Some(code) => modifiers | code,
            None => KEY_UNSET,
        }
    }
}

fn base_code(name: &str) -> Option<i64> {
    if let Some(&(_, code)) = NAMED_KEYS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        return Some(code);
    }

    if let Some(number) = name.strip_prefix(|c: char| c == 'F' || c == 'f') {
        if let Ok(n @ 1..=12) = number.parse::<i64>() {
            return Some(FUNCTION_KEY_BASE + n);
        }
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(i64::from(u32::from(c))),
        _ => None,
    }
}
