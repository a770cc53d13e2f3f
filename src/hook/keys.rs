//! Key naming for hook events
//!
//! Maps raw `rdev` keys to the lowercase wire names used in outbound
//! payloads ("a", "space", "left shift"). The remote listener matches on
//! these strings, so the table is explicit rather than derived from the
//! enum's debug representation.

use std::borrow::Cow;

use rdev::Key;

/// Wire name for a key, e.g. `Key::ShiftLeft` -> "left shift".
///
/// Unrecognized scancodes render as `unknown(<code>)` and are forwarded
/// as-is; the key name is not validated further.
pub fn key_name(key: Key) -> Cow<'static, str> {
    let name: &'static str = match key {
        Key::KeyA => "a",
        Key::KeyB => "b",
        Key::KeyC => "c",
        Key::KeyD => "d",
        Key::KeyE => "e",
        Key::KeyF => "f",
        Key::KeyG => "g",
        Key::KeyH => "h",
        Key::KeyI => "i",
        Key::KeyJ => "j",
        Key::KeyK => "k",
        Key::KeyL => "l",
        Key::KeyM => "m",
        Key::KeyN => "n",
        Key::KeyO => "o",
        Key::KeyP => "p",
        Key::KeyQ => "q",
        Key::KeyR => "r",
        Key::KeyS => "s",
        Key::KeyT => "t",
        Key::KeyU => "u",
        Key::KeyV => "v",
        Key::KeyW => "w",
        Key::KeyX => "x",
        Key::KeyY => "y",
        Key::KeyZ => "z",
        Key::Num0 | Key::Kp0 => "0",
        Key::Num1 | Key::Kp1 => "1",
        Key::Num2 | Key::Kp2 => "2",
        Key::Num3 | Key::Kp3 => "3",
        Key::Num4 | Key::Kp4 => "4",
        Key::Num5 | Key::Kp5 => "5",
        Key::Num6 | Key::Kp6 => "6",
        Key::Num7 | Key::Kp7 => "7",
        Key::Num8 | Key::Kp8 => "8",
        Key::Num9 | Key::Kp9 => "9",
        Key::Space => "space",
        Key::Return | Key::KpReturn => "enter",
        Key::Tab => "tab",
        Key::Backspace => "backspace",
        Key::Escape => "esc",
        Key::CapsLock => "caps lock",
        Key::ShiftLeft => "left shift",
        Key::ShiftRight => "right shift",
        Key::ControlLeft => "left ctrl",
        Key::ControlRight => "right ctrl",
        Key::Alt => "alt",
        Key::AltGr => "alt gr",
        Key::MetaLeft => "left meta",
        Key::MetaRight => "right meta",
        Key::UpArrow => "up",
        Key::DownArrow => "down",
        Key::LeftArrow => "left",
        Key::RightArrow => "right",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "page up",
        Key::PageDown => "page down",
        Key::Insert => "insert",
        Key::Delete => "delete",
        Key::F1 => "f1",
        Key::F2 => "f2",
        Key::F3 => "f3",
        Key::F4 => "f4",
        Key::F5 => "f5",
        Key::F6 => "f6",
        Key::F7 => "f7",
        Key::F8 => "f8",
        Key::F9 => "f9",
        Key::F10 => "f10",
        Key::F11 => "f11",
        Key::F12 => "f12",
        Key::PrintScreen => "print screen",
        Key::ScrollLock => "scroll lock",
        Key::Pause => "pause",
        Key::NumLock => "num lock",
        Key::BackQuote => "`",
        Key::Minus | Key::KpMinus => "-",
        Key::Equal => "=",
        Key::LeftBracket => "[",
        Key::RightBracket => "]",
        Key::SemiColon => ";",
        Key::Quote => "'",
        Key::BackSlash | Key::IntlBackslash => "\\",
        Key::Comma => ",",
        Key::Dot => ".",
        Key::Slash | Key::KpDivide => "/",
        Key::KpPlus => "+",
        Key::KpMultiply => "*",
        Key::Unknown(code) => return Cow::Owned(format!("unknown({code})")),
        other => return Cow::Owned(format!("{other:?}").to_lowercase()),
    };
    Cow::Borrowed(name)
}
