//! Radio link diagnostics suffix
//!
//! The ground receiver appends `Grssi<n>/Gsnr<n>` after the `|` of each
//! line. The values are outside the binary payload and are parsed
//! independently of it; a missing or unreadable tag leaves its field unset.
//!
//! When encoding, a tag is written only for a value that is present. Both
//! absent means no suffix at all, and a single value produces a single tag
//! (`|Grssi-65`). Older ground scripts expect both tags, which every record
//! decoded from a complete line carries.

use std::fmt;

use crate::frame::DIAGNOSTICS_SEPARATOR;

const RSSI_TAG: &str = "rssi";
const SNR_TAG: &str = "snr";

/// Signal quality reported by the ground receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Diagnostics {
    /// Received signal strength
    pub rssi: Option<i32>,
    /// Signal-to-noise ratio
    pub snr: Option<i32>,
}

impl Diagnostics {
    /// Parse the text after `|`
    pub fn parse(suffix: &str) -> Self {
        Self {
            rssi: tagged_value(suffix, RSSI_TAG),
            snr: tagged_value(suffix, SNR_TAG),
        }
    }

    /// Returns whether neither value is present
    pub fn is_empty(&self) -> bool {
        self.rssi.is_none() && self.snr.is_none()
    }

    /// The suffix to append to a line, including the leading `|`
    pub fn to_suffix(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!("{}{}", DIAGNOSTICS_SEPARATOR, self))
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rssi, self.snr) {
            (Some(rssi), Some(snr)) => write!(f, "G{RSSI_TAG}{rssi}/G{SNR_TAG}{snr}"),
            (Some(rssi), None) => write!(f, "G{RSSI_TAG}{rssi}"),
            (None, Some(snr)) => write!(f, "G{SNR_TAG}{snr}"),
            (None, None) => Ok(()),
        }
    }
}

/// First `<tag><signed integer>` occurrence in `text`
fn tagged_value(text: &str, tag: &str) -> Option<i32> {
    text.match_indices(tag)
        .find_map(|(pos, _)| leading_int(&text[pos + tag.len()..]))
}

fn leading_int(text: &str) -> Option<i32> {
    let sign_len = usize::from(text.starts_with(|c: char| c == '-' || c == '+'));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}
