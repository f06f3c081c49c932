//! Coarse colour classification of a reading.
//!
//! This is a heuristic over the nominal filter wavelengths, not colorimetry.
//! Clear and NIR carry no hue and are left out of every calculation here.

use core::fmt;

use crate::channel::{Channel, ChannelReading};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorLabel {
    NoLight,
    Violet,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

impl ColorLabel {
    /// Band for a peak wavelength. 590 nm itself is still Yellow.
    pub fn from_wavelength(nm: u16) -> Self {
        match nm {
            0..=449 => ColorLabel::Violet,
            450..=494 => ColorLabel::Blue,
            495..=569 => ColorLabel::Green,
            570..=590 => ColorLabel::Yellow,
            591..=619 => ColorLabel::Orange,
            _ => ColorLabel::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorLabel::NoLight => "No light",
            ColorLabel::Violet => "Violet",
            ColorLabel::Blue => "Blue",
            ColorLabel::Green => "Green",
            ColorLabel::Yellow => "Yellow",
            ColorLabel::Orange => "Orange",
            ColorLabel::Red => "Red",
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strongest visible channel of a reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DominantChannel {
    pub channel: Channel,
    pub count: u16,
    /// Fraction of the visible total, 0.0..=1.0
    pub share: f32,
}

/// Finds the visible channel with the largest normalised count.
///
/// Ties go to the shorter wavelength. Returns `None` when every visible
/// channel reads zero.
pub fn dominant_channel(reading: &ChannelReading) -> Option<DominantChannel> {
    let total = reading.visible_total();
    if total == 0 {
        return None;
    }

    let mut best: Option<DominantChannel> = None;
    for (channel, count) in reading.visible() {
        let share = count as f32 / total as f32;
        match best {
            Some(current) if current.share >= share => {}
            _ => {
                best = Some(DominantChannel {
                    channel,
                    count,
                    share,
                })
            }
        }
    }
    best
}

pub fn classify(reading: &ChannelReading) -> ColorLabel {
    match dominant_channel(reading) {
        Some(dominant) => dominant
            .channel
            .wavelength_nm()
            .map_or(ColorLabel::NoLight, ColorLabel::from_wavelength),
        None => ColorLabel::NoLight,
    }
}

/// Prominence of 680 nm over 555 nm, scaled to 0..=158.
///
/// A ratio of 0.7 or less maps to 0 and 1.7 or more to 158. Returns `None`
/// when F5 reads zero.
pub fn ripeness_index(reading: &ChannelReading) -> Option<u8> {
    let green = reading.get(Channel::F5);
    if green == 0 {
        return None;
    }
    let ratio = reading.get(Channel::F8) as f32 / green as f32 - 0.7;
    let clamped = ratio.max(0.0).min(1.0);
    Some((clamped * 158.0) as u8)
}
