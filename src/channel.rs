//! Logical measurement channels and the per-measurement reading.

/// One of the ten logical outputs of the AS7341
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    Clear,
    Nir,
}

impl Channel {
    /// All channels, in harvest order
    pub const ALL: [Channel; 10] = [
        Channel::F1,
        Channel::F2,
        Channel::F3,
        Channel::F4,
        Channel::F5,
        Channel::F6,
        Channel::F7,
        Channel::F8,
        Channel::Clear,
        Channel::Nir,
    ];

    /// Hue-bearing channels, shortest wavelength first
    pub const VISIBLE: [Channel; 8] = [
        Channel::F1,
        Channel::F2,
        Channel::F3,
        Channel::F4,
        Channel::F5,
        Channel::F6,
        Channel::F7,
        Channel::F8,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Channel::F1 => "F1",
            Channel::F2 => "F2",
            Channel::F3 => "F3",
            Channel::F4 => "F4",
            Channel::F5 => "F5",
            Channel::F6 => "F6",
            Channel::F7 => "F7",
            Channel::F8 => "F8",
            Channel::Clear => "Clear",
            Channel::Nir => "NIR",
        }
    }

    /// Nominal peak wavelength in nm; the Clear channel is broadband
    pub const fn wavelength_nm(self) -> Option<u16> {
        match self {
            Channel::F1 => Some(415),
            Channel::F2 => Some(445),
            Channel::F3 => Some(480),
            Channel::F4 => Some(515),
            Channel::F5 => Some(555),
            Channel::F6 => Some(590),
            Channel::F7 => Some(630),
            Channel::F8 => Some(680),
            Channel::Clear => None,
            Channel::Nir => Some(910),
        }
    }

    /// SMUX routing code that connects this photodiode to an ADC slot
    pub const fn smux_code(self) -> u8 {
        match self {
            Channel::F1 => 0x30,
            Channel::F2 => 0x01,
            Channel::F3 => 0x32,
            Channel::F4 => 0x03,
            Channel::F5 => 0x34,
            Channel::F6 => 0x05,
            Channel::F7 => 0x36,
            Channel::F8 => 0x07,
            Channel::Clear => 0x08,
            Channel::Nir => 0x09,
        }
    }
}

/// Raw counts from one measurement cycle.
///
/// An all-zero reading is a genuine dark measurement; a timed-out
/// measurement never produces one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelReading {
    counts: [u16; 10],
}

impl ChannelReading {
    /// Builds a reading from counts in F1..F8, Clear, NIR order
    pub const fn from_counts(counts: [u16; 10]) -> Self {
        Self { counts }
    }

    pub fn get(&self, channel: Channel) -> u16 {
        self.counts[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, count: u16) {
        self.counts[channel.index()] = count;
    }

    /// Counts in F1..F8, Clear, NIR order
    pub const fn counts(&self) -> [u16; 10] {
        self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, u16)> + '_ {
        Channel::ALL
            .into_iter()
            .map(move |channel| (channel, self.get(channel)))
    }

    pub fn visible(&self) -> impl Iterator<Item = (Channel, u16)> + '_ {
        Channel::VISIBLE
            .into_iter()
            .map(move |channel| (channel, self.get(channel)))
    }

    /// Sum of the eight visible channels
    pub fn visible_total(&self) -> u32 {
        self.visible().map(|(_, count)| count as u32).sum()
    }

    pub fn clear(&self) -> u16 {
        self.get(Channel::Clear)
    }

    pub fn nir(&self) -> u16 {
        self.get(Channel::Nir)
    }
}
