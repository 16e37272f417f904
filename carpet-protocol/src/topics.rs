//! Static topic table
//!
//! Inbound topics are the broker subscriptions whose messages feed the
//! telemetry store. Outbound topics are where the carpet publishes its own
//! readings. Both directions resolve names and link ids through the tables
//! below; nothing is registered at runtime.

/// Topics the carpet subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundTopic {
    /// Outside temperature from the weather station (decimal text)
    RemoteTemperature,
    /// Next departure from the public transport feed (free text)
    TransportSchedule,
}

impl InboundTopic {
    /// Every inbound topic, in subscription order
    pub const ALL: [InboundTopic; 2] = [
        InboundTopic::RemoteTemperature,
        InboundTopic::TransportSchedule,
    ];

    /// Broker topic name
    pub const fn name(self) -> &'static str {
        match self {
            InboundTopic::RemoteTemperature => "esp32c6/wetter",
            InboundTopic::TransportSchedule => "esp32c6/transport",
        }
    }

    /// Link id
    pub const fn id(self) -> u8 {
        match self {
            InboundTopic::RemoteTemperature => 0x01,
            InboundTopic::TransportSchedule => 0x02,
        }
    }

    /// Resolve a link id
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Resolve a broker topic name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Topics the carpet publishes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutboundTopic {
    /// Inside temperature, degrees Celsius
    Temperature,
    /// Inside relative humidity, percent
    Humidity,
    /// Inside barometric pressure, hPa
    Pressure,
    /// Liveness marker
    Status,
}

impl OutboundTopic {
    pub const ALL: [OutboundTopic; 4] = [
        OutboundTopic::Temperature,
        OutboundTopic::Humidity,
        OutboundTopic::Pressure,
        OutboundTopic::Status,
    ];

    /// Broker topic name
    pub const fn name(self) -> &'static str {
        match self {
            OutboundTopic::Temperature => "home/esp32/temp",
            OutboundTopic::Humidity => "home/esp32/hum",
            OutboundTopic::Pressure => "home/esp32/press",
            OutboundTopic::Status => "home/esp32/status",
        }
    }

    /// Link id
    pub const fn id(self) -> u8 {
        match self {
            OutboundTopic::Temperature => 0x10,
            OutboundTopic::Humidity => 0x11,
            OutboundTopic::Pressure => 0x12,
            OutboundTopic::Status => 0x13,
        }
    }

    /// Resolve a link id
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}
