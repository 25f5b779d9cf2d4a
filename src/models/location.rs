use serde::Serialize;

/// Where the work was done, as offered by the time editor's
/// `time_field_5` select. The numeric ids are the server's option values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Location {
    #[default]
    Empty, // 0
    Home,   // 10
    Client, // 11
    Office, // 12
    Other,  // 13
}

impl Location {
    pub fn id(&self) -> i64 {
        match self {
            Location::Empty => 0,
            Location::Home => 10,
            Location::Client => 11,
            Location::Office => 12,
            Location::Other => 13,
        }
    }

    /// Unknown non-zero ids fall back to `Other`.
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => Location::Empty,
            10 => Location::Home,
            11 => Location::Client,
            12 => Location::Office,
            _ => Location::Other,
        }
    }

    /// Parse an option value from the page; blank means no location.
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Location::Empty;
        }
        value.parse::<i64>().map(Self::from_id).unwrap_or(Location::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Location::Empty => "",
            Location::Home => "Home",
            Location::Client => "Client",
            Location::Office => "Office",
            Location::Other => "Other",
        }
    }
}
