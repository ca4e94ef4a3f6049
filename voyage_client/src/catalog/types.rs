use serde::Serialize;
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const DEFAULT_DESCRIPTION: &str = "Experience this amazing package.";
const DEFAULT_DURATION_DAYS: u32 = 7;
const DEFAULT_CATEGORY: &str = "adventure";
const DEFAULT_IMAGE: &str = "/images/packages/mountain-view.jpg";
const DEFAULT_RATING: f64 = 4.5;
const DEFAULT_DESTINATION_CATEGORY: &str = "other";

/// Tour package as listed on the packages page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourPackage {
    pub id: String,
    pub title: String,
    pub location: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    /// Length in days
    pub duration: u32,
    pub category: String,
    pub image: String,
    pub rating: f64,
    pub featured: bool,
    pub activities: Vec<String>,
}

impl TourPackage {
    /// Normalize a backend package record. Returns `None` unless `raw` is an object.
    ///
    /// Numeric fields accept JSON numbers or numeric strings (decimal columns often
    /// arrive as strings). Zero or missing duration and rating fall back to defaults.
    pub fn from_record(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;

        Some(Self {
            id: text(record, "Package_ID").unwrap_or_default(),
            title: text(record, "Package_Name").unwrap_or_default(),
            location: text(record, "Location").unwrap_or_default(),
            description: text(record, "Description")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            price: number(record, "Price").unwrap_or(0.0),
            original_price: number(record, "Original_Price"),
            duration: number(record, "Duration")
                .filter(|d| *d >= 1.0)
                .map(|d| d as u32)
                .unwrap_or(DEFAULT_DURATION_DAYS),
            category: text(record, "Category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image: text(record, "Image_URL").unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            rating: number(record, "Rating")
                .filter(|r| *r > 0.0)
                .unwrap_or(DEFAULT_RATING),
            featured: matches!(record.get("featured"), Some(Value::Bool(true))),
            activities: list(record, "Activities"),
        })
    }

    /// Normalize every object in a JSON array; anything else yields an empty list.
    pub fn from_records(raw: &Value) -> Vec<Self> {
        raw.as_array()
            .map(|records| records.iter().filter_map(Self::from_record).collect())
            .unwrap_or_default()
    }

    pub fn nights(&self) -> u32 {
        self.duration.saturating_sub(1)
    }

    /// e.g. "7 days / 6 nights"
    pub fn trip_length_label(&self) -> String {
        format!("{} days / {} nights", self.duration, self.nights())
    }
}

/// Destination card on the destinations page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub rating: f64,
    pub review_count: u32,
    pub attractions: Vec<String>,
}

impl Destination {
    /// Normalize a backend destination record. Returns `None` unless `raw` is an object.
    pub fn from_record(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;

        Some(Self {
            id: text(record, "Destination_ID").unwrap_or_default(),
            name: text(record, "Name").unwrap_or_default(),
            location: text(record, "Location").unwrap_or_default(),
            description: text(record, "Description").unwrap_or_default(),
            image: text(record, "Image_URL").unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            category: text(record, "Category")
                .unwrap_or_else(|| DEFAULT_DESTINATION_CATEGORY.to_string()),
            rating: number(record, "Rating")
                .filter(|r| *r > 0.0)
                .unwrap_or(DEFAULT_RATING),
            review_count: number(record, "Review_Count")
                .filter(|n| *n >= 0.0)
                .map(|n| n as u32)
                .unwrap_or(0),
            attractions: list(record, "Popular_Attractions"),
        })
    }

    pub fn from_records(raw: &Value) -> Vec<Self> {
        raw.as_array()
            .map(|records| records.iter().filter_map(Self::from_record).collect())
            .unwrap_or_default()
    }
}

fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A comma-separated string or an array of strings, items trimmed, blanks dropped
fn list(record: &Map<String, Value>, key: &str) -> Vec<String> {
    let items: Vec<&str> = match record.get(key) {
        Some(Value::String(s)) => s.split(',').collect(),
        Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Booking payment status as shown on the bookings dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Other(String),
}

impl BookingStatus {
    /// Status of a backend booking record, read from `Payment_Status`
    pub fn of(booking: &Value) -> Option<Self> {
        booking
            .get("Payment_Status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

impl FromStr for BookingStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "cancelled" | "canceled" => Self::Cancelled,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Completed => write!(f, "Completed"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}
