use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

use super::format::parse_timestamp;
use super::types::{BookingStatus, Destination, TourPackage};

/// Criteria from the packages page sidebar. Ranges are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageFilter {
    /// `None` (or "all") keeps every category
    pub category: Option<String>,
    pub price_range: (f64, f64),
    pub duration_range: (u32, u32),
    /// Case-insensitive text matched against title, location, description and activities
    pub query: Option<String>,
}

impl Default for PackageFilter {
    fn default() -> Self {
        Self {
            category: None,
            price_range: (0.0, 5000.0),
            duration_range: (1, 14),
            query: None,
        }
    }
}

impl PackageFilter {
    pub fn matches(&self, package: &TourPackage) -> bool {
        if let Some(category) = self.category.as_deref() {
            if category != "all" && package.category != category {
                return false;
            }
        }

        let (min_price, max_price) = self.price_range;
        if package.price < min_price || package.price > max_price {
            return false;
        }

        let (min_days, max_days) = self.duration_range;
        if package.duration < min_days || package.duration > max_days {
            return false;
        }

        match self.query.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                [&package.title, &package.location, &package.description]
                    .into_iter()
                    .chain(&package.activities)
                    .any(|field| field.to_lowercase().contains(&query))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageSort {
    /// Featured first, then by rating
    #[default]
    Recommended,
    PriceLowHigh,
    PriceHighLow,
    DurationShortLong,
    DurationLongShort,
    Rating,
}

impl FromStr for PackageSort {
    type Err = Infallible;

    /// Parses the sort selector values; anything unknown is `Recommended`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "price-low-high" => Self::PriceLowHigh,
            "price-high-low" => Self::PriceHighLow,
            "duration-short-long" => Self::DurationShortLong,
            "duration-long-short" => Self::DurationLongShort,
            "rating" => Self::Rating,
            _ => Self::Recommended,
        })
    }
}

impl PackageSort {
    fn compare(&self, a: &TourPackage, b: &TourPackage) -> Ordering {
        match self {
            Self::PriceLowHigh => a.price.total_cmp(&b.price),
            Self::PriceHighLow => b.price.total_cmp(&a.price),
            Self::DurationShortLong => a.duration.cmp(&b.duration),
            Self::DurationLongShort => b.duration.cmp(&a.duration),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Recommended => b
                .featured
                .cmp(&a.featured)
                .then_with(|| b.rating.total_cmp(&a.rating)),
        }
    }
}

/// Packages matching `filter`, ordered by `sort`. Ties keep their input order.
pub fn filter_packages(
    packages: &[TourPackage],
    filter: &PackageFilter,
    sort: PackageSort,
) -> Vec<TourPackage> {
    let mut result: Vec<TourPackage> = packages
        .iter()
        .filter(|package| filter.matches(package))
        .cloned()
        .collect();
    result.sort_by(|a, b| sort.compare(a, b));
    result
}

/// Destinations page criteria: a category tab and the search box
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationFilter {
    /// `None` (or "all") keeps every category
    pub category: Option<String>,
    /// Case-insensitive text matched against name, location and description
    pub query: Option<String>,
}

impl DestinationFilter {
    pub fn matches(&self, destination: &Destination) -> bool {
        if let Some(category) = self.category.as_deref() {
            if category != "all" && destination.category != category {
                return false;
            }
        }

        match self.query.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                [
                    &destination.name,
                    &destination.location,
                    &destination.description,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
            }
        }
    }
}

/// Destinations matching `filter`, in input order
pub fn filter_destinations(
    destinations: &[Destination],
    filter: &DestinationFilter,
) -> Vec<Destination> {
    destinations
        .iter()
        .filter(|destination| filter.matches(destination))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for BookingOrder {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "oldest" => Self::Oldest,
            _ => Self::Newest,
        })
    }
}

/// Bookings dashboard filter; `status: None` keeps everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Value) -> bool {
        match &self.status {
            None => true,
            Some(wanted) => BookingStatus::of(booking).as_ref() == Some(wanted),
        }
    }
}

fn booking_date(booking: &Value) -> Option<DateTime<FixedOffset>> {
    ["Booking_Date", "Created_At"]
        .iter()
        .filter_map(|key| booking.get(*key).and_then(Value::as_str))
        .find_map(parse_timestamp)
}

/// Raw booking records matching `filter`, ordered by `Booking_Date` (falling back to
/// `Created_At`). Bookings without a usable date sort as the oldest.
pub fn filter_bookings(
    bookings: &[Value],
    filter: &BookingFilter,
    order: BookingOrder,
) -> Vec<Value> {
    let mut result: Vec<(Option<DateTime<FixedOffset>>, Value)> = bookings
        .iter()
        .filter(|booking| filter.matches(booking))
        .map(|booking| (booking_date(booking), booking.clone()))
        .collect();

    // None orders before Some, i.e. undated bookings count as the epoch
    result.sort_by(|(a, _), (b, _)| match order {
        BookingOrder::Newest => b.cmp(a),
        BookingOrder::Oldest => a.cmp(b),
    });

    result.into_iter().map(|(_, booking)| booking).collect()
}
