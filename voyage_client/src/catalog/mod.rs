//! Client-side presentation logic over gateway payloads: package, destination and
//! booking normalization, filtering, sorting and display formatting.

mod filter;
mod format;
mod types;

pub use filter::{
    BookingFilter, BookingOrder, DestinationFilter, PackageFilter, PackageSort, filter_bookings,
    filter_destinations, filter_packages,
};
pub use format::{flight_duration, format_clock_time, format_flight_date, format_long_date};
pub use types::{BookingStatus, Destination, TourPackage};
