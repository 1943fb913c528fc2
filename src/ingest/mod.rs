//! Input adapters.
//!
//! These run before the pipeline: fetching raw bookings from the booking
//! API or a JSON file, cleaning them into [`crate::models::Booking`] values,
//! and reading daily exchange rates from CSV.

mod booking_api;
mod cleaning;
mod rates_csv;

pub use booking_api::{
    BookingPage, BookingPageSource, DEFAULT_BOOKING_API_URL, DEFAULT_PER_PAGE, HttpBookingSource,
    fetch_all_bookings, page_count, parse_bookings_json, read_bookings_file,
};
pub use cleaning::{CleaningResult, RawBooking, RawBookingId, clean_bookings, title_case};
pub use rates_csv::{DEFAULT_RATES_CSV, parse_rates_csv, read_rates_csv};
