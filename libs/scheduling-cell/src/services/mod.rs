pub mod avatar;
pub mod dashboard;
pub mod fetcher;
pub mod partition;
pub mod selection;
pub mod session;
pub mod submitter;

pub use avatar::AvatarResolver;
pub use dashboard::Dashboard;
pub use fetcher::{AvailabilityFetcher, AvailabilityState, FetchResult, FetchTicket};
pub use partition::{format_hour_label, partition, partition_slots, MORNING_CUTOFF_HOUR};
pub use selection::SelectionState;
pub use session::BookingSession;
pub use submitter::{local_timestamp, local_timestamp_in, BookingSubmitter};
