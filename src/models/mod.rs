mod client;
pub mod region;

pub use client::Client;
pub use client::NewClient;
pub use region::Region;
pub use region::REGIONS;
