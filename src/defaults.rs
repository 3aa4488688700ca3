pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const DEFAULT_HUB_LOCATION: &str = "Hub";

pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
