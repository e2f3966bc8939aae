/// Path segment that marks the canonical shareable activation link
pub const ACTIVATE_PATH_SEGMENT: &str = "/activate/";

/// Separator used by legacy `event:sno:name` QR payloads
pub const LEGACY_PAYLOAD_SEPARATOR: char = ':';

/// Upper bound on events accepted by one batch classification request
pub const MAX_STATUS_BATCH_SIZE: usize = 200;
