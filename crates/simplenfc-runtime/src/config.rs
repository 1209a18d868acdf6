//! Connector configuration

/// NFC connector configuration
#[derive(Clone, Debug)]
pub struct ConnectorConfig {
    /// Capacity of the bounded result channel
    pub result_capacity: usize,
    /// Log type, id and payload of every record after a write
    pub log_record_contents: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig {
            result_capacity: 32,
            log_record_contents: false,
        }
    }
}
