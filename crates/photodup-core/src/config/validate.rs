//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

fn invalid(message: &str) -> Result<(), ConfigError> {
    Err(ConfigError::ValidationError(message.into()))
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let fp = &self.fingerprint;
        if !(2..=64).contains(&fp.global_hash_size) {
            return invalid("fingerprint.global_hash_size must be between 2 and 64");
        }
        if !(2..=64).contains(&fp.resize_hash_size) {
            return invalid("fingerprint.resize_hash_size must be between 2 and 64");
        }
        if !(2..=64).contains(&fp.segments.hash_size) {
            return invalid("fingerprint.segments.hash_size must be between 2 and 64");
        }
        if fp.resize_dimension < fp.resize_hash_size {
            return invalid("fingerprint.resize_dimension must be >= resize_hash_size");
        }
        if !(fp.segments.blur_sigma >= 0.0 && fp.segments.blur_sigma.is_finite()) {
            return invalid("fingerprint.segments.blur_sigma must be a finite value >= 0.0");
        }
        if fp.segments.max_segments == 0 {
            return invalid("fingerprint.segments.max_segments must be > 0");
        }
        if fp.segments.min_segment_area == 0 {
            return invalid("fingerprint.segments.min_segment_area must be > 0");
        }
        if fp.segments.min_std_dev < 0.0 {
            return invalid("fingerprint.segments.min_std_dev must be >= 0.0");
        }

        let fraction = self.similarity.segment_match_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return invalid("similarity.segment_match_fraction must be in (0.0, 1.0]");
        }

        if self.grouping.max_group_size < 2 {
            return invalid("grouping.max_group_size must be >= 2");
        }
        if self.grouping.progress_batch == 0 {
            return invalid("grouping.progress_batch must be > 0");
        }
        if self.jobs.max_concurrent_scans == 0 {
            return invalid("jobs.max_concurrent_scans must be > 0");
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return invalid("server.bind must be a socket address like 127.0.0.1:8000");
        }
        Ok(())
    }
}
