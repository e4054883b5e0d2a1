//! Field id and field name generation

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Monotonically observed wall-clock millis; never goes backwards within a process
fn observed_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let prev = LAST_MILLIS.fetch_max(now, Ordering::Relaxed);
    prev.max(now)
}

/// Generate a field id of the form `field_<millis>_<9 base36 chars>`
pub fn generate_field_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("field_{}_{}", observed_millis(), suffix)
}

/// Default step id for the step at zero-based `index`
pub fn step_id_for(index: usize) -> String {
    format!("step_{}", index + 1)
}

/// Derive a payload key from a label: lowercase, whitespace runs become `_`
pub fn derive_field_name(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_id_shape() {
        let id = generate_field_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "field");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
    }

    #[test]
    fn test_field_ids_unique_in_burst() {
        let ids: HashSet<String> = (0..500).map(|_| generate_field_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_derive_field_name() {
        assert_eq!(derive_field_name("Email Address"), "email_address");
        assert_eq!(derive_field_name("  Full   Name "), "full_name");
        assert_eq!(derive_field_name(""), "");
    }
}
