//! Keeping a user's host choice consistent across inventory refreshes.

use shared::models::location::{LocationHost, LocationInfo};

/// Host to preselect when the user picks a location.
pub fn default_host(location: &LocationInfo) -> Option<&LocationHost> {
    location
        .hostnodes
        .iter()
        .find(|host| host.reserved)
        .or_else(|| location.hostnodes.first())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// The host is still offered.
    Kept(String),
    /// The host vanished from the matching set and must be chosen again.
    Invalidated(String),
    Unselected,
}

pub fn reconcile_selection(selected: Option<&str>, locations: &[LocationInfo]) -> SelectionState {
    match selected {
        None => SelectionState::Unselected,
        Some(host_id) if locations.iter().any(|l| l.contains_host(host_id)) => {
            SelectionState::Kept(host_id.to_string())
        }
        Some(host_id) => SelectionState::Invalidated(host_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::location::Availability;

    fn location(hosts: &[(&str, bool)]) -> LocationInfo {
        LocationInfo {
            availability: Availability::LowStock,
            location: "Dallas, Texas, United States".to_string(),
            price: 2.0,
            gpu_type: "h100-sxm5-80gb".to_string(),
            stock: hosts.len() as u32,
            cpu_type: "EPYC 7763".to_string(),
            hostnodes: hosts
                .iter()
                .map(|(id, reserved)| LocationHost {
                    id: id.to_string(),
                    ports: vec![20004],
                    specs: Default::default(),
                    reserved: *reserved,
                    uptime: 1.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_host_prefers_reserved() {
        let loc = location(&[("a", false), ("b", true), ("c", true)]);
        assert_eq!(default_host(&loc).map(|h| h.id.as_str()), Some("b"));

        let loc = location(&[("a", false), ("b", false)]);
        assert_eq!(default_host(&loc).map(|h| h.id.as_str()), Some("a"));

        assert!(default_host(&location(&[])).is_none());
    }

    #[test]
    fn test_reconcile_after_refresh() {
        let locations = vec![location(&[("a", false)]), location(&[("b", false)])];

        assert_eq!(
            reconcile_selection(Some("b"), &locations),
            SelectionState::Kept("b".to_string())
        );
        assert_eq!(
            reconcile_selection(Some("gone"), &locations),
            SelectionState::Invalidated("gone".to_string())
        );
        assert_eq!(reconcile_selection(None, &locations), SelectionState::Unselected);
    }
}
