use shared::models::location::LocationInfo;
use std::cmp::Ordering;

fn compare(a: &LocationInfo, b: &LocationInfo) -> Ordering {
    b.has_reserved_host()
        .cmp(&a.has_reserved_host())
        .then_with(|| a.price.total_cmp(&b.price))
}

/// Locations holding a host reserved for the requester come first, then by
/// ascending price. Exact ties keep their incoming order.
pub fn rank(locations: impl IntoIterator<Item = LocationInfo>) -> Vec<LocationInfo> {
    let mut ranked: Vec<_> = locations.into_iter().collect();
    ranked.sort_by(compare);
    ranked
}
