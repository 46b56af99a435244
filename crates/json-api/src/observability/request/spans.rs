//! Route labels for spans and metrics.

use uuid::Uuid;

/// Request path with identifiers collapsed, so `/orders/<uuid>` and
/// `/orders/<other uuid>` share one label.
pub(super) fn route_label(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuids_are_collapsed() {
        assert_eq!(
            route_label("/orders/0190b3c4-5e6f-7a8b-9c0d-1e2f3a4b5c6d/refund"),
            "/orders/{uuid}/refund"
        );
    }

    #[test]
    fn plain_segments_are_kept() {
        assert_eq!(route_label("/shipping/kuwait-city"), "/shipping/kuwait-city");
        assert_eq!(route_label("/"), "/");
    }
}
