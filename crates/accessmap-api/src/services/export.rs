//! GeoJSON rendering of routes and search hits.

use accessmap_core::models::RouteSummary;
use accessmap_discovery::LocationReport;
use geojson::{Feature, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

/// Render a stopped route as a LineString feature
///
/// A route with fewer than two samples has no valid LineString; its geometry
/// is a MultiPoint of whatever was captured instead.
pub fn route_feature(summary: &RouteSummary) -> Feature {
    let positions: Vec<Vec<f64>> = summary
        .path
        .iter()
        .map(|s| vec![s.coordinate.longitude(), s.coordinate.latitude()])
        .collect();

    let geometry = if positions.len() >= 2 {
        Geometry::new(Value::LineString(positions))
    } else {
        Geometry::new(Value::MultiPoint(positions))
    };

    let mut properties = Map::new();
    properties.insert("session_id".to_string(), JsonValue::from(summary.session_id.to_string()));
    properties.insert("owner_id".to_string(), JsonValue::from(summary.owner_id.to_string()));
    properties.insert(
        "total_distance_meters".to_string(),
        JsonValue::from(summary.total_distance_meters),
    );
    properties.insert(
        "active_duration_seconds".to_string(),
        JsonValue::from(summary.active_duration_seconds),
    );
    properties.insert("started_at".to_string(), JsonValue::from(summary.started_at.to_rfc3339()));
    properties.insert("stopped_at".to_string(), JsonValue::from(summary.stopped_at.to_rfc3339()));

    Feature {
        geometry: Some(geometry),
        properties: Some(properties),
        id: None,
        bbox: None,
        foreign_members: None,
    }
}

/// Render a location report as a Point feature
pub fn location_feature(report: &LocationReport) -> Feature {
    let location = &report.location;
    let geometry = Geometry::new(Value::Point(vec![
        location.coordinate.longitude(),
        location.coordinate.latitude(),
    ]));

    let mut properties = Map::new();
    properties.insert("id".to_string(), JsonValue::from(location.id.0));
    properties.insert("name".to_string(), JsonValue::from(location.name.clone()));
    properties.insert("category".to_string(), JsonValue::from(location.category.clone()));

    if let Some(distance) = report.distance_meters {
        properties.insert("distance_meters".to_string(), JsonValue::from(distance));
    }

    properties.insert(
        "accessibility".to_string(),
        serde_json::to_value(&report.features).unwrap_or(JsonValue::Null),
    );
    properties.insert(
        "overall".to_string(),
        serde_json::to_value(report.overall).unwrap_or(JsonValue::Null),
    );

    Feature {
        geometry: Some(geometry),
        properties: Some(properties),
        id: None,
        bbox: None,
        foreign_members: None,
    }
}
