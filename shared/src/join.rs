use geojson::Feature;
use serde_json::Value;

use crate::attributes::Attribute;
use crate::dataset::{KEY_FIELD, NAME_FIELD, RegionRow};

/// Read a feature's join key from its properties.
pub fn feature_key(feature: &Feature) -> Option<&str> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get(KEY_FIELD))
        .and_then(Value::as_str)
}

/// Read a feature's attribute value written by a previous join.
pub fn feature_value(feature: &Feature, attr: Attribute) -> Option<f64> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get(attr.label()))
        .and_then(Value::as_f64)
}

pub fn feature_name(feature: &Feature) -> Option<&str> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get(NAME_FIELD))
        .and_then(Value::as_str)
}

/// Merge tabular attribute values onto matching boundary features by key
/// equality. Every matching feature receives the row's display name and all
/// parsed attribute values; missing values are left unset so downstream
/// readers see them as absent. Unmatched rows and unmatched features are
/// both left alone by contract.
///
/// Linear scan per row, O(rows * features). Both collections are tens of
/// entries; an indexed join would change performance only.
pub fn join_attributes(features: &mut [Feature], rows: &[RegionRow]) {
    for row in rows {
        for feature in features.iter_mut() {
            if feature_key(feature) != Some(row.key.as_str()) {
                continue;
            }
            for attr in Attribute::ALL {
                if let Some(value) = row.value(attr) {
                    feature.set_property(attr.label(), value);
                }
            }
            feature.set_property(NAME_FIELD, row.name.clone());
        }
    }
}
