use std::fmt::Write;

use geojson::{Feature, Value};

/// One-shot plate carrée projection: longitude/latitude scaled uniformly and
/// centered on the rendered surface, with latitude flipped into screen space.
/// Fitted once after load; the map does not pan or zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

const FIT_PADDING: f64 = 0.05;

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl MapProjection {
    /// Fit the feature collection's bounds into a surface with padding.
    pub fn fit(features: &[Feature], width: f64, height: f64) -> Self {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for feature in features {
            for ring in feature_rings(feature) {
                for pos in ring {
                    let (Some(&lon), Some(&lat)) = (pos.first(), pos.get(1)) else {
                        continue;
                    };
                    bounds = Some(match bounds {
                        None => (lon, lat, lon, lat),
                        Some((min_x, min_y, max_x, max_y)) => (
                            min_x.min(lon),
                            min_y.min(lat),
                            max_x.max(lon),
                            max_y.max(lat),
                        ),
                    });
                }
            }
        }

        let Some((min_x, min_y, max_x, max_y)) = bounds else {
            return Self::default();
        };
        let world_w = max_x - min_x;
        let world_h = max_y - min_y;
        if world_w <= 0.0 || world_h <= 0.0 || width <= 0.0 || height <= 0.0 {
            return Self::default();
        }

        let scale_x = width / (world_w * (1.0 + FIT_PADDING * 2.0));
        let scale_y = height / (world_h * (1.0 + FIT_PADDING * 2.0));
        let scale = scale_x.min(scale_y);

        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;
        Self {
            scale,
            offset_x: width / 2.0 - center_x * scale,
            offset_y: height / 2.0 + center_y * scale,
        }
    }

    /// Project a longitude/latitude pair to surface coordinates.
    /// Latitude grows north, screen y grows down.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            lon * self.scale + self.offset_x,
            self.offset_y - lat * self.scale,
        )
    }

    /// SVG path data for all rings of a polygonal feature.
    pub fn path_data(&self, feature: &Feature) -> String {
        let mut d = String::new();
        for ring in feature_rings(feature) {
            for (i, pos) in ring.iter().enumerate() {
                let (Some(&lon), Some(&lat)) = (pos.first(), pos.get(1)) else {
                    continue;
                };
                let (x, y) = self.project(lon, lat);
                let _ = write!(d, "{}{x:.2} {y:.2}", if i == 0 { 'M' } else { 'L' });
            }
            d.push('Z');
        }
        d
    }
}

fn feature_rings(feature: &Feature) -> Vec<&Vec<Vec<f64>>> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => rings.iter().collect(),
        Some(Value::MultiPolygon(polys)) => polys.iter().flatten().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Geometry;

    fn polygon(ring: Vec<Vec<f64>>) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    #[test]
    fn fit_centers_the_bounds() {
        let features = vec![polygon(vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![10.0, 5.0],
            vec![0.0, 5.0],
            vec![0.0, 0.0],
        ])];
        let proj = MapProjection::fit(&features, 100.0, 100.0);
        let (cx, cy) = proj.project(5.0, 2.5);
        assert!((cx - 50.0).abs() < 1e-9);
        assert!((cy - 50.0).abs() < 1e-9);
    }

    #[test]
    fn north_maps_up() {
        let features = vec![polygon(vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![10.0, 5.0],
            vec![0.0, 5.0],
            vec![0.0, 0.0],
        ])];
        let proj = MapProjection::fit(&features, 100.0, 100.0);
        let (_, y_south) = proj.project(5.0, 0.0);
        let (_, y_north) = proj.project(5.0, 5.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn fit_respects_the_narrower_axis() {
        let features = vec![polygon(vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![10.0, 5.0],
            vec![0.0, 0.0],
        ])];
        let proj = MapProjection::fit(&features, 100.0, 100.0);
        // Width is the limiting dimension: 100 / (10 * 1.1).
        assert!((proj.scale - 100.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn empty_features_fall_back_to_identity() {
        assert_eq!(MapProjection::fit(&[], 100.0, 100.0), MapProjection::default());
    }

    #[test]
    fn path_data_closes_each_ring() {
        let proj = MapProjection {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let feature = polygon(vec![
            vec![0.0, 0.0],
            vec![4.0, 0.0],
            vec![4.0, -3.0],
            vec![0.0, 0.0],
        ]);
        assert_eq!(
            proj.path_data(&feature),
            "M0.00 0.00L4.00 0.00L4.00 3.00L0.00 0.00Z"
        );
    }

    #[test]
    fn multipolygon_emits_one_subpath_per_ring() {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::MultiPolygon(vec![
                vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]]],
                vec![vec![vec![5.0, 0.0], vec![6.0, 0.0], vec![5.0, 0.0]]],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        let proj = MapProjection::default();
        let d = proj.path_data(&feature);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }
}
