use serde::Deserialize;

use geojson::{Feature, Geometry, JsonObject, Value};

/// A TopoJSON document: a shared arc table plus named geometry objects.
/// Quantized documents delta-encode arc positions against `transform`.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub objects: std::collections::BTreeMap<String, TopoGeometry>,
    pub arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// Geometry objects we accept: the boundary sources used here are a single
/// GeometryCollection of Polygon/MultiPolygon entries, each carrying its
/// identifying properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<JsonObject>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<JsonObject>,
    },
}

pub fn parse(text: &str) -> Result<Topology, String> {
    serde_json::from_str(text).map_err(|e| format!("topology parse error: {e}"))
}

/// Convert one named object of `topo` into standard polygon features.
/// Falls back to the document's first object when `object` is absent, so the
/// boundary asset can be regenerated without a code change.
pub fn feature_collection(topo: &Topology, object: &str) -> Result<Vec<Feature>, String> {
    let root = topo
        .objects
        .get(object)
        .or_else(|| topo.objects.values().next())
        .ok_or("topology has no objects")?;

    let arcs = decode_arcs(topo);
    let mut features = Vec::new();
    collect_features(root, &arcs, &mut features)?;
    Ok(features)
}

/// Resolve delta encoding and the quantization transform once, up front.
fn decode_arcs(topo: &Topology) -> Vec<Vec<[f64; 2]>> {
    topo.arcs
        .iter()
        .map(|arc| match &topo.transform {
            Some(t) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .map(|p| {
                        x += p.first().copied().unwrap_or(0.0);
                        y += p.get(1).copied().unwrap_or(0.0);
                        [
                            x * t.scale[0] + t.translate[0],
                            y * t.scale[1] + t.translate[1],
                        ]
                    })
                    .collect()
            }
            None => arc
                .iter()
                .map(|p| {
                    [
                        p.first().copied().unwrap_or(0.0),
                        p.get(1).copied().unwrap_or(0.0),
                    ]
                })
                .collect(),
        })
        .collect()
}

fn collect_features(
    geom: &TopoGeometry,
    arcs: &[Vec<[f64; 2]>],
    out: &mut Vec<Feature>,
) -> Result<(), String> {
    match geom {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_features(g, arcs, out)?;
            }
        }
        TopoGeometry::Polygon { arcs: rings, properties } => {
            let rings = rings
                .iter()
                .map(|ring| stitch_ring(arcs, ring))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(make_feature(Value::Polygon(rings), properties.clone()));
        }
        TopoGeometry::MultiPolygon { arcs: polys, properties } => {
            let polys = polys
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|ring| stitch_ring(arcs, ring))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            out.push(make_feature(Value::MultiPolygon(polys), properties.clone()));
        }
    }
    Ok(())
}

fn make_feature(value: Value, properties: Option<JsonObject>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties,
        foreign_members: None,
    }
}

/// Stitch arc references into one ring. A negative index means the
/// one's-complement arc traversed in reverse; consecutive arcs share their
/// junction point, which is emitted only once.
fn stitch_ring(arcs: &[Vec<[f64; 2]>], indices: &[i64]) -> Result<Vec<Vec<f64>>, String> {
    let mut ring: Vec<Vec<f64>> = Vec::new();
    for &ix in indices {
        let (arc_ix, reversed) = if ix >= 0 {
            (ix as usize, false)
        } else {
            (!ix as usize, true)
        };
        let arc = arcs
            .get(arc_ix)
            .ok_or_else(|| format!("arc index {ix} out of range"))?;

        let append = |ring: &mut Vec<Vec<f64>>, p: &[f64; 2]| ring.push(vec![p[0], p[1]]);
        let skip = usize::from(!ring.is_empty());
        if reversed {
            for p in arc.iter().rev().skip(skip) {
                append(&mut ring, p);
            }
        } else {
            for p in arc.iter().skip(skip) {
                append(&mut ring, p);
            }
        }
    }
    Ok(ring)
}
