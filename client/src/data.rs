use futures::join;
use geojson::Feature;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use homestead_shared::{RegionRow, join_attributes, parse_rows, topology};

const DATASET_URL: &str = "data/housing.csv";
const BOUNDARY_URL: &str = "data/us_states.topojson";
const BOUNDARY_OBJECT: &str = "states";

pub async fn fetch_rows() -> Result<Vec<RegionRow>, String> {
    let resp = gloo_net::http::Request::get(DATASET_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let text = resp.text().await.map_err(|e| format!("read error: {e}"))?;
    parse_rows(&text)
}

pub async fn fetch_features() -> Result<Vec<Feature>, String> {
    let resp = gloo_net::http::Request::get(BOUNDARY_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let text = resp.text().await.map_err(|e| format!("read error: {e}"))?;
    let topo = topology::parse(&text)?;
    topology::feature_collection(&topo, BOUNDARY_OBJECT)
}

/// Fetch both sources concurrently and run the join exactly once, after both
/// have arrived. Either failure leaves the page unrendered: the signals stay
/// empty and the error goes to the console.
pub fn load(rows_signal: RwSignal<Vec<RegionRow>>, features_signal: RwSignal<Vec<Feature>>) {
    spawn_local(async move {
        let (rows, features) = join!(fetch_rows(), fetch_features());
        match (rows, features) {
            (Ok(rows), Ok(mut features)) => {
                join_attributes(&mut features, &rows);
                features_signal.set(features);
                rows_signal.set(rows);
            }
            (rows, features) => {
                for err in [rows.err(), features.err()].into_iter().flatten() {
                    web_sys::console::warn_1(&format!("data load failed: {err}").into());
                }
            }
        }
    });
}
