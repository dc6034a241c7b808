use geojson::Feature;
use leptos::prelude::*;

use homestead_shared::{Attribute, NO_DATA_FILL, QuantileScale, feature_key, feature_value};

use crate::app::{AnimNow, HoveredRegion, SelectedAttribute, Transitions, viewport_dimensions};
use crate::projection::MapProjection;

pub const MAP_HEIGHT: f64 = 460.0;

pub fn map_dimensions() -> (f64, f64) {
    let (viewport_width, _) = viewport_dimensions();
    (viewport_width * 0.5, MAP_HEIGHT)
}

/// Choropleth surface: one path per boundary feature, filled by the current
/// attribute's quantile class, sentinel gray where the join left no value.
#[component]
pub fn ChoroplethMap() -> impl IntoView {
    let features: RwSignal<Vec<Feature>> = expect_context();
    let SelectedAttribute(selected) = expect_context();
    let HoveredRegion(hovered) = expect_context();
    let mouse_pos: RwSignal<(f64, f64)> = expect_context();
    let Transitions(transitions) = expect_context();
    let AnimNow(anim_now) = expect_context();
    let color_scale: Memo<QuantileScale> = expect_context();

    let (width, height) = map_dimensions();
    let projection =
        Memo::new(move |_| features.with(|features| MapProjection::fit(features, width, height)));

    view! {
        <svg class="map" width=width height=height>
            {move || {
                let projection = projection.get();
                features
                    .get()
                    .iter()
                    .map(|feature| {
                        let key = feature_key(feature).unwrap_or_default().to_string();
                        let values: [Option<f64>; Attribute::COUNT] =
                            Attribute::ALL.map(|attr| feature_value(feature, attr));
                        let d = projection.path_data(feature);

                        let fill = {
                            let key = key.clone();
                            move || {
                                let now = anim_now.get();
                                if let Some(css) = transitions.with(|ts| ts.fill_css(&key, now)) {
                                    return css;
                                }
                                match values[selected.get().index()] {
                                    Some(v) => {
                                        color_scale.with(|scale| scale.color(v)).to_string()
                                    }
                                    None => NO_DATA_FILL.to_string(),
                                }
                            }
                        };
                        let stroke = {
                            let key = key.clone();
                            move || {
                                if hovered.get().as_deref() == Some(key.as_str()) {
                                    "blue"
                                } else {
                                    "#fff"
                                }
                            }
                        };
                        let stroke_width = {
                            let key = key.clone();
                            move || {
                                if hovered.get().as_deref() == Some(key.as_str()) {
                                    "2"
                                } else {
                                    "0.5"
                                }
                            }
                        };
                        let enter_key = key.clone();
                        view! {
                            <path
                                class="region"
                                d=d
                                fill=fill
                                stroke=stroke
                                stroke-width=stroke_width
                                on:pointerenter=move |_| hovered.set(Some(enter_key.clone()))
                                on:pointermove=move |e: web_sys::PointerEvent| {
                                    mouse_pos.set((e.client_x() as f64, e.client_y() as f64));
                                }
                                on:pointerleave=move |_| hovered.set(None)
                            />
                        }
                    })
                    .collect_view()
            }}
        </svg>
    }
}
