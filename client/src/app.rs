use geojson::Feature;
use leptos::prelude::*;

use homestead_shared::{Attribute, LinearScale, QuantileScale, RegionRow};

use crate::chart::{BarChart, ChartLayout};
use crate::data;
use crate::dropdown::AttributeDropdown;
use crate::label::HoverLabel;
use crate::map::ChoroplethMap;
use crate::transition::TransitionSet;

/// Newtype wrappers give same-shaped signals distinct types for Leptos
/// context. (Without them, `provide_context` of a second
/// `RwSignal<Option<String>>` would overwrite the first.)
#[derive(Clone, Copy)]
pub(crate) struct SelectedAttribute(pub RwSignal<Attribute>);
#[derive(Clone, Copy)]
pub(crate) struct HoveredRegion(pub RwSignal<Option<String>>);
#[derive(Clone, Copy)]
pub(crate) struct ChartTitle(pub RwSignal<String>);
#[derive(Clone, Copy)]
pub(crate) struct YScale(pub RwSignal<LinearScale>);
#[derive(Clone, Copy)]
pub(crate) struct Transitions(pub RwSignal<TransitionSet>);
#[derive(Clone, Copy)]
pub(crate) struct AnimNow(pub RwSignal<f64>);

pub(crate) fn viewport_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

/// Root component. Owns every piece of shared state; the attribute switch
/// controller is the only writer of the selected attribute and the scales,
/// everything else reads them through context.
#[component]
pub fn App() -> impl IntoView {
    let rows: RwSignal<Vec<RegionRow>> = RwSignal::new(Vec::new());
    let features: RwSignal<Vec<Feature>> = RwSignal::new(Vec::new());
    let selected: RwSignal<Attribute> = RwSignal::new(Attribute::default_selection());
    let hovered: RwSignal<Option<String>> = RwSignal::new(None);
    let mouse_pos: RwSignal<(f64, f64)> = RwSignal::new((0.0, 0.0));
    let title: RwSignal<String> = RwSignal::new("Select Attribute".to_string());
    let transitions: RwSignal<TransitionSet> = RwSignal::new(TransitionSet::default());
    let anim_now: RwSignal<f64> = RwSignal::new(0.0);

    let (viewport_width, _) = viewport_dimensions();
    let layout = ChartLayout::from_viewport(viewport_width);
    // The axis starts on a fixed domain; the first attribute switch
    // re-derives it from the data.
    let y_scale: RwSignal<LinearScale> = RwSignal::new(LinearScale::new(
        (0.0, 100_000.0),
        (layout.inner_height(), 0.0),
    ));

    // Rebuilt from scratch whenever the selected attribute (or the data)
    // changes; quantile breakpoints are attribute-specific.
    let color_scale: Memo<QuantileScale> = Memo::new(move |_| {
        rows.with(|rows| QuantileScale::from_values(rows.iter().map(|r| r.value(selected.get()))))
    });

    crate::transition::init_clock(anim_now, transitions);

    provide_context(rows);
    provide_context(features);
    provide_context(mouse_pos);
    provide_context(SelectedAttribute(selected));
    provide_context(HoveredRegion(hovered));
    provide_context(ChartTitle(title));
    provide_context(YScale(y_scale));
    provide_context(Transitions(transitions));
    provide_context(AnimNow(anim_now));
    provide_context(color_scale);
    provide_context(layout);

    // Kick off the joined fetch once on mount. Nothing renders until both
    // sources have arrived and been joined.
    Effect::new(move || {
        data::load(rows, features);
    });

    view! {
        <div style="display: flex; flex-direction: row; align-items: flex-start; gap: 16px; padding: 12px;">
            <div class="map-container">
                <ChoroplethMap />
            </div>
            <div class="chart-container" style="display: flex; flex-direction: column; gap: 8px;">
                <AttributeDropdown />
                <BarChart />
            </div>
        </div>
        <HoverLabel />
    }
}
