use leptos::prelude::*;
use wasm_bindgen::JsCast;

use homestead_shared::{Attribute, RegionRow};

use crate::app::{ChartTitle, SelectedAttribute, Transitions, YScale};
use crate::chart::ChartLayout;
use crate::controller::{self, SwitchInput};

/// Attribute selector. The placeholder option is disabled, so the change
/// handler only ever sees one of the five attribute labels.
#[component]
pub fn AttributeDropdown() -> impl IntoView {
    let rows: RwSignal<Vec<RegionRow>> = expect_context();
    let SelectedAttribute(selected) = expect_context();
    let YScale(y_scale) = expect_context();
    let ChartTitle(title) = expect_context();
    let Transitions(transitions) = expect_context();
    let layout: ChartLayout = expect_context();

    view! {
        <select
            class="dropdown"
            on:change=move |e| {
                let Some(select) = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
                else {
                    return;
                };
                let Some(attr) = Attribute::from_label(&select.value()) else {
                    return;
                };
                controller::switch_attribute(
                    attr,
                    SwitchInput {
                        rows,
                        selected,
                        y_scale,
                        title,
                        transitions,
                        layout,
                    },
                );
            }
        >
            <option disabled=true selected=true value="">
                "Select Attribute"
            </option>
            {Attribute::ALL
                .into_iter()
                .map(|attr| {
                    view! { <option value=attr.label()>{attr.label()}</option> }
                })
                .collect_view()}
        </select>
    }
}
