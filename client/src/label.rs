use leptos::html::Div;
use leptos::prelude::*;

use homestead_shared::RegionRow;

use crate::app::{HoveredRegion, SelectedAttribute, viewport_dimensions};

/// Width assumed before the label has been measured once.
pub const LABEL_FALLBACK_WIDTH: f64 = 150.0;

/// Place the label near the pointer, flipping to the other side when it
/// would clip: horizontally within (label width + 20) of the right edge,
/// vertically within 75 of the top.
pub fn label_position(
    client_x: f64,
    client_y: f64,
    label_width: f64,
    viewport_width: f64,
) -> (f64, f64) {
    let x = if client_x > viewport_width - label_width - 20.0 {
        client_x - label_width - 10.0
    } else {
        client_x + 10.0
    };
    let y = if client_y < 75.0 {
        client_y + 25.0
    } else {
        client_y - 75.0
    };
    (x, y)
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v}"),
        None => "No data".to_string(),
    }
}

/// Floating label shown while a region or bar is hovered. A single component
/// instance renders it, so at most one exists at a time.
#[component]
pub fn HoverLabel() -> impl IntoView {
    let rows: RwSignal<Vec<RegionRow>> = expect_context();
    let SelectedAttribute(selected) = expect_context();
    let HoveredRegion(hovered) = expect_context();
    let mouse_pos: RwSignal<(f64, f64)> = expect_context();
    let label_ref: NodeRef<Div> = NodeRef::new();

    let info = Memo::new(move |_| {
        let key = hovered.get()?;
        rows.with(|rows| {
            rows.iter()
                .find(|row| row.key == key)
                .map(|row| (row.name.clone(), row.value(selected.get())))
        })
    });

    view! {
        {move || {
            let Some((name, value)) = info.get() else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            let (client_x, client_y) = mouse_pos.get();
            let width = label_ref
                .get_untracked()
                .map(|el| el.get_bounding_client_rect().width())
                .unwrap_or(LABEL_FALLBACK_WIDTH);
            let (viewport_width, _) = viewport_dimensions();
            let (x, y) = label_position(client_x, client_y, width, viewport_width);
            view! {
                <div
                    class="infolabel"
                    node_ref=label_ref
                    style="position: fixed; pointer-events: none; z-index: 100; background: #fff; border: 1px solid #999; border-radius: 4px; padding: 6px 10px; box-shadow: 0 2px 8px rgba(0,0,0,0.25);"
                    style:left=format!("{x}px")
                    style:top=format!("{y}px")
                >
                    <h1 style="margin: 0; font-size: 1.3rem;">{format_value(value)}</h1>
                    <b>{selected.get().label()}</b>
                    <div class="labelname">{name}</div>
                </div>
            }
            .into_any()
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::{format_value, label_position};

    #[test]
    fn label_sits_right_of_pointer_by_default() {
        assert_eq!(label_position(300.0, 400.0, 150.0, 1200.0), (310.0, 325.0));
    }

    #[test]
    fn label_flips_left_near_the_right_edge() {
        let (x, _) = label_position(1100.0, 400.0, 150.0, 1200.0);
        assert_eq!(x, 1100.0 - 150.0 - 10.0);
    }

    #[test]
    fn label_flips_below_near_the_top() {
        let (_, y) = label_position(300.0, 50.0, 150.0, 1200.0);
        assert_eq!(y, 75.0);
    }

    #[test]
    fn flip_threshold_is_exclusive() {
        // Exactly at the horizontal threshold: no flip.
        let (x, _) = label_position(1030.0, 400.0, 150.0, 1200.0);
        assert_eq!(x, 1040.0);
        // Exactly at the vertical threshold: no flip.
        let (_, y) = label_position(300.0, 75.0, 150.0, 1200.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn values_format_without_trailing_fraction() {
        assert_eq!(format_value(Some(5893718.0)), "5893718");
        assert_eq!(format_value(Some(1400.5)), "1400.5");
        assert_eq!(format_value(None), "No data");
    }
}
