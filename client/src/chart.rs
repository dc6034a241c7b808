use std::cmp::Ordering;

use leptos::prelude::*;

use homestead_shared::{Attribute, LinearScale, QuantileScale, RegionRow};

use crate::app::{AnimNow, ChartTitle, HoveredRegion, SelectedAttribute, Transitions, YScale};

pub const CHART_HEIGHT: f64 = 473.0;
pub const LEFT_PADDING: f64 = 25.0;
pub const RIGHT_PADDING: f64 = 2.0;
pub const TOP_BOTTOM_PADDING: f64 = 5.0;
pub const BAR_GAP: f64 = 5.0;
pub const AXIS_TICK_COUNT: usize = 10;

/// Chart geometry, fixed at startup from the window width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
}

impl ChartLayout {
    pub fn from_viewport(viewport_width: f64) -> Self {
        Self {
            width: viewport_width * 0.425,
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.width - LEFT_PADDING - RIGHT_PADDING
    }

    pub fn inner_height(&self) -> f64 {
        CHART_HEIGHT - TOP_BOTTOM_PADDING * 2.0
    }
}

/// Row indices in display order: descending by the attribute's value.
/// The sort is stable, so ties keep their input order; rows with a missing
/// value sort after every valued row.
pub fn bar_order(rows: &[RegionRow], attr: Attribute) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| match (rows[a].value(attr), rows[b].value(attr)) {
        (Some(va), Some(vb)) => vb.partial_cmp(&va).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order
}

/// Display rank per row index (inverse of `bar_order`).
pub fn bar_ranks(rows: &[RegionRow], attr: Attribute) -> Vec<usize> {
    let order = bar_order(rows, attr);
    let mut ranks = vec![0; order.len()];
    for (rank, &row_ix) in order.iter().enumerate() {
        ranks[row_ix] = rank;
    }
    ranks
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle for the bar at `rank` out of `n`. A missing or out-of-domain
/// value is clamped to a zero-height bar sitting on the baseline rather than
/// producing NaN geometry.
pub fn bar_rect(
    rank: usize,
    n: usize,
    value: Option<f64>,
    layout: ChartLayout,
    y_scale: &LinearScale,
) -> BarRect {
    let slot = layout.inner_width() / n.max(1) as f64;
    let x = rank as f64 * slot + LEFT_PADDING;
    let width = (slot - BAR_GAP).max(0.0);

    let height = match value {
        Some(v) => (layout.inner_height() - y_scale.scale(v)).clamp(0.0, layout.inner_height()),
        None => 0.0,
    };
    BarRect {
        x,
        y: layout.inner_height() - height + TOP_BOTTOM_PADDING,
        width,
        height,
    }
}

/// Tick label formatting: whole numbers without a fraction.
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Vertical bar chart of all tabular rows, linked to the map by region key.
#[component]
pub fn BarChart() -> impl IntoView {
    let rows: RwSignal<Vec<RegionRow>> = expect_context();
    let SelectedAttribute(selected) = expect_context();
    let HoveredRegion(hovered) = expect_context();
    let mouse_pos: RwSignal<(f64, f64)> = expect_context();
    let ChartTitle(title) = expect_context();
    let YScale(y_scale) = expect_context();
    let Transitions(transitions) = expect_context();
    let AnimNow(anim_now) = expect_context();
    let color_scale: Memo<QuantileScale> = expect_context();
    let layout: ChartLayout = expect_context();

    let ranks = Memo::new(move |_| rows.with(|rows| bar_ranks(rows, selected.get())));

    view! {
        <svg class="chart" width=layout.width height=CHART_HEIGHT>
            {move || {
                let n = rows.with(Vec::len);
                rows.get()
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let key = row.key.clone();
                        let values: [Option<f64>; Attribute::COUNT] =
                            Attribute::ALL.map(|attr| row.value(attr));

                        let rect = {
                            let key = key.clone();
                            Memo::new(move |_| {
                                let now = anim_now.get();
                                transitions
                                    .with(|ts| ts.bar_rect(&key, now))
                                    .unwrap_or_else(|| {
                                        let rank = ranks.with(|r| r.get(i).copied().unwrap_or(0));
                                        bar_rect(
                                            rank,
                                            n,
                                            values[selected.get().index()],
                                            layout,
                                            &y_scale.get(),
                                        )
                                    })
                            })
                        };
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
                                    None => homestead_shared::NO_DATA_FILL.to_string(),
                                }
                            }
                        };
                        let stroke = {
                            let key = key.clone();
                            move || {
                                if hovered.get().as_deref() == Some(key.as_str()) {
                                    "blue"
                                } else {
                                    "none"
                                }
                            }
                        };
                        let enter_key = key.clone();
                        view! {
                            <rect
                                class="bar"
                                x=move || rect.get().x
                                y=move || rect.get().y
                                width=move || rect.get().width
                                height=move || rect.get().height
                                fill=fill
                                stroke=stroke
                                stroke-width="2"
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
            <Axis />
            <rect
                class="chart-frame"
                x="0"
                y="0"
                width=layout.width
                height=CHART_HEIGHT
                fill="none"
                stroke="#999"
                stroke-width="1"
            />
            <text
                class="chart-title"
                x=layout.width / 2.0
                y="30"
                text-anchor="middle"
            >
                {move || title.get()}
            </text>
        </svg>
    }
}

/// Left axis. Ticks are regenerated from scratch whenever the scale's
/// domain changes; there is no incremental rescaling.
#[component]
fn Axis() -> impl IntoView {
    let YScale(y_scale) = expect_context();
    let layout: ChartLayout = expect_context();

    view! {
        <g class="axis">
            <line
                x1=LEFT_PADDING
                y1=TOP_BOTTOM_PADDING
                x2=LEFT_PADDING
                y2=TOP_BOTTOM_PADDING + layout.inner_height()
                stroke="#333"
            />
            {move || {
                let scale = y_scale.get();
                scale
                    .ticks(AXIS_TICK_COUNT)
                    .into_iter()
                    .map(|tick| {
                        let y = scale.scale(tick) + TOP_BOTTOM_PADDING;
                        view! {
                            <g class="tick">
                                <line
                                    x1=LEFT_PADDING - 6.0
                                    y1=y
                                    x2=LEFT_PADDING
                                    y2=y
                                    stroke="#333"
                                />
                                <text
                                    x=LEFT_PADDING - 8.0
                                    y=y
                                    text-anchor="end"
                                    dominant-baseline="middle"
                                    font-size="10"
                                >
                                    {format_tick(tick)}
                                </text>
                            </g>
                        }
                    })
                    .collect_view()
            }}
        </g>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: Option<f64>) -> RegionRow {
        let mut values = [None; Attribute::COUNT];
        values[0] = value;
        RegionRow::new(key, key, values)
    }

    fn layout() -> ChartLayout {
        // 425 wide: inner width 398.
        ChartLayout { width: 425.0 }
    }

    #[test]
    fn order_is_descending_by_value() {
        let rows = vec![row("a", Some(5.0)), row("b", Some(9.0)), row("c", Some(1.0))];
        assert_eq!(bar_order(&rows, Attribute::TotalPopulation), vec![1, 0, 2]);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            row("a", Some(5.0)),
            row("b", Some(5.0)),
            row("c", Some(7.0)),
            row("d", Some(5.0)),
        ];
        assert_eq!(
            bar_order(&rows, Attribute::TotalPopulation),
            vec![2, 0, 1, 3]
        );
    }

    #[test]
    fn missing_values_sort_last() {
        let rows = vec![row("a", None), row("b", Some(2.0)), row("c", Some(4.0))];
        assert_eq!(bar_order(&rows, Attribute::TotalPopulation), vec![2, 1, 0]);
    }

    #[test]
    fn ranks_invert_order() {
        let rows = vec![row("a", Some(5.0)), row("b", Some(9.0)), row("c", Some(1.0))];
        assert_eq!(bar_ranks(&rows, Attribute::TotalPopulation), vec![1, 0, 2]);
    }

    #[test]
    fn bars_divide_inner_width_evenly_minus_gap() {
        let y = LinearScale::new((0.0, 100.0), (463.0, 0.0));
        let a = bar_rect(0, 4, Some(50.0), layout(), &y);
        let b = bar_rect(1, 4, Some(50.0), layout(), &y);
        let slot = layout().inner_width() / 4.0;
        assert_eq!(a.width, slot - BAR_GAP);
        assert_eq!(b.x - a.x, slot);
        assert_eq!(a.x, LEFT_PADDING);
    }

    #[test]
    fn bar_height_tracks_the_scale() {
        let y = LinearScale::new((0.0, 100.0), (463.0, 0.0));
        let full = bar_rect(0, 3, Some(100.0), layout(), &y);
        assert_eq!(full.height, 463.0);
        assert_eq!(full.y, TOP_BOTTOM_PADDING);

        let half = bar_rect(0, 3, Some(50.0), layout(), &y);
        assert_eq!(half.height, 231.5);
        assert_eq!(half.y, 463.0 - 231.5 + TOP_BOTTOM_PADDING);
    }

    #[test]
    fn missing_value_clamps_to_zero_height_on_the_baseline() {
        let y = LinearScale::new((0.0, 100.0), (463.0, 0.0));
        let bar = bar_rect(2, 3, None, layout(), &y);
        assert_eq!(bar.height, 0.0);
        assert_eq!(bar.y, 463.0 + TOP_BOTTOM_PADDING);
    }

    #[test]
    fn out_of_domain_value_clamps_instead_of_overflowing() {
        let y = LinearScale::new((10.0, 100.0), (463.0, 0.0));
        let below = bar_rect(0, 3, Some(0.0), layout(), &y);
        assert_eq!(below.height, 0.0);
        let above = bar_rect(0, 3, Some(1e9), layout(), &y);
        assert_eq!(above.height, 463.0);
    }

    #[test]
    fn tick_labels_drop_trailing_fractions() {
        assert_eq!(format_tick(10000.0), "10000");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
