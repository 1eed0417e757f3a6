use dioxus::prelude::*;

use api::chart::{Figure, HoverEvent, TraceMode};

use crate::core::format;
use crate::dashboard::plot::{Projection, VIEW_HEIGHT, VIEW_WIDTH};

#[derive(Clone, PartialEq)]
struct LineShape {
    key: String,
    d: String,
    color: String,
    width: f64,
}

#[derive(Clone, PartialEq)]
struct MarkerShape {
    key: String,
    cx: f64,
    cy: f64,
    radius: f64,
    color: String,
    class: &'static str,
}

#[derive(Clone, PartialEq)]
struct BandShape {
    key: String,
    x: f64,
    width: f64,
    /// Unified-x hover target for the band's data x.
    hover: Option<HoverEvent>,
}

#[derive(Clone, PartialEq)]
struct TickMark {
    key: String,
    label: String,
    /// Grid line endpoints.
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
    /// Label anchor.
    label_x: f64,
    label_y: f64,
}

#[derive(Clone, PartialEq)]
struct LegendEntry {
    key: String,
    name: String,
    color: String,
    group: String,
    class: &'static str,
}

#[component]
pub fn PerformanceChart(figure: Figure, hover: Signal<Option<HoverEvent>>, loading: bool) -> Element {
    let mut hover = hover;
    // Legend groups switched off by the user.
    let mut hidden = use_signal(Vec::<String>::new);
    let title = figure.layout.title.clone();

    let Some(projection) = Projection::new(&figure) else {
        let message = if loading {
            "Loading franchise data…"
        } else {
            "No dated movies to plot for this franchise."
        };
        return rsx! {
            section { class: "dashboard-card dashboard-chart",
                div { class: "dashboard-card__header",
                    h2 { "{title}" }
                }
                p { class: "dashboard-card__placeholder", "{message}" }
            }
        };
    };

    let hidden_groups = hidden();
    let legend: Vec<LegendEntry> = figure
        .traces
        .iter()
        .filter(|trace| trace.show_legend)
        .map(|trace| LegendEntry {
            key: format!("legend-{}", trace.legend_group),
            name: trace.name.clone(),
            color: trace.color.clone(),
            group: trace.legend_group.clone(),
            class: if hidden_groups.contains(&trace.legend_group) {
                "dashboard-chart__legend-item dashboard-chart__legend-item--hidden"
            } else {
                "dashboard-chart__legend-item"
            },
        })
        .collect();
    let figure = figure.with_hidden_groups(&hidden_groups);

    let current = hover().filter(|event| {
        figure
            .traces
            .get(event.trace)
            .is_some_and(|trace| trace.visible)
    });
    let active_x = current.and_then(|event| figure.point(event)).map(|point| point.x);

    let lines: Vec<LineShape> = figure
        .traces
        .iter()
        .enumerate()
        .filter(|(_, trace)| trace.visible && trace.mode == TraceMode::Lines)
        .map(|(idx, trace)| LineShape {
            key: format!("line-{idx}"),
            d: projection.line_path(trace),
            color: trace.color.clone(),
            width: trace.size,
        })
        .collect();

    let markers: Vec<MarkerShape> = figure
        .traces
        .iter()
        .enumerate()
        .filter(|(_, trace)| trace.visible && trace.mode == TraceMode::Markers)
        .flat_map(|(trace_idx, trace)| {
            let projection = &projection;
            trace
                .points
                .iter()
                .enumerate()
                .filter_map(move |(point_idx, point)| {
                    let y = point.y?;
                    Some(MarkerShape {
                        key: format!("marker-{trace_idx}-{point_idx}"),
                        cx: projection.x(point.x),
                        cy: projection.y(y),
                        radius: trace.size,
                        color: trace.color.clone(),
                        class: if active_x == Some(point.x) {
                            "dashboard-chart__marker dashboard-chart__marker--active"
                        } else {
                            "dashboard-chart__marker"
                        },
                    })
                })
        })
        .collect();

    let bands: Vec<BandShape> = projection
        .hover_bands(&figure.hover_positions())
        .into_iter()
        .enumerate()
        .map(|(idx, band)| BandShape {
            key: format!("band-{idx}"),
            x: band.x,
            width: band.width,
            hover: figure.hover_at(band.target),
        })
        .collect();

    let tooltip = current.and_then(|event| {
        let anchor = figure.point(event)?;
        let heading = anchor
            .payload
            .as_ref()
            .and_then(|record| record.formatted_release_date.clone())
            .unwrap_or_else(|| format::format_year(anchor.x));
        let rows: Vec<(String, String, String)> = figure
            .unified_points(event)
            .into_iter()
            .map(|(trace, point)| {
                (
                    trace.color.clone(),
                    trace.name.clone(),
                    format::format_value(point.y),
                )
            })
            .collect();
        Some((projection.x(anchor.x), heading, rows))
    });

    let (left, right, top, bottom) = (
        projection.left(),
        projection.right(),
        projection.top(),
        projection.bottom(),
    );
    let y_ticks: Vec<TickMark> = projection
        .y_ticks()
        .into_iter()
        .map(|tick| TickMark {
            key: format!("y-{}", tick.label),
            x1: left,
            x2: right,
            y1: tick.position,
            y2: tick.position,
            label_x: left - 8.0,
            label_y: tick.position + 4.0,
            label: tick.label,
        })
        .collect();
    let x_ticks: Vec<TickMark> = projection
        .x_ticks()
        .into_iter()
        .map(|tick| TickMark {
            key: format!("x-{}", tick.label),
            x1: tick.position,
            x2: tick.position,
            y1: top,
            y2: bottom,
            label_x: tick.position,
            label_y: bottom + 18.0,
            label: tick.label,
        })
        .collect();
    let x_title = figure.layout.x_axis_title.clone();
    let y_title = figure.layout.y_axis_title.clone();
    let x_title_pos = (left + right) / 2.0;
    let x_title_y = VIEW_HEIGHT - 12.0;
    let y_title_x = 14.0;
    let y_title_y = (top + bottom) / 2.0;
    let plot_height = bottom - top;

    rsx! {
        section { class: "dashboard-card dashboard-chart",
            div { class: "dashboard-card__header",
                h2 { "{title}" }
                div { class: "dashboard-chart__legend",
                    for entry in legend.iter().cloned() {
                        button {
                            key: "{entry.key}",
                            r#type: "button",
                            class: entry.class,
                            title: "Show or hide {entry.name}",
                            onclick: move |_| {
                                let mut groups = hidden.write();
                                match groups.iter().position(|group| *group == entry.group) {
                                    Some(idx) => {
                                        groups.remove(idx);
                                    }
                                    None => groups.push(entry.group.clone()),
                                }
                                hover.set(None);
                            },
                            span {
                                class: "dashboard-chart__legend-swatch",
                                style: "background: {entry.color}",
                            }
                            "{entry.name}"
                        }
                    }
                }
            }

            svg {
                class: "dashboard-chart__canvas",
                view_box: "0 0 {VIEW_WIDTH} {VIEW_HEIGHT}",
                onmouseleave: move |_| hover.set(None),

                g { class: "dashboard-chart__grid",
                    for tick in y_ticks.iter() {
                        g { key: "{tick.key}",
                            line { x1: "{tick.x1}", x2: "{tick.x2}", y1: "{tick.y1}", y2: "{tick.y2}" }
                            text {
                                class: "dashboard-chart__tick",
                                x: "{tick.label_x}",
                                y: "{tick.label_y}",
                                text_anchor: "end",
                                "{tick.label}"
                            }
                        }
                    }
                    for tick in x_ticks.iter() {
                        g { key: "{tick.key}",
                            line { x1: "{tick.x1}", x2: "{tick.x2}", y1: "{tick.y1}", y2: "{tick.y2}" }
                            text {
                                class: "dashboard-chart__tick",
                                x: "{tick.label_x}",
                                y: "{tick.label_y}",
                                text_anchor: "middle",
                                "{tick.label}"
                            }
                        }
                    }
                }

                line {
                    class: "dashboard-chart__axis",
                    x1: "{left}", x2: "{right}", y1: "{bottom}", y2: "{bottom}",
                }
                text {
                    class: "dashboard-chart__axis-title",
                    x: "{x_title_pos}",
                    y: "{x_title_y}",
                    text_anchor: "middle",
                    "{x_title}"
                }
                text {
                    class: "dashboard-chart__axis-title",
                    x: "{y_title_x}",
                    y: "{y_title_y}",
                    text_anchor: "middle",
                    transform: "rotate(-90 {y_title_x} {y_title_y})",
                    "{y_title}"
                }

                if let Some((x, _, _)) = tooltip.as_ref() {
                    line {
                        class: "dashboard-chart__crosshair",
                        x1: "{x}", x2: "{x}", y1: "{top}", y2: "{bottom}",
                    }
                }

                for line_shape in lines.iter() {
                    path {
                        key: "{line_shape.key}",
                        class: "dashboard-chart__line",
                        d: "{line_shape.d}",
                        stroke: "{line_shape.color}",
                        stroke_width: "{line_shape.width}",
                        fill: "none",
                        pointer_events: "none",
                    }
                }

                for marker in markers.iter() {
                    circle {
                        key: "{marker.key}",
                        class: marker.class,
                        cx: "{marker.cx}",
                        cy: "{marker.cy}",
                        r: "{marker.radius}",
                        fill: "{marker.color}",
                    }
                }

                g { class: "dashboard-chart__bands",
                    for band in bands.iter().cloned() {
                        rect {
                            key: "{band.key}",
                            class: "dashboard-chart__band",
                            x: "{band.x}",
                            y: "{top}",
                            width: "{band.width}",
                            height: "{plot_height}",
                            onmouseenter: move |_| hover.set(band.hover),
                        }
                    }
                }
            }

            if let Some((_, heading, rows)) = tooltip.as_ref() {
                div { class: "dashboard-chart__tooltip",
                    strong { "{heading}" }
                    ul {
                        for (color, name, value) in rows.iter() {
                            li { key: "{name}",
                                span {
                                    class: "dashboard-chart__legend-swatch",
                                    style: "background: {color}",
                                }
                                span { "{name}: " }
                                strong { "{value}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
