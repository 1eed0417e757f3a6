use dioxus::prelude::*;

use api::detail::{DetailPanel, Media, MetricCard, MetricIcon, PanelState, COMMENT_COLOR};

const MOVIE_ICON: Asset = asset!("/assets/icons/movie.svg");
const TICKET_ICON: Asset = asset!("/assets/icons/ticket.svg");

/// Side panel for the hovered movie. Purely a view of [`DetailPanel`].
#[component]
pub fn MovieDetailPanel(panel: DetailPanel, franchise: String) -> Element {
    let state_class = match panel.state {
        PanelState::Placeholder => "dashboard-detail dashboard-detail--placeholder",
        PanelState::Hovered => "dashboard-detail",
        PanelState::Unavailable => "dashboard-detail dashboard-detail--error",
    };

    rsx! {
        aside { class: "dashboard-card {state_class}",
            div { class: "dashboard-detail__summary",
                if !franchise.is_empty() {
                    span { class: "dashboard-detail__franchise", "{franchise}" }
                }
                h3 { "{panel.heading}" }
                p { class: "dashboard-detail__subtitle", "{panel.subtitle}" }
            }

            div { class: "dashboard-detail__media",
                img {
                    class: "dashboard-detail__poster",
                    src: "{panel.poster}",
                    alt: "{panel.heading} poster",
                }
                {render_media(&panel.media, &panel.heading)}
            }

            div { class: "dashboard-detail__metrics",
                {render_metric(&panel.performance)}
                {render_metric(&panel.sentiment)}
            }

            dl { class: "dashboard-detail__stats",
                for stat in panel.stats.iter() {
                    div { key: "{stat.label}", class: "dashboard-detail__stat",
                        dt { "{stat.label}" }
                        dd { "{stat.value}" }
                    }
                }
            }

            if !panel.comment.is_empty() {
                p { class: "dashboard-detail__comment",
                    i { style: "color: {COMMENT_COLOR}", "{panel.comment}" }
                }
            }
        }
    }
}

fn render_media(media: &Media, title: &str) -> Element {
    match media {
        Media::Image(src) => rsx! {
            img {
                class: "dashboard-detail__backdrop",
                src: "{src}",
                alt: "{title} backdrop",
            }
        },
        Media::Trailer(src) => rsx! {
            iframe {
                class: "dashboard-detail__trailer",
                src: "{src}",
                title: "{title} trailer",
                allowfullscreen: true,
            }
        },
    }
}

fn render_metric(card: &MetricCard) -> Element {
    let icon = match card.icon {
        MetricIcon::Movie => MOVIE_ICON,
        MetricIcon::Ticket => TICKET_ICON,
    };

    rsx! {
        div { class: "dashboard-detail__metric",
            img { class: "dashboard-detail__metric-icon", src: icon, alt: "" }
            div {
                span { class: "dashboard-detail__metric-label", "{card.label}" }
                strong { class: "dashboard-detail__metric-value", "{card.value}" }
            }
        }
    }
}
