#![cfg(test)]
/*!
Theme selector lint for the dashboard.

Every class the dashboard components emit must have a rule in
`ui/assets/theme/main.css`. This is a substring check, so a renamed class in
either the markup or the stylesheet shows up here instead of as an unstyled
page.

If you intentionally rename or remove a selector, update the rsx markup and
REQUIRED_SELECTORS together.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));

const COMPONENT_SOURCES: &[(&str, &str)] = &[
    ("chart.rs", include_str!("../src/dashboard/chart.rs")),
    ("detail.rs", include_str!("../src/dashboard/detail.rs")),
    ("picker.rs", include_str!("../src/dashboard/picker.rs")),
    ("dashboard.rs", include_str!("../src/views/dashboard.rs")),
    ("app_header.rs", include_str!("../src/components/app_header.rs")),
];

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".app-header",
    ".app-header__title",
    ".dashboard__panels",
    ".dashboard__error",
    // Cards
    ".dashboard-card {",
    ".dashboard-card__header",
    ".dashboard-card__placeholder",
    // Picker
    ".dashboard-picker",
    ".dashboard-picker__label",
    ".dashboard-picker__select",
    // Chart
    ".dashboard-chart__legend",
    ".dashboard-chart__legend-item",
    ".dashboard-chart__legend-item--hidden",
    ".dashboard-chart__legend-swatch",
    ".dashboard-chart__canvas",
    ".dashboard-chart__grid",
    ".dashboard-chart__tick",
    ".dashboard-chart__axis",
    ".dashboard-chart__axis-title",
    ".dashboard-chart__crosshair",
    ".dashboard-chart__line",
    ".dashboard-chart__marker",
    ".dashboard-chart__marker--active",
    ".dashboard-chart__bands",
    ".dashboard-chart__band {",
    ".dashboard-chart__tooltip",
    // Detail panel
    ".dashboard-detail {",
    ".dashboard-detail--placeholder",
    ".dashboard-detail--error",
    ".dashboard-detail__summary",
    ".dashboard-detail__franchise",
    ".dashboard-detail__subtitle",
    ".dashboard-detail__media",
    ".dashboard-detail__poster",
    ".dashboard-detail__backdrop",
    ".dashboard-detail__trailer",
    ".dashboard-detail__metrics",
    ".dashboard-detail__metric",
    ".dashboard-detail__metric-icon",
    ".dashboard-detail__metric-label",
    ".dashboard-detail__metric-value",
    ".dashboard-detail__stats",
    ".dashboard-detail__stat",
    ".dashboard-detail__comment",
    // Responsive block
    "@media (max-width: 720px)",
];

#[test]
fn theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn every_required_class_is_used_by_a_component() {
    let unused: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .filter_map(|sel| {
            let class = sel.strip_prefix('.')?;
            let class = class.trim_end_matches(" {");
            let used = COMPONENT_SOURCES
                .iter()
                .any(|(_, src)| src.contains(class));
            (!used).then_some(*sel)
        })
        .collect();

    assert!(
        unused.is_empty(),
        "Selectors with no matching markup: {unused:?}"
    );
}

#[test]
fn theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 3_000,
        "Theme appears unexpectedly small ({non_ws_len} non-whitespace chars); \
         did the file get truncated or the path change?"
    );
}

#[test]
fn icons_referenced_by_the_detail_panel_exist() {
    for icon in ["movie.svg", "ticket.svg"] {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets/icons")
            .join(icon);
        assert!(path.is_file(), "missing icon {}", path.display());
    }
}
