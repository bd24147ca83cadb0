//! A scripted stand-in for the map editor, built on `MockPage`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use plant_e2e::driver::BoundingBox;
use plant_e2e::testing::{Effect, MockPage};
use plant_e2e::{DirectMapNavigator, E2eConfig, MapPlantingPage, Target, WorkerId};

pub const BASE_URL: &str = "http://localhost:5173";

pub const CANVAS: BoundingBox = BoundingBox {
    x: 320.0,
    y: 64.0,
    width: 960.0,
    height: 640.0,
};

pub fn config() -> E2eConfig {
    E2eConfig {
        base_url: BASE_URL.to_string(),
        timeout_ms: 400,
        short_timeout_ms: 30,
        ..E2eConfig::default()
    }
}

pub fn features_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("features")
}

pub fn feature(name: &str) -> PathBuf {
    features_dir().join(name)
}

/// Writes `source` as a feature file into `dir`.
pub fn write_feature(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

/// The planting screen of one map, as reached from the map list.
///
/// Only maps named in `maps` (already namespaced) are listed. The search
/// knows Tomato (exact and by prefix); everything else finds nothing.
pub fn map_editor(maps: &[&str]) -> MockPage {
    let page = MockPage::new().with_action_timeout(Duration::from_millis(100));

    let map_list = format!("{BASE_URL}/maps");
    for (index, name) in maps.iter().enumerate() {
        let link = DirectMapNavigator::map_link(name);
        page.on_goto(&map_list, [Effect::show(link.clone())]);
        page.on_click(
            &link,
            [
                Effect::set_url(format!("{BASE_URL}/maps/{}", index + 1)),
                Effect::show(Target::test_id("base-layer-radio")),
                Effect::show(Target::test_id("plants-layer-radio")),
                Effect::show(Target::test_id("plant-search-icon")),
                Effect::show(Target::role("button", "Maps")),
                Effect::show(MapPlantingPage::undo_button()),
                Effect::show(MapPlantingPage::redo_button()),
            ],
        );
    }

    let canvas = Target::test_id("canvas");
    page.set_bbox(&canvas, CANVAS);

    let icon = Target::test_id("plant-search-icon");
    let input = Target::test_id("plant-search-input");
    page.on_click(&icon, [Effect::show(input.clone())]);

    let tomato = MapPlantingPage::search_result("Tomato");
    let empty = MapPlantingPage::empty_search_results();
    for text in ["Tomato", "tom"] {
        page.on_fill(&input, text, [Effect::show(tomato.clone()), Effect::hide(empty.clone())]);
    }
    page.on_fill(
        &input,
        "zzznonexistent",
        [Effect::hide(tomato.clone()), Effect::show(empty.clone())],
    );

    let heading = MapPlantingPage::planted_heading("Tomato");
    let delete = Target::role("button", "Delete Planting");
    page.on_mouse_click([Effect::show(heading.clone()), Effect::show(delete.clone())]);
    page.on_click(&delete, [Effect::hide(heading.clone())]);
    page.on_click(&MapPlantingPage::undo_button(), [Effect::show(heading.clone())]);
    page.on_click(&MapPlantingPage::redo_button(), [Effect::hide(heading)]);

    page.on_click(
        &Target::role("button", "Maps"),
        [Effect::set_url(format!("{BASE_URL}/maps"))],
    );

    page
}

/// An editor listing this worker's copy of every map used by the features.
pub fn editor_for(worker: &WorkerId) -> MockPage {
    let search = format!("SUT Plant Search{worker}");
    let planting = format!("SUT Planting{worker}");
    map_editor(&[&search, &planting])
}
