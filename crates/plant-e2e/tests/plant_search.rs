//! Search scenarios against the scripted map editor.

mod common;

use std::sync::Arc;

use plant_e2e::driver::PageLike;
use plant_e2e::testing::{MockAction, MockPage, MockSessionFactory};
use plant_e2e::{E2eError, MapPlantingPage, ScenarioRunner, ScenarioStatus, Target, WorkerId};

fn runner(factory: Arc<MockSessionFactory>) -> ScenarioRunner {
    ScenarioRunner::new(factory, common::config())
}

#[tokio::test]
async fn search_feature_passes() {
    let factory = Arc::new(MockSessionFactory::new(common::editor_for));
    let report = runner(factory.clone())
        .run(common::feature("search_plants.feature"))
        .await
        .unwrap();

    assert_eq!(report.scenarios.len(), 3);
    for scenario in &report.scenarios {
        assert_eq!(scenario.status, ScenarioStatus::Passed, "{scenario:?}");
    }
    assert!(factory.all_closed());
}

#[tokio::test]
async fn each_scenario_gets_its_own_session() {
    let factory = Arc::new(MockSessionFactory::new(common::editor_for));
    runner(factory.clone())
        .run(common::feature("search_plants.feature"))
        .await
        .unwrap();

    let opened = factory.opened();
    assert_eq!(opened.len(), 3);
    for (_, page) in &opened {
        let link = plant_e2e::DirectMapNavigator::map_link("SUT Plant Search");
        assert_eq!(page.clicks_on(&link), 1);
    }
}

#[tokio::test]
async fn typing_opens_search_then_fills() {
    let page = common::map_editor(&["SUT Plant Search"]);
    page.show(&Target::test_id("plant-search-icon"));
    let planting = MapPlantingPage::new(&page, &common::config());

    planting.click_search_icon().await.unwrap();
    planting.fill_plant_search("Tomato").await.unwrap();
    planting.expect_search_result_is_visible("Tomato").await.unwrap();

    assert_eq!(
        page.actions(),
        vec![
            MockAction::Click {
                target: Target::test_id("plant-search-icon")
            },
            MockAction::Fill {
                target: Target::test_id("plant-search-input"),
                text: "Tomato".into()
            },
        ]
    );
}

#[tokio::test]
async fn no_match_shows_empty_state_and_no_results() {
    let page = common::map_editor(&[]);
    page.show(&Target::test_id("plant-search-icon"));
    let planting = MapPlantingPage::new(&page, &common::config());

    planting.click_search_icon().await.unwrap();
    planting.fill_plant_search("zzznonexistent").await.unwrap();

    planting.expect_no_plants_found_text_is_visible().await.unwrap();
    assert!(!page.is_shown(&MapPlantingPage::search_result("Tomato")));
}

#[tokio::test]
async fn missing_result_times_out() {
    let page = common::map_editor(&[]);
    page.show(&Target::test_id("plant-search-icon"));
    let planting = MapPlantingPage::new(&page, &common::config());
    planting.click_search_icon().await.unwrap();
    planting.fill_plant_search("Tomato").await.unwrap();

    let err = planting
        .expect_search_result_is_visible("Potato")
        .await
        .unwrap_err();
    assert!(matches!(err, E2eError::Timeout { ms: 400, .. }));

    let err = planting
        .click_plant_from_search_results("Potato")
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn failed_assertion_aborts_only_its_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_feature(
        dir.path(),
        "wrong_plant.feature",
        "Feature: Wrong plant\n\
         \n\
         Scenario: Potato is not offered\n\
           Given I am on the SUT Plant Search map page and I have selected the plant layer\n\
           When I type Tomato into the search box\n\
           Then the app should display Potato as first match\n\
           And the app should display Tomato as first match\n\
         \n\
         Scenario: Tomato is offered\n\
           Given I am on the SUT Plant Search map page and I have selected the plant layer\n\
           When I type Tomato into the search box\n\
           Then the app should display Tomato as first match\n",
    );
    let factory = Arc::new(MockSessionFactory::new(common::editor_for));

    let report = runner(factory).run(&path).await.unwrap();
    assert_eq!(report.scenarios.len(), 2);
    assert_eq!(report.scenarios[0].scenario, "Potato is not offered");
    assert_eq!(report.scenarios[0].status, ScenarioStatus::Failed);
    assert_eq!(report.scenarios[1].status, ScenarioStatus::Passed);
}

#[tokio::test]
async fn unknown_step_is_skipped_and_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_feature(
        dir.path(),
        "unknown.feature",
        "Feature: Unknown\n\
         \n\
         Scenario: The moon\n\
           Given the moon is full\n\
           Then no match can be found and a text is displayed\n",
    );
    let factory = Arc::new(MockSessionFactory::new(common::editor_for));

    let report = runner(factory).run(&path).await.unwrap();
    assert_eq!(report.scenarios[0].status, ScenarioStatus::Skipped);
    assert!(!report.is_success());
}

#[tokio::test]
async fn given_step_selects_plant_layer_on_namespaced_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_feature(
        dir.path(),
        "given.feature",
        "Feature: Setup\n\
         \n\
         Scenario: Open the search map\n\
           Given I am on the SUT Plant Search map page and I have selected the plant layer\n",
    );
    let worker = WorkerId::new("gw7");
    let factory = Arc::new(MockSessionFactory::new(common::editor_for));

    let report = ScenarioRunner::new(factory.clone(), common::config().with_worker(&worker))
        .run(&path)
        .await
        .unwrap();
    assert!(report.is_success(), "{report:?}");
    assert_eq!(report.scenarios[0].worker, "gw7");

    let (opened_for, page) = &factory.opened()[0];
    assert_eq!(opened_for, &worker);
    let link = plant_e2e::DirectMapNavigator::map_link("SUT Plant Searchgw7");
    assert_eq!(page.clicks_on(&link), 1);
    assert!(page.is_checked(&Target::test_id("plants-layer-radio")));
    assert_eq!(page.url(), "http://localhost:5173/maps/1");
}

#[tokio::test]
async fn unlisted_map_fails_setup() {
    let factory = Arc::new(MockSessionFactory::new(|_| MockPage::new()));
    let report = runner(factory.clone())
        .run(common::feature("search_plants.feature"))
        .await
        .unwrap();
    assert_eq!(report.failed(), 3);
    assert!(report.failures().all(|s| s.status == ScenarioStatus::Failed));
    assert!(factory.all_closed());
}
