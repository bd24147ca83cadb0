//! Steps for searching and planting on a map.

use cucumber::{given, then, when};

use crate::error::Result;
use crate::world::ScenarioWorld;

#[given(regex = r"^I am on the (.+) map page and I have selected the plant layer$")]
async fn on_map_with_plant_layer(world: &mut ScenarioWorld, name: String) -> Result<()> {
    world.open_map(&name).await?;
    world.planting()?.check_plant_layer().await
}

#[when(regex = r"^I type (.+) into the search box$")]
async fn type_into_search(world: &mut ScenarioWorld, plant: String) -> Result<()> {
    let planting = world.planting()?;
    planting.click_search_icon().await?;
    planting.fill_plant_search(&plant).await
}

#[when(regex = r"^I select (.+) from the search results$")]
async fn select_search_result(world: &mut ScenarioWorld, plant: String) -> Result<()> {
    world
        .planting()?
        .click_plant_from_search_results(&plant)
        .await
}

#[when("I click on the middle of the canvas")]
async fn click_canvas_middle(world: &mut ScenarioWorld) -> Result<()> {
    world.planting()?.click_on_canvas_middle().await
}

#[when("I delete the selected planting")]
async fn delete_planting(world: &mut ScenarioWorld) -> Result<()> {
    world.planting()?.click_delete().await
}

#[when("I undo the last action")]
async fn undo(world: &mut ScenarioWorld) -> Result<()> {
    world.planting()?.click_undo().await
}

#[when("I redo the last action")]
async fn redo(world: &mut ScenarioWorld) -> Result<()> {
    world.planting()?.click_redo().await
}

#[then(regex = r"^the app should display (.+) as first match$")]
async fn result_is_displayed(world: &mut ScenarioWorld, result: String) -> Result<()> {
    world
        .planting()?
        .expect_search_result_is_visible(&result)
        .await
}

#[then("no match can be found and a text is displayed")]
async fn nothing_found_is_displayed(world: &mut ScenarioWorld) -> Result<()> {
    world
        .planting()?
        .expect_no_plants_found_text_is_visible()
        .await
}

#[then(regex = r"^(.+) should be planted$")]
async fn plant_is_planted(world: &mut ScenarioWorld, plant: String) -> Result<()> {
    world.planting()?.expect_plant_to_be_planted(&plant).await
}

#[then(regex = r"^(.+) should not be planted$")]
async fn plant_is_not_planted(world: &mut ScenarioWorld, plant: String) -> Result<()> {
    world
        .planting()?
        .expect_plant_to_not_be_planted(&plant)
        .await
}
