use super::*;

use crate::{resource::RequestStatus, testing::FakeApi};

#[tokio::test]
async fn loads_both_choice_lists() {
    let api = FakeApi::default();
    let options = FormOptions::new();

    options.load(&api).await.expect("load");

    assert_eq!(options.operators(), vec!["Ada", "Grace", "Linus"]);
    assert_eq!(options.sample_types(), vec!["Water", "Soil"]);
    assert_eq!(api.call_count("list_operators"), 1);
    assert_eq!(api.call_count("list_sample_types"), 1);
}

#[tokio::test]
async fn one_failing_list_leaves_the_other_usable() {
    let api = FakeApi::default();
    api.fail("list_sample_types", "Network Error");
    let options = FormOptions::default();

    let err = options.load(&api).await.expect_err("sample types fail");

    assert_eq!(err.to_string(), "Network Error");
    assert_eq!(options.operators().len(), 3);
    assert!(options.sample_types().is_empty());
    assert_eq!(
        options.sample_types_controller().status(),
        RequestStatus::Failed
    );
    assert_eq!(
        options.operators_controller().status(),
        RequestStatus::Succeeded
    );
}

#[tokio::test]
async fn matching_is_case_insensitive_and_trims_the_query() {
    let api = FakeApi::default();
    let options = FormOptions::new();
    options.load(&api).await.expect("load");

    assert_eq!(options.matching_operators(" gr "), vec!["Grace"]);
    assert_eq!(options.matching_operators("IN"), vec!["Linus"]);
    assert_eq!(options.matching_operators("").len(), 3);
    assert_eq!(options.matching_sample_types("o"), vec!["Soil"]);
    assert!(options.matching_sample_types("ice").is_empty());
}

#[test]
fn nothing_to_match_before_loading() {
    let options = FormOptions::new();
    assert!(options.matching_operators("a").is_empty());
}
