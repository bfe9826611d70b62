use super::*;

#[test]
fn test_initial_state_automatic() {
    let state: FetchState<String> = FetchState::initial(false);

    assert!(state.data.is_none());
    assert!(state.error.is_none());
    assert!(state.loading);
    assert_eq!(state.generation, 0);
    assert!(!state.is_idle());
}

#[test]
fn test_initial_state_manual() {
    let state: FetchState<String> = FetchState::initial(true);

    assert!(state.data.is_none());
    assert!(state.error.is_none());
    assert!(!state.loading);
    assert!(state.is_idle());
}

#[test]
fn test_data_and_error_can_coexist() {
    let state = FetchState {
        data: Some("initial".to_string()),
        loading: false,
        error: Some(FetchError::transport("Refetch failed")),
        generation: 2,
    };

    assert!(state.has_data());
    assert!(state.has_error());
}
