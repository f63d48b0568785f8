use super::*;

#[test]
fn search_request_defaults_max_results_to_100() {
    let req: Request = serde_json::from_str(r#"{"command":"search","pattern":"foo"}"#).unwrap();
    match req {
        Request::Search {
            pattern,
            max_results,
        } => {
            assert_eq!(pattern, "foo");
            assert_eq!(max_results, 100);
        }
        other => panic!("expected Search, got {other:?}"),
    }
}

#[test]
fn search_request_honors_explicit_max_results() {
    let req: Request =
        serde_json::from_str(r#"{"command":"search","pattern":"foo","max_results":5}"#).unwrap();
    match req {
        Request::Search { max_results, .. } => assert_eq!(max_results, 5),
        other => panic!("expected Search, got {other:?}"),
    }
}

#[test]
fn apply_changes_request_parses() {
    let req: Request =
        serde_json::from_str(r#"{"command":"apply_changes","changes":"diff text"}"#).unwrap();
    assert!(matches!(req, Request::ApplyChanges { changes } if changes == "diff text"));
}

#[test]
fn shutdown_request_parses_with_no_fields() {
    let req: Request = serde_json::from_str(r#"{"command":"shutdown"}"#).unwrap();
    assert!(matches!(req, Request::Shutdown));
}

#[test]
fn unknown_command_fails_to_parse() {
    let result: Result<Request, _> = serde_json::from_str(r#"{"command":"frobnicate"}"#);
    assert!(result.is_err());
}

#[test]
fn missing_required_field_fails_to_parse() {
    let result: Result<Request, _> = serde_json::from_str(r#"{"command":"search"}"#);
    assert!(result.is_err());
}

#[test]
fn search_response_computes_returned_matches_from_len() {
    let resp = SearchResponse::new(10, vec![]);
    assert_eq!(resp.status, "success");
    assert_eq!(resp.total_matches, 10);
    assert_eq!(resp.returned_matches, 0);
}
