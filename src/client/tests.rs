use super::*;

fn ranked(identifier: &str, score: f64) -> RankedCandidate {
    RankedCandidate {
        identifier: identifier.to_string(),
        text: format!("texto {identifier}"),
        congruence_score: score,
        computed_perplexity: 42.0,
    }
}

fn identifiers(ranked: &[RankedCandidate]) -> Vec<&str> {
    ranked.iter().map(|c| c.identifier.as_str()).collect()
}

#[test]
fn test_rank_orders_by_descending_score() {
    let scored = vec![ranked("a", 3.2), ranked("b", 9.1), ranked("c", 1.0), ranked("d", 6.5)];

    let top = rank_by_score(scored, 10);

    assert_eq!(identifiers(&top), vec!["b", "d", "a", "c"]);
}

#[test]
fn test_rank_truncates_to_top_n() {
    let scored = vec![ranked("a", 3.2), ranked("b", 9.1), ranked("c", 1.0), ranked("d", 6.5)];

    let top = rank_by_score(scored, DEFAULT_TOP_N);

    assert_eq!(identifiers(&top), vec!["b", "d", "a"]);
}

#[test]
fn test_rank_keeps_submission_order_on_ties() {
    let scored = vec![ranked("first", 1.0), ranked("second", 1.0), ranked("third", 1.0)];

    let top = rank_by_score(scored, 2);

    assert_eq!(identifiers(&top), vec!["first", "second"]);
}

#[test]
fn test_rank_with_fewer_than_top_n() {
    let top = rank_by_score(vec![ranked("only", 5.0)], 3);
    assert_eq!(top.len(), 1);
    assert!(rank_by_score(Vec::new(), 3).is_empty());
}

#[test]
fn test_ranked_candidate_from_result() {
    let candidate = Candidate::new("shift-3", "El gato come pescado.");
    let result = ScoreResult::from_perplexity("El gato come pescado.", 20.0);

    let ranked = RankedCandidate::new(&candidate, &result);

    assert_eq!(ranked.identifier, "shift-3");
    assert_eq!(ranked.congruence_score, 10.0);
    assert_eq!(ranked.computed_perplexity, 20.0);
}

#[test]
fn test_preview_ellipsizes_long_text() {
    let mut candidate = ranked("long", 5.0);
    candidate.text = "ñ".repeat(60);

    let preview = candidate.preview();

    assert_eq!(preview.chars().count(), 53);
    assert!(preview.ends_with("..."));
    assert_eq!(ranked("short", 5.0).preview(), "texto short");
}

#[test]
fn test_report_display() {
    let report = RankingReport {
        ranked: vec![ranked("b", 9.1), ranked("a", 3.25)],
        failed: vec![FailedEvaluation {
            identifier: "c".to_string(),
            error: "timeout".to_string(),
        }],
        total: 3,
    };

    let rendered = report.to_string();

    assert!(rendered.contains("1. [b] score 9.10"));
    assert!(rendered.contains("2. [a] score 3.25"));
    assert!(rendered.contains("1 candidates failed"));
    assert_eq!(report.best().map(|c| c.identifier.as_str()), Some("b"));
}

#[test]
fn test_empty_report_display() {
    assert_eq!(
        RankingReport::default().to_string(),
        "No candidates submitted.\n"
    );

    let report = RankingReport {
        failed: vec![FailedEvaluation {
            identifier: "x".to_string(),
            error: "503".to_string(),
        }],
        total: 1,
        ..Default::default()
    };
    assert!(report.to_string().contains("No candidate could be evaluated"));
}

#[test]
fn test_client_url_building() {
    let client = EvaluationClient::new("http://localhost:8000/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
    assert_eq!(client.url("/evaluate"), "http://localhost:8000/evaluate");
    assert_eq!(client.url("evaluate"), "http://localhost:8000/evaluate");
}

#[test]
fn test_local_client_targets_default_port() {
    let client = EvaluationClient::local().unwrap();
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    assert_eq!(client.url("/evaluate"), "http://localhost:8000/evaluate");
}

#[test]
fn test_truncate_body() {
    assert_eq!(truncate_body("short"), "short");
    let long = "x".repeat(100);
    assert_eq!(truncate_body(&long).len(), 83);
}

#[tokio::test]
async fn test_unreachable_server_reports_failures() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = EvaluationClient::new("http://127.0.0.1:9").unwrap();
    let candidates = vec![Candidate::new("a", "hola"), Candidate::new("b", "adiós")];

    let report = client.rank(&candidates, DEFAULT_TOP_N).await;

    assert_eq!(report.total, 2);
    assert!(report.ranked.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].identifier, "a");
}

mod caesar_tests {
    use crate::client::caesar::{KEY_SPACE, decode, encode, shift_candidates};
    use super::*;

    #[test]
    fn test_encode_known_vectors() {
        assert_eq!(encode("abc", 3), "def");
        assert_eq!(encode("xyz", 3), "abc");
        assert_eq!(encode("XYZ", 3), "ABC");
        assert_eq!(encode("789", 3), "012");
    }

    #[test]
    fn test_encode_reduces_large_and_negative_keys() {
        assert_eq!(encode("abc", 29), "def");
        assert_eq!(encode("abc", -1), "zab");
        assert_eq!(encode("0", -1), "9");
        assert_eq!(encode("Hola", 0), "Hola");
    }

    #[test]
    fn test_non_ascii_and_punctuation_pass_through() {
        assert_eq!(encode("año, ¿qué? ¡sí!", 1), "bñp, ¿rvé? ¡tí!");
    }

    #[test]
    fn test_decode_inverts_encode_including_digits() {
        let plain = "El 7 de julio, 2024: ¡España gana!";
        for key in [-30, -1, 0, 1, 3, 13, 25, 26, 99] {
            assert_eq!(decode(&encode(plain, key), key), plain, "key {key}");
        }
    }

    #[test]
    fn test_shift_candidates_cover_every_key() {
        let cipher = encode("El gato come pescado.", 7);

        let candidates = shift_candidates(&cipher);

        assert_eq!(candidates.len(), KEY_SPACE as usize);
        assert_eq!(candidates[0], Candidate::new("key 0", cipher.clone()));
        assert_eq!(candidates[7].identifier, "key 7");
        assert_eq!(candidates[7].text, "El gato come pescado.");
    }
}
